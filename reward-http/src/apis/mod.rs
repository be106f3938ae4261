pub mod health;
pub mod reward;

pub use health::handle_health;
pub use reward::{handle_confirm, handle_start, handle_status};
