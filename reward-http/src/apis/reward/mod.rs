pub mod types;
pub mod handler;

pub use types::{ConfirmRequest, ConfirmResponse, StartRequest, StartResponse};
pub use handler::{handle_confirm, handle_start, handle_status};
