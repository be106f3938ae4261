pub mod http;
pub mod apis;
pub mod error;

pub use error::{ApiJson, ErrorResponse};
pub use http::{ServerConfig, ServerState, build_router, start_server};
