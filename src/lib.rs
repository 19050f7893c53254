pub mod clients;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod models;
pub mod services;

pub use clients::CompletionCapability;
pub use error::{AppError, Result};
pub use services::review_reply::ReviewResponder;
