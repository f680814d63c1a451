//! HTTP API for the content processing service.

pub mod handlers;

pub use handlers::{router, AppState};
