//! Content Processor Library
//!
//! Turns raw code snippets from lesson and quiz data into HTML-safe,
//! display-ready text: detects the snippet language, reverses legacy escape
//! artifacts (`\${x}`, `\$VAR`, `\${{ }}`), and escapes or sanitizes the
//! result.

pub mod api;
pub mod batch;
pub mod handlers;
pub mod processing;
pub mod processor;
pub mod router;
pub mod types;

pub use batch::{BatchConfig, BatchProcessor, BatchResult};
pub use handlers::{Handler, HandlerContext};
pub use processing::{escape_html, HtmlSanitizer, Language, LanguageDetector};
pub use processor::{ContentProcessor, ObjectStats};
pub use router::{HandlerRouter, ResolvedLanguage};
pub use types::{ProcessError, ProcessorConfig, ServiceConfig};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::batch::*;
    pub use crate::handlers::*;
    pub use crate::processing::*;
    pub use crate::processor::*;
    pub use crate::router::*;
    pub use crate::types::*;
}

/// Default port for the HTTP service
pub const DEFAULT_PORT: u16 = 3018;

/// Maximum content size accepted per snippet or document (10MB)
pub const DEFAULT_MAX_CONTENT_SIZE: usize = 10 * 1024 * 1024;

/// Maximum HTTP request body size (64MB)
pub const DEFAULT_MAX_REQUEST_SIZE: usize = 64 * 1024 * 1024;
