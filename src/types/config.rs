//! Configuration types for the processor and the service.

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_MAX_CONTENT_SIZE, DEFAULT_MAX_REQUEST_SIZE, DEFAULT_PORT};

/// Options for a single [`ContentProcessor`](crate::ContentProcessor).
///
/// Deserializes from the option bag renderers pass around
/// (`{"sanitize": false}`); unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Whether HTML content is sanitized and CSS is stripped of script
    /// openers and `javascript:` URIs.
    #[serde(alias = "sanitize")]
    pub sanitize_html: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            sanitize_html: true,
        }
    }
}

impl ProcessorConfig {
    /// Set whether sanitization is enabled.
    pub fn with_sanitize(mut self, sanitize: bool) -> Self {
        self.sanitize_html = sanitize;
        self
    }
}

/// Global service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Port the HTTP service listens on
    pub port: u16,

    /// Processor options shared by every request
    pub processor: ProcessorConfig,

    /// Largest content accepted per request or batch document, in bytes
    pub max_content_size: usize,

    /// Largest request body accepted, in bytes; batches carry several
    /// documents per request
    pub max_request_size: usize,

    /// Whether a batch keeps going after a document fails
    pub batch_continue_on_error: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            processor: ProcessorConfig::default(),
            max_content_size: DEFAULT_MAX_CONTENT_SIZE,
            max_request_size: DEFAULT_MAX_REQUEST_SIZE,
            batch_continue_on_error: true,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let max_content_size = std::env::var("MAX_CONTENT_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONTENT_SIZE);

        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            processor: ProcessorConfig {
                sanitize_html: std::env::var("SANITIZE_HTML")
                    .ok()
                    .and_then(|s| parse_bool(&s))
                    .unwrap_or(true),
            },
            max_content_size,
            // Never below a single document.
            max_request_size: std::env::var("MAX_REQUEST_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_REQUEST_SIZE)
                .max(max_content_size),
            batch_continue_on_error: std::env::var("BATCH_CONTINUE_ON_ERROR")
                .ok()
                .and_then(|s| parse_bool(&s))
                .unwrap_or(true),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
