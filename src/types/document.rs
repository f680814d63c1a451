//! Document types and request/response definitions.

use serde::{Deserialize, Serialize};

/// A lesson or quiz data document as raw JSON text.
///
/// This is the input unit of batch processing, typically one data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    /// Document name (file stem or caller-chosen label)
    pub name: String,

    /// The JSON text of the document
    pub content: String,
}

impl RawDocument {
    /// Create a new raw document.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// A document after object traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedDocument {
    /// Name of the source document
    pub name: String,

    /// The processed record tree
    pub data: serde_json::Value,
}

/// Request to process a single snippet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    /// Raw snippet text
    pub content: String,

    /// Declared language tag, detected when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Response for a processed snippet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    /// Display-ready text
    pub content: String,

    /// The language the snippet was processed as
    pub language: String,
}

/// Request to process several documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Documents to process
    pub documents: Vec<RawDocument>,
}

/// Response for a processed batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    /// Documents that were processed successfully
    pub documents: Vec<ProcessedDocument>,

    /// Aggregate statistics and per-document errors
    pub result: crate::batch::BatchResult,
}
