//! Batch processing of lesson and quiz data documents.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::processor::{ContentProcessor, ObjectStats};
use crate::types::{ProcessedDocument, RawDocument};
use crate::DEFAULT_MAX_CONTENT_SIZE;

/// Configuration for batch processing.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Whether to continue on individual document failures
    pub continue_on_error: bool,
    /// Maximum content size per document (bytes)
    pub max_content_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            continue_on_error: true,
            max_content_size: DEFAULT_MAX_CONTENT_SIZE,
        }
    }
}

/// Result of batch processing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub total_documents: usize,
    pub processed_documents: usize,
    pub failed_documents: usize,
    pub code_fields: usize,
    pub html_fields: usize,
    pub errors: Vec<BatchError>,
}

/// Error during batch processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchError {
    pub document: String,
    pub error: String,
}

/// Batch processor applying object traversal to many documents.
pub struct BatchProcessor {
    processor: Arc<ContentProcessor>,
    config: BatchConfig,
}

impl BatchProcessor {
    /// Create a new batch processor.
    pub fn new(processor: Arc<ContentProcessor>, config: BatchConfig) -> Self {
        Self { processor, config }
    }

    /// Process a batch of documents.
    ///
    /// Failed documents are reported in the result and left out of the
    /// output, unless `continue_on_error` is off, in which case the first
    /// failure aborts the batch.
    pub fn process_batch(
        &self,
        documents: Vec<RawDocument>,
    ) -> Result<(Vec<ProcessedDocument>, BatchResult)> {
        let mut result = BatchResult {
            total_documents: documents.len(),
            ..Default::default()
        };
        let mut processed = Vec::with_capacity(documents.len());

        info!(total_documents = result.total_documents, "Starting batch processing");

        for document in documents {
            match self.process_single_document(&document) {
                Ok((data, stats)) => {
                    result.processed_documents += 1;
                    result.code_fields += stats.code_fields;
                    result.html_fields += stats.html_fields;
                    processed.push(ProcessedDocument {
                        name: document.name,
                        data,
                    });
                }
                Err(e) => {
                    if !self.config.continue_on_error {
                        return Err(e.context(format!("document `{}`", document.name)));
                    }

                    warn!(document = %document.name, error = %e, "Failed to process document");
                    result.failed_documents += 1;
                    result.errors.push(BatchError {
                        document: document.name,
                        error: format!("{:#}", e),
                    });
                }
            }
        }

        info!(
            processed = result.processed_documents,
            failed = result.failed_documents,
            code_fields = result.code_fields,
            html_fields = result.html_fields,
            "Batch processing complete"
        );

        Ok((processed, result))
    }

    /// Parse and process a single document.
    fn process_single_document(
        &self,
        document: &RawDocument,
    ) -> Result<(serde_json::Value, ObjectStats)> {
        if document.content_len() > self.config.max_content_size {
            bail!(
                "Document too large: {} bytes (max: {})",
                document.content_len(),
                self.config.max_content_size
            );
        }

        let value: serde_json::Value =
            serde_json::from_str(&document.content).context("Invalid JSON document")?;

        let (data, stats) = self.processor.process_object_with_stats(&value);
        debug!(
            document = %document.name,
            code_fields = stats.code_fields,
            html_fields = stats.html_fields,
            "Processed document"
        );

        Ok((data, stats))
    }
}

/// Load every `*.json` file in a directory as a raw document.
///
/// Files are returned sorted by name. Files larger than `max_content_size`
/// are skipped with a warning.
pub fn load_documents(dir: &Path, max_content_size: usize) -> Result<Vec<RawDocument>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let size = std::fs::metadata(&path)
            .with_context(|| format!("Failed to stat {}", path.display()))?
            .len();
        if size > max_content_size as u64 {
            warn!(path = %path.display(), size, "Skipping oversized document");
            continue;
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        documents.push(RawDocument { name, content });
    }

    debug!(dir = %dir.display(), documents = documents.len(), "Loaded documents");
    Ok(documents)
}
