//! Core types for the content processor.

mod config;
mod document;
mod error;

pub use config::{ProcessorConfig, ServiceConfig};
pub use document::{
    BatchRequest, BatchResponse, ProcessRequest, ProcessResponse, ProcessedDocument,
    RawDocument,
};
pub use error::ProcessError;
