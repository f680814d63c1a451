//! Processing primitives shared by the handlers.
//!
//! This module provides:
//! - Language tags and content-based language detection
//! - Escape-recovery rule chains for legacy data
//! - HTML escaping and the sanitizer seam

pub mod escape;
pub mod language;
pub mod recovery;

pub use escape::{escape_html, escape_text, HtmlSanitizer};
pub use language::{DetectionRule, Language, LanguageDetector};
pub use recovery::RecoveryRule;
