//! Content handlers for the built-in languages.

mod base;
mod json;
mod markup;
mod recovering;
mod text;

pub use base::{FnHandler, Handler, HandlerContext};
pub use json::JsonHandler;
pub use markup::{CssHandler, HtmlHandler};
pub use recovering::RecoveryHandler;
pub use text::TextHandler;
