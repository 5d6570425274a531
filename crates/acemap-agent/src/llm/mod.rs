//! Intent extraction through a hosted language model.

mod client;
mod extractor;
pub mod prompt;

pub use client::{ChatCompletionClient, CompletionClient};
pub use extractor::{IntentExtractor, parse_response, strip_code_fences};
