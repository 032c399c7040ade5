//! Tokenizers for patterns and URLs.
//!
//! This module handles:
//! - Turning a pattern string into rule tokens, with grammar checking
//! - Turning a URL into canonical URL tokens (collapsed separators, sorted params)

pub mod pattern;
pub mod url;

pub use pattern::{empty_pattern, tokenize_pattern};
pub use url::tokenize_url;
