//! urlpat - rewrite URLs with a compact pattern language.
//!
//! A pattern keeps, drops or requires parts of a URL:
//! - Path: `/` separators, literal segments, `*` globs, `-` to drop a segment
//!   (or the whole path when the pattern starts with a lone `-`)
//! - Query: `?` or `?*` keeps every param, `?-` drops the query string,
//!   `?[a,b]` keeps only the listed params, `?[^a,b]` drops them
//! - Fragment: `#` or `#*` keeps it, `#-` drops it, `#text` requires it to be `text`
//!
//! `\` makes the next character literal. Untouched URL parts are always
//! normalized: repeated and trailing path separators go away, empty query
//! entries are dropped, and query params are sorted by name, then value.
//!
//! # Example
//!
//! ```
//! use urlpat::transform;
//!
//! assert_eq!(transform("/foo/bar/is/a/thing", "/*/-/*"), "/foo/is/a/thing");
//! assert_eq!(transform("/foo/bar?b=2&c=3&a=1#test", "?[c,a]"), "/foo/bar?a=1&c=3#test");
//! assert_eq!(transform("///foo///bar///", ""), "/foo/bar");
//! ```

pub mod config;
pub mod error;
pub mod rules;
pub mod scanner;
pub mod serialize;
pub mod token;
pub mod tokenize;

pub use error::{MatchError, Result, SyntaxError, UrlPatError};
pub use serialize::serialize;
pub use token::{QueryParam, RuleToken, UrlToken};

use crate::tokenize::{empty_pattern, tokenize_pattern, tokenize_url};

/// Rewrite `url` according to `pattern`.
///
/// Never fails. A malformed pattern is treated as the empty pattern, a path
/// that does not match the pattern is only normalized, and a fragment that
/// does not match returns `url` exactly as given.
pub fn transform(url: &str, pattern: &str) -> String {
	let rules = tokenize_pattern(pattern).unwrap_or_else(|err| {
		log::debug!("invalid pattern {pattern:?}: {err}; normalizing only");
		empty_pattern()
	});
	transform_with_rules(url, &rules)
}

/// Rewrite `url` with an already tokenized pattern, recovering like [`transform`].
pub fn transform_with_rules(url: &str, rules: &[RuleToken]) -> String {
	match rules::apply_rules_or_normalize(&tokenize_url(url), rules) {
		Ok(tokens) => serialize(&tokens),
		Err(err) => {
			log::debug!("{err}; returning url unchanged");
			url.to_string()
		}
	}
}

/// Rewrite `url` according to `pattern`, reporting every failure.
///
/// Unlike [`transform`] nothing is recovered: a malformed pattern is a
/// [`SyntaxError`] and a URL the pattern does not fit is a [`MatchError`].
pub fn try_transform(url: &str, pattern: &str) -> Result<String> {
	let rules = tokenize_pattern(pattern)?;
	let tokens = rules::apply_rules(&tokenize_url(url), &rules)?;
	Ok(serialize(&tokens))
}

/// Normalize `url` without applying any rules.
pub fn normalize(url: &str) -> String {
	transform_with_rules(url, &empty_pattern())
}

/// Tokenize a pattern into rule tokens.
pub fn pattern_tokens(pattern: &str) -> std::result::Result<Vec<RuleToken>, SyntaxError> {
	tokenize_pattern(pattern)
}

/// Tokenize a URL into its canonical URL tokens.
pub fn url_tokens(url: &str) -> Vec<UrlToken> {
	tokenize_url(url)
}
