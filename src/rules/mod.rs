//! Rule application for urlpat.
//!
//! This module handles:
//! - Path rules: literal segment matching, globs and omissions
//! - Query rules: allow lists, deny lists and dropping the query string
//! - Fragment rules: literal matching and dropping the fragment
//!
//! Each stage sees the whole URL and the whole pattern, picks out the tokens
//! of its own zone, and produces one block of output tokens. The blocks are
//! joined in a fixed order behind the scheme and authority.

pub mod fragment;
pub mod path;
pub mod query;

pub use fragment::apply_fragment_rules;
pub use path::apply_path_rules;
pub use query::{QueryAction, apply_query_rules};

use crate::error::MatchError;
use crate::token::{RuleToken, UrlToken};
use crate::tokenize::empty_pattern;

/// Apply all rules, failing on the first structural mismatch.
pub fn apply_rules(url: &[UrlToken], rules: &[RuleToken]) -> Result<Vec<UrlToken>, MatchError> {
	let path = apply_path_rules(url, rules)?;
	let query = apply_query_rules(url, rules);
	let fragment = apply_fragment_rules(url, rules)?;
	Ok(assemble(url, path, query, fragment))
}

/// Apply all rules, normalizing instead when the path does not match.
///
/// Only a fragment mismatch is returned as an error.
pub fn apply_rules_or_normalize(
	url: &[UrlToken],
	rules: &[RuleToken],
) -> Result<Vec<UrlToken>, MatchError> {
	match apply_rules(url, rules) {
		Err(err @ MatchError::FragmentMismatch { .. }) => Err(err),
		Err(err) => {
			log::debug!("{err}; normalizing instead");
			apply_rules(url, &empty_pattern())
		}
		ok => ok,
	}
}

fn assemble(
	url: &[UrlToken],
	path: Vec<UrlToken>,
	query: Vec<UrlToken>,
	fragment: Vec<UrlToken>,
) -> Vec<UrlToken> {
	let mut out: Vec<UrlToken> = url.iter().filter(|token| token.is_authority()).cloned().collect();
	out.extend(path);
	out.extend(query);
	out.extend(fragment);
	out.push(UrlToken::End);
	out
}
