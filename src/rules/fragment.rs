use crate::error::MatchError;
use crate::scanner::unescape;
use crate::token::{RuleToken, UrlToken};

/// Apply the fragment rules of a pattern to the fragment of a URL.
///
/// A `match-fragment` rule must equal the URL's fragment exactly; a URL
/// without a fragment never matches. The match is checked before an
/// `omit-fragment` rule drops the fragment.
pub fn apply_fragment_rules(url: &[UrlToken], rules: &[RuleToken]) -> Result<Vec<UrlToken>, MatchError> {
	let fragment = url.iter().find_map(|token| match token {
		UrlToken::Fragment(value) => Some(value.as_str()),
		_ => None,
	});

	let mut omit = false;
	for rule in rules {
		match rule {
			RuleToken::MatchFragment(expected) => {
				if fragment.map(unescape).as_deref() != Some(expected.as_str()) {
					return Err(MatchError::FragmentMismatch {
						expected: expected.clone(),
						found: fragment.map(str::to_string),
					});
				}
			}
			RuleToken::OmitFragment => omit = true,
			_ => {}
		}
	}

	match fragment {
		Some(value) if !omit => Ok(vec![
			UrlToken::FragmentSeparator,
			UrlToken::Fragment(value.to_string()),
		]),
		_ => Ok(Vec::new()),
	}
}
