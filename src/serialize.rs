use crate::token::{RuleToken, UrlToken};

/// Join token values into a URL string.
///
/// Every delimiter is its own token, so nothing is inserted between values.
pub fn serialize(tokens: &[UrlToken]) -> String {
	tokens.iter().map(UrlToken::value).collect()
}

/// Render rule tokens one per line, for inspection.
pub fn describe_rules(tokens: &[RuleToken]) -> String {
	tokens.iter().map(|token| format!("{token}\n")).collect()
}

/// Render URL tokens one per line, for inspection.
pub fn describe_url(tokens: &[UrlToken]) -> String {
	tokens.iter().map(|token| format!("{token}\n")).collect()
}
