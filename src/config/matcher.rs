use crate::config::types::{MergedConfig, Rule, RuleWithSource};
use crate::error::{Result, UrlPatError};
use crate::token::RuleToken;
use crate::tokenize::tokenize_pattern;
use regex::Regex;
use std::path::PathBuf;

/// A compiled rule ready for matching.
#[derive(Debug)]
pub struct CompiledRule {
	/// The original rule.
	pub rule: Rule,

	/// Compiled url pattern regex.
	pub url_regex: Option<Regex>,

	/// The rule's pattern, tokenized.
	pub tokens: Vec<RuleToken>,

	/// Source config path (for debugging).
	pub source: PathBuf,
}

impl CompiledRule {
	/// Compile a rule from a RuleWithSource.
	pub fn from_rule_with_source(rws: &RuleWithSource) -> Result<Self> {
		let url_regex = rws.rule.url_pattern.as_deref().map(compile_regex).transpose()?;

		let tokens =
			tokenize_pattern(&rws.rule.pattern).map_err(|source| UrlPatError::InvalidPattern {
				rule: rws
					.rule
					.name
					.clone()
					.unwrap_or_else(|| rws.source.display().to_string()),
				pattern: rws.rule.pattern.clone(),
				source,
			})?;

		Ok(CompiledRule {
			rule: rws.rule.clone(),
			url_regex,
			tokens,
			source: rws.source.clone(),
		})
	}

	/// Check if this rule applies to the given URL.
	pub fn matches(&self, url: &str) -> bool {
		self.url_regex.as_ref().is_none_or(|regex| regex.is_match(url))
	}
}

/// Compile a regex pattern string.
fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| UrlPatError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}

/// Compile all rules in a merged config.
pub fn compile_rules(config: &MergedConfig) -> Result<Vec<CompiledRule>> {
	config
		.rules
		.iter()
		.map(CompiledRule::from_rule_with_source)
		.collect()
}

/// Find the first rule that applies to a URL.
pub fn find_matching_rule<'a>(rules: &'a [CompiledRule], url: &str) -> Option<&'a CompiledRule> {
	rules.iter().find(|rule| rule.matches(url))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn make_rule_with_source(rule: Rule) -> RuleWithSource {
		RuleWithSource {
			rule,
			source: PathBuf::from("test.toml"),
		}
	}

	fn compile(url_pattern: Option<&str>, pattern: &str) -> CompiledRule {
		let rule = Rule {
			url_pattern: url_pattern.map(str::to_string),
			pattern: pattern.to_string(),
			..Default::default()
		};
		CompiledRule::from_rule_with_source(&make_rule_with_source(rule)).unwrap()
	}

	#[test]
	fn test_compile_invalid_regex() {
		let result = compile_regex(r"[invalid");
		match result.unwrap_err() {
			UrlPatError::InvalidRegex { pattern, .. } => {
				assert_eq!(pattern, "[invalid");
			}
			_ => panic!("Expected InvalidRegex error"),
		}
	}

	#[test]
	fn test_compile_tokenizes_pattern() {
		let compiled = compile(None, "/*?-");
		assert_eq!(
			compiled.tokens,
			vec![
				RuleToken::PathSeparator,
				RuleToken::Glob,
				RuleToken::OmitQueryString,
				RuleToken::End
			]
		);
	}

	#[test]
	fn test_compile_invalid_pattern() {
		let rule = Rule {
			name: Some("broken".to_string()),
			pattern: "?x".to_string(),
			..Default::default()
		};
		let result = CompiledRule::from_rule_with_source(&make_rule_with_source(rule));
		match result.unwrap_err() {
			UrlPatError::InvalidPattern { rule, pattern, .. } => {
				assert_eq!(rule, "broken");
				assert_eq!(pattern, "?x");
			}
			other => panic!("Expected InvalidPattern error, got {other:?}"),
		}
	}

	#[test]
	fn test_rule_matches_url_pattern() {
		let compiled = compile(Some(r"^https?://[^/]+/search"), "/search?[q]");
		assert!(compiled.matches("https://example.com/search?q=rust"));
		assert!(!compiled.matches("https://example.com/about"));
	}

	#[test]
	fn test_rule_without_url_pattern_matches_everything() {
		let compiled = compile(None, "");
		assert!(compiled.matches("anything at all"));
		assert!(compiled.matches(""));
	}

	#[test]
	fn test_find_matching_rule_first_wins() {
		let compiled = vec![
			compile(Some("/docs/"), "/docs/*"),
			compile(Some("/search"), "?[q]"),
			compile(Some("/search"), "?-"),
			compile(None, "#-"),
		];

		let matched = find_matching_rule(&compiled, "https://example.com/search?q=1").unwrap();
		assert_eq!(matched.rule.pattern, "?[q]");

		let fallback = find_matching_rule(&compiled, "https://example.com/").unwrap();
		assert_eq!(fallback.rule.pattern, "#-");

		assert!(find_matching_rule(&compiled[..3], "https://example.com/").is_none());
	}
}
