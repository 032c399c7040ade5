//! Token types produced by the tokenizers.
//!
//! [`UrlToken`] describes the structure of a URL and carries the exact text
//! needed to serialize it again; [`RuleToken`] describes a pattern.

use std::fmt;

/// A single `name=value` entry of a query string.
///
/// Ordering is by name, then value, then raw text, which is the canonical
/// order of query params.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueryParam {
	/// Text before the first unescaped `=`, or the whole entry.
	pub name: String,

	/// Text after the first unescaped `=`, empty when there is none.
	pub value: String,

	/// The entry exactly as it appeared in the URL.
	pub raw: String,
}

impl QueryParam {
	/// Split a raw query entry on its first unescaped `=`.
	pub fn parse(raw: String) -> Self {
		let mut escaped = false;
		let split = raw
			.char_indices()
			.find(|&(_, c)| {
				let hit = c == '=' && !escaped;
				escaped = c == '\\' && !escaped;
				hit
			})
			.map(|(i, _)| i);

		let (name, value) = match split {
			Some(i) => (raw[..i].to_string(), raw[i + 1..].to_string()),
			None => (raw.clone(), String::new()),
		};

		QueryParam { name, value, raw }
	}
}

/// Structural piece of a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlToken {
	Scheme(String),
	SchemeSeparator,
	Authority(String),
	PathSeparator,
	PathSegment(String),
	QuerySeparator,
	QueryParam(QueryParam),
	QueryParamSeparator,
	FragmentSeparator,
	Fragment(String),
	End,
}

impl UrlToken {
	/// Text this token contributes to a serialized URL.
	pub fn value(&self) -> &str {
		match self {
			UrlToken::Scheme(text)
			| UrlToken::Authority(text)
			| UrlToken::PathSegment(text)
			| UrlToken::Fragment(text) => text,
			UrlToken::QueryParam(param) => &param.raw,
			UrlToken::SchemeSeparator => "://",
			UrlToken::PathSeparator => "/",
			UrlToken::QuerySeparator => "?",
			UrlToken::QueryParamSeparator => "&",
			UrlToken::FragmentSeparator => "#",
			UrlToken::End => "",
		}
	}

	pub fn kind(&self) -> &'static str {
		match self {
			UrlToken::Scheme(_) => "scheme",
			UrlToken::SchemeSeparator => "scheme-separator",
			UrlToken::Authority(_) => "authority",
			UrlToken::PathSeparator => "path-separator",
			UrlToken::PathSegment(_) => "path-segment",
			UrlToken::QuerySeparator => "query-separator",
			UrlToken::QueryParam(_) => "query-param",
			UrlToken::QueryParamSeparator => "query-param-separator",
			UrlToken::FragmentSeparator => "fragment-separator",
			UrlToken::Fragment(_) => "fragment",
			UrlToken::End => "end",
		}
	}

	/// Scheme and authority tokens, which every transform keeps as-is.
	pub fn is_authority(&self) -> bool {
		matches!(
			self,
			UrlToken::Scheme(_) | UrlToken::SchemeSeparator | UrlToken::Authority(_)
		)
	}

	pub fn is_path(&self) -> bool {
		matches!(self, UrlToken::PathSeparator | UrlToken::PathSegment(_))
	}
}

impl fmt::Display for UrlToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			UrlToken::Scheme(text)
			| UrlToken::Authority(text)
			| UrlToken::PathSegment(text)
			| UrlToken::Fragment(text) => write!(f, "{}({:?})", self.kind(), text),
			UrlToken::QueryParam(param) => write!(
				f,
				"{}({:?}, name={:?}, value={:?})",
				self.kind(),
				param.raw,
				param.name,
				param.value
			),
			_ => f.write_str(self.kind()),
		}
	}
}

/// Directive of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleToken {
	PathSeparator,
	Glob,
	OmitPath,
	OmitPathSegment,
	MatchPathSegment(String),
	QueryAllowList,
	QueryDenyList,
	QueryParamName(String),
	OmitQueryString,
	MatchFragment(String),
	OmitFragment,
	End,
}

impl RuleToken {
	pub fn kind(&self) -> &'static str {
		match self {
			RuleToken::PathSeparator => "path-separator",
			RuleToken::Glob => "glob",
			RuleToken::OmitPath => "omit-path",
			RuleToken::OmitPathSegment => "omit-path-segment",
			RuleToken::MatchPathSegment(_) => "match-path-segment",
			RuleToken::QueryAllowList => "query-begin-allow-list",
			RuleToken::QueryDenyList => "query-begin-deny-list",
			RuleToken::QueryParamName(_) => "query-param-name",
			RuleToken::OmitQueryString => "omit-query-string",
			RuleToken::MatchFragment(_) => "match-fragment",
			RuleToken::OmitFragment => "omit-fragment",
			RuleToken::End => "end",
		}
	}

	pub fn is_path_rule(&self) -> bool {
		matches!(
			self,
			RuleToken::PathSeparator
				| RuleToken::Glob
				| RuleToken::OmitPath
				| RuleToken::OmitPathSegment
				| RuleToken::MatchPathSegment(_)
		)
	}

	pub fn is_query_rule(&self) -> bool {
		matches!(
			self,
			RuleToken::QueryAllowList
				| RuleToken::QueryDenyList
				| RuleToken::QueryParamName(_)
				| RuleToken::OmitQueryString
		)
	}

	pub fn is_fragment_rule(&self) -> bool {
		matches!(self, RuleToken::MatchFragment(_) | RuleToken::OmitFragment)
	}
}

impl fmt::Display for RuleToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RuleToken::MatchPathSegment(text)
			| RuleToken::QueryParamName(text)
			| RuleToken::MatchFragment(text) => write!(f, "{}({:?})", self.kind(), text),
			_ => f.write_str(self.kind()),
		}
	}
}
