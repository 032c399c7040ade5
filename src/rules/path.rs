use crate::error::MatchError;
use crate::scanner::unescape;
use crate::token::{RuleToken, UrlToken};

/// Read position over the path tokens of a URL.
struct PathCursor<'a, 'b> {
	tokens: &'b [&'a UrlToken],
	pos: usize,
}

impl<'a, 'b> PathCursor<'a, 'b> {
	fn at_end(&self) -> bool {
		self.pos >= self.tokens.len()
	}

	fn take_separator(&mut self) -> bool {
		let found = matches!(self.tokens.get(self.pos), Some(UrlToken::PathSeparator));
		if found {
			self.pos += 1;
		}
		found
	}

	fn take_segment(&mut self) -> Option<&'a UrlToken> {
		let token = self.tokens.get(self.pos).copied()?;
		if let UrlToken::PathSegment(_) = token {
			self.pos += 1;
			Some(token)
		} else {
			None
		}
	}

	fn take_rest(&mut self) -> &'b [&'a UrlToken] {
		let rest = &self.tokens[self.pos..];
		self.pos = self.tokens.len();
		rest
	}
}

/// Path tokens written so far, plus a separator that is only written once a
/// segment follows it.
#[derive(Debug, Default)]
struct PathOutput {
	tokens: Vec<UrlToken>,
	pending: bool,
}

impl PathOutput {
	fn flush(&mut self) {
		if std::mem::take(&mut self.pending) {
			self.tokens.push(UrlToken::PathSeparator);
		}
	}

	fn segment(&mut self, token: &UrlToken) {
		self.flush();
		self.tokens.push(token.clone());
	}

	/// A path that matched nothing but a separator is the root path.
	fn finish(mut self) -> Vec<UrlToken> {
		if self.pending && self.tokens.is_empty() {
			self.tokens.push(UrlToken::PathSeparator);
		}
		self.tokens
	}
}

/// Apply the path rules of a pattern to the path tokens of a URL.
///
/// Returns the rewritten path tokens only. When the pattern has no path
/// rules the URL path is returned unchanged. When the path rules end in a
/// segment rule followed by a query or fragment rule, the rest of the URL
/// path is copied through; otherwise it is dropped.
pub fn apply_path_rules(url: &[UrlToken], rules: &[RuleToken]) -> Result<Vec<UrlToken>, MatchError> {
	let path: Vec<&UrlToken> = url.iter().filter(|token| token.is_path()).collect();
	let boundary = rules
		.iter()
		.position(|rule| !rule.is_path_rule())
		.unwrap_or(rules.len());
	let stops_at_marker = rules
		.get(boundary)
		.is_some_and(|rule| rule.is_query_rule() || rule.is_fragment_rule());
	let rules = &rules[..boundary];

	if rules.is_empty() {
		return Ok(path.into_iter().cloned().collect());
	}

	let mut cursor = PathCursor {
		tokens: &path,
		pos: 0,
	};
	let mut out = PathOutput::default();

	// `*`, `foo` and `-` at the start of a pattern stand for `/*`, `/foo`, `/-`.
	if matches!(
		rules[0],
		RuleToken::Glob | RuleToken::MatchPathSegment(_) | RuleToken::OmitPathSegment
	) && cursor.take_separator()
	{
		out.pending = true;
	}

	let mut i = 0;
	while i < rules.len() {
		let last = i + 1 == rules.len();

		match &rules[i] {
			RuleToken::PathSeparator => {
				if cursor.take_separator() {
					out.pending = !last;
				} else if !(last && cursor.at_end()) {
					return Err(MatchError::SeparatorExpected);
				}
			}
			RuleToken::MatchPathSegment(expected) => {
				let token = cursor.take_segment().ok_or(MatchError::MissingSegment)?;
				if unescape(token.value()) != expected.as_str() {
					return Err(MatchError::SegmentMismatch {
						expected: expected.clone(),
						found: token.value().to_string(),
					});
				}
				out.segment(token);
			}
			RuleToken::Glob if last => {
				let rest = cursor.take_rest();
				if rest.is_empty() && !(out.pending && out.tokens.is_empty()) {
					return Err(MatchError::MissingSegment);
				}
				out.flush();
				out.tokens.extend(rest.iter().map(|token| (*token).clone()));
			}
			RuleToken::Glob => {
				let token = cursor.take_segment().ok_or(MatchError::MissingSegment)?;
				out.segment(token);
			}
			RuleToken::OmitPathSegment => {
				cursor.take_segment();
				// `-/` drops the separator after the segment along with it.
				if rules.get(i + 1) == Some(&RuleToken::PathSeparator) && cursor.take_separator() {
					i += 1;
				}
			}
			RuleToken::OmitPath => return Ok(out.tokens),
			RuleToken::QueryAllowList
			| RuleToken::QueryDenyList
			| RuleToken::QueryParamName(_)
			| RuleToken::OmitQueryString
			| RuleToken::MatchFragment(_)
			| RuleToken::OmitFragment
			| RuleToken::End => break,
		}

		i += 1;
	}

	if stops_at_marker
		&& matches!(
			rules.last(),
			Some(RuleToken::Glob | RuleToken::MatchPathSegment(_) | RuleToken::OmitPathSegment)
		)
	{
		out.tokens.extend(cursor.take_rest().iter().map(|token| (*token).clone()));
	}

	Ok(out.finish())
}
