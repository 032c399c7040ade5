use crate::error::SyntaxError;
use crate::scanner::{Scan, Step, Symbol, scan};
use crate::token::RuleToken;

/// Part of the pattern the scanner is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
	Path,
	Query,
	ParamList,
	Fragment,
}

#[derive(Debug)]
struct PatternState {
	zone: Zone,

	/// The previous character was an unescaped `/` (or there was none).
	after_separator: bool,
}

/// Tokenize a pattern into rule tokens.
///
/// The result always ends with exactly one [`RuleToken::End`]. Query param
/// names are sorted in place so list lookups can use binary search.
pub fn tokenize_pattern(pattern: &str) -> Result<Vec<RuleToken>, SyntaxError> {
	let state = PatternState {
		zone: Zone::Path,
		after_separator: true,
	};
	let mut tokens = scan(pattern, state, step)?;
	sort_param_names(&mut tokens);
	log::trace!("pattern {:?} -> {} rule tokens", pattern, tokens.len());
	Ok(tokens)
}

/// Rule tokens of the empty pattern, which only normalizes.
pub fn empty_pattern() -> Vec<RuleToken> {
	vec![RuleToken::End]
}

fn step(
	scan: &mut Scan<PatternState>,
	index: usize,
	symbol: Symbol,
) -> Result<Step<RuleToken>, SyntaxError> {
	match scan.state.zone {
		Zone::Path => path_step(scan, index, symbol),
		Zone::Query => query_step(scan, index, symbol),
		Zone::ParamList => param_list_step(scan, index, symbol),
		Zone::Fragment => fragment_step(scan, symbol),
	}
}

fn path_step(
	scan: &mut Scan<PatternState>,
	index: usize,
	symbol: Symbol,
) -> Result<Step<RuleToken>, SyntaxError> {
	let after_separator = std::mem::replace(&mut scan.state.after_separator, false);

	let c = match symbol {
		Symbol::End => {
			let mut out = flush_segment(scan);
			out.push(RuleToken::End);
			return Ok(Step::EmitMany(out));
		}
		Symbol::Char(c) => c,
	};

	match c {
		'\\' => {
			scan.escape_next();
			Ok(Step::Skip)
		}
		'/' => {
			let mut out = flush_segment(scan);
			out.push(RuleToken::PathSeparator);
			scan.state.after_separator = true;
			Ok(Step::EmitMany(out))
		}
		'*' => {
			let mut out = flush_segment(scan);
			out.push(RuleToken::Glob);
			Ok(Step::EmitMany(out))
		}
		'-' => {
			if !after_separator {
				return Err(SyntaxError::MisplacedMinus { index });
			}
			let next = scan.peek(index + 1);
			let ends_path = matches!(next, Symbol::End | Symbol::Char('?' | '#'));
			if index == 0 && ends_path {
				Ok(Step::Emit(RuleToken::OmitPath))
			} else if ends_path || next.is('/') {
				Ok(Step::Emit(RuleToken::OmitPathSegment))
			} else {
				Err(SyntaxError::MisplacedMinus { index })
			}
		}
		'?' => {
			let mut out = flush_segment(scan);
			begin_query(scan, index, &mut out)?;
			Ok(Step::EmitMany(out))
		}
		'#' => {
			let mut out = flush_segment(scan);
			begin_fragment(scan, index, &mut out);
			Ok(Step::EmitMany(out))
		}
		'[' => Err(SyntaxError::MisplacedOpenBracket { index }),
		']' => Err(SyntaxError::StrayCloseBracket { index }),
		',' => Err(SyntaxError::StrayComma { index }),
		_ => Ok(Step::Literal),
	}
}

fn query_step(
	scan: &mut Scan<PatternState>,
	index: usize,
	symbol: Symbol,
) -> Result<Step<RuleToken>, SyntaxError> {
	match symbol {
		Symbol::End => Ok(Step::Emit(RuleToken::End)),
		Symbol::Char('#') => {
			let mut out = Vec::new();
			begin_fragment(scan, index, &mut out);
			Ok(Step::EmitMany(out))
		}
		Symbol::Char('[') => Err(SyntaxError::MisplacedOpenBracket { index }),
		Symbol::Char(']') => Err(SyntaxError::StrayCloseBracket { index }),
		Symbol::Char(',') => Err(SyntaxError::StrayComma { index }),
		Symbol::Char(character) => Err(SyntaxError::UnexpectedQueryCharacter { character, index }),
	}
}

fn param_list_step(
	scan: &mut Scan<PatternState>,
	index: usize,
	symbol: Symbol,
) -> Result<Step<RuleToken>, SyntaxError> {
	let c = match symbol {
		Symbol::End => return Err(SyntaxError::UnterminatedParamList { index }),
		Symbol::Char(c) => c,
	};

	match c {
		'\\' => {
			scan.escape_next();
			Ok(Step::Skip)
		}
		',' => Ok(flush_param(scan)),
		']' => {
			scan.state.zone = Zone::Query;
			Ok(flush_param(scan))
		}
		'[' => Err(SyntaxError::MisplacedOpenBracket { index }),
		'^' => Err(SyntaxError::MisplacedCaret { index }),
		'-' => Err(SyntaxError::MisplacedMinus { index }),
		'?' | '#' | '*' | '/' => Err(SyntaxError::UnexpectedInParamList {
			character: c,
			index,
		}),
		_ => Ok(Step::Literal),
	}
}

// Fragment text is never reinterpreted; only escapes are honored.
fn fragment_step(
	scan: &mut Scan<PatternState>,
	symbol: Symbol,
) -> Result<Step<RuleToken>, SyntaxError> {
	match symbol {
		Symbol::Char('\\') => {
			scan.escape_next();
			Ok(Step::Skip)
		}
		Symbol::Char(_) => Ok(Step::Literal),
		Symbol::End => {
			let mut out = Vec::new();
			if scan.has_literal() {
				out.push(RuleToken::MatchFragment(scan.take_literal()));
			}
			out.push(RuleToken::End);
			Ok(Step::EmitMany(out))
		}
	}
}

/// Handle the construct following a `?` at `index`.
fn begin_query(
	scan: &mut Scan<PatternState>,
	index: usize,
	out: &mut Vec<RuleToken>,
) -> Result<(), SyntaxError> {
	scan.state.zone = Zone::Query;

	match scan.peek(index + 1) {
		Symbol::End => {}
		Symbol::Char('*') => scan.skip(1),
		Symbol::Char('-') => {
			out.push(RuleToken::OmitQueryString);
			scan.skip(1);
		}
		Symbol::Char('[') => {
			if scan.peek(index + 2).is('^') {
				out.push(RuleToken::QueryDenyList);
				scan.skip(2);
			} else {
				out.push(RuleToken::QueryAllowList);
				scan.skip(1);
			}
			scan.state.zone = Zone::ParamList;
		}
		Symbol::Char(_) => return Err(SyntaxError::MalformedQuery { index: index + 1 }),
	}

	Ok(())
}

/// Handle the construct following a `#` at `index`.
fn begin_fragment(scan: &mut Scan<PatternState>, index: usize, out: &mut Vec<RuleToken>) {
	scan.state.zone = Zone::Fragment;

	match scan.peek(index + 1) {
		Symbol::Char('-') => {
			out.push(RuleToken::OmitFragment);
			scan.skip(1);
		}
		Symbol::Char('*') => scan.skip(1),
		_ => {}
	}
}

fn flush_segment(scan: &mut Scan<PatternState>) -> Vec<RuleToken> {
	if scan.has_literal() {
		vec![RuleToken::MatchPathSegment(scan.take_literal())]
	} else {
		Vec::new()
	}
}

fn flush_param(scan: &mut Scan<PatternState>) -> Step<RuleToken> {
	if scan.has_literal() {
		Step::Emit(RuleToken::QueryParamName(scan.take_literal()))
	} else {
		Step::Skip
	}
}

/// Sort param names and write them back into the positions param names held.
fn sort_param_names(tokens: &mut [RuleToken]) {
	let mut names: Vec<String> = tokens
		.iter()
		.filter_map(|token| match token {
			RuleToken::QueryParamName(name) => Some(name.clone()),
			_ => None,
		})
		.collect();
	names.sort();

	let mut sorted = names.into_iter();
	for token in tokens.iter_mut() {
		if let RuleToken::QueryParamName(name) = token
			&& let Some(next) = sorted.next()
		{
			*name = next;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::token::RuleToken::*;

	fn seg(value: &str) -> RuleToken {
		MatchPathSegment(value.to_string())
	}

	fn param(value: &str) -> RuleToken {
		QueryParamName(value.to_string())
	}

	fn frag(value: &str) -> RuleToken {
		MatchFragment(value.to_string())
	}

	fn tokens(pattern: &str) -> Vec<RuleToken> {
		tokenize_pattern(pattern).unwrap()
	}

	// ========== Path ==========

	#[test]
	fn test_empty_pattern() {
		assert_eq!(tokens(""), vec![End]);
		assert_eq!(tokens(""), empty_pattern());
	}

	#[test]
	fn test_path_rules() {
		assert_eq!(tokens("*"), vec![Glob, End]);
		assert_eq!(tokens("-"), vec![OmitPath, End]);
		assert_eq!(tokens("/"), vec![PathSeparator, End]);
		assert_eq!(tokens("/*/"), vec![PathSeparator, Glob, PathSeparator, End]);
		assert_eq!(
			tokens("/*/-"),
			vec![PathSeparator, Glob, PathSeparator, OmitPathSegment, End]
		);
		assert_eq!(
			tokens("/foo/*"),
			vec![PathSeparator, seg("foo"), PathSeparator, Glob, End]
		);
		assert_eq!(
			tokens("/-/bar/"),
			vec![PathSeparator, OmitPathSegment, PathSeparator, seg("bar"), PathSeparator, End]
		);
	}

	#[test]
	fn test_leading_minus_before_query_omits_path() {
		assert_eq!(tokens("-?-"), vec![OmitPath, OmitQueryString, End]);
		assert_eq!(tokens("-#-"), vec![OmitPath, OmitFragment, End]);
		assert_eq!(tokens("-/foo"), vec![OmitPathSegment, PathSeparator, seg("foo"), End]);
	}

	#[test]
	fn test_caret_is_literal_in_path() {
		assert_eq!(tokens("/^"), vec![PathSeparator, seg("^"), End]);
	}

	// ========== Query ==========

	#[test]
	fn test_query_rules() {
		assert_eq!(tokens("/-/bar?"), tokens("/-/bar"));
		assert_eq!(tokens("/-/bar?*"), tokens("/-/bar"));
		assert_eq!(tokens("?-"), vec![OmitQueryString, End]);
		assert_eq!(tokens("?[param1]"), vec![QueryAllowList, param("param1"), End]);
		assert_eq!(
			tokens("?[^param1,param2]"),
			vec![QueryDenyList, param("param1"), param("param2"), End]
		);
	}

	#[test]
	fn test_empty_param_names_are_dropped() {
		assert_eq!(tokens("?[param1,]"), vec![QueryAllowList, param("param1"), End]);
		assert_eq!(
			tokens("?[param1,,param2]"),
			vec![QueryAllowList, param("param1"), param("param2"), End]
		);
	}

	#[test]
	fn test_param_names_are_sorted() {
		assert_eq!(
			tokens("?[c,z,a,z]"),
			vec![QueryAllowList, param("a"), param("c"), param("z"), param("z"), End]
		);
	}

	// ========== Fragment ==========

	#[test]
	fn test_fragment_rules() {
		assert_eq!(tokens("?[a]#"), vec![QueryAllowList, param("a"), End]);
		assert_eq!(tokens("?[a]#*"), vec![QueryAllowList, param("a"), End]);
		assert_eq!(tokens("#-"), vec![OmitFragment, End]);
		assert_eq!(tokens("#test-fragment"), vec![frag("test-fragment"), End]);
		assert_eq!(tokens("#-foo"), vec![OmitFragment, frag("foo"), End]);
	}

	#[test]
	fn test_fragment_content_is_literal() {
		assert_eq!(tokens("/#foo?bar"), vec![PathSeparator, frag("foo?bar"), End]);
		assert_eq!(tokens("/#foo//bar"), vec![PathSeparator, frag("foo//bar"), End]);
		assert_eq!(tokens("/#foo#-bar"), vec![PathSeparator, frag("foo#-bar"), End]);
		assert_eq!(tokens("#frag-*?&#/"), vec![frag("frag-*?&#/"), End]);
	}

	// ========== Escaping ==========

	#[test]
	fn test_escapes() {
		assert_eq!(tokens(r"/\\"), vec![PathSeparator, seg(r"\"), End]);
		assert_eq!(tokens(r"/\[path\]"), vec![PathSeparator, seg("[path]"), End]);
		assert_eq!(tokens(r"/foo\-bar"), vec![PathSeparator, seg("foo-bar"), End]);
		assert_eq!(
			tokens(r"/foo\-\?\#\*\,bar"),
			vec![PathSeparator, seg("foo-?#*,bar"), End]
		);
		assert_eq!(
			tokens(r"?[\-\?\#\*\,foo]"),
			vec![QueryAllowList, param("-?#*,foo"), End]
		);
		assert_eq!(
			tokens(r"?[list\[1\],param2]#\-bar"),
			vec![QueryAllowList, param("list[1]"), param("param2"), frag("-bar"), End]
		);
	}

	// ========== Syntax errors ==========

	#[test]
	fn test_bracket_errors() {
		assert_eq!(
			tokenize_pattern("["),
			Err(SyntaxError::MisplacedOpenBracket { index: 0 })
		);
		assert_eq!(tokenize_pattern(","), Err(SyntaxError::StrayComma { index: 0 }));
		assert_eq!(
			tokenize_pattern("]"),
			Err(SyntaxError::StrayCloseBracket { index: 0 })
		);
		assert_eq!(
			tokenize_pattern("?[foo][bar]"),
			Err(SyntaxError::MisplacedOpenBracket { index: 6 })
		);
		assert_eq!(
			tokenize_pattern("?[foo"),
			Err(SyntaxError::UnterminatedParamList { index: 5 })
		);
	}

	#[test]
	fn test_caret_outside_list_start() {
		assert_eq!(
			tokenize_pattern("?[foo^"),
			Err(SyntaxError::MisplacedCaret { index: 5 })
		);
	}

	#[test]
	fn test_misplaced_minus() {
		assert_eq!(
			tokenize_pattern("/foo-bar"),
			Err(SyntaxError::MisplacedMinus { index: 4 })
		);
		assert_eq!(
			tokenize_pattern("/-foo"),
			Err(SyntaxError::MisplacedMinus { index: 1 })
		);
		assert_eq!(
			tokenize_pattern("?[-foo]"),
			Err(SyntaxError::MisplacedMinus { index: 2 })
		);
	}

	#[test]
	fn test_malformed_query() {
		assert_eq!(
			tokenize_pattern("/foo?bar"),
			Err(SyntaxError::MalformedQuery { index: 5 })
		);
		assert_eq!(
			tokenize_pattern("?*x"),
			Err(SyntaxError::UnexpectedQueryCharacter {
				character: 'x',
				index: 2
			})
		);
		assert_eq!(
			tokenize_pattern("?[a?]"),
			Err(SyntaxError::UnexpectedInParamList {
				character: '?',
				index: 3
			})
		);
	}
}
