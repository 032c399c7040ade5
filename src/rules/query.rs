use crate::scanner::unescape;
use crate::token::{QueryParam, RuleToken, UrlToken};

/// What the query rules of a pattern do with the URL's params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryAction<'a> {
	/// No query rule, `?` or `?*`.
	ShowAll,
	/// `?-`
	ShowNone,
	/// `?[a,b]`; names are sorted.
	ShowList(Vec<&'a str>),
	/// `?[^a,b]`; names are sorted.
	SkipList(Vec<&'a str>),
}

impl QueryAction<'_> {
	/// Classify the query rules of a pattern. The first query rule decides.
	pub fn from_rules(rules: &[RuleToken]) -> QueryAction<'_> {
		let names = || {
			let mut names: Vec<&str> = rules
				.iter()
				.filter_map(|rule| match rule {
					RuleToken::QueryParamName(name) => Some(name.as_str()),
					_ => None,
				})
				.collect();
			names.sort_unstable();
			names
		};

		for rule in rules {
			match rule {
				RuleToken::OmitQueryString => return QueryAction::ShowNone,
				RuleToken::QueryAllowList => return QueryAction::ShowList(names()),
				RuleToken::QueryDenyList => return QueryAction::SkipList(names()),
				_ => {}
			}
		}
		QueryAction::ShowAll
	}

	/// Whether a param called `name` survives.
	pub fn keeps(&self, name: &str) -> bool {
		match self {
			QueryAction::ShowAll => true,
			QueryAction::ShowNone => false,
			QueryAction::ShowList(names) => names.binary_search(&name).is_ok(),
			QueryAction::SkipList(names) => names.binary_search(&name).is_err(),
		}
	}
}

/// Apply the query rules of a pattern to the query params of a URL.
///
/// Params keep their canonical order. Survivors are joined with `&` behind a
/// single `?`; when nothing survives the block is empty.
pub fn apply_query_rules(url: &[UrlToken], rules: &[RuleToken]) -> Vec<UrlToken> {
	let action = QueryAction::from_rules(rules);
	let params = url.iter().filter_map(|token| match token {
		UrlToken::QueryParam(param) => Some(param),
		_ => None,
	});

	let mut out = Vec::new();
	for param in params.filter(|param: &&QueryParam| action.keeps(&unescape(&param.name))) {
		out.push(if out.is_empty() {
			UrlToken::QuerySeparator
		} else {
			UrlToken::QueryParamSeparator
		});
		out.push(UrlToken::QueryParam(param.clone()));
	}
	out
}
