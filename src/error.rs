use std::path::PathBuf;

/// A pattern string that violates the pattern grammar.
///
/// `index` is the character offset in the pattern where the problem was found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
	#[error("'[' must follow '?' like ?[param1,param2,...] (at {index})")]
	MisplacedOpenBracket { index: usize },

	#[error("',' can only appear in a param list like ?[param,param,...] (at {index})")]
	StrayComma { index: usize },

	#[error("']' must follow '[' like ?[param1,param2,...] (at {index})")]
	StrayCloseBracket { index: usize },

	#[error("'^' must follow '[' like ?[^param1,param2,...] (at {index})")]
	MisplacedCaret { index: usize },

	#[error(
		"'-' can only appear at beginning or after a '/' or '?' or '#' and must stand alone (at {index}), try escaping it like \\-"
	)]
	MisplacedMinus { index: usize },

	#[error(
		"expect '[' + comma separated list of param names + ']' like ?[param1,param2] or ?[^param3] (at {index})"
	)]
	MalformedQuery { index: usize },

	#[error("unexpected {character:?} after the query rule (at {index})")]
	UnexpectedQueryCharacter { character: char, index: usize },

	#[error("unexpected {character:?} in param list (at {index}), try escaping it")]
	UnexpectedInParamList { character: char, index: usize },

	#[error("expect ']' to end a comma separated list of param names like ?[param1] (at {index})")]
	UnterminatedParamList { index: usize },
}

/// A URL that does not satisfy a structural rule of the pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
	#[error("path does not match pattern: expected a path separator")]
	SeparatorExpected,

	#[error("path segment {found:?} does not match {expected:?}")]
	SegmentMismatch { expected: String, found: String },

	#[error("missing required path segment")]
	MissingSegment,

	#[error("fragment {found:?} does not match {expected:?}")]
	FragmentMismatch {
		expected: String,
		found: Option<String>,
	},
}

/// Library-level structured errors for urlpat.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum UrlPatError {
	#[error(transparent)]
	Syntax(#[from] SyntaxError),

	#[error(transparent)]
	Match(#[from] MatchError),

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid regex in url_pattern: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Invalid pattern {pattern:?} in rule {rule}")]
	InvalidPattern {
		rule: String,
		pattern: String,
		#[source]
		source: SyntaxError,
	},

	#[error("Duplicate rule name {name:?} in {path}")]
	DuplicateRuleName { name: String, path: PathBuf },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using UrlPatError.
pub type Result<T> = std::result::Result<T, UrlPatError>;
