use crate::config::types::Config;
use crate::error::{Result, UrlPatError};
use std::path::Path;

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	let content = std::fs::read_to_string(path).map_err(|source| UrlPatError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_config_str(&content, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config =
		toml::from_str(content).map_err(|source| UrlPatError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	config.validate(path)?;

	Ok(config)
}

/// Template written by `urlpat --init`.
pub fn init_template() -> &'static str {
	r#"# urlpat configuration
#
# Rules are tried in order; the first rule whose url_pattern (a regex)
# matches the URL supplies the pattern. A rule without url_pattern matches
# every URL. Files in parent directories and ~/.urlpat.toml are consulted
# after this one.

# Stop looking for .urlpat.toml in parent directories.
# root = true

# Skip ~/.urlpat.toml when this environment variable is truthy.
# root-config-lookup-disable-env-var = "CI"

# Keep only the search term on search pages.
# [[rules]]
# name = "search"
# url_pattern = "^https?://[^/]+/search"
# pattern = "/search?[q]"

# Keep the first two path segments and drop tracking params elsewhere.
# [[rules]]
# name = "default"
# pattern = "/*/*/?[^utm_source,utm_medium,utm_campaign]"
"#
}
