use crate::error::{Result, UrlPatError};
use crate::tokenize::tokenize_pattern;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Top-level configuration from a `.urlpat.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop directory cascade and jump directly to ~/.urlpat.toml.
	#[serde(default)]
	pub root: bool,

	/// Environment variable name that, if truthy, skips ~/.urlpat.toml lookup.
	/// Useful for CI environments.
	#[serde(default)]
	pub root_config_lookup_disable_env_var: Option<String>,

	/// Rules selecting a pattern for matching URLs.
	/// First matching rule wins.
	#[serde(default)]
	pub rules: Vec<Rule>,
}

/// A rule selecting the pattern to apply to a URL.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Rule {
	/// Name shown by `urlpat config show`; unique within one file.
	pub name: Option<String>,

	/// Regex the URL must match. Without it the rule matches every URL.
	pub url_pattern: Option<String>,

	/// The pattern to apply.
	pub pattern: String,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Merged configuration from multiple config files in the cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// All rules from all configs, in cascade order (first match wins).
	pub rules: Vec<RuleWithSource>,
}

/// A rule with its source config path for debugging/display.
#[derive(Debug, Clone)]
pub struct RuleWithSource {
	/// The rule itself.
	pub rule: Rule,

	/// The config file this rule came from.
	pub source: PathBuf,
}

impl Rule {
	/// Name for messages: the rule's name, or its position in the file.
	pub fn label(&self, index: usize) -> String {
		match &self.name {
			Some(name) => name.clone(),
			None => format!("#{}", index + 1),
		}
	}

	/// Check that the pattern is well formed.
	pub fn validate(&self, index: usize) -> Result<()> {
		tokenize_pattern(&self.pattern).map_err(|source| UrlPatError::InvalidPattern {
			rule: self.label(index),
			pattern: self.pattern.clone(),
			source,
		})?;
		Ok(())
	}
}

impl Config {
	/// Validate all rules in this config.
	pub fn validate(&self, path: &Path) -> Result<()> {
		let mut names = HashSet::new();
		for (index, rule) in self.rules.iter().enumerate() {
			rule.validate(index)?;

			if let Some(name) = &rule.name
				&& !names.insert(name.as_str())
			{
				return Err(UrlPatError::DuplicateRuleName {
					name: name.clone(),
					path: path.to_path_buf(),
				});
			}
		}
		Ok(())
	}
}
