use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, MergedConfig, RuleWithSource};
use crate::error::{Result, UrlPatError};
use std::path::{Path, PathBuf};

/// File name looked up in every directory of the cascade.
pub const CONFIG_FILE_NAME: &str = ".urlpat.toml";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.urlpat.toml`
/// 2. If found and `root = true`, stop walking up
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.urlpat.toml (unless disabled)
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();

	for dir in start_dir.ancestors() {
		let config_path = dir.join(CONFIG_FILE_NAME);
		if !config_path.is_file() {
			continue;
		}

		log::debug!("loading config {}", config_path.display());
		let config = parse_config_file(&config_path)?;
		let root = config.root;
		configs.push(LoadedConfig {
			config,
			path: config_path,
		});

		if root {
			break;
		}
	}

	if let Some(user_config) = load_user_config(&configs)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Load the user's ~/.urlpat.toml if it exists and isn't disabled.
fn load_user_config(existing_configs: &[LoadedConfig]) -> Result<Option<LoadedConfig>> {
	for loaded in existing_configs {
		if let Some(ref env_var) = loaded.config.root_config_lookup_disable_env_var
			&& is_env_truthy(env_var)
		{
			log::debug!(
				"{} disables user config lookup via ${}",
				loaded.path.display(),
				env_var
			);
			return Ok(None);
		}
	}

	let Some(home_dir) = dirs::home_dir() else {
		log::debug!("no home directory, skipping user config");
		return Ok(None);
	};
	let user_config_path = home_dir.join(CONFIG_FILE_NAME);

	// A project config that is also the user config is only loaded once.
	if !user_config_path.is_file()
		|| existing_configs
			.iter()
			.any(|loaded| loaded.path == user_config_path)
	{
		return Ok(None);
	}

	log::debug!("loading user config {}", user_config_path.display());
	let config = parse_config_file(&user_config_path)?;
	Ok(Some(LoadedConfig {
		config,
		path: user_config_path,
	}))
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

/// Merge multiple configs into a single effective config.
///
/// Rules are collected in cascade order (first match wins).
pub fn merge_configs(configs: &[LoadedConfig]) -> MergedConfig {
	let rules = configs
		.iter()
		.flat_map(|loaded| {
			loaded.config.rules.iter().map(|rule| RuleWithSource {
				rule: rule.clone(),
				source: loaded.path.clone(),
			})
		})
		.collect();

	MergedConfig { rules }
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path) -> Result<MergedConfig> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(UrlPatError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
