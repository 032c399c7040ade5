//! Configuration loading and parsing for urlpat.
//!
//! This module handles:
//! - TOML config file parsing and validation
//! - Directory cascade discovery
//! - Config merging
//! - Selecting the rule whose url pattern matches a URL

pub mod cascade;
pub mod matcher;
pub mod parser;
pub mod types;

pub use cascade::{
	CONFIG_FILE_NAME, discover_configs, load_merged_config, merge_configs, user_config_path,
};
pub use matcher::{CompiledRule, compile_rules, find_matching_rule};
pub use parser::{init_template, parse_config_file, parse_config_str};
pub use types::{Config, LoadedConfig, MergedConfig, Rule, RuleWithSource};
