use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::{LevelFilter, Log, Metadata, Record};
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

use urlpat::config::{
	CONFIG_FILE_NAME, CompiledRule, compile_rules, discover_configs, find_matching_rule,
	init_template, load_merged_config, merge_configs, user_config_path,
};
use urlpat::serialize::{describe_rules, describe_url};
use urlpat::{pattern_tokens, transform, transform_with_rules, try_transform, url_tokens};

#[derive(Parser)]
#[command(name = "urlpat")]
#[command(author, version, about = "Rewrite URLs with a compact pattern language")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Pattern to apply to every URL instead of the configured rules
	#[arg(short, long)]
	pattern: Option<String>,

	/// Report malformed patterns and URLs that do not fit the pattern as errors
	#[arg(long)]
	strict: bool,

	/// Print the tokens of each URL (and of the pattern) instead of rewriting
	#[arg(long)]
	tokens: bool,

	/// Create a template .urlpat.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .urlpat.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Log more: -v for debug, -vv for trace
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,

	/// URLs to rewrite; read from stdin, one per line, when none are given
	urls: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display discovered configuration files and their rules
	Show,
	/// Check all config files for errors
	Validate,
}

/// Writes log records to stderr.
struct StderrLogger;

impl Log for StderrLogger {
	fn enabled(&self, metadata: &Metadata) -> bool {
		metadata.level() <= log::max_level()
	}

	fn log(&self, record: &Record) {
		if self.enabled(record.metadata()) {
			eprintln!("[{}] {}", record.level(), record.args());
		}
	}

	fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) {
	let level = match verbose {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	};
	if log::set_logger(&LOGGER).is_ok() {
		log::set_max_level(level);
	}
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	if cli.init {
		return handle_init(cli.force);
	}

	if let Some(ref command) = cli.command {
		return match command {
			Commands::Config { action } => match action {
				ConfigAction::Show => handle_config_show(),
				ConfigAction::Validate => handle_config_validate(),
			},
		};
	}

	let urls = if cli.urls.is_empty() {
		read_stdin_urls()?
	} else {
		cli.urls.clone()
	};

	handle_urls(&cli, &urls)
}

fn read_stdin_urls() -> Result<Vec<String>> {
	let mut urls = Vec::new();
	for line in std::io::stdin().lock().lines() {
		let line = line.context("Failed to read URLs from stdin")?;
		let url = line.trim();
		if !url.is_empty() {
			urls.push(url.to_string());
		}
	}
	Ok(urls)
}

/// Where the pattern for each URL comes from.
enum PatternSource {
	/// `--pattern` on the command line.
	Fixed(String),
	/// First matching rule of the config cascade; the empty pattern when none matches.
	Config(Vec<CompiledRule>),
}

impl PatternSource {
	fn load(cli: &Cli) -> Result<Self> {
		if let Some(ref pattern) = cli.pattern {
			return Ok(PatternSource::Fixed(pattern.clone()));
		}

		let cwd = std::env::current_dir().context("Failed to get current directory")?;
		let config = load_merged_config(&cwd).context("Failed to load configuration")?;
		let rules = compile_rules(&config).context("Failed to compile rules")?;
		log::debug!("{} configured rules", rules.len());
		Ok(PatternSource::Config(rules))
	}

	fn rule_for(&self, url: &str) -> Option<&CompiledRule> {
		match self {
			PatternSource::Fixed(_) => None,
			PatternSource::Config(rules) => find_matching_rule(rules, url),
		}
	}

	fn pattern_for<'a>(&'a self, rule: Option<&'a CompiledRule>) -> &'a str {
		match self {
			PatternSource::Fixed(pattern) => pattern,
			PatternSource::Config(_) => rule.map_or("", |rule| rule.rule.pattern.as_str()),
		}
	}
}

fn handle_urls(cli: &Cli, urls: &[String]) -> Result<ExitCode> {
	let source = PatternSource::load(cli)?;
	let mut failed = false;

	for url in urls {
		let rule = source.rule_for(url);
		if let Some(rule) = rule {
			log::debug!(
				"{url}: using rule {:?} from {}",
				rule.rule.name.as_deref().unwrap_or(&rule.rule.pattern),
				rule.source.display()
			);
		}
		let pattern = source.pattern_for(rule);

		if cli.tokens {
			print_tokens(url, pattern)?;
			continue;
		}

		if cli.strict {
			match try_transform(url, pattern) {
				Ok(rewritten) => println!("{rewritten}"),
				Err(e) => {
					eprintln!("error: {url}: {e}");
					failed = true;
				}
			}
			continue;
		}

		let rewritten = match rule {
			Some(rule) => transform_with_rules(url, &rule.tokens),
			None => transform(url, pattern),
		};
		println!("{rewritten}");
	}

	Ok(if failed {
		ExitCode::FAILURE
	} else {
		ExitCode::SUCCESS
	})
}

fn print_tokens(url: &str, pattern: &str) -> Result<()> {
	println!("url: {url}");
	print!("{}", describe_url(&url_tokens(url)));

	if !pattern.is_empty() {
		let rules =
			pattern_tokens(pattern).with_context(|| format!("Invalid pattern {pattern:?}"))?;
		println!("pattern: {pattern}");
		print!("{}", describe_rules(&rules));
	}
	Ok(())
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs = discover_configs(&cwd).context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Configuration files (in cascade order):\n");

	for loaded in &configs {
		println!("# Source: {}", loaded.path.display());
		println!("# root: {}", loaded.config.root);
		if let Some(ref env_var) = loaded.config.root_config_lookup_disable_env_var {
			println!("# root-config-lookup-disable-env-var: {env_var}");
		}
		println!("# rules: {}", loaded.config.rules.len());
		println!();

		for (i, rule) in loaded.config.rules.iter().enumerate() {
			println!("  Rule {}:", rule.label(i));
			if let Some(ref url_pattern) = rule.url_pattern {
				println!("    url_pattern: {url_pattern}");
			}
			println!("    pattern: {}", rule.pattern);
			println!();
		}
	}

	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	let configs = match discover_configs(&cwd) {
		Ok(configs) => configs,
		Err(e) => {
			eprintln!("Configuration error: {e}");
			if let Some(source) = std::error::Error::source(&e) {
				eprintln!("  caused by: {source}");
			}
			return Ok(ExitCode::FAILURE);
		}
	};

	// Regexes are only checked once the rules are compiled.
	let merged = merge_configs(&configs);
	if let Err(e) = compile_rules(&merged) {
		eprintln!("Configuration error: {e}");
		return Ok(ExitCode::FAILURE);
	}

	if configs.is_empty() {
		println!("No configuration files found.");
	} else {
		println!("All configuration files are valid:");
		for loaded in &configs {
			println!(
				"  {} ({} rules)",
				loaded.path.display(),
				loaded.config.rules.len()
			);
		}
	}
	Ok(ExitCode::SUCCESS)
}
