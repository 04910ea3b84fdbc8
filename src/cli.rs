//! Command line definitions

use crate::config::{
	AppConfig, CacheBackend, NormalizationPolicy, RunMode, DEFAULT_API_BASE_URL, DEFAULT_CACHE_DIR,
	DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH, DEFAULT_THRESHOLD, DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_URL,
};
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(
	name = "lifecycle-lookup",
	version,
	about = "Look up end-of-life data for a list of technologies in the Flexera catalog"
)]
pub struct Cli {
	// Global arguments cannot be required; --token and --org are checked in `into_config`.

	/// Refresh token used to obtain API access tokens (required)
	#[arg(long, global = true, env = "FLEXERA_API_TOKEN", hide_env_values = true)]
	pub token: Option<String>,

	/// Organization id the catalog is queried for (required)
	#[arg(long, global = true, env = "FLEXERA_ORG_ID")]
	pub org: Option<String>,

	/// Access token from an earlier run; reused while it is still accepted
	#[arg(long, global = true, env = "FLEXERA_ACCESS_TOKEN", hide_env_values = true)]
	pub access_token: Option<String>,

	#[arg(long, global = true, default_value = DEFAULT_API_BASE_URL, hide = true)]
	pub api_base_url: String,

	#[arg(long, global = true, default_value = DEFAULT_TOKEN_URL, hide = true)]
	pub token_url: String,

	/// Seconds to wait for any single HTTP request
	#[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
	pub timeout_secs: u64,

	/// Log debug details
	#[arg(short, long, global = true, conflicts_with = "quiet")]
	pub verbose: bool,

	/// Only log warnings and errors
	#[arg(short, long, global = true)]
	pub quiet: bool,

	#[command(subcommand)]
	pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Match every technology of the input file against the catalog (default)
	Reconcile(ReconcileArgs),
	/// Write every release and version of one product to a CSV file
	Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct ReconcileArgs {
	/// Semicolon separated file whose first column holds technology names
	#[arg(long, default_value = DEFAULT_INPUT_PATH)]
	pub input: PathBuf,

	/// Report file rows are appended to
	#[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
	pub output: PathBuf,

	/// Minimum similarity (0-100) a release name needs to be accepted
	#[arg(long, default_value_t = DEFAULT_THRESHOLD, value_parser = clap::value_parser!(u8).range(0..=100))]
	pub threshold: u8,

	/// How names are cleaned before lookup
	#[arg(long, value_enum, default_value_t = NormalizationPolicy::default())]
	pub normalize: NormalizationPolicy,

	/// Encoding of the input file (e.g. windows-1252); defaults to BOM detection
	#[arg(long)]
	pub input_encoding: Option<String>,

	#[command(flatten)]
	pub cache: CacheArgs,
}

impl Default for ReconcileArgs {
	fn default() -> Self {
		Self {
			input: DEFAULT_INPUT_PATH.into(),
			output: DEFAULT_OUTPUT_PATH.into(),
			threshold: DEFAULT_THRESHOLD,
			normalize: NormalizationPolicy::default(),
			input_encoding: None,
			cache: CacheArgs::default(),
		}
	}
}

#[derive(Debug, Args)]
pub struct ExportArgs {
	/// Product name to look up
	#[arg(long)]
	pub product: String,

	/// Destination file, defaults to `<product>.csv`
	#[arg(long)]
	pub output: Option<PathBuf>,

	#[command(flatten)]
	pub cache: CacheArgs,
}

#[derive(Debug, Args)]
pub struct CacheArgs {
	/// Where catalog responses are stored
	#[arg(long, value_enum, default_value_t = CacheBackend::default())]
	pub cache_backend: CacheBackend,

	/// Directory holding cached responses
	#[arg(long, default_value = DEFAULT_CACHE_DIR)]
	pub cache_dir: PathBuf,

	/// Answer from the cache only, never call the catalog
	#[arg(long)]
	pub offline: bool,
}

impl Default for CacheArgs {
	fn default() -> Self {
		Self {
			cache_backend: CacheBackend::default(),
			cache_dir: DEFAULT_CACHE_DIR.into(),
			offline: false,
		}
	}
}

impl Cli {
	pub fn log_filter(&self) -> &'static str {
		if self.verbose {
			"debug"
		} else if self.quiet {
			"warn"
		} else {
			"info"
		}
	}

	/// Builds the run configuration; fails like a clap usage error when the
	/// credentials are missing.
	pub fn into_config(self) -> Result<AppConfig, clap::Error> {
		let refresh_token = required(self.token, "--token <TOKEN>")?;
		let organization_id = required(self.org, "--org <ORG>")?;

		let command = self
			.command
			.unwrap_or_else(|| Command::Reconcile(ReconcileArgs::default()));

		let mut config = AppConfig {
			mode: RunMode::Reconcile,
			refresh_token,
			access_token: self.access_token.filter(|t| !t.trim().is_empty()),
			organization_id,
			api_base_url: self.api_base_url,
			token_url: self.token_url,
			request_timeout: Duration::from_secs(self.timeout_secs),
			input_path: DEFAULT_INPUT_PATH.into(),
			input_encoding: None,
			output_path: DEFAULT_OUTPUT_PATH.into(),
			threshold: DEFAULT_THRESHOLD,
			normalization: NormalizationPolicy::default(),
			cache_backend: CacheBackend::default(),
			cache_dir: DEFAULT_CACHE_DIR.into(),
			offline: false,
		};

		let cache = match command {
			Command::Reconcile(args) => {
				config.input_path = args.input;
				config.output_path = args.output;
				config.threshold = args.threshold;
				config.normalization = args.normalize;
				config.input_encoding = args.input_encoding;
				args.cache
			}
			Command::Export(args) => {
				config.output_path = args
					.output
					.unwrap_or_else(|| PathBuf::from(format!("{}.csv", args.product)));
				config.mode = RunMode::Export { product: args.product };
				args.cache
			}
		};

		config.cache_backend = cache.cache_backend;
		config.cache_dir = cache.cache_dir;
		config.offline = cache.offline;
		Ok(config)
	}
}

fn required(value: Option<String>, flag: &str) -> Result<String, clap::Error> {
	value.ok_or_else(|| {
		Cli::command().error(
			ErrorKind::MissingRequiredArgument,
			format!("the following required arguments were not provided:\n  {}", flag),
		)
	})
}
