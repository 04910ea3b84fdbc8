// src/config.rs

use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.flexera.com/content/v2/orgs";
pub const DEFAULT_TOKEN_URL: &str = "https://login.flexera.com/oidc/token";
pub const DEFAULT_INPUT_PATH: &str = "techs.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "output.csv";
pub const DEFAULT_CACHE_DIR: &str = ".cache";
pub const DEFAULT_THRESHOLD: u8 = 70;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How a technology name is cleaned up before it is looked up, cached and matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum NormalizationPolicy {
	/// Use the name exactly as it appears in the input file.
	Verbatim,
	/// Turn every character that is neither alphanumeric nor whitespace into a space.
	#[default]
	ReplaceSymbols,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CacheBackend {
	/// One JSON file per query.
	#[default]
	Files,
	/// A single SQLite database.
	Sqlite,
	/// Keep responses for the current run only.
	Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
	/// Resolve every technology of the input file and append to the report.
	Reconcile,
	/// Dump every release and version of one product.
	Export { product: String },
}

/// Settings for a whole run, assembled once from the command line.
#[derive(Debug, Clone)]
pub struct AppConfig {
	pub mode: RunMode,
	pub refresh_token: String,
	pub access_token: Option<String>,
	pub organization_id: String,
	pub api_base_url: String,
	pub token_url: String,
	pub request_timeout: Duration,
	pub input_path: PathBuf,
	pub input_encoding: Option<String>,
	pub output_path: PathBuf,
	pub threshold: u8,
	pub normalization: NormalizationPolicy,
	pub cache_backend: CacheBackend,
	pub cache_dir: PathBuf,
	pub offline: bool,
}

impl AppConfig {
	pub fn graphql_endpoint(&self) -> String {
		format!(
			"{}/{}/graphql",
			self.api_base_url.trim_end_matches('/'),
			self.organization_id
		)
	}

	#[cfg(test)]
	pub fn for_tests(organization_id: &str) -> Self {
		Self {
			mode: RunMode::Reconcile,
			refresh_token: "refresh".into(),
			access_token: None,
			organization_id: organization_id.into(),
			api_base_url: DEFAULT_API_BASE_URL.into(),
			token_url: DEFAULT_TOKEN_URL.into(),
			request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
			input_path: DEFAULT_INPUT_PATH.into(),
			input_encoding: None,
			output_path: DEFAULT_OUTPUT_PATH.into(),
			threshold: DEFAULT_THRESHOLD,
			normalization: NormalizationPolicy::default(),
			cache_backend: CacheBackend::default(),
			cache_dir: DEFAULT_CACHE_DIR.into(),
			offline: false,
		}
	}
}
