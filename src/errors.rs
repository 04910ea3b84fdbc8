// src/errors.rs

use thiserror::Error;

/// Failures raised while talking to the identity provider, the catalog or
/// the local cache.
///
/// `Auth*` and `InputFormat` are fatal for a run. Everything else is scoped
/// to the single technology being processed and only marks that item as
/// failed.
#[derive(Debug, Error)]
pub enum LookupError {
	#[error("token request failed with status {status}: {body}")]
	Auth { status: u16, body: String },

	#[error("could not reach the identity provider")]
	AuthTransport(#[source] reqwest::Error),

	#[error("token response did not contain an access_token")]
	MissingAccessToken,

	#[error("catalog query failed with status {status_code}: {body}")]
	CatalogLookup { status_code: u16, body: String },

	#[error("catalog request could not be completed")]
	Transport(#[from] reqwest::Error),

	#[error(transparent)]
	Cache(#[from] CacheError),

	#[error("no cached response for '{query}' and offline mode is enabled")]
	OfflineMiss { query: String },

	#[error("invalid input file: {0}")]
	InputFormat(String),
}

impl LookupError {
	/// Whether this error must abort the whole run instead of a single item.
	pub fn is_fatal(&self) -> bool {
		matches!(
			self,
			LookupError::Auth { .. }
				| LookupError::AuthTransport(_)
				| LookupError::MissingAccessToken
				| LookupError::InputFormat(_)
		)
	}
}

#[derive(Debug, Error)]
pub enum CacheError {
	#[error("cache I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("cache database error: {0}")]
	Sqlite(#[from] rusqlite::Error),

	#[error("cache connection pool error: {0}")]
	Pool(#[from] r2d2::Error),

	#[error("cached entry for '{0}' is not valid UTF-8")]
	Encoding(String),
}

#[derive(Debug, Error)]
pub enum ReportError {
	#[error("report I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("report CSV error: {0}")]
	Csv(#[from] csv::Error),
}

/// Reasons a batch stops before every name was processed.
#[derive(Debug, Error)]
pub enum BatchError {
	#[error(transparent)]
	Report(#[from] ReportError),

	#[error("lookup of '{name}' failed fatally")]
	Fatal {
		name: String,
		#[source]
		source: LookupError,
	},
}

/// Why a query produced no report row even though the lookup succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unmatched {
	#[error("name is empty after normalization")]
	BlankName,

	#[error("empty catalog response, no software product found")]
	EmptyCatalogResponse,

	#[error("no release name reached the confidence threshold of {}{}", .threshold, best_hint(.best))]
	NoConfidentMatch {
		threshold: u8,
		best: Option<(String, u8)>,
	},
}

fn best_hint(best: &Option<(String, u8)>) -> String {
	match best {
		Some((name, score)) => format!(" (closest: '{}' at {}%)", name, score),
		None => String::new(),
	}
}
