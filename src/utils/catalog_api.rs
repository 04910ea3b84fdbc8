use crate::config::AppConfig;
use crate::errors::LookupError;
use crate::models::catalog::RawCatalogResponse;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::json;

const PRODUCT_FIELDS: &str = "
		application
		name
		description
		manufacturer {
			name
			description
		}
		softwareReleases {
			name
			application
			softwareLifecycle {
				endOfLife
				endOfLifeCalculatedCase
				endOfLifeException
				endOfLifeSupportLevel
				obsolete
			}
		}
		softwareVersions {
			name
		}";

/// Looks a product name up in the remote catalog.
///
/// Implementations return the body untouched on a success status and
/// `LookupError::CatalogLookup` otherwise.
#[allow(async_fn_in_trait)]
pub trait CatalogClient {
	async fn lookup(&self, name: &str) -> Result<RawCatalogResponse, LookupError>;
}

#[derive(Clone)]
pub struct CatalogApiClient {
	client: reqwest::Client,
	endpoint: String,
	access_token: String,
}

impl CatalogApiClient {
	pub fn new(config: &AppConfig, access_token: String) -> Result<Self, LookupError> {
		Ok(Self {
			client: build_http_client(config)?,
			endpoint: config.graphql_endpoint(),
			access_token,
		})
	}
}

impl CatalogClient for CatalogApiClient {
	async fn lookup(&self, name: &str) -> Result<RawCatalogResponse, LookupError> {
		debug!("Querying catalog for '{}'", name);

		let response = self.client
			.post(&self.endpoint)
			.bearer_auth(&self.access_token)
			.json(&json!({ "query": product_query(name) }))
			.send()
			.await?;

		let status = response.status();
		let body = response.text().await?;

		if !status.is_success() {
			return Err(LookupError::CatalogLookup {
				status_code: status.as_u16(),
				body,
			});
		}

		Ok(RawCatalogResponse::new(body))
	}
}

/// Shared reqwest client with the request timeout applied.
pub fn build_http_client(config: &AppConfig) -> Result<reqwest::Client, LookupError> {
	let mut headers = HeaderMap::new();
	headers.insert(
		USER_AGENT,
		HeaderValue::from_static(concat!("lifecycle-lookup/", env!("CARGO_PKG_VERSION"))),
	);

	let client = reqwest::Client::builder()
		.default_headers(headers)
		.timeout(config.request_timeout)
		.build()?;

	Ok(client)
}

/// The `SoftwareProductList` query for one product name.
///
/// The name is embedded as a JSON string literal, which is also a valid
/// GraphQL string, so quotes and backslashes in user input stay inside it.
pub fn product_query(name: &str) -> String {
	let literal = serde_json::Value::String(name.to_string()).to_string();
	format!(
		"query SoftwareProductList {{\n\tSoftwareProduct(name: {}) {{{}\n\t}}\n}}",
		literal, PRODUCT_FIELDS
	)
}
