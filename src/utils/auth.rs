use crate::config::AppConfig;
use crate::errors::LookupError;
use crate::utils::catalog_api::build_http_client;
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::json;

/// Cheapest query the catalog answers; used only to test a bearer token.
const PROBE_QUERY: &str = "{ __typename }";

#[derive(Debug, Deserialize)]
struct TokenResponse {
	access_token: Option<String>,
}

/// Exchanges the refresh token for an access token, reusing a still valid one.
pub struct TokenProvider {
	client: reqwest::Client,
	graphql_endpoint: String,
	token_url: String,
}

impl TokenProvider {
	pub fn new(config: &AppConfig) -> Result<Self, LookupError> {
		Ok(Self {
			client: build_http_client(config).map_err(|e| match e {
				LookupError::Transport(inner) => LookupError::AuthTransport(inner),
				other => other,
			})?,
			graphql_endpoint: config.graphql_endpoint(),
			token_url: config.token_url.clone(),
		})
	}

	/// Returns `current` when the catalog still accepts it, otherwise a fresh token.
	pub async fn acquire(&self, refresh_token: &str, current: Option<&str>) -> Result<String, LookupError> {
		if let Some(token) = current {
			if self.is_valid(token).await {
				info!("Current access token is still valid");
				return Ok(token.to_string());
			}
			info!("Current access token has expired, requesting a new one");
		}

		self.refresh(refresh_token).await
	}

	async fn is_valid(&self, token: &str) -> bool {
		let result = self.client
			.post(&self.graphql_endpoint)
			.bearer_auth(token)
			.json(&json!({ "query": PROBE_QUERY }))
			.send()
			.await;

		match result {
			Ok(response) => {
				debug!("Token probe answered with {}", response.status());
				response.status().is_success()
			}
			Err(e) => {
				warn!("Token probe failed: {}", e);
				false
			}
		}
	}

	async fn refresh(&self, refresh_token: &str) -> Result<String, LookupError> {
		let response = self.client
			.post(&self.token_url)
			.form(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
			.send()
			.await
			.map_err(LookupError::AuthTransport)?;

		let status = response.status();
		let body = response.text().await.map_err(LookupError::AuthTransport)?;

		if !status.is_success() {
			return Err(LookupError::Auth {
				status: status.as_u16(),
				body,
			});
		}

		let token = parse_access_token(&body)?;
		info!("New access token issued");
		Ok(token)
	}
}

fn parse_access_token(body: &str) -> Result<String, LookupError> {
	serde_json::from_str::<TokenResponse>(body)
		.ok()
		.and_then(|r| r.access_token)
		.filter(|t| !t.is_empty())
		.ok_or(LookupError::MissingAccessToken)
}
