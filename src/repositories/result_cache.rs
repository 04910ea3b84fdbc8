// src/repositories/result_cache.rs

use crate::errors::LookupError;
use crate::models::catalog::RawCatalogResponse;
use crate::repositories::cache_store::{CacheKey, CacheStore};
use crate::utils::catalog_api::CatalogClient;
use log::{debug, info};

/// Serves catalog responses from the cache store and only calls the catalog
/// on a miss. Without a client (offline mode) a miss is an error.
pub struct ResultCache<C> {
	client: Option<C>,
	store: Box<dyn CacheStore>,
}

impl<C: CatalogClient> ResultCache<C> {
	pub fn new(client: C, store: Box<dyn CacheStore>) -> Self {
		Self { client: Some(client), store }
	}

	pub fn offline(store: Box<dyn CacheStore>) -> Self {
		Self { client: None, store }
	}

	/// Returns the cached response for `query`, fetching and storing it first
	/// when there is none. Failed lookups are never written to the store.
	pub async fn fetch_or_load(&self, query: &str) -> Result<RawCatalogResponse, LookupError> {
		let key = CacheKey::for_query(query);

		if let Some(cached) = self.store.get(&key)? {
			debug!("Cache hit for '{}' ({})", query, key.as_str());
			return Ok(cached);
		}

		let client = self.client.as_ref().ok_or_else(|| LookupError::OfflineMiss {
			query: query.to_string(),
		})?;

		info!("Cache miss for '{}', querying the catalog", query);
		let response = client.lookup(query).await?;
		self.store.put(&key, query, &response)?;
		Ok(response)
	}
}
