// src/app.rs

use crate::config::{AppConfig, CacheBackend, RunMode};
use crate::db::connection;
use crate::models::report::ExportRow;
use crate::repositories::cache_store::{CacheStore, FileCacheStore, MemoryCacheStore, SqliteCacheStore};
use crate::repositories::result_cache::ResultCache;
use crate::services::batch::{self, BatchSummary};
use crate::services::matcher::TokenSetMatcher;
use crate::services::reconciler::ReconciliationEngine;
use crate::utils::auth::TokenProvider;
use crate::utils::catalog_api::CatalogApiClient;
use crate::utils::csv_importer::read_technologies;
use crate::utils::report_writer::{write_export, CsvReportWriter};
use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;

pub struct App {
	config: AppConfig,
}

impl App {
	pub fn new(config: AppConfig) -> Self {
		Self { config }
	}

	pub async fn run(&self) -> Result<()> {
		match &self.config.mode {
			RunMode::Reconcile => self.reconcile().await.map(|_| ()),
			RunMode::Export { product } => self.export(product).await.map(|_| ()),
		}
	}

	/// Resolves every technology of the input file and appends matches to the report.
	pub async fn reconcile(&self) -> Result<BatchSummary> {
		let names = read_technologies(&self.config.input_path, self.config.input_encoding.as_deref())
			.context("Failed to load technology list")?;
		let names = batch::dedupe(names);
		info!("{} distinct technologies to look up", names.len());

		if names.is_empty() {
			return Ok(BatchSummary::default());
		}

		let cache = self.result_cache().await?;
		let engine = ReconciliationEngine::new(
			cache,
			TokenSetMatcher::new(),
			self.config.threshold,
			self.config.normalization,
		);

		let mut report = CsvReportWriter::open(&self.config.output_path)
			.with_context(|| format!("Failed to open report {:?}", self.config.output_path))?;

		let summary = batch::run_batch(&engine, &names, &mut report)
			.await
			.context("Reconciliation aborted")?;

		info!("Report written to {:?}", report.path());
		Ok(summary)
	}

	/// Writes every release and version of `product` to the configured output.
	pub async fn export(&self, product: &str) -> Result<usize> {
		let cache = self.result_cache().await?;
		let response = cache
			.fetch_or_load(product)
			.await
			.with_context(|| format!("Lookup failed for '{}'", product))?;

		let rows = ExportRow::expand(&response.products());
		let written = write_export(&self.config.output_path, &rows)
			.with_context(|| format!("Failed to write {:?}", self.config.output_path))?;

		info!("Wrote {} rows for '{}' to {:?}", written, product, self.config.output_path);
		Ok(written)
	}

	async fn result_cache(&self) -> Result<ResultCache<CatalogApiClient>> {
		let store = self.open_store()?;

		if self.config.offline {
			info!("Offline mode: answering from the cache only");
			return Ok(ResultCache::offline(store));
		}

		let tokens = TokenProvider::new(&self.config).context("Failed to create HTTP client")?;
		let access_token = tokens
			.acquire(&self.config.refresh_token, self.config.access_token.as_deref())
			.await
			.context("Failed to obtain an access token")?;

		let client = CatalogApiClient::new(&self.config, access_token)
			.context("Failed to create catalog client")?;
		Ok(ResultCache::new(client, store))
	}

	fn open_store(&self) -> Result<Box<dyn CacheStore>> {
		let dir = &self.config.cache_dir;
		let store: Box<dyn CacheStore> = match self.config.cache_backend {
			CacheBackend::Files => Box::new(
				FileCacheStore::new(dir).with_context(|| format!("Failed to create cache directory {:?}", dir))?,
			),
			CacheBackend::Sqlite => {
				let pool = connection::establish_pool(dir).context("Failed to open cache database")?;
				Box::new(SqliteCacheStore::new(Arc::new(pool)).context("Failed to prepare cache database")?)
			}
			CacheBackend::Memory => Box::new(MemoryCacheStore::new()),
		};

		info!("Using {:?} cache backend", self.config.cache_backend);
		Ok(store)
	}
}
