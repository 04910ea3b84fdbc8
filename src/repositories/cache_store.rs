// src/repositories/cache_store.rs

use crate::db::connection::SqlitePool;
use crate::db::schema;
use crate::errors::CacheError;
use crate::models::catalog::RawCatalogResponse;
use chrono::Utc;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use rusqlite::{params, OptionalExtension};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

const SLUG_MAX_LEN: usize = 64;

lazy_static! {
	static ref UNSAFE_KEY_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_-]+").unwrap();
}

/// Store-safe identifier of a cache slot.
///
/// The readable slug keeps cache directories browsable; the hash suffix keeps
/// queries that differ only in punctuation or case in separate slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
	pub fn for_query(query: &str) -> Self {
		let slug = UNSAFE_KEY_CHARS.replace_all(query.trim(), "_");
		let slug: String = slug.trim_matches('_').chars().take(SLUG_MAX_LEN).collect();

		let digest = Sha256::digest(query.as_bytes());
		let hash: String = digest.iter().take(8).map(|b| format!("{:02x}", b)).collect();

		if slug.is_empty() {
			CacheKey(hash)
		} else {
			CacheKey(format!("{}-{}", slug, hash))
		}
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

/// Key to blob store backing the result cache. An entry that exists is valid.
pub trait CacheStore: Send + Sync {
	fn get(&self, key: &CacheKey) -> Result<Option<RawCatalogResponse>, CacheError>;

	/// Writes an entry unless one already exists for `key`; the first write wins.
	fn put(&self, key: &CacheKey, query: &str, response: &RawCatalogResponse) -> Result<(), CacheError>;
}

/// One `<key>.json` file per query inside a directory.
pub struct FileCacheStore {
	dir: PathBuf,
}

impl FileCacheStore {
	pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
		let dir = dir.into();
		fs::create_dir_all(&dir)?;
		Ok(Self { dir })
	}

	pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
		self.dir.join(format!("{}.json", key.as_str()))
	}
}

impl CacheStore for FileCacheStore {
	fn get(&self, key: &CacheKey) -> Result<Option<RawCatalogResponse>, CacheError> {
		let path = self.entry_path(key);
		let bytes = match fs::read(&path) {
			Ok(bytes) => bytes,
			Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
			Err(e) => return Err(e.into()),
		};

		let body = String::from_utf8(bytes).map_err(|_| CacheError::Encoding(key.as_str().to_string()))?;
		Ok(Some(RawCatalogResponse::new(body)))
	}

	fn put(&self, key: &CacheKey, query: &str, response: &RawCatalogResponse) -> Result<(), CacheError> {
		let path = self.entry_path(key);

		// Write beside the target and rename, so readers never see a partial file.
		let mut tmp = NamedTempFile::new_in(&self.dir)?;
		tmp.write_all(response.as_str().as_bytes())?;
		tmp.flush()?;

		match tmp.persist_noclobber(&path) {
			Ok(_) => {
				debug!("Cached catalog response for '{}' at {:?}", query, path);
				Ok(())
			}
			Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
				debug!("Cache entry for '{}' already present, keeping it", query);
				Ok(())
			}
			Err(e) => Err(e.error.into()),
		}
	}
}

/// Cache entries kept in the `catalog_cache` SQLite table.
pub struct SqliteCacheStore {
	pool: Arc<SqlitePool>,
}

impl SqliteCacheStore {
	pub fn new(pool: Arc<SqlitePool>) -> Result<Self, CacheError> {
		let conn = pool.get()?;
		schema::create_tables(&conn)?;
		Ok(Self { pool })
	}
}

impl CacheStore for SqliteCacheStore {
	fn get(&self, key: &CacheKey) -> Result<Option<RawCatalogResponse>, CacheError> {
		let conn = self.pool.get()?;
		let body: Option<String> = conn
			.query_row(
				"SELECT body FROM catalog_cache WHERE cache_key = ?1",
				params![key.as_str()],
				|row| row.get(0),
			)
			.optional()?;

		Ok(body.map(RawCatalogResponse::new))
	}

	fn put(&self, key: &CacheKey, query: &str, response: &RawCatalogResponse) -> Result<(), CacheError> {
		let conn = self.pool.get()?;
		let inserted = conn.execute(
			"INSERT OR IGNORE INTO catalog_cache (cache_key, query, body, fetched_at)
			 VALUES (?1, ?2, ?3, ?4)",
			params![
				key.as_str(),
				query,
				response.as_str(),
				Utc::now().to_rfc3339(),
			],
		)?;

		if inserted == 0 {
			debug!("Cache entry for '{}' already present, keeping it", query);
		}
		Ok(())
	}
}

/// Process-local store; nothing survives the run.
#[derive(Default)]
pub struct MemoryCacheStore {
	entries: Mutex<HashMap<CacheKey, RawCatalogResponse>>,
}

impl MemoryCacheStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.lock().map(|e| e.len()).unwrap_or(0)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl CacheStore for MemoryCacheStore {
	fn get(&self, key: &CacheKey) -> Result<Option<RawCatalogResponse>, CacheError> {
		let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
		Ok(entries.get(key).cloned())
	}

	fn put(&self, key: &CacheKey, _query: &str, response: &RawCatalogResponse) -> Result<(), CacheError> {
		let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
		entries.entry(key.clone()).or_insert_with(|| response.clone());
		Ok(())
	}
}
