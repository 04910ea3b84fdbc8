use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::{Path, PathBuf};
use log::info;
use crate::errors::CacheError;

pub type SqlitePool = Pool<SqliteConnectionManager>;

const CACHE_DB_FILE: &str = "catalog_cache.db";

/// Establishes a connection pool for the cache database at `path`
pub fn establish_pool_with_path(path: PathBuf) -> Result<SqlitePool, CacheError> {
	info!("SQLite cache will be located at: {:?}", path);

	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		std::fs::create_dir_all(parent)?;
	}

	let manager = SqliteConnectionManager::file(path);

	// The pipeline runs one query at a time, a handful of connections is plenty.
	let pool = Pool::builder()
		.max_size(4)
		.build(manager)?;

	info!("SQLite connection pool established successfully");
	Ok(pool)
}

/// Establishes a connection pool inside the given cache directory
pub fn establish_pool(cache_dir: &Path) -> Result<SqlitePool, CacheError> {
	establish_pool_with_path(cache_db_path(cache_dir))
}

fn cache_db_path(cache_dir: &Path) -> PathBuf {
	cache_dir.join(CACHE_DB_FILE)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_establish_pool_creates_directory() {
		let dir = tempfile::tempdir().unwrap();
		let cache_dir = dir.path().join("nested").join("cache");

		let pool = establish_pool(&cache_dir).unwrap();
		let conn = pool.get().unwrap();
		let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0)).unwrap();

		assert_eq!(one, 1);
		assert!(cache_dir.join(CACHE_DB_FILE).exists());
	}
}
