use rusqlite::Connection;
use crate::errors::CacheError;

pub fn create_tables(conn: &Connection) -> Result<(), CacheError> {
	conn.execute_batch(
		"
		CREATE TABLE IF NOT EXISTS catalog_cache (
			cache_key TEXT PRIMARY KEY NOT NULL,
			query TEXT NOT NULL,
			body TEXT NOT NULL,
			fetched_at TEXT NOT NULL
		);
		"
	)?;

	Ok(())
}
