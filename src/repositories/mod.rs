pub mod cache_store;
pub mod result_cache;
