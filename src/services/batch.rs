// src/services/batch.rs

use crate::errors::BatchError;
use crate::services::matcher::NameMatcher;
use crate::services::reconciler::{ReconciliationEngine, Resolution};
use crate::utils::catalog_api::CatalogClient;
use crate::utils::report_writer::ReportSink;
use console::style;
use log::{error, info, warn};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
	pub resolved: usize,
	pub unmatched: usize,
	pub failed: usize,
}

impl BatchSummary {
	pub fn total(&self) -> usize {
		self.resolved + self.unmatched + self.failed
	}
}

/// Drops repeated names (exact comparison), keeping the first occurrence.
pub fn dedupe(names: Vec<String>) -> Vec<String> {
	let mut seen = HashSet::new();
	names.into_iter().filter(|name| seen.insert(name.clone())).collect()
}

/// Resolves each name in turn and appends matches to `sink`.
///
/// Misses and item-scoped lookup failures are reported and skipped. A fatal
/// lookup error (see `LookupError::is_fatal`) or a failure to write the
/// report stops the batch.
pub async fn run_batch<C, M, S>(
	engine: &ReconciliationEngine<C, M>,
	names: &[String],
	sink: &mut S,
) -> Result<BatchSummary, BatchError>
where
	C: CatalogClient,
	M: NameMatcher,
	S: ReportSink,
{
	let mut summary = BatchSummary::default();

	for name in names {
		match engine.process(name).await {
			Ok(Resolution::Resolved(row)) => {
				println!(
					"{}",
					style(format!(
						"Technology found: {}: {} (similarity: {}%)",
						row.tech_name, row.release_name, row.similarity
					))
					.green()
				);
				sink.append(&row)?;
				summary.resolved += 1;
			}
			Ok(Resolution::Unmatched(reason)) => {
				println!("{}", style(format!("Technology not found: {} ({})", name, reason)).red());
				warn!("No match for '{}': {}", name, reason);
				summary.unmatched += 1;
			}
			Err(e) if e.is_fatal() => {
				error!("Aborting batch at '{}': {}", name, e);
				return Err(BatchError::Fatal { name: name.clone(), source: e });
			}
			Err(e) => {
				println!("{}", style(format!("Lookup failed for {}: {}", name, e)).red());
				error!("Lookup failed for '{}': {}", name, e);
				summary.failed += 1;
			}
		}
	}

	info!(
		"Processed {} technologies: {} matched, {} unmatched, {} failed",
		summary.total(),
		summary.resolved,
		summary.unmatched,
		summary.failed
	);
	Ok(summary)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::NormalizationPolicy;
	use crate::errors::{LookupError, ReportError};
	use crate::models::report::OutputRow;
	use crate::repositories::cache_store::MemoryCacheStore;
	use crate::repositories::result_cache::ResultCache;
	use crate::services::matcher::TokenSetMatcher;
	use crate::testing::{catalog_body, FakeCatalog};

	#[derive(Default)]
	struct VecSink(Vec<OutputRow>);

	impl ReportSink for VecSink {
		fn append(&mut self, row: &OutputRow) -> Result<(), ReportError> {
			self.0.push(row.clone());
			Ok(())
		}
	}

	fn engine(catalog: FakeCatalog) -> ReconciliationEngine<FakeCatalog, TokenSetMatcher> {
		let cache = ResultCache::new(catalog, Box::new(MemoryCacheStore::new()));
		ReconciliationEngine::new(cache, TokenSetMatcher::new(), 70, NormalizationPolicy::ReplaceSymbols)
	}

	fn names(items: &[&str]) -> Vec<String> {
		items.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn test_dedupe_keeps_first_seen_order() {
		let input = names(&["Apache Tomcat", "Apache Tomcat", "Unknown Widget XYZ"]);
		assert_eq!(dedupe(input), names(&["Apache Tomcat", "Unknown Widget XYZ"]));

		let input = names(&["b", "a", "B", "b", "a"]);
		assert_eq!(dedupe(input), names(&["b", "a", "B"]));
	}

	#[tokio::test]
	async fn test_batch_writes_matches_and_skips_unknown() {
		let body = catalog_body(&[("Tomcat", &[("Apache Tomcat 9.0", "2024-01-01")])]);
		let catalog = FakeCatalog::new()
			.with_body("Apache Tomcat", &body)
			.with_body("Unknown Widget XYZ", r#"{"data":{"SoftwareProduct":[]}}"#);
		let engine = engine(catalog.clone());
		let mut sink = VecSink::default();

		let queries = dedupe(names(&["Apache Tomcat", "Apache Tomcat", "Unknown Widget XYZ"]));
		let summary = run_batch(&engine, &queries, &mut sink).await.unwrap();

		assert_eq!(summary, BatchSummary { resolved: 1, unmatched: 1, failed: 0 });
		assert_eq!(sink.0.len(), 1);
		assert_eq!(sink.0[0].release_name, "Apache Tomcat 9.0");
		assert_eq!(sink.0[0].end_of_life, "2024-01-01");
		assert_eq!(catalog.total_calls(), 2);
	}

	#[tokio::test]
	async fn test_one_failing_lookup_does_not_stop_the_batch() {
		let catalog = FakeCatalog::new()
			.with_body("Apache Tomcat", &catalog_body(&[("Tomcat", &[("Apache Tomcat 9.0", "2024-01-01")])]))
			.with_status("PostgreSQL", 502)
			.with_body("nginx", &catalog_body(&[("nginx", &[("nginx 1.24", "2024-04-23")])]));
		let engine = engine(catalog);
		let mut sink = VecSink::default();

		let summary = run_batch(&engine, &names(&["Apache Tomcat", "PostgreSQL", "nginx"]), &mut sink)
			.await
			.unwrap();

		assert_eq!(summary, BatchSummary { resolved: 2, unmatched: 0, failed: 1 });
		let written: Vec<_> = sink.0.iter().map(|r| r.tech_name.as_str()).collect();
		assert_eq!(written, vec!["Apache Tomcat", "nginx"]);
	}

	#[tokio::test]
	async fn test_names_normalizing_to_same_query_share_one_lookup() {
		let body = catalog_body(&[("Node", &[("Node js 18", "2025-04-30")])]);
		let catalog = FakeCatalog::new().with_body("Node js", &body);
		let engine = engine(catalog.clone());
		let mut sink = VecSink::default();

		let summary = run_batch(&engine, &names(&["Node.js", "Node-js"]), &mut sink).await.unwrap();

		assert_eq!(summary.resolved, 2);
		assert_eq!(catalog.calls("Node js"), 1);
	}

	#[tokio::test]
	async fn test_fatal_lookup_error_stops_the_batch() {
		let catalog = FakeCatalog::new()
			.with_body("Apache Tomcat", &catalog_body(&[("Tomcat", &[("Apache Tomcat 9.0", "2024-01-01")])]))
			.with_auth_failure("PostgreSQL");
		let engine = engine(catalog.clone());
		let mut sink = VecSink::default();

		let err = run_batch(&engine, &names(&["Apache Tomcat", "PostgreSQL", "nginx"]), &mut sink)
			.await
			.unwrap_err();

		assert!(matches!(
			err,
			BatchError::Fatal { ref name, source: LookupError::Auth { status: 401, .. } } if name == "PostgreSQL"
		));
		assert_eq!(sink.0.len(), 1);
		assert_eq!(catalog.calls("nginx"), 0);
	}
}
