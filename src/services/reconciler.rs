// src/services/reconciler.rs

use crate::config::NormalizationPolicy;
use crate::errors::{LookupError, Unmatched};
use crate::models::catalog::CatalogProduct;
use crate::models::report::OutputRow;
use crate::repositories::result_cache::ResultCache;
use crate::services::matcher::NameMatcher;
use crate::utils::catalog_api::CatalogClient;
use log::debug;

/// Outcome of a lookup that reached the catalog (or the cache).
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
	Resolved(OutputRow),
	Unmatched(Unmatched),
}

/// Maps one technology name to the catalog release that best fits it.
pub struct ReconciliationEngine<C, M> {
	cache: ResultCache<C>,
	matcher: M,
	threshold: u8,
	normalization: NormalizationPolicy,
}

impl<C: CatalogClient, M: NameMatcher> ReconciliationEngine<C, M> {
	pub fn new(cache: ResultCache<C>, matcher: M, threshold: u8, normalization: NormalizationPolicy) -> Self {
		Self {
			cache,
			matcher,
			threshold,
			normalization,
		}
	}

	/// Looks `raw_name` up and picks the winning release.
	///
	/// An `Err` means the lookup itself failed and only this name is affected.
	pub async fn process(&self, raw_name: &str) -> Result<Resolution, LookupError> {
		let query = self.normalization.apply(raw_name);
		if query.is_empty() {
			return Ok(Resolution::Unmatched(Unmatched::BlankName));
		}

		let response = self.cache.fetch_or_load(&query).await?;
		let products = response.products();
		Ok(self.resolve(&query, &products))
	}

	/// Matching step on an already fetched product list.
	pub fn resolve(&self, query: &str, products: &[CatalogProduct]) -> Resolution {
		if products.is_empty() {
			return Resolution::Unmatched(Unmatched::EmptyCatalogResponse);
		}

		let candidates: Vec<&str> = products.iter().flat_map(|p| p.release_names()).collect();
		debug!("'{}': {} candidate release names", query, candidates.len());

		let Some(winner) = self.matcher.best_match(query, &candidates, self.threshold) else {
			let best = self
				.matcher
				.best_match(query, &candidates, 0)
				.map(|closest| (closest.name, closest.score));
			return Resolution::Unmatched(Unmatched::NoConfidentMatch {
				threshold: self.threshold,
				best,
			});
		};

		// First release in traversal order carrying the winning name.
		let owner = products.iter().find_map(|product| {
			product
				.software_releases
				.iter()
				.find(|release| release.name.as_deref() == Some(winner.name.as_str()))
				.map(|release| (product, release))
		});

		match owner {
			Some((product, release)) => Resolution::Resolved(OutputRow::new(query, product, release, winner.score)),
			None => Resolution::Unmatched(Unmatched::NoConfidentMatch {
				threshold: self.threshold,
				best: Some((winner.name, winner.score)),
			}),
		}
	}
}
