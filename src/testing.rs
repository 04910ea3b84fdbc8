//! Scriptable stand-in for the remote catalog, shared by unit tests.

use crate::errors::LookupError;
use crate::models::catalog::RawCatalogResponse;
use crate::utils::catalog_api::CatalogClient;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
enum Reply {
	Body(String),
	Status(u16),
	Unauthorized,
}

#[derive(Clone, Default)]
pub struct FakeCatalog {
	replies: HashMap<String, Reply>,
	calls: Arc<Mutex<Vec<String>>>,
}

impl FakeCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_body(mut self, name: &str, body: &str) -> Self {
		self.replies.insert(name.to_string(), Reply::Body(body.to_string()));
		self
	}

	pub fn with_status(mut self, name: &str, status: u16) -> Self {
		self.replies.insert(name.to_string(), Reply::Status(status));
		self
	}

	pub fn with_auth_failure(mut self, name: &str) -> Self {
		self.replies.insert(name.to_string(), Reply::Unauthorized);
		self
	}

	pub fn calls(&self, name: &str) -> usize {
		self.calls.lock().unwrap().iter().filter(|n| *n == name).count()
	}

	pub fn total_calls(&self) -> usize {
		self.calls.lock().unwrap().len()
	}
}

impl CatalogClient for FakeCatalog {
	async fn lookup(&self, name: &str) -> Result<RawCatalogResponse, LookupError> {
		self.calls.lock().unwrap().push(name.to_string());
		match self.replies.get(name) {
			Some(Reply::Body(body)) => Ok(RawCatalogResponse::new(body.clone())),
			Some(Reply::Status(status)) => Err(LookupError::CatalogLookup {
				status_code: *status,
				body: format!("status {}", status),
			}),
			Some(Reply::Unauthorized) => Err(LookupError::Auth {
				status: 401,
				body: "token expired".to_string(),
			}),
			None => Ok(RawCatalogResponse::new(r#"{"data":{"SoftwareProduct":[]}}"#)),
		}
	}
}

/// A catalog reply with one product per `(product, [release, eol])` entry.
pub fn catalog_body(products: &[(&str, &[(&str, &str)])]) -> String {
	let products: Vec<serde_json::Value> = products
		.iter()
		.map(|(name, releases)| {
			let releases: Vec<serde_json::Value> = releases
				.iter()
				.map(|(release, eol)| {
					serde_json::json!({
						"name": release,
						"application": name,
						"softwareLifecycle": {
							"endOfLife": eol,
							"endOfLifeSupportLevel": "Mainstream",
							"obsolete": false
						}
					})
				})
				.collect();
			serde_json::json!({
				"application": name,
				"name": name,
				"description": format!("{} product", name),
				"manufacturer": { "name": "Apache Software Foundation", "description": "ASF" },
				"softwareReleases": releases,
				"softwareVersions": []
			})
		})
		.collect();

	serde_json::json!({ "data": { "SoftwareProduct": products } }).to_string()
}
