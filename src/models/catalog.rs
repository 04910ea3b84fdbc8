// src/models/catalog.rs

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The catalog reply exactly as received, kept as text so the cache can
/// hand back the same bytes on later runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCatalogResponse(String);

impl RawCatalogResponse {
	pub fn new(body: impl Into<String>) -> Self {
		Self(body.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Extracts `data.SoftwareProduct`.
	///
	/// A body that is not JSON, or whose `data` section is absent or shaped
	/// differently, yields an empty list rather than an error.
	pub fn products(&self) -> Vec<CatalogProduct> {
		let response: CatalogResponse = match serde_json::from_str(&self.0) {
			Ok(response) => response,
			Err(e) => {
				warn!("Catalog response could not be parsed, treating it as empty: {}", e);
				return Vec::new();
			}
		};

		if let Some(errors) = response.errors.as_ref().filter(|e| !e.is_empty()) {
			for error in errors {
				warn!("Catalog reported an error: {}", error.message);
			}
		}

		response
			.data
			.and_then(|data| data.software_product)
			.unwrap_or_default()
	}
}

#[derive(Debug, Deserialize)]
pub struct CatalogResponse {
	#[serde(default, deserialize_with = "lenient")]
	pub data: Option<CatalogData>,
	#[serde(default)]
	pub errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogData {
	#[serde(rename = "SoftwareProduct", default, deserialize_with = "lenient")]
	pub software_product: Option<Vec<CatalogProduct>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlError {
	#[serde(default)]
	pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
	#[serde(default, deserialize_with = "text")]
	pub application: Option<String>,
	#[serde(default, deserialize_with = "text")]
	pub name: Option<String>,
	#[serde(default, deserialize_with = "text")]
	pub description: Option<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub manufacturer: Manufacturer,
	#[serde(default, deserialize_with = "null_as_default")]
	pub software_releases: Vec<SoftwareRelease>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub software_versions: Vec<SoftwareVersion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manufacturer {
	#[serde(default, deserialize_with = "text")]
	pub name: Option<String>,
	#[serde(default, deserialize_with = "text")]
	pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareRelease {
	#[serde(default, deserialize_with = "text")]
	pub name: Option<String>,
	#[serde(default, deserialize_with = "text")]
	pub application: Option<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub software_lifecycle: SoftwareLifecycle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareLifecycle {
	#[serde(default, deserialize_with = "text")]
	pub end_of_life: Option<String>,
	#[serde(default, deserialize_with = "text")]
	pub end_of_life_calculated_case: Option<String>,
	#[serde(default, deserialize_with = "text")]
	pub end_of_life_exception: Option<String>,
	#[serde(default, deserialize_with = "text")]
	pub end_of_life_support_level: Option<String>,
	#[serde(default, deserialize_with = "text")]
	pub obsolete: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoftwareVersion {
	#[serde(default, deserialize_with = "text")]
	pub name: Option<String>,
}

impl CatalogProduct {
	/// Release names in response order, skipping releases without a name.
	pub fn release_names(&self) -> impl Iterator<Item = &str> {
		self.software_releases.iter().filter_map(|r| r.name.as_deref())
	}
}

/// Accepts any JSON scalar and renders it as text, so fields the catalog
/// returns as booleans or numbers (`obsolete`, `endOfLifeException`) land
/// in the report the same way strings do.
fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Value::deserialize(deserializer)? {
		Value::Null => None,
		Value::String(s) => Some(s),
		Value::Bool(b) => Some(b.to_string()),
		Value::Number(n) => Some(n.to_string()),
		other => Some(other.to_string()),
	})
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Malformed sections become `None` instead of failing the whole document.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
	D: Deserializer<'de>,
	T: serde::de::DeserializeOwned,
{
	let value = Value::deserialize(deserializer)?;
	Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
	use super::*;

	const TOMCAT: &str = r#"{
		"data": {
			"SoftwareProduct": [
				{
					"application": "Tomcat",
					"name": "Tomcat",
					"description": "Servlet container",
					"manufacturer": { "name": "Apache Software Foundation", "description": null },
					"softwareReleases": [
						{
							"name": "Apache Tomcat 9.0",
							"application": "Tomcat",
							"softwareLifecycle": {
								"endOfLife": "2024-01-01",
								"endOfLifeCalculatedCase": "Vendor",
								"endOfLifeException": false,
								"endOfLifeSupportLevel": "Extended",
								"obsolete": true
							}
						}
					],
					"softwareVersions": [ { "name": "9.0.1" } ]
				}
			]
		}
	}"#;

	#[test]
	fn test_products_parses_nested_records() {
		let products = RawCatalogResponse::new(TOMCAT).products();
		assert_eq!(products.len(), 1);

		let product = &products[0];
		assert_eq!(product.name.as_deref(), Some("Tomcat"));
		assert_eq!(product.manufacturer.name.as_deref(), Some("Apache Software Foundation"));
		assert_eq!(product.manufacturer.description, None);
		assert_eq!(product.software_versions[0].name.as_deref(), Some("9.0.1"));

		let lifecycle = &product.software_releases[0].software_lifecycle;
		assert_eq!(lifecycle.end_of_life.as_deref(), Some("2024-01-01"));
		assert_eq!(lifecycle.end_of_life_exception.as_deref(), Some("false"));
		assert_eq!(lifecycle.obsolete.as_deref(), Some("true"));
	}

	#[test]
	fn test_products_empty_or_malformed() {
		assert!(RawCatalogResponse::new(r#"{"data":{"SoftwareProduct":[]}}"#).products().is_empty());
		assert!(RawCatalogResponse::new(r#"{"data":{"SoftwareProduct":null}}"#).products().is_empty());
		assert!(RawCatalogResponse::new(r#"{"data":null}"#).products().is_empty());
		assert!(RawCatalogResponse::new(r#"{"data":{"SoftwareProduct":"oops"}}"#).products().is_empty());
		assert!(RawCatalogResponse::new(r#"{}"#).products().is_empty());
		assert!(RawCatalogResponse::new("<html>gateway timeout</html>").products().is_empty());
	}

	#[test]
	fn test_products_survive_graphql_errors() {
		let body = r#"{
			"errors": [ { "message": "partial failure" } ],
			"data": { "SoftwareProduct": [ { "name": "Nginx", "softwareReleases": null } ] }
		}"#;
		let products = RawCatalogResponse::new(body).products();
		assert_eq!(products.len(), 1);
		assert!(products[0].software_releases.is_empty());
	}

	#[test]
	fn test_release_names_skip_unnamed() {
		let product = CatalogProduct {
			software_releases: vec![
				SoftwareRelease { name: Some("A 1".into()), ..Default::default() },
				SoftwareRelease::default(),
				SoftwareRelease { name: Some("A 2".into()), ..Default::default() },
			],
			..Default::default()
		};
		assert_eq!(product.release_names().collect::<Vec<_>>(), vec!["A 1", "A 2"]);
	}
}
