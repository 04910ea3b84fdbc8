// src/models/report.rs

use serde::Serialize;
use crate::models::catalog::{CatalogProduct, SoftwareRelease, SoftwareVersion};

/// One line of the reconcile report. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
	#[serde(rename = "Tech Name")]
	pub tech_name: String,
	#[serde(rename = "Application")]
	pub application: String,
	#[serde(rename = "Name")]
	pub name: String,
	#[serde(rename = "Description")]
	pub description: String,
	#[serde(rename = "Manufacturer Name")]
	pub manufacturer_name: String,
	#[serde(rename = "Manufacturer Description")]
	pub manufacturer_description: String,
	#[serde(rename = "Release Name")]
	pub release_name: String,
	#[serde(rename = "End of Life")]
	pub end_of_life: String,
	#[serde(rename = "End of Life Support Level")]
	pub end_of_life_support_level: String,
	#[serde(rename = "Obsolete")]
	pub obsolete: String,
	#[serde(rename = "Similarity")]
	pub similarity: u8,
}

impl OutputRow {
	pub fn new(tech_name: &str, product: &CatalogProduct, release: &SoftwareRelease, similarity: u8) -> Self {
		let lifecycle = &release.software_lifecycle;
		Self {
			tech_name: tech_name.to_string(),
			application: or_blank(&product.application),
			name: or_blank(&product.name),
			description: or_blank(&product.description),
			manufacturer_name: or_blank(&product.manufacturer.name),
			manufacturer_description: or_blank(&product.manufacturer.description),
			release_name: or_blank(&release.name),
			end_of_life: or_blank(&lifecycle.end_of_life),
			end_of_life_support_level: or_blank(&lifecycle.end_of_life_support_level),
			obsolete: or_blank(&lifecycle.obsolete),
			similarity,
		}
	}
}

/// One line of a single-product export: a release paired with a version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
	pub application: String,
	pub name: String,
	pub description: String,
	pub manufacturer_name: String,
	pub manufacturer_description: String,
	pub release_name: String,
	pub release_application: String,
	pub end_of_life: String,
	pub end_of_life_calculated_case: String,
	pub end_of_life_exception: String,
	pub end_of_life_support_level: String,
	pub obsolete: String,
	pub version_name: String,
}

impl ExportRow {
	pub fn new(product: &CatalogProduct, release: &SoftwareRelease, version: Option<&SoftwareVersion>) -> Self {
		let lifecycle = &release.software_lifecycle;
		Self {
			application: or_blank(&product.application),
			name: or_blank(&product.name),
			description: or_blank(&product.description),
			manufacturer_name: or_blank(&product.manufacturer.name),
			manufacturer_description: or_blank(&product.manufacturer.description),
			release_name: or_blank(&release.name),
			release_application: or_blank(&release.application),
			end_of_life: or_blank(&lifecycle.end_of_life),
			end_of_life_calculated_case: or_blank(&lifecycle.end_of_life_calculated_case),
			end_of_life_exception: or_blank(&lifecycle.end_of_life_exception),
			end_of_life_support_level: or_blank(&lifecycle.end_of_life_support_level),
			obsolete: or_blank(&lifecycle.obsolete),
			version_name: version.map(|v| or_blank(&v.name)).unwrap_or_default(),
		}
	}

	/// Every release crossed with every version of its product, in response
	/// order. A product without versions still yields one row per release.
	pub fn expand(products: &[CatalogProduct]) -> Vec<ExportRow> {
		let mut rows = Vec::new();
		for product in products {
			for release in &product.software_releases {
				if product.software_versions.is_empty() {
					rows.push(ExportRow::new(product, release, None));
					continue;
				}
				for version in &product.software_versions {
					rows.push(ExportRow::new(product, release, Some(version)));
				}
			}
		}
		rows
	}
}

fn or_blank(value: &Option<String>) -> String {
	value.clone().unwrap_or_default()
}
