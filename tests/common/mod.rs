//! Shared helpers for the command line tests

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use lifecycle_lookup::models::catalog::RawCatalogResponse;
use lifecycle_lookup::repositories::cache_store::{CacheKey, CacheStore, FileCacheStore};
use std::fs;
use tempfile::TempDir;

pub const TOMCAT_RESPONSE: &str = r#"{
    "data": {
        "SoftwareProduct": [
            {
                "application": "Tomcat",
                "name": "Tomcat",
                "description": "Java servlet container",
                "manufacturer": { "name": "Apache Software Foundation", "description": "ASF" },
                "softwareReleases": [
                    {
                        "name": "Apache Tomcat 9.0",
                        "application": "Tomcat",
                        "softwareLifecycle": {
                            "endOfLife": "2024-01-01",
                            "endOfLifeCalculatedCase": "Vendor",
                            "endOfLifeException": false,
                            "endOfLifeSupportLevel": "Extended",
                            "obsolete": false
                        }
                    }
                ],
                "softwareVersions": [ { "name": "9.0.1" }, { "name": "9.0.2" } ]
            }
        ]
	}
}"#;

pub const EMPTY_RESPONSE: &str = r#"{"data":{"SoftwareProduct":[]}}"#;

/// The binary with credentials cleared from the environment
pub fn lookup() -> Command {
	let mut cmd = Command::new(cargo::cargo_bin!("lifecycle-lookup"));
	cmd.env_remove("FLEXERA_API_TOKEN")
		.env_remove("FLEXERA_ACCESS_TOKEN")
		.env_remove("FLEXERA_ORG_ID")
		.env("RUST_LOG", "warn");
	cmd
}

/// A temp directory with a technology list and a seeded default cache
pub fn setup_workspace(techs: &[&str], cached: &[(&str, &str)]) -> TempDir {
	let tmp = TempDir::new().unwrap();

	let mut input = String::from("Technology;Owner\n");
	for tech in techs {
		input.push_str(&format!("{};ops\n", tech));
	}
	fs::write(tmp.path().join("techs.csv"), input).unwrap();

	let store = FileCacheStore::new(tmp.path().join(".cache")).unwrap();
	for (query, body) in cached {
		store
			.put(&CacheKey::for_query(query), query, &RawCatalogResponse::new(*body))
			.unwrap();
	}

	tmp
}
