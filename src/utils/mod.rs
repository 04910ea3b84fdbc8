pub mod auth;
pub mod catalog_api;
pub mod csv_importer;
pub mod logger;
pub mod report_writer;
