// src/utils/csv_importer.rs

use crate::errors::LookupError;
use csv::ReaderBuilder;
use encoding_rs::{Encoding, UTF_8};
use encoding_rs_io::DecodeReaderBytesBuilder;
use log::{info, warn};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Column delimiter of the technology list.
const DELIMITER: u8 = b';';

/// Reads the technology names from the first column of the input table.
///
/// The first row is a header and is skipped. Rows with an empty first column
/// are skipped with a warning; order and duplicates are preserved.
///
/// # Arguments
///
/// * `path` - The path to the semicolon separated input file.
/// * `encoding_label` - A WHATWG encoding label such as `windows-1252`. When
///   absent the file is read as UTF-8 unless a BOM says otherwise.
///
/// # Returns
///
/// * `Result<Vec<String>, LookupError>` - The names, or `InputFormat` when the
///   file is missing or malformed.
pub fn read_technologies(path: &Path, encoding_label: Option<&str>) -> Result<Vec<String>, LookupError> {
	let encoding = resolve_encoding(encoding_label)?;

	let file = File::open(path).map_err(|e| match e.kind() {
		ErrorKind::NotFound => LookupError::InputFormat(format!("input file {:?} not found", path)),
		_ => LookupError::InputFormat(format!("cannot open {:?}: {}", path, e)),
	})?;

	let decoded = DecodeReaderBytesBuilder::new()
		.encoding(Some(encoding))
		.bom_override(true)
		.build(file);

	let names = parse_technologies(decoded)?;
	info!("Loaded {} technologies from {:?}", names.len(), path);
	Ok(names)
}

fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding, LookupError> {
	match label {
		None => Ok(UTF_8),
		Some(label) => Encoding::for_label(label.trim().as_bytes())
			.ok_or_else(|| LookupError::InputFormat(format!("unknown input encoding '{}'", label))),
	}
}

fn parse_technologies<R: Read>(reader: R) -> Result<Vec<String>, LookupError> {
	let mut rdr = ReaderBuilder::new()
		.delimiter(DELIMITER)
		.has_headers(true)
		.flexible(true)
		.trim(csv::Trim::All)
		.from_reader(reader);

	let mut names = Vec::new();
	for (index, result) in rdr.records().enumerate() {
		// Header is line 1.
		let line_number = index + 2;
		let record = result.map_err(|e| LookupError::InputFormat(format!("line {}: {}", line_number, e)))?;

		let name = record
			.get(0)
			.ok_or_else(|| LookupError::InputFormat(format!("line {} has no columns", line_number)))?;

		if name.is_empty() {
			warn!("Skipping line {}: empty technology name", line_number);
			continue;
		}
		names.push(name.to_string());
	}

	Ok(names)
}
