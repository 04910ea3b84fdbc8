use crate::errors::ReportError;
use crate::models::report::{ExportRow, OutputRow};
use csv::WriterBuilder;
use log::info;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Destination of matched rows. Rows are only ever appended.
pub trait ReportSink {
	fn append(&mut self, row: &OutputRow) -> Result<(), ReportError>;
}

/// Appends rows to a comma separated report, writing the header only when
/// the file is new or still empty.
pub struct CsvReportWriter {
	path: PathBuf,
	writer: csv::Writer<File>,
}

impl CsvReportWriter {
	pub fn open(path: impl AsRef<Path>) -> Result<Self, ReportError> {
		let path = path.as_ref().to_path_buf();
		let file = OpenOptions::new().create(true).append(true).open(&path)?;
		// A run that matched nothing leaves an empty file behind.
		let has_content = file.metadata()?.len() > 0;

		let writer = WriterBuilder::new()
			.has_headers(!has_content)
			.from_writer(file);

		if has_content {
			info!("Appending to existing report {:?}", path);
		} else {
			info!("Creating report {:?}", path);
		}

		Ok(Self { path, writer })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl ReportSink for CsvReportWriter {
	fn append(&mut self, row: &OutputRow) -> Result<(), ReportError> {
		self.writer.serialize(row)?;
		// Each row hits the disk before the next lookup starts.
		self.writer.flush()?;
		Ok(())
	}
}

/// Writes a single-product export, replacing any previous file.
///
/// # Returns
///
/// * `Result<usize, ReportError>` - The number of rows written.
pub fn write_export(path: impl AsRef<Path>, rows: &[ExportRow]) -> Result<usize, ReportError> {
	let mut writer = WriterBuilder::new()
		.delimiter(b';')
		.from_path(path.as_ref())?;

	if rows.is_empty() {
		writer.write_record(EXPORT_HEADER)?;
	}
	for row in rows {
		writer.serialize(row)?;
	}
	writer.flush()?;

	Ok(rows.len())
}

const EXPORT_HEADER: [&str; 13] = [
	"application",
	"name",
	"description",
	"manufacturer_name",
	"manufacturer_description",
	"release_name",
	"release_application",
	"end_of_life",
	"end_of_life_calculated_case",
	"end_of_life_exception",
	"end_of_life_support_level",
	"obsolete",
	"version_name",
];
