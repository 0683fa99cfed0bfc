//! CSV serialization of filtered views for download.

use std::io::Write;
use std::path::{Path, PathBuf};

use sensor_core::error::{DashboardError, Result};
use sensor_core::formatting::{format_csv_value, format_timestamp};
use sensor_core::models::{Reading, Variable, TIME_COLUMN};
use tracing::info;

use crate::filter::FilteredView;

/// Fixed name of the downloaded file.
pub const EXPORT_FILE_NAME: &str = "datos_filtrados.csv";

/// MIME type of the export.
pub const EXPORT_MIME: &str = "text/csv";

/// Write `rows` as UTF-8 CSV: the timestamp first, then every measurement
/// column. Missing readings become empty fields.
pub fn write_csv<W: Write>(rows: &[&Reading], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record([
            TIME_COLUMN,
            Variable::Temperature.canonical_name(),
            Variable::Humidity.canonical_name(),
        ])
        .map_err(export_error)?;

    for reading in rows {
        csv_writer
            .write_record([
                format_timestamp(&reading.timestamp),
                format_csv_value(reading.temperature),
                format_csv_value(reading.humidity),
            ])
            .map_err(export_error)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Serialize a view into an in-memory buffer.
pub fn to_csv_bytes(view: &FilteredView<'_>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(&view.rows, &mut buf)?;
    Ok(buf)
}

/// Write a view to [`EXPORT_FILE_NAME`] inside `dir`, replacing any earlier
/// export. Returns the written path.
pub fn export_to_dir(view: &FilteredView<'_>, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(EXPORT_FILE_NAME);
    let bytes = to_csv_bytes(view)?;
    std::fs::write(&path, bytes)?;
    info!(
        "Exported {} rows ({}) to {} as {}",
        view.len(),
        view.describe_condition(),
        path.display(),
        EXPORT_MIME
    );
    Ok(path)
}

fn export_error(e: csv::Error) -> DashboardError {
    DashboardError::Export(e.to_string())
}
