//! CSV ingestion and schema normalization.
//!
//! Fail-fast: the first malformed row, missing column or unparseable
//! timestamp aborts the whole load and no partial dataset is returned.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use sensor_core::error::IngestionError;
use sensor_core::models::{Reading, Variable, TIME_COLUMN};
use sensor_core::time_utils::TimestampParser;
use tracing::{debug, info};

use crate::dataset::{ColumnSource, Dataset};
use crate::labels::parse_sensor_label;

// ── Public API ────────────────────────────────────────────────────────────────

/// Read and normalize the CSV file at `path`.
pub fn read_dataset(path: &Path, parser: &TimestampParser) -> Result<Dataset, IngestionError> {
    let bytes = std::fs::read(path).map_err(|source| IngestionError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = parse_dataset(&bytes, parser)?;
    info!(
        "Loaded {} readings from {}",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

/// Normalize raw CSV bytes into a [`Dataset`].
///
/// 1. Parse the CSV with a header row.
/// 2. Map the long-form sensor headers onto `temperatura` / `humedad`.
/// 3. Parse every `Time` cell.
/// 4. Key the rows by that timestamp.
pub fn parse_dataset(bytes: &[u8], parser: &TimestampParser) -> Result<Dataset, IngestionError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| IngestionError::Csv(e.to_string()))?
        .clone();
    let layout = ColumnLayout::resolve(&headers)?;

    let mut readings = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| IngestionError::Csv(e.to_string()))?;
        readings.push(layout.reading(&record, parser)?);
    }

    debug!("Parsed {} rows", readings.len());
    Ok(Dataset::new(readings, layout.sources))
}

// ── Column layout ─────────────────────────────────────────────────────────────

/// Positions of the required columns within a header row.
struct ColumnLayout {
    time: usize,
    temperature: usize,
    humidity: usize,
    sources: [ColumnSource; 2],
}

impl ColumnLayout {
    fn resolve(headers: &StringRecord) -> Result<Self, IngestionError> {
        let time = headers
            .iter()
            .position(|h| h == TIME_COLUMN)
            .ok_or_else(|| IngestionError::MissingColumn(TIME_COLUMN.to_string()))?;

        let (temperature, temperature_src) = find_measurement(headers, Variable::Temperature)?;
        let (humidity, humidity_src) = find_measurement(headers, Variable::Humidity)?;

        for (i, h) in headers.iter().enumerate() {
            if i != time && i != temperature && i != humidity {
                debug!("Ignoring extra column {:?}", h);
            }
        }

        Ok(Self {
            time,
            temperature,
            humidity,
            sources: [temperature_src, humidity_src],
        })
    }

    fn reading(
        &self,
        record: &StringRecord,
        parser: &TimestampParser,
    ) -> Result<Reading, IngestionError> {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let cell = |i: usize| record.get(i).unwrap_or("");

        let raw_time = cell(self.time);
        let timestamp = parser
            .parse(raw_time)
            .ok_or_else(|| IngestionError::TimestampParse {
                line,
                value: raw_time.to_string(),
            })?;

        Ok(Reading {
            timestamp,
            temperature: parse_value(cell(self.temperature), Variable::Temperature, line)?,
            humidity: parse_value(cell(self.humidity), Variable::Humidity, line)?,
        })
    }
}

/// Locate the column for `variable`: either its long-form sensor header
/// (compared label by label, so spacing does not matter) or its canonical
/// name.
fn find_measurement(
    headers: &StringRecord,
    variable: Variable,
) -> Result<(usize, ColumnSource), IngestionError> {
    let expected = parse_sensor_label(variable.source_label());

    for (i, header) in headers.iter().enumerate() {
        if header == variable.canonical_name() {
            return Ok((i, ColumnSource::canonical(variable)));
        }
        let label = parse_sensor_label(header);
        if label.is_some() && label == expected {
            return Ok((
                i,
                ColumnSource {
                    variable,
                    header: header.to_string(),
                    label,
                },
            ));
        }
    }

    Err(IngestionError::MissingColumn(
        variable.source_label().to_string(),
    ))
}

/// Empty cells are missing readings (NaN); anything else must be a number.
fn parse_value(raw: &str, variable: Variable, line: u64) -> Result<f64, IngestionError> {
    if raw.is_empty() {
        return Ok(f64::NAN);
    }
    raw.parse::<f64>()
        .map_err(|_| IngestionError::InvalidValue {
            line,
            column: variable.canonical_name().to_string(),
            value: raw.to_string(),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
