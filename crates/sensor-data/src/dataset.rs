use chrono::NaiveDateTime;
use sensor_core::models::{Reading, SensorLabel, Variable, TIME_COLUMN};
use sensor_core::stats::{self, Describe};

/// Where a canonical column came from in the uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSource {
    pub variable: Variable,
    /// Header text as it appeared in the CSV.
    pub header: String,
    /// Parsed metadata when the header was in long form.
    pub label: Option<SensorLabel>,
}

impl ColumnSource {
    /// A column whose header already was the canonical name.
    pub fn canonical(variable: Variable) -> Self {
        Self {
            variable,
            header: variable.canonical_name().to_string(),
            label: None,
        }
    }
}

/// A normalized, timestamp-keyed table of readings from one upload.
///
/// Rows keep file order; duplicate or out-of-order timestamps are kept
/// as they are.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    readings: Vec<Reading>,
    sources: [ColumnSource; 2],
}

impl Dataset {
    pub fn new(readings: Vec<Reading>, sources: [ColumnSource; 2]) -> Self {
        Self { readings, sources }
    }

    /// Build a dataset with canonical column provenance.
    pub fn from_readings(readings: Vec<Reading>) -> Self {
        Self::new(
            readings,
            [
                ColumnSource::canonical(Variable::Temperature),
                ColumnSource::canonical(Variable::Humidity),
            ],
        )
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Name of the index column followed by the measurement columns.
    pub fn column_names(&self) -> [&'static str; 3] {
        [
            TIME_COLUMN,
            Variable::Temperature.canonical_name(),
            Variable::Humidity.canonical_name(),
        ]
    }

    pub fn source(&self, variable: Variable) -> &ColumnSource {
        match variable {
            Variable::Temperature => &self.sources[0],
            Variable::Humidity => &self.sources[1],
        }
    }

    /// All values of one column in row order, NaN for missing readings.
    pub fn column(&self, variable: Variable) -> Vec<f64> {
        self.readings.iter().map(|r| r.value(variable)).collect()
    }

    /// `(timestamp, value)` pairs of one column in row order.
    pub fn series(&self, variable: Variable) -> Vec<(NaiveDateTime, f64)> {
        self.readings
            .iter()
            .map(|r| (r.timestamp, r.value(variable)))
            .collect()
    }

    pub fn describe(&self, variable: Variable) -> Describe {
        stats::describe(&self.column(variable))
    }

    /// Earliest and latest timestamp, regardless of row order.
    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.readings.first()?.timestamp;
        Some(self.readings.iter().fold((first, first), |(lo, hi), r| {
            (lo.min(r.timestamp), hi.max(r.timestamp))
        }))
    }
}
