//! Threshold filtering over one variable.

use serde::Serialize;
use sensor_core::models::{Reading, Variable};
use sensor_core::stats;

use crate::dataset::Dataset;

// ── Bounds ────────────────────────────────────────────────────────────────────

/// Range a threshold may take for one column, plus its default (the mean).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdBounds {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl ThresholdBounds {
    /// Bounds over the non-NaN values of `variable`, or `None` when the
    /// column has no valid value.
    pub fn for_column(dataset: &Dataset, variable: Variable) -> Option<Self> {
        let values: Vec<f64> = dataset
            .column(variable)
            .into_iter()
            .filter(|v| !v.is_nan())
            .collect();
        let default = stats::mean(&values)?;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self { min, max, default })
    }

    /// Clamp a requested threshold into `[min, max]`. `None` or NaN selects
    /// the default.
    pub fn resolve(&self, requested: Option<f64>) -> f64 {
        match requested {
            Some(t) if !t.is_nan() => t.clamp(self.min, self.max),
            _ => self.default,
        }
    }
}

// ── Views ─────────────────────────────────────────────────────────────────────

/// Which side of the threshold a view keeps. Both comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Above,
    Below,
}

impl Direction {
    pub fn keeps(self, value: f64, threshold: f64) -> bool {
        match self {
            Direction::Above => value > threshold,
            Direction::Below => value < threshold,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Direction::Above => ">",
            Direction::Below => "<",
        }
    }
}

/// Rows of a dataset on one side of a threshold, in dataset order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    pub variable: Variable,
    pub direction: Direction,
    pub threshold: f64,
    pub rows: Vec<&'a Reading>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// e.g. `temperatura > 22.5`
    pub fn describe_condition(&self) -> String {
        format!(
            "{} {} {}",
            self.variable,
            self.direction.symbol(),
            self.threshold
        )
    }
}

/// Keep the rows whose `variable` is strictly on `direction`'s side of
/// `threshold`. NaN readings never match.
pub fn filter_rows(
    dataset: &Dataset,
    variable: Variable,
    direction: Direction,
    threshold: f64,
) -> FilteredView<'_> {
    let rows = dataset
        .readings()
        .iter()
        .filter(|r| direction.keeps(r.value(variable), threshold))
        .collect();
    FilteredView {
        variable,
        direction,
        threshold,
        rows,
    }
}

// ── ThresholdFilter ───────────────────────────────────────────────────────────

/// The two independent thresholds applied to one variable.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThresholdFilter {
    pub above: Option<f64>,
    pub below: Option<f64>,
}

/// Both views for one variable together with the bounds that clamped them.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult<'a> {
    pub variable: Variable,
    /// `None` when the column is empty or all NaN.
    pub bounds: Option<ThresholdBounds>,
    pub above: FilteredView<'a>,
    pub below: FilteredView<'a>,
}

impl ThresholdFilter {
    pub fn new(above: Option<f64>, below: Option<f64>) -> Self {
        Self { above, below }
    }

    /// Clamp both thresholds and split the dataset. Without valid bounds the
    /// thresholds are NaN and both views are empty.
    pub fn apply<'a>(&self, dataset: &'a Dataset, variable: Variable) -> FilterResult<'a> {
        let bounds = ThresholdBounds::for_column(dataset, variable);
        let (above_t, below_t) = match &bounds {
            Some(b) => (b.resolve(self.above), b.resolve(self.below)),
            None => (f64::NAN, f64::NAN),
        };
        FilterResult {
            variable,
            bounds,
            above: filter_rows(dataset, variable, Direction::Above, above_t),
            below: filter_rows(dataset, variable, Direction::Below, below_t),
        }
    }
}
