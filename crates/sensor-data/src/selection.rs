//! Variable and chart selection for display.

use chrono::NaiveDateTime;
use serde::Serialize;
use sensor_core::models::{ChartKind, Variable, VariableSelection};

use crate::dataset::Dataset;

/// One column prepared for display. `chart` is a rendering hint only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub variable: Variable,
    pub chart: ChartKind,
    pub points: Vec<(NaiveDateTime, f64)>,
}

/// The series for every variable in `selection`, in display order.
pub fn select_series(
    dataset: &Dataset,
    selection: VariableSelection,
    chart: ChartKind,
) -> Vec<Series> {
    selection
        .variables()
        .iter()
        .map(|&variable| Series {
            variable,
            chart,
            points: dataset.series(variable),
        })
        .collect()
}
