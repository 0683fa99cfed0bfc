//! One dashboard session: an owned dataset plus pure view computation.
//!
//! Every call to [`Session::view`] recomputes the whole view from the
//! dataset and the request; nothing is cached between calls.

use serde::Serialize;
use sensor_core::models::{ChartKind, Variable, VariableSelection};
use sensor_core::stats::{Describe, Headline};

use crate::dataset::Dataset;
use crate::filter::{FilterResult, ThresholdFilter};
use crate::selection::{select_series, Series};

/// Every selector value the dashboard exposes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRequest {
    pub selection: VariableSelection,
    pub chart: ChartKind,
    pub stats_variable: Variable,
    pub filter_variable: Variable,
    pub thresholds: ThresholdFilter,
}

impl Default for ViewRequest {
    fn default() -> Self {
        Self {
            selection: VariableSelection::Temperature,
            chart: ChartKind::Line,
            stats_variable: Variable::Temperature,
            filter_variable: Variable::Temperature,
            thresholds: ThresholdFilter::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsView {
    pub variable: Variable,
    pub describe: Describe,
    pub headline: Headline,
}

/// Everything derived from one request.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView<'a> {
    pub series: Vec<Series>,
    pub stats: StatsView,
    pub filters: FilterResult<'a>,
}

/// Owns the dataset of the current upload. A new upload means a new session.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Dataset,
}

impl Session {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn view(&self, request: &ViewRequest) -> DashboardView<'_> {
        let describe = self.dataset.describe(request.stats_variable);
        DashboardView {
            series: select_series(&self.dataset, request.selection, request.chart),
            stats: StatsView {
                variable: request.stats_variable,
                headline: Headline::from(&describe),
                describe,
            },
            filters: request
                .thresholds
                .apply(&self.dataset, request.filter_variable),
        }
    }
}
