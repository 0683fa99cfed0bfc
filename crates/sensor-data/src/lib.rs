//! Ingestion and query layer for the sensor dashboard.
//!
//! Turns an uploaded CSV into a normalized [`dataset::Dataset`] and derives
//! every view the dashboard shows from it: selected series, descriptive
//! statistics, threshold-filtered subsets and their CSV export.

pub mod dataset;
pub mod export;
pub mod filter;
pub mod labels;
pub mod reader;
pub mod selection;
pub mod session;

pub use sensor_core as core;
