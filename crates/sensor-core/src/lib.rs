//! Core domain types and pure helpers for the sensor dashboard.
//!
//! Everything in this crate is free of I/O except the configuration
//! loader in [`settings`].

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod stats;
pub mod time_utils;
