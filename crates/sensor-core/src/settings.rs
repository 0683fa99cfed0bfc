use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::models::{ChartKind, Variable, VariableSelection};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Analyse temperature and humidity readings exported from ESP32 sensors
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sensor-dashboard",
    about = "Analyse temperature and humidity readings exported from ESP32 sensors",
    version
)]
pub struct Settings {
    /// Timezone of the dataset: "auto" or an IANA name
    #[arg(long, global = true)]
    pub timezone: Option<String>,

    /// Logging level
    #[arg(long, global = true, value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: Option<String>,

    /// Log file path
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Configuration file (defaults to ~/.sensor-dashboard/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the series selected for charting
    Show(ShowArgs),
    /// Print descriptive statistics for one variable
    Stats(StatsArgs),
    /// Split readings around thresholds and optionally export the upper view
    Filter(FilterArgs),
    /// Print the static measurement-site information
    Site,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// CSV file with sensor readings
    pub input: PathBuf,

    /// Variable(s) to display
    #[arg(long, value_enum)]
    pub variable: Option<VariableSelection>,

    /// Chart kind
    #[arg(long, value_enum)]
    pub chart: Option<ChartKind>,

    /// Also print the full normalized table
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// CSV file with sensor readings
    pub input: PathBuf,

    /// Variable to summarise
    #[arg(long, value_enum)]
    pub variable: Option<Variable>,

    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// CSV file with sensor readings
    pub input: PathBuf,

    /// Variable to filter on
    #[arg(long, value_enum)]
    pub variable: Option<Variable>,

    /// Keep readings strictly above this value (defaults to the mean)
    #[arg(long, allow_negative_numbers = true)]
    pub above: Option<f64>,

    /// Keep readings strictly below this value (defaults to the mean)
    #[arg(long, allow_negative_numbers = true)]
    pub below: Option<f64>,

    /// Write the above-threshold view as CSV
    #[arg(long)]
    pub export: bool,

    /// Directory the export is written into
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Write the export to stdout instead of a file
    #[arg(long, requires = "export")]
    pub stdout: bool,
}

// ── FileConfig ─────────────────────────────────────────────────────────────────

/// Optional defaults read from `~/.sensor-dashboard/config.json`.
///
/// The file is only ever read; command-line flags always win.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct FileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable: Option<VariableSelection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartKind>,
}

impl FileConfig {
    /// `~/.sensor-dashboard/config.json`.
    pub fn default_path() -> PathBuf {
        Self::path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// The config path rooted at `base_dir`.
    pub fn path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".sensor-dashboard").join("config.json")
    }

    /// Load from `path`. Missing file → defaults; malformed file → defaults
    /// plus a warning.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring malformed config {}: {}", path.display(), e);
            Self::default()
        })
    }
}

// ── RuntimeConfig ──────────────────────────────────────────────────────────────

/// Settings after merging CLI flags, the config file and built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub timezone: String,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub selection: VariableSelection,
    pub chart: ChartKind,
}

impl RuntimeConfig {
    /// The variable for commands that work on one column (`stats`,
    /// `filter`). A configured `ambas` falls back to temperature with a
    /// warning.
    pub fn single_variable(&self) -> Variable {
        if self.selection == VariableSelection::Both {
            warn!(
                "variable \"ambas\" selects one column here; using {}",
                self.selection.primary()
            );
        }
        self.selection.primary()
    }
}

impl Settings {
    /// Parse the process arguments and merge them with the config file.
    pub fn load() -> (Self, RuntimeConfig) {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> (Self, RuntimeConfig)
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let settings = Settings::parse_from(args);
        let path = settings
            .config
            .clone()
            .unwrap_or_else(FileConfig::default_path);
        let file = FileConfig::load_from(&path);
        let runtime = settings.resolve(&file);
        (settings, runtime)
    }

    /// Merge with `file`: CLI > config file > defaults. `--debug` forces DEBUG.
    pub fn resolve(&self, file: &FileConfig) -> RuntimeConfig {
        let timezone = self
            .timezone
            .clone()
            .or_else(|| file.timezone.clone())
            .unwrap_or_else(|| "auto".to_string());

        let log_level = if self.debug {
            "DEBUG".to_string()
        } else {
            self.log_level
                .clone()
                .or_else(|| file.log_level.clone())
                .unwrap_or_else(|| "INFO".to_string())
        };

        let (cli_selection, cli_chart) = match &self.command {
            Command::Show(args) => (args.variable, args.chart),
            Command::Stats(args) => (args.variable.map(VariableSelection::from), None),
            Command::Filter(args) => (args.variable.map(VariableSelection::from), None),
            Command::Site => (None, None),
        };

        RuntimeConfig {
            timezone,
            log_level,
            log_file: self.log_file.clone(),
            selection: cli_selection.or(file.variable).unwrap_or_default(),
            chart: cli_chart.or(file.chart).unwrap_or_default(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
