use std::fmt;

use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Header of the timestamp column in an uploaded CSV.
pub const TIME_COLUMN: &str = "Time";

// ── Variable ──────────────────────────────────────────────────────────────────

/// One of the two measured quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Variable {
    /// Air temperature in degrees Celsius.
    #[serde(rename = "temperatura", alias = "temperature")]
    #[value(name = "temperatura", alias = "temperature")]
    Temperature,
    /// Relative humidity in percent.
    #[serde(rename = "humedad", alias = "humidity")]
    #[value(name = "humedad", alias = "humidity")]
    Humidity,
}

impl Variable {
    /// Both variables, in column order.
    pub const ALL: [Variable; 2] = [Variable::Temperature, Variable::Humidity];

    /// Short column name used after ingestion.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Variable::Temperature => "temperatura",
            Variable::Humidity => "humedad",
        }
    }

    /// Long-form header the sensor export uses for this variable.
    pub fn source_label(self) -> &'static str {
        match self {
            Variable::Temperature => r#"temperatura {device="ESP32", name="Sensor 1"}"#,
            Variable::Humidity => r#"humedad {device="ESP32", name="Sensor 1"}"#,
        }
    }

    /// Human-readable title.
    pub fn title(self) -> &'static str {
        match self {
            Variable::Temperature => "Temperatura",
            Variable::Humidity => "Humedad",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Variable::Temperature => "°C",
            Variable::Humidity => "%",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

// ── Display selectors ─────────────────────────────────────────────────────────

/// Which variable(s) a chart view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum VariableSelection {
    #[default]
    #[serde(rename = "temperatura", alias = "temperature")]
    #[value(name = "temperatura", alias = "temperature")]
    Temperature,
    #[serde(rename = "humedad", alias = "humidity")]
    #[value(name = "humedad", alias = "humidity")]
    Humidity,
    #[serde(rename = "ambas", alias = "both")]
    #[value(name = "ambas", alias = "both")]
    Both,
}

impl VariableSelection {
    /// The variables covered by this selection, in display order.
    pub fn variables(self) -> &'static [Variable] {
        match self {
            VariableSelection::Temperature => &[Variable::Temperature],
            VariableSelection::Humidity => &[Variable::Humidity],
            VariableSelection::Both => &Variable::ALL,
        }
    }

    /// The first selected variable; used where a single column is required.
    pub fn primary(self) -> Variable {
        self.variables()[0]
    }
}

impl From<Variable> for VariableSelection {
    fn from(v: Variable) -> Self {
        match v {
            Variable::Temperature => VariableSelection::Temperature,
            Variable::Humidity => VariableSelection::Humidity,
        }
    }
}

/// Rendering hint for a series. Carries no data transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Area,
    Bar,
}

impl ChartKind {
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Line => "Línea",
            ChartKind::Area => "Área",
            ChartKind::Bar => "Barra",
        }
    }
}

// ── Reading ───────────────────────────────────────────────────────────────────

/// One row of a normalized dataset.
///
/// `timestamp` is wall-clock time in the dataset timezone. Missing
/// measurements are stored as NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    #[serde(rename = "temperatura")]
    pub temperature: f64,
    #[serde(rename = "humedad")]
    pub humidity: f64,
}

impl Reading {
    pub fn value(&self, variable: Variable) -> f64 {
        match variable {
            Variable::Temperature => self.temperature,
            Variable::Humidity => self.humidity,
        }
    }
}

// ── SensorLabel ───────────────────────────────────────────────────────────────

/// Metadata embedded in a long-form column header such as
/// `temperatura {device="ESP32", name="Sensor 1"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorLabel {
    /// The bare measurement name before the braces.
    pub measurement: String,
    /// `key="value"` pairs in header order.
    pub labels: Vec<(String, String)>,
}

impl SensorLabel {
    /// Value of the label named `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for SensorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.labels.is_empty() {
            return f.write_str(&self.measurement);
        }
        write!(f, "{} {{", self.measurement)?;
        for (i, (k, v)) in self.labels.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}=\"{}\"", k, v)?;
        }
        f.write_str("}")
    }
}

// ── Site ──────────────────────────────────────────────────────────────────────

/// Static description of where the sensors are installed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Site {
    pub name: &'static str,
    pub city: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_m: u32,
    pub sensor_type: &'static str,
}

/// The measurement site. Display metadata only, never derived from data.
pub const SITE: Site = Site {
    name: "Universidad EAFIT",
    city: "Medellín, Colombia",
    latitude: 6.2006,
    longitude: -75.5783,
    altitude_m: 1495,
    sensor_type: "ESP32",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_names() {
        assert_eq!(Variable::Temperature.canonical_name(), "temperatura");
        assert_eq!(Variable::Humidity.canonical_name(), "humedad");
        assert_eq!(
            Variable::Temperature.source_label(),
            "temperatura {device=\"ESP32\", name=\"Sensor 1\"}"
        );
    }

    #[test]
    fn test_variable_serde_uses_canonical_name() {
        let json = serde_json::to_string(&Variable::Humidity).unwrap();
        assert_eq!(json, "\"humedad\"");
        let back: Variable = serde_json::from_str("\"temperature\"").unwrap();
        assert_eq!(back, Variable::Temperature);
    }

    #[test]
    fn test_selection_variables() {
        assert_eq!(
            VariableSelection::Both.variables(),
            &[Variable::Temperature, Variable::Humidity]
        );
        assert_eq!(VariableSelection::Humidity.primary(), Variable::Humidity);
        assert_eq!(
            VariableSelection::from(Variable::Temperature),
            VariableSelection::Temperature
        );
    }

    #[test]
    fn test_selection_value_enum_aliases() {
        let sel = VariableSelection::from_str("ambas", true).unwrap();
        assert_eq!(sel, VariableSelection::Both);
        let sel = VariableSelection::from_str("humidity", true).unwrap();
        assert_eq!(sel, VariableSelection::Humidity);
    }

    #[test]
    fn test_chart_kind_serde() {
        let kind: ChartKind = serde_json::from_str("\"area\"").unwrap();
        assert_eq!(kind, ChartKind::Area);
        assert_eq!(ChartKind::Bar.label(), "Barra");
    }

    #[test]
    fn test_reading_value() {
        let r = Reading {
            timestamp: chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            temperature: 20.0,
            humidity: 50.0,
        };
        assert_eq!(r.value(Variable::Temperature), 20.0);
        assert_eq!(r.value(Variable::Humidity), 50.0);
    }

    #[test]
    fn test_sensor_label_display_and_get() {
        let label = SensorLabel {
            measurement: "humedad".to_string(),
            labels: vec![
                ("device".to_string(), "ESP32".to_string()),
                ("name".to_string(), "Sensor 1".to_string()),
            ],
        };
        assert_eq!(label.get("device"), Some("ESP32"));
        assert_eq!(label.get("room"), None);
        assert_eq!(label.to_string(), Variable::Humidity.source_label());
    }
}
