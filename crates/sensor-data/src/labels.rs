//! Parsing of long-form sensor column headers.
//!
//! Headers look like `temperatura {device="ESP32", name="Sensor 1"}`: a
//! measurement name followed by a brace-delimited list of quoted labels.

use std::sync::OnceLock;

use regex::Regex;
use sensor_core::models::SensorLabel;

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([^\s{}]+)\s*\{(.*)\}\s*$").expect("regex is valid"))
}

const PAIR: &str = r#"([A-Za-z_][A-Za-z0-9_]*)\s*=\s*"((?:[^"\\]|\\.)*)""#;

fn pair_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PAIR).expect("regex is valid"))
}

/// Whole brace content: empty, or comma-separated pairs with an optional
/// trailing comma and nothing else.
fn pair_list_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^\s*(?:{PAIR}(?:\s*,\s*{PAIR})*\s*,?)?\s*$"))
            .expect("regex is valid")
    })
}

/// Parse a column header into a [`SensorLabel`].
///
/// A bare single-token header yields a label with no key/value pairs.
/// Returns `None` for anything else: spaces without braces, unbalanced
/// braces, brace content that is not a comma-separated list of
/// `key="value"` pairs, or empty input.
pub fn parse_sensor_label(header: &str) -> Option<SensorLabel> {
    let trimmed = header.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(caps) = header_regex().captures(trimmed) {
        if !pair_list_regex().is_match(&caps[2]) {
            return None;
        }
        let labels = pair_regex()
            .captures_iter(&caps[2])
            .map(|pair| (pair[1].to_string(), unescape(&pair[2])))
            .collect();
        return Some(SensorLabel {
            measurement: caps[1].to_string(),
            labels,
        });
    }

    if trimmed.contains(|c: char| c.is_whitespace() || c == '{' || c == '}') {
        return None;
    }
    Some(SensorLabel {
        measurement: trimmed.to_string(),
        labels: Vec::new(),
    })
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensor_core::models::Variable;

    #[test]
    fn test_parse_source_label() {
        let label = parse_sensor_label(Variable::Temperature.source_label()).unwrap();
        assert_eq!(label.measurement, "temperatura");
        assert_eq!(label.get("device"), Some("ESP32"));
        assert_eq!(label.get("name"), Some("Sensor 1"));
        assert_eq!(label.labels.len(), 2);
    }

    #[test]
    fn test_parse_ignores_spacing_differences() {
        let a = parse_sensor_label(r#"humedad{device="ESP32",name="Sensor 1"}"#).unwrap();
        let b = parse_sensor_label(Variable::Humidity.source_label()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_bare_name() {
        let label = parse_sensor_label("temperatura").unwrap();
        assert_eq!(label.measurement, "temperatura");
        assert!(label.labels.is_empty());
    }

    #[test]
    fn test_parse_escaped_quote() {
        let label = parse_sensor_label(r#"temp {name="Sensor \"A\""}"#).unwrap();
        assert_eq!(label.get("name"), Some("Sensor \"A\""));
    }

    #[test]
    fn test_parse_rejects_free_text() {
        assert!(parse_sensor_label("").is_none());
        assert!(parse_sensor_label("outdoor temperature").is_none());
        assert!(parse_sensor_label("temp {device=").is_none());
    }

    #[test]
    fn test_parse_rejects_stray_tokens_in_braces() {
        let trailing = r#"temperatura {device="ESP32", name="Sensor 1", junk}"#;
        assert!(parse_sensor_label(trailing).is_none());
        assert!(parse_sensor_label(r#"temperatura {junk device="ESP32"}"#).is_none());
    }

    #[test]
    fn test_parse_rejects_missing_comma() {
        let header = r#"temperatura {device="ESP32" name="Sensor 1"}"#;
        assert!(parse_sensor_label(header).is_none());
    }

    #[test]
    fn test_parse_accepts_empty_braces_and_trailing_comma() {
        let label = parse_sensor_label("temperatura {}").unwrap();
        assert!(label.labels.is_empty());
        let label = parse_sensor_label(r#"t {a="1",}"#).unwrap();
        assert_eq!(label.get("a"), Some("1"));
    }

    #[test]
    fn test_parse_comma_inside_quoted_value() {
        let label = parse_sensor_label(r#"t {name="Sensor 1, roof", device="ESP32"}"#).unwrap();
        assert_eq!(label.get("name"), Some("Sensor 1, roof"));
        assert_eq!(label.get("device"), Some("ESP32"));
    }

    #[test]
    fn test_label_order_preserved() {
        let label = parse_sensor_label(r#"t {z="1", a="2"}"#).unwrap();
        let keys: Vec<&str> = label.labels.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a"]);
    }
}
