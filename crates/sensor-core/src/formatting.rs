use chrono::NaiveDateTime;

use crate::models::Variable;

/// Layout used for timestamps in tables and exported CSV. The fractional
/// part is only written when non-zero.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places. NaN renders as `"NaN"`.
///
/// # Examples
///
/// ```
/// use sensor_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(22.5, 2), "22.50");
/// assert_eq!(format_number(-3.25, 1), "-3.3");
/// assert_eq!(format_number(f64::NAN, 2), "NaN");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by half an ULP at the target precision so exact midpoints round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` starts with "0.", strip the leading zero.
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative && result.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a measurement with two decimals and the variable's unit.
///
/// ```
/// use sensor_core::formatting::format_measure;
/// use sensor_core::models::Variable;
///
/// assert_eq!(format_measure(22.5, Variable::Temperature), "22.50°C");
/// assert_eq!(format_measure(55.0, Variable::Humidity), "55.00%");
/// ```
pub fn format_measure(value: f64, variable: Variable) -> String {
    format!("{}{}", format_number(value, 2), variable.unit())
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Render a value for a CSV cell: shortest round-trippable form with a
/// trailing `.0` for integral values, empty for NaN.
pub fn format_csv_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{:?}", value)
    }
}

/// Lay out a plain-text table. The first column is left-aligned, all others
/// right-aligned, separated by two spaces, with a dashed rule under the
/// header.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header_cells, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, width) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        let pad = width.saturating_sub(cell.chars().count());
        if i > 0 {
            line.push_str("  ");
            line.push_str(&" ".repeat(pad));
            line.push_str(cell);
        } else {
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
