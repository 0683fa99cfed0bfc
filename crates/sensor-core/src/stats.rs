use serde::Serialize;

// ── Percentile helper ─────────────────────────────────────────────────────────

/// Compute the `p`-th percentile of a **sorted** slice using linear
/// interpolation between closest ranks.
///
/// Returns NaN for an empty slice.
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return f64::NAN;
    }
    let len = sorted_data.len();
    if len == 1 {
        return sorted_data[0];
    }
    let rank = (p / 100.0) * (len as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted_data[lo];
    }
    let frac = rank - lo as f64;
    sorted_data[lo] + frac * (sorted_data[hi] - sorted_data[lo])
}

/// Arithmetic mean of the non-NaN values, or `None` when there are none.
pub fn mean(values: &[f64]) -> Option<f64> {
    let (sum, n) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

// ── Describe ──────────────────────────────────────────────────────────────────

/// Descriptive summary of one column.
///
/// NaN entries are skipped. With no valid values every field except
/// `count` is NaN; with a single value `std` is NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (`n - 1` denominator).
    pub std: f64,
    pub min: f64,
    #[serde(rename = "25%")]
    pub p25: f64,
    #[serde(rename = "50%")]
    pub p50: f64,
    #[serde(rename = "75%")]
    pub p75: f64,
    pub max: f64,
}

impl Describe {
    /// `(label, value)` pairs in conventional display order.
    pub fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.p25),
            ("50%", self.p50),
            ("75%", self.p75),
            ("max", self.max),
        ]
    }
}

/// Summarise `values` the way a dataframe `describe()` does.
pub fn describe(values: &[f64]) -> Describe {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    if count == 0 {
        return Describe {
            count,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            p50: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        };
    }

    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = if count < 2 {
        f64::NAN
    } else {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    };

    Describe {
        count,
        mean,
        std,
        min: sorted[0],
        p25: percentile(&sorted, 25.0),
        p50: percentile(&sorted, 50.0),
        p75: percentile(&sorted, 75.0),
        max: sorted[count - 1],
    }
}

// ── Headline metrics ──────────────────────────────────────────────────────────

/// The three figures shown next to the summary table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Headline {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

impl From<&Describe> for Headline {
    fn from(d: &Describe) -> Self {
        Headline {
            mean: d.mean,
            max: d.max,
            min: d.min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_percentile_interpolates() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert!(approx(percentile(&data, 25.0), 1.75));
        assert!(approx(percentile(&data, 50.0), 2.5));
        assert!(approx(percentile(&data, 75.0), 3.25));
        assert!(approx(percentile(&data, 100.0), 4.0));
    }

    #[test]
    fn test_percentile_single_and_empty() {
        assert_eq!(percentile(&[7.0], 90.0), 7.0);
        assert!(percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn test_mean_skips_nan() {
        assert_eq!(mean(&[1.0, f64::NAN, 3.0]), Some(2.0));
        assert_eq!(mean(&[f64::NAN]), None);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_describe_two_values() {
        let d = describe(&[20.0, 25.0]);
        assert_eq!(d.count, 2);
        assert!(approx(d.mean, 22.5));
        assert!(approx(d.std, 12.5_f64.sqrt()));
        assert_eq!(d.min, 20.0);
        assert!(approx(d.p25, 21.25));
        assert!(approx(d.p50, 22.5));
        assert!(approx(d.p75, 23.75));
        assert_eq!(d.max, 25.0);
    }

    #[test]
    fn test_describe_unsorted_input_with_nan() {
        let d = describe(&[5.0, f64::NAN, 1.0, 3.0]);
        assert_eq!(d.count, 3);
        assert!(approx(d.mean, 3.0));
        assert!(approx(d.std, 2.0));
        assert_eq!(d.min, 1.0);
        assert_eq!(d.p50, 3.0);
        assert_eq!(d.max, 5.0);
    }

    #[test]
    fn test_describe_single_value_has_nan_std() {
        let d = describe(&[4.0]);
        assert_eq!(d.count, 1);
        assert_eq!(d.mean, 4.0);
        assert!(d.std.is_nan());
        assert_eq!(d.p75, 4.0);
    }

    #[test]
    fn test_describe_empty() {
        let d = describe(&[]);
        assert_eq!(d.count, 0);
        assert!(d.mean.is_nan());
        assert!(d.min.is_nan());
        assert!(d.max.is_nan());
    }

    #[test]
    fn test_describe_is_deterministic() {
        let values = [18.2, 19.9, 21.4, 17.0, 22.3, 20.1];
        assert_eq!(describe(&values), describe(&values));
    }

    #[test]
    fn test_describe_rows_order() {
        let labels: Vec<&str> = describe(&[1.0, 2.0]).rows().iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            vec!["count", "mean", "std", "min", "25%", "50%", "75%", "max"]
        );
    }

    #[test]
    fn test_describe_serializes_percentile_keys() {
        let json = serde_json::to_value(describe(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(json["count"], 3);
        assert_eq!(json["50%"], 2.0);
        assert_eq!(json["max"], 3.0);
    }

    #[test]
    fn test_headline_from_describe() {
        let h = Headline::from(&describe(&[20.0, 25.0]));
        assert!(approx(h.mean, 22.5));
        assert_eq!(h.max, 25.0);
        assert_eq!(h.min, 20.0);
    }
}
