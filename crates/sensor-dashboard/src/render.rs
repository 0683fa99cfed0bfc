//! Plain-text rendering of dashboard views.

use sensor_core::formatting::{
    format_csv_value, format_measure, format_number, format_timestamp, render_table,
};
use sensor_core::models::{ChartKind, Reading, Site, TIME_COLUMN};
use sensor_data::dataset::Dataset;
use sensor_data::filter::{FilterResult, FilteredView};
use sensor_data::selection::Series;
use sensor_data::session::StatsView;

/// A selected series as a titled two-column table.
pub fn series(series: &Series) -> String {
    let caption = match series.chart {
        ChartKind::Line => "line chart",
        ChartKind::Area => "area chart",
        ChartKind::Bar => "bar chart",
    };
    let rows: Vec<Vec<String>> = series
        .points
        .iter()
        .map(|(ts, v)| vec![format_timestamp(ts), format_csv_value(*v)])
        .collect();
    format!(
        "### {} ({}, {})\n{}\n",
        series.variable.title(),
        series.chart.label(),
        caption,
        render_table(&[TIME_COLUMN, series.variable.canonical_name()], &rows)
    )
}

/// The full normalized table.
pub fn dataset(dataset: &Dataset) -> String {
    let refs: Vec<&Reading> = dataset.readings().iter().collect();
    reading_table(&refs)
}

pub fn stats(view: &StatsView) -> String {
    let rows: Vec<Vec<String>> = view
        .describe
        .rows()
        .iter()
        .map(|(label, value)| {
            let decimals = if *label == "count" { 0 } else { 6 };
            vec![label.to_string(), format_number(*value, decimals)]
        })
        .collect();
    let v = view.variable;
    format!(
        "{}\n{} average: {}\n{} maximum: {}\n{} minimum: {}\n",
        render_table(&["", v.canonical_name()], &rows),
        v.title(),
        format_measure(view.headline.mean, v),
        v.title(),
        format_measure(view.headline.max, v),
        v.title(),
        format_measure(view.headline.min, v),
    )
}

pub fn filters(result: &FilterResult<'_>) -> String {
    let mut out = String::new();
    match &result.bounds {
        Some(b) => out.push_str(&format!(
            "Threshold range for {}: {} to {} (default {})\n\n",
            result.variable,
            format_number(b.min, 2),
            format_number(b.max, 2),
            format_number(b.default, 2)
        )),
        None => out.push_str(&format!("No valid {} readings to filter.\n\n", result.variable)),
    }
    for view in [&result.above, &result.below] {
        out.push_str(&filtered(view));
        out.push('\n');
    }
    out
}

fn filtered(view: &FilteredView<'_>) -> String {
    format!(
        "Readings with {} ({} rows):\n{}",
        view.describe_condition(),
        view.len(),
        reading_table(&view.rows)
    )
}

fn reading_table(rows: &[&Reading]) -> String {
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                format_timestamp(&r.timestamp),
                format_csv_value(r.temperature),
                format_csv_value(r.humidity),
            ]
        })
        .collect();
    render_table(&[TIME_COLUMN, "temperatura", "humedad"], &body)
}

pub fn site(site: &Site) -> String {
    format!(
        "{}\n- City: {}\n- Latitude: {}\n- Longitude: {}\n\
         - Altitude: ~{} m above sea level\n- Sensor: {} (temperatura °C, humedad %)\n",
        site.name, site.city, site.latitude, site.longitude, site.altitude_m, site.sensor_type
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensor_core::models::{Variable, VariableSelection, SITE};
    use sensor_core::time_utils::TimestampParser;
    use sensor_data::filter::ThresholdFilter;
    use sensor_data::reader::parse_dataset;
    use sensor_data::selection::select_series;
    use sensor_data::session::{Session, ViewRequest};

    fn example() -> Dataset {
        parse_dataset(
            b"Time,temperatura,humedad\n\
              2024-01-01T00:00:00,20.0,50.0\n\
              2024-01-01T01:00:00,25.0,55.0\n",
            &TimestampParser::utc(),
        )
        .unwrap()
    }

    #[test]
    fn test_series_caption_and_rows() {
        let ds = example();
        let s = select_series(&ds, VariableSelection::Humidity, ChartKind::Bar);
        let text = series(&s[0]);
        assert!(text.starts_with("### Humedad (Barra, bar chart)\n"));
        assert!(text.contains("2024-01-01 01:00:00     55.0"));
    }

    #[test]
    fn test_stats_headline() {
        let session = Session::new(example());
        let view = session.view(&ViewRequest::default());
        let text = stats(&view.stats);
        assert!(text.contains("Temperatura average: 22.50°C"));
        assert!(text.contains("Temperatura maximum: 25.00°C"));
        assert!(text.contains("Temperatura minimum: 20.00°C"));
    }

    #[test]
    fn test_filters_lists_both_views() {
        let ds = example();
        let result = ThresholdFilter::new(Some(22.0), Some(22.0)).apply(&ds, Variable::Temperature);
        let text = filters(&result);
        assert!(text.contains("Readings with temperatura > 22 (1 rows)"));
        assert!(text.contains("Readings with temperatura < 22 (1 rows)"));
    }

    #[test]
    fn test_site_block() {
        let text = site(&SITE);
        assert!(text.starts_with("Universidad EAFIT\n"));
        assert!(text.contains("Latitude: 6.2006"));
        assert!(text.contains("Longitude: -75.5783"));
    }
}
