mod bootstrap;
mod render;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use sensor_core::error::DashboardError;
use sensor_core::formatting::format_timestamp;
use sensor_core::models::{Variable, SITE};
use sensor_core::settings::{Command, RuntimeConfig, Settings};
use sensor_core::time_utils::{resolve_timezone, TimestampParser};
use sensor_data::export::{export_to_dir, write_csv};
use sensor_data::filter::ThresholdFilter;
use sensor_data::reader::read_dataset;
use sensor_data::session::{Session, ViewRequest};

fn main() -> ExitCode {
    let (settings, runtime) = Settings::load();

    if let Err(e) = bootstrap::setup_logging(&runtime.log_level, runtime.log_file.as_deref()) {
        eprintln!("Failed to initialise logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    tracing::debug!("sensor-dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Timezone: {}, selection: {:?}, chart: {:?}",
        runtime.timezone,
        runtime.selection,
        runtime.chart
    );

    match run(&settings, &runtime) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings, runtime: &RuntimeConfig) -> Result<()> {
    match &settings.command {
        Command::Site => {
            print!("{}", render::site(&SITE));
        }

        Command::Show(args) => {
            let session = load_session(&args.input, runtime)?;
            let request = ViewRequest {
                selection: runtime.selection,
                chart: runtime.chart,
                ..Default::default()
            };
            let view = session.view(&request);
            for series in &view.series {
                println!("{}", render::series(series));
            }
            if args.raw {
                print!("{}", render::dataset(session.dataset()));
            }
        }

        Command::Stats(args) => {
            let session = load_session(&args.input, runtime)?;
            let request = ViewRequest {
                stats_variable: runtime.single_variable(),
                ..Default::default()
            };
            let view = session.view(&request);
            if args.json {
                let json = serde_json::to_string_pretty(&view.stats)
                    .map_err(DashboardError::from)?;
                println!("{}", json);
            } else {
                print!("{}", render::stats(&view.stats));
            }
        }

        Command::Filter(args) => {
            let session = load_session(&args.input, runtime)?;
            let request = ViewRequest {
                filter_variable: runtime.single_variable(),
                thresholds: ThresholdFilter::new(args.above, args.below),
                ..Default::default()
            };
            let view = session.view(&request);
            let above = &view.filters.above;

            if args.export && args.stdout {
                write_csv(&above.rows, std::io::stdout().lock())?;
                return Ok(());
            }

            print!("{}", render::filters(&view.filters));
            if args.export {
                let path = export_to_dir(above, &args.output_dir).with_context(|| {
                    format!("writing export into {}", args.output_dir.display())
                })?;
                println!("Exported {} rows to {}", above.len(), path.display());
            }
        }
    }

    Ok(())
}

/// Ingest `input` and open a session over it.
fn load_session(input: &Path, runtime: &RuntimeConfig) -> Result<Session> {
    let tz = resolve_timezone(&runtime.timezone)?;
    let parser = TimestampParser::new(tz);
    let dataset = read_dataset(input, &parser).map_err(DashboardError::from)?;

    for variable in Variable::ALL {
        let source = dataset.source(variable);
        match &source.label {
            Some(label) => tracing::debug!("{} <- {}", variable, label),
            None => tracing::debug!("{} <- {:?}", variable, source.header),
        }
    }
    match dataset.time_range() {
        Some((start, end)) => tracing::info!(
            "Readings span {} to {} ({})",
            format_timestamp(&start),
            format_timestamp(&end),
            parser.timezone()
        ),
        None => tracing::warn!("{} contains no readings", input.display()),
    }
    Ok(Session::new(dataset))
}
