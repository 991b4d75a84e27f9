//! CLI entry point for the Easy Rider schedule validator.
//!
//! Provides one subcommand per analysis stage plus a full report.

use anyhow::Result;
use clap::{Parser, Subcommand};
use easy_rider::analyzers::analyzer::analyze;
use easy_rider::analyzers::lines::count_line_stops;
use easy_rider::analyzers::schedule::check_arrival_times;
use easy_rider::analyzers::topology::analyze_topology;
use easy_rider::analyzers::transfers::find_transfer_stops;
use easy_rider::config::Settings;
use easy_rider::fetch::{BasicClient, load_source};
use easy_rider::output::{
    append_record, render_errors, render_format_errors, render_line_stops, render_report,
    render_stops, render_time_anomalies, to_json,
};
use easy_rider::parser::parse_records;
use easy_rider::record::StopRecord;
use easy_rider::stats::{ErrorTally, TallyRow};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "easy_rider")]
#[command(about = "Validate and summarize bus line schedules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count type and required-field errors per field
    Validate {
        /// Path, URL, or `-` for stdin
        #[arg(value_name = "SOURCE", default_value = "-")]
        source: String,
    },
    /// Count format errors of stop names, stop types and arrival times
    Format {
        #[arg(value_name = "SOURCE", default_value = "-")]
        source: String,
    },
    /// Number of stops per line
    Lines {
        #[arg(value_name = "SOURCE", default_value = "-")]
        source: String,
    },
    /// Start, transfer and finish stops; fails on a bad line
    Stops {
        #[arg(value_name = "SOURCE", default_value = "-")]
        source: String,
    },
    /// Check that arrival times never go backwards within a line
    Times {
        #[arg(value_name = "SOURCE", default_value = "-")]
        source: String,
    },
    /// Run every analysis
    Report {
        #[arg(value_name = "SOURCE", default_value = "-")]
        source: String,

        /// Print the report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,

        /// CSV file to append the error tally to
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let file_appender =
        tracing_appender::rolling::daily(settings.log_dir(), settings.log_file_name());
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info")?);

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", "debug")?);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let client = BasicClient::with_timeout(Duration::from_secs(30))?;

    match cli.command {
        Commands::Validate { source } => {
            let records = load_records(&client, &source)?;
            println!("{}", render_errors(&ErrorTally::from_records(&records)));
        }
        Commands::Format { source } => {
            let records = load_records(&client, &source)?;
            println!("{}", render_format_errors(&ErrorTally::from_records(&records)));
        }
        Commands::Lines { source } => {
            let records = load_records(&client, &source)?;
            println!("{}", render_line_stops(&count_line_stops(&records)));
        }
        Commands::Stops { source } => {
            let records = load_records(&client, &source)?;
            match analyze_topology(&records) {
                Ok(topology) => {
                    let transfers = find_transfer_stops(&topology.line_stops);
                    println!("{}", render_stops(&topology, &transfers));
                }
                Err(e) => {
                    error!(line = e.line, reason = %e.reason, "Topology check failed");
                    println!("{e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Times { source } => {
            let records = load_records(&client, &source)?;
            println!("{}", render_time_anomalies(&check_arrival_times(&records)));
        }
        Commands::Report { source, json, csv } => {
            let records = load_records(&client, &source)?;
            let report = analyze(&records);

            if json {
                println!("{}", to_json(&report)?);
            } else {
                println!("{}", render_report(&report));
            }

            if let Some(path) = settings.tally_target(csv) {
                let row = TallyRow::new(&report.errors, report.records).with_source(&source);
                append_record(&path, &row)?;
                info!(path = %path.display(), "Tally appended");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn env_filter(var: &str, default: &str) -> Result<EnvFilter> {
    Ok(EnvFilter::from_env(var).add_directive(default.parse()?))
}

/// Loads and decodes a schedule batch.
#[tracing::instrument(skip(client))]
fn load_records(client: &BasicClient, source: &str) -> Result<Vec<StopRecord>> {
    let bytes = load_source(client, source)?;
    let records = parse_records(&bytes)?;
    info!(records = records.len(), "Schedule decoded");
    Ok(records)
}
