use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use eta_grid::assembler::EtaTable;
use eta_grid::config::EtaGridConfig;
use eta_grid::error::EtaGridError;
use eta_grid::osrm::{OsrmClient, OsrmConfig};
use eta_grid::pipeline;

#[derive(Debug, Parser)]
#[command(name = "eta-grid")]
#[command(about = "Precompute drive times from a coordinate grid to fixed destinations")]
struct Cli {
    /// JSON config file; keys it omits keep their built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the generated data file.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let result = run(cli);
    if let Err(err) = &result {
        error!("{err}");
        if matches!(err, EtaGridError::ServiceUnreachable { .. }) {
            error!(
                "make sure OSRM is running, e.g. `osrm-routed --algorithm mld /data/region.osrm`"
            );
        }
    }
    ExitCode::from(exit_code(&result))
}

/// 0 when the grid was processed (batch failures included), 1 when the
/// routing service never answered, 2 for any other fatal error.
fn exit_code(result: &Result<(), EtaGridError>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(EtaGridError::ServiceUnreachable { .. }) => 1,
        Err(_) => 2,
    }
}

fn run(cli: Cli) -> Result<(), EtaGridError> {
    let mut config = match &cli.config {
        Some(path) => EtaGridConfig::from_file(path)?,
        None => EtaGridConfig::default(),
    };
    if let Some(output) = cli.output {
        config.output_path = output;
    }

    let client = OsrmClient::new(OsrmConfig::from(&config))?;
    let start = Instant::now();
    let table = pipeline::run_to_file(&config, &client, &config.output_path)?;

    let summary = table.summary;
    info!("Done in {:.1} seconds", start.elapsed().as_secs_f64());
    info!("  Reachable points: {}", summary.reachable);
    info!(
        "  Unreachable points: {} ({} no route, {} failed queries)",
        summary.unreachable, summary.no_route, summary.query_failed
    );

    let size_kb = std::fs::metadata(&config.output_path)?.len() as f64 / 1024.0;
    info!("Written to: {}", config.output_path.display());
    info!("File size: {:.1} KB", size_kb);

    log_samples(&table, &config);
    Ok(())
}

fn log_samples(table: &EtaTable, config: &EtaGridConfig) {
    for row in table.rows.iter().take(3) {
        let times = config
            .destinations
            .iter()
            .zip(&row.durations)
            .map(|(dest, secs)| match secs {
                Some(s) => format!("{}: {:.1} min", dest.key, f64::from(*s) / 60.0),
                None => format!("{}: N/A", dest.key),
            })
            .collect::<Vec<_>>()
            .join(", ");
        info!("  ({}, {}) -> {}", row.lat, row.lon, times);
    }
}
