//! End-to-end run: probe, generate, query, assemble, write.

use std::path::Path;

use chrono::Local;
use tracing::info;

use crate::assembler::{self, EtaTable};
use crate::config::EtaGridConfig;
use crate::coordinator;
use crate::error::{EtaGridError, Result};
use crate::grid;
use crate::output;
use crate::traits::TravelTimeProvider;

/// Probe the service, then build the ETA table for the whole grid.
///
/// Fails only on invalid configuration or an unreachable service; batch
/// failures shrink the table instead.
pub fn build_table<P: TravelTimeProvider>(
    config: &EtaGridConfig,
    provider: &P,
) -> Result<EtaTable> {
    config.validate()?;

    info!(url = %config.service_url, "checking routing service");
    provider
        .probe(config.bbox.center())
        .map_err(|source| EtaGridError::ServiceUnreachable {
            url: config.service_url.clone(),
            source,
        })?;

    let spacing = config.spacing();
    let points = grid::generate(&config.bbox, &spacing);
    info!(
        points = points.len(),
        step_lat = spacing.step_lat,
        step_lon = spacing.step_lon,
        "generated grid"
    );
    info!(
        "Querying routing service ({} batches of {})",
        coordinator::batch_count(points.len(), config.batch_size),
        config.batch_size
    );

    let results = coordinator::run(&points, &config.destinations, config.batch_size, provider);
    let table = assembler::assemble(results);

    info!(
        reachable = table.summary.reachable,
        unreachable = table.summary.unreachable,
        no_route = table.summary.no_route,
        query_failed = table.summary.query_failed,
        "assembled ETA table"
    );
    Ok(table)
}

/// Run the pipeline and write the output file to `path`.
///
/// Nothing is written unless the whole grid has been processed.
pub fn run_to_file<P: TravelTimeProvider>(
    config: &EtaGridConfig,
    provider: &P,
    path: &Path,
) -> Result<EtaTable> {
    let table = build_table(config, provider)?;
    let contents = output::render(&table, config, Local::now())?;
    output::write_atomic(path, &contents)?;
    Ok(table)
}
