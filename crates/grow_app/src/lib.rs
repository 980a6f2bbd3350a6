pub mod config;
pub mod report;

use anyhow::{Context, Result};
use grow_core::{calendar, facility::LedgerStore, GrowService};
use tracing::info;

pub use crate::config::AppConfig;

/// Loads the data roots and prints the report for the configured day.
pub fn run(config: AppConfig) -> Result<()> {
    let mut builder = GrowService::builder();
    for root in config.roots() {
        builder = builder.add_root(root);
    }
    let service = builder.build().context("failed to load grow data")?;

    let report = service
        .day_report(config.day_offset(), config.location())
        .context("failed to build day report")?;
    info!(label = %report.label, tasks = report.tasks.len(), "day resolved");

    let store = LedgerStore::new(config.ledger_path());
    let ledger = store
        .load()
        .with_context(|| format!("failed to read ledger {}", store.path().display()))?;
    let month = calendar::month_key(report.day.date);
    let progress = service.facility_progress(&month, &ledger);

    print!("{}", report::render(&report, &month, &progress));
    Ok(())
}
