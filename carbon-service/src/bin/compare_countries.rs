use anyhow::{bail, Result};
use carbon_analytics::analytics::{
    classification::compute_thresholds_with, comparison::compare, country_averages,
};
use carbon_service::{config::AppConfig, ingest, observability, report};
use std::env;

/// Compare the carbon intensity of two countries.
///
/// Usage:
///   compare_countries <country_x> <country_y>
#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        bail!("usage: compare_countries <country_x> <country_y>");
    }

    let cfg = AppConfig::load()?;
    let table = ingest::load_table(&cfg.dataset).await?;

    let resolve = |name: &str| -> Result<String> {
        match table.resolve_country(name) {
            Some(c) => Ok(c.to_string()),
            None => bail!("no data for country '{name}'"),
        }
    };
    let x = resolve(&args[1])?;
    let y = resolve(&args[2])?;

    let thresholds = compute_thresholds_with(&country_averages(&table), cfg.scoring.quantile_levels())?;
    let comparison = compare(&table, &x, &y, cfg.scoring.energy_per_task_kwh, &thresholds)?;
    print!("{}", report::render_comparison(&comparison));

    Ok(())
}
