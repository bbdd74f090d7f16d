use anyhow::{bail, Result};
use carbon_analytics::analytics::CountryReport;
use carbon_service::{config::AppConfig, ingest, observability, report};
use std::env;

/// Print the carbon report for one country.
///
/// Usage:
///   country_report <country> [--json]
#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");
    let Some(name) = args.iter().find(|a| !a.starts_with("--")) else {
        bail!("usage: country_report <country> [--json]");
    };

    // CARBON_CONFIG can point to a dataset-specific file.
    let cfg = AppConfig::load()?;
    let table = ingest::load_table(&cfg.dataset).await?;

    let Some(country) = table.resolve_country(name) else {
        bail!("no data for country '{name}'");
    };
    let country_report = CountryReport::build(&table, country, &cfg.scoring)?;

    if json {
        let body = serde_json::json!({
            "report": &country_report,
            "scorecard": country_report.scorecard(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", report::render_country_report(&country_report));
    }

    Ok(())
}
