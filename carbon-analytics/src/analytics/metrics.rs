use std::collections::BTreeMap;

use crate::domain::{CountryAverage, DelaySimulation};
use crate::error::CarbonError;
use crate::table::CarbonTable;

/// Emission reduction credited per hour of delay.
const DELAY_REDUCTION_PER_HOUR: f64 = 0.05;
pub const MAX_DELAY_HOURS: u8 = 6;

/// Mean carbon intensity of one country's readings.
///
/// A country without readings has no average; it is reported as
/// [`CarbonError::EmptyResult`] rather than zero.
pub fn average_intensity(table: &CarbonTable, country: &str) -> Result<f64, CarbonError> {
    let (sum, count) = table
        .rows_for(country)
        .fold((0.0_f64, 0_usize), |(sum, count), o| {
            (sum + o.carbon_intensity, count + 1)
        });

    if count == 0 {
        return Err(CarbonError::empty(country));
    }
    Ok(sum / count as f64)
}

/// Per-country mean intensity, ordered by country name.
pub fn country_averages(table: &CarbonTable) -> Vec<CountryAverage> {
    let mut acc: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for o in table.rows() {
        let entry = acc.entry(o.country.as_str()).or_insert((0.0, 0));
        entry.0 += o.carbon_intensity;
        entry.1 += 1;
    }

    acc.into_iter()
        .map(|(country, (sum, count))| CountryAverage {
            country: country.to_string(),
            mean_intensity: sum / count as f64,
        })
        .collect()
}

/// gCO2 emitted by a task consuming `energy_per_task_kwh` at `avg_intensity`.
pub fn emission(avg_intensity: f64, energy_per_task_kwh: f64) -> f64 {
    avg_intensity * energy_per_task_kwh
}

pub fn savings(normal: f64, green: f64) -> f64 {
    normal - green
}

pub fn green_score(avg_intensity: f64) -> f64 {
    (100.0 - avg_intensity / 4.0).max(0.0)
}

/// Monetary value of `saved_g` grams of CO2 at `price_per_kg`.
pub fn carbon_cost(saved_g: f64, price_per_kg: f64) -> f64 {
    saved_g / 1000.0 * price_per_kg
}

/// What-if: every hour of delay trims 5% off the normal emission.
pub fn simulate_delay(normal: f64, delay_hours: u8) -> Result<DelaySimulation, CarbonError> {
    if delay_hours > MAX_DELAY_HOURS {
        return Err(CarbonError::InvalidParameter(format!(
            "delay_hours must be between 0 and {MAX_DELAY_HOURS}, got {delay_hours}"
        )));
    }

    let simulated = normal * (1.0 - f64::from(delay_hours) * DELAY_REDUCTION_PER_HOUR);
    Ok(DelaySimulation {
        delay_hours,
        simulated,
        extra_saved: normal - simulated,
    })
}
