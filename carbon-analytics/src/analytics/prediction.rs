use std::collections::BTreeSet;

use crate::domain::Decision;
use crate::error::CarbonError;
use crate::table::CarbonTable;

/// gCO2/kWh below which an hour counts as low-carbon unless configured otherwise.
pub const DEFAULT_LOW_CARBON_THRESHOLD: f64 = 200.0;

/// Readings considered for the best-hour pick.
const BEST_HOUR_WINDOW: usize = 24;

/// Distinct hours of day, ascending, with at least one reading strictly below `threshold`.
pub fn low_carbon_hours(table: &CarbonTable, country: &str, threshold: f64) -> Vec<u8> {
    table
        .rows_for(country)
        .filter(|o| o.carbon_intensity < threshold)
        .map(|o| o.utc_hour)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn apply_policy(candidate_hour: u8, low_hours: &[u8]) -> Decision {
    if low_hours.contains(&candidate_hour) {
        Decision::ExecuteNow
    } else {
        Decision::Defer
    }
}

/// Hour of the cleanest reading among the country's latest 24.
///
/// The earliest reading wins a tie.
pub fn best_hour(table: &CarbonTable, country: &str) -> Result<u8, CarbonError> {
    let window = table.recent(country, BEST_HOUR_WINDOW);

    let mut best = window.first().ok_or_else(|| CarbonError::empty(country))?;
    for o in &window[1..] {
        if o.carbon_intensity < best.carbon_intensity {
            best = o;
        }
    }
    Ok(best.utc_hour)
}
