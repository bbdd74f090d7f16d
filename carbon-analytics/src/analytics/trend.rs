use std::collections::BTreeMap;

use time::{Date, UtcOffset};

use crate::domain::{Observation, TrendPeriod, TrendStatus};
use crate::error::CarbonError;
use crate::table::CarbonTable;

const SHORT_WINDOW: usize = 7;
const LONG_WINDOW: usize = 30;
const READINGS_PER_DAY: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrendSummary {
    pub last_7_mean: f64,
    pub last_30_mean: f64,
    pub status: TrendStatus,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DailyMean {
    pub date: Date,
    pub mean_intensity: f64,
}

fn mean(rows: &[&Observation]) -> f64 {
    rows.iter().map(|o| o.carbon_intensity).sum::<f64>() / rows.len() as f64
}

/// Compares the mean of the latest 7 readings to the latest 30.
pub fn trend_summary(table: &CarbonTable, country: &str) -> Result<TrendSummary, CarbonError> {
    let long = table.recent(country, LONG_WINDOW);
    if long.is_empty() {
        return Err(CarbonError::empty(country));
    }
    let short = &long[long.len().saturating_sub(SHORT_WINDOW)..];

    let last_7_mean = mean(short);
    let last_30_mean = mean(&long);
    let status = if last_7_mean > last_30_mean {
        TrendStatus::Increasing
    } else {
        TrendStatus::Decreasing
    };

    Ok(TrendSummary {
        last_7_mean,
        last_30_mean,
        status,
    })
}

/// Daily means over the last `period.days() * 24` readings, oldest day first.
pub fn daily_trend(table: &CarbonTable, country: &str, period: TrendPeriod) -> Vec<DailyMean> {
    let window = table.recent(country, period.days() * READINGS_PER_DAY);

    let mut by_day: BTreeMap<Date, (f64, usize)> = BTreeMap::new();
    for o in window {
        let day = o.timestamp.to_offset(UtcOffset::UTC).date();
        let entry = by_day.entry(day).or_insert((0.0, 0));
        entry.0 += o.carbon_intensity;
        entry.1 += 1;
    }

    by_day
        .into_iter()
        .map(|(date, (sum, count))| DailyMean {
            date,
            mean_intensity: sum / count as f64,
        })
        .collect()
}

/// Last minus first reading over the latest 24 readings.
pub fn intraday_change(table: &CarbonTable, country: &str) -> Result<f64, CarbonError> {
    let window = table.recent(country, READINGS_PER_DAY);
    match (window.first(), window.last()) {
        (Some(first), Some(last)) => Ok(last.carbon_intensity - first.carbon_intensity),
        _ => Err(CarbonError::empty(country)),
    }
}
