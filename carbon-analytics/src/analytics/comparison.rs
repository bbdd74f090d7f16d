use crate::analytics::alerts::CleanerSnapshot;
use crate::analytics::classification::Thresholds;
use crate::analytics::metrics::{average_intensity, emission};
use crate::domain::Level;
use crate::error::CarbonError;
use crate::table::CarbonTable;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CountrySide {
    pub country: String,
    pub mean_intensity: f64,
    /// gCO2 per task.
    pub emission: f64,
    pub level: Level,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "country", rename_all = "snake_case"))]
pub enum BestCountry {
    Single(String),
    Both,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Comparison {
    pub x: CountrySide,
    pub y: CountrySide,
    /// Absolute emission difference, gCO2 per task.
    pub difference: f64,
    pub percent_difference: f64,
    pub cleaner: CleanerSnapshot,
    pub best: BestCountry,
}

impl Comparison {
    pub fn is_self_comparison(&self) -> bool {
        self.x.country == self.y.country
    }
}

fn side(
    table: &CarbonTable,
    country: &str,
    energy_per_task_kwh: f64,
    thresholds: &Thresholds,
) -> Result<CountrySide, CarbonError> {
    let mean_intensity = average_intensity(table, country)?;
    Ok(CountrySide {
        country: country.to_string(),
        mean_intensity,
        emission: emission(mean_intensity, energy_per_task_kwh),
        level: thresholds.classify(mean_intensity),
    })
}

/// Side-by-side comparison of two countries. Comparing a country with itself
/// yields zero difference.
pub fn compare(
    table: &CarbonTable,
    x: &str,
    y: &str,
    energy_per_task_kwh: f64,
    thresholds: &Thresholds,
) -> Result<Comparison, CarbonError> {
    let x = side(table, x, energy_per_task_kwh, thresholds)?;
    let y = side(table, y, energy_per_task_kwh, thresholds)?;

    let (difference, percent_difference) = if x.country == y.country {
        (0.0, 0.0)
    } else {
        let diff = (x.emission - y.emission).abs();
        let max = x.emission.max(y.emission);
        let pct = if max == 0.0 { 0.0 } else { diff / max * 100.0 };
        (diff, pct)
    };

    let cleaner_side = if x.mean_intensity < y.mean_intensity { &x } else { &y };
    let cleaner = CleanerSnapshot {
        country: cleaner_side.country.clone(),
        intensity: cleaner_side.mean_intensity,
    };

    let best = if x.mean_intensity < y.mean_intensity {
        BestCountry::Single(x.country.clone())
    } else if y.mean_intensity < x.mean_intensity {
        BestCountry::Single(y.country.clone())
    } else {
        BestCountry::Both
    };

    Ok(Comparison {
        x,
        y,
        difference,
        percent_difference,
        cleaner,
        best,
    })
}
