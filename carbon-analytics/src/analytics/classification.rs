use std::cmp::Ordering;

use crate::domain::{CountryAverage, Grade, Level};
use crate::error::CarbonError;

/// Quantile levels used to derive the Low/Moderate/High cut points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantileLevels {
    pub low: f64,
    pub high: f64,
}

impl Default for QuantileLevels {
    fn default() -> Self {
        Self {
            low: 0.33,
            high: 0.66,
        }
    }
}

impl QuantileLevels {
    pub(crate) fn validate(&self) -> Result<(), CarbonError> {
        let in_unit = |q: f64| (0.0..=1.0).contains(&q);
        if !in_unit(self.low) || !in_unit(self.high) || self.low > self.high {
            return Err(CarbonError::InvalidParameter(format!(
                "quantile levels must satisfy 0 <= low <= high <= 1, got low={} high={}",
                self.low, self.high
            )));
        }
        Ok(())
    }
}

/// Cut points across the current population of country averages.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Thresholds {
    pub low_cut: f64,
    pub high_cut: f64,
}

impl Thresholds {
    pub fn classify(&self, value: f64) -> Level {
        classify(value, self.low_cut, self.high_cut)
    }

    /// Scorecard grade. Unlike [`classify`], a value exactly on a cut
    /// falls into the better grade.
    pub fn grade(&self, value: f64) -> Grade {
        if value <= self.low_cut {
            Grade::A
        } else if value <= self.high_cut {
            Grade::B
        } else {
            Grade::C
        }
    }
}

/// Value at quantile `q` using linear interpolation between closest ranks.
///
/// Returns `None` for an empty slice or a `q` outside `[0, 1]`.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// 33rd and 66th percentile of the country means.
pub fn compute_thresholds(averages: &[CountryAverage]) -> Result<Thresholds, CarbonError> {
    compute_thresholds_with(averages, QuantileLevels::default())
}

pub fn compute_thresholds_with(
    averages: &[CountryAverage],
    levels: QuantileLevels,
) -> Result<Thresholds, CarbonError> {
    levels.validate()?;

    let means: Vec<f64> = averages.iter().map(|a| a.mean_intensity).collect();
    let low_cut = quantile(&means, levels.low).ok_or(CarbonError::InsufficientData)?;
    let high_cut = quantile(&means, levels.high).ok_or(CarbonError::InsufficientData)?;

    Ok(Thresholds { low_cut, high_cut })
}

/// Upper-inclusive classification: a value on `high_cut` is High, on `low_cut` Moderate.
pub fn classify(value: f64, low_cut: f64, high_cut: f64) -> Level {
    if value >= high_cut {
        Level::High
    } else if value >= low_cut {
        Level::Moderate
    } else {
        Level::Low
    }
}

pub fn classify_all(
    averages: &[CountryAverage],
    thresholds: &Thresholds,
) -> Vec<(CountryAverage, Level)> {
    averages
        .iter()
        .map(|a| (a.clone(), thresholds.classify(a.mean_intensity)))
        .collect()
}

/// 1-based rank of `country` when ordered cleanest first, with the population size.
pub fn global_rank(averages: &[CountryAverage], country: &str) -> Result<(usize, usize), CarbonError> {
    let mut ordered: Vec<&CountryAverage> = averages.iter().collect();
    ordered.sort_by(|a, b| match a.mean_intensity.total_cmp(&b.mean_intensity) {
        Ordering::Equal => a.country.cmp(&b.country),
        other => other,
    });

    ordered
        .iter()
        .position(|a| a.country == country)
        .map(|idx| (idx + 1, ordered.len()))
        .ok_or_else(|| CarbonError::empty(country))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avg(country: &str, mean: f64) -> CountryAverage {
        CountryAverage {
            country: country.to_string(),
            mean_intensity: mean,
        }
    }

    fn population() -> Vec<CountryAverage> {
        vec![
            avg("Norway", 30.0),
            avg("France", 60.0),
            avg("Germany", 350.0),
            avg("Poland", 700.0),
        ]
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let values = [30.0, 60.0, 350.0, 700.0];
        // positions 0.99 and 1.98
        let q33 = quantile(&values, 0.33).unwrap();
        let q66 = quantile(&values, 0.66).unwrap();
        assert!((q33 - (30.0 + 30.0 * 0.99)).abs() < 1e-9);
        assert!((q66 - (60.0 + 290.0 * 0.98)).abs() < 1e-9);
        assert_eq!(quantile(&values, 0.0), Some(30.0));
        assert_eq!(quantile(&values, 1.0), Some(700.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn quantile_outside_unit_interval_is_none() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(quantile(&values, 1.5), None);
        assert_eq!(quantile(&values, -0.1), None);
        assert_eq!(quantile(&values, f64::NAN), None);
    }

    #[test]
    fn thresholds_need_at_least_one_country() {
        assert_eq!(compute_thresholds(&[]), Err(CarbonError::InsufficientData));

        let single = compute_thresholds(&[avg("Chile", 250.0)]).unwrap();
        assert_eq!(single.low_cut, 250.0);
        assert_eq!(single.high_cut, 250.0);
        assert_eq!(single.classify(250.0), Level::High);
    }

    #[test]
    fn thresholds_are_idempotent() {
        let avgs = population();
        let first = compute_thresholds(&avgs).unwrap();
        let second = compute_thresholds(&avgs).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_quantile_levels_are_rejected() {
        let levels = QuantileLevels { low: 0.8, high: 0.2 };
        assert!(matches!(
            compute_thresholds_with(&population(), levels),
            Err(CarbonError::InvalidParameter(_))
        ));
    }

    #[test]
    fn classify_is_inclusive_on_upper_side() {
        let (low, high) = (100.0, 300.0);
        assert_eq!(classify(300.0, low, high), Level::High);
        assert_eq!(classify(300.0 - 1e-9, low, high), Level::Moderate);
        assert_eq!(classify(100.0, low, high), Level::Moderate);
        assert_eq!(classify(99.999, low, high), Level::Low);
    }

    #[test]
    fn classify_is_monotonic() {
        let (low, high) = (100.0, 300.0);
        let mut previous = Level::Low;
        for step in 0..=80 {
            let level = classify(step as f64 * 5.0, low, high);
            assert!(level >= previous);
            previous = level;
        }
        assert_eq!(previous, Level::High);
    }

    #[test]
    fn grade_is_inclusive_on_lower_side() {
        let t = Thresholds {
            low_cut: 100.0,
            high_cut: 300.0,
        };
        assert_eq!(t.grade(100.0), Grade::A);
        assert_eq!(t.grade(300.0), Grade::B);
        assert_eq!(t.grade(300.5), Grade::C);
    }

    #[test]
    fn classify_all_labels_every_country() {
        let avgs = population();
        let t = compute_thresholds(&avgs).unwrap();
        let labelled = classify_all(&avgs, &t);
        let levels: Vec<Level> = labelled.iter().map(|(_, l)| *l).collect();
        assert_eq!(
            levels,
            vec![Level::Low, Level::Moderate, Level::High, Level::High]
        );
    }

    #[test]
    fn rank_orders_cleanest_first() {
        let avgs = population();
        assert_eq!(global_rank(&avgs, "Norway").unwrap(), (1, 4));
        assert_eq!(global_rank(&avgs, "Poland").unwrap(), (4, 4));
        assert!(matches!(
            global_rank(&avgs, "Atlantis"),
            Err(CarbonError::EmptyResult { .. })
        ));
    }
}
