use crate::analytics::classification::{
    classify_all, compute_thresholds_with, global_rank, QuantileLevels, Thresholds,
};
use crate::analytics::metrics::{average_intensity, carbon_cost, country_averages, green_score};
use crate::analytics::prediction::{
    apply_policy, best_hour, low_carbon_hours, DEFAULT_LOW_CARBON_THRESHOLD,
};
use crate::analytics::trend::{intraday_change, trend_summary, TrendSummary};
use crate::domain::{Decision, EmissionEstimate, Grade, Level, NationalSavings, TrendPeriod};
use crate::error::CarbonError;
use crate::table::CarbonTable;

/// Tunables shared by every derived report.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoringParams {
    pub energy_per_task_kwh: f64,
    /// Share of the normal emission a green run emits.
    pub green_factor: f64,
    pub low_carbon_threshold: f64,
    pub low_quantile: f64,
    pub high_quantile: f64,
    pub carbon_price_per_kg: f64,
    pub tasks_per_day: u64,
    pub candidate_hour: u8,
    pub trend_period: TrendPeriod,
}

impl Default for ScoringParams {
    fn default() -> Self {
        let levels = QuantileLevels::default();
        Self {
            energy_per_task_kwh: 0.5,
            green_factor: 0.6,
            low_carbon_threshold: DEFAULT_LOW_CARBON_THRESHOLD,
            low_quantile: levels.low,
            high_quantile: levels.high,
            carbon_price_per_kg: 1.5,
            tasks_per_day: 1_000_000,
            candidate_hour: 5,
            trend_period: TrendPeriod::Week,
        }
    }
}

impl ScoringParams {
    pub fn quantile_levels(&self) -> QuantileLevels {
        QuantileLevels {
            low: self.low_quantile,
            high: self.high_quantile,
        }
    }

    pub fn validate(&self) -> Result<(), CarbonError> {
        self.quantile_levels().validate()?;
        if self.candidate_hour > 23 {
            return Err(CarbonError::InvalidParameter(format!(
                "candidate_hour must be 0-23, got {}",
                self.candidate_hour
            )));
        }
        if !(0.0..=1.0).contains(&self.green_factor) {
            return Err(CarbonError::InvalidParameter(format!(
                "green_factor must be within [0, 1], got {}",
                self.green_factor
            )));
        }
        if !self.energy_per_task_kwh.is_finite() || self.energy_per_task_kwh < 0.0 {
            return Err(CarbonError::InvalidParameter(format!(
                "energy_per_task_kwh must be a non-negative number, got {}",
                self.energy_per_task_kwh
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassifiedCountry {
    pub country: String,
    pub mean_intensity: f64,
    pub level: Level,
}

/// Every country's average and level against the current thresholds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalStatus {
    pub thresholds: Thresholds,
    pub countries: Vec<ClassifiedCountry>,
}

impl GlobalStatus {
    pub fn build(table: &CarbonTable, levels: QuantileLevels) -> Result<Self, CarbonError> {
        let averages = country_averages(table);
        let thresholds = compute_thresholds_with(&averages, levels)?;
        let countries = classify_all(&averages, &thresholds)
            .into_iter()
            .map(|(avg, level)| ClassifiedCountry {
                country: avg.country,
                mean_intensity: avg.mean_intensity,
                level,
            })
            .collect();
        Ok(Self {
            thresholds,
            countries,
        })
    }

    /// First `n` countries at `level`, in country-name order.
    pub fn top(&self, level: Level, n: usize) -> Vec<&ClassifiedCountry> {
        self.countries
            .iter()
            .filter(|c| c.level == level)
            .take(n)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScorecardRow {
    pub position: usize,
    pub indicator: &'static str,
    pub assessment: String,
}

/// Everything the dashboard shows for one country.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CountryReport {
    pub country: String,
    pub mean_intensity: f64,
    pub level: Level,
    pub thresholds: Thresholds,
    /// Green execution applied unconditionally.
    pub estimate: EmissionEstimate,
    /// Green execution applied only when the candidate hour is low-carbon.
    pub scheduled_estimate: EmissionEstimate,
    pub candidate_hour: u8,
    pub decision: Decision,
    pub low_carbon_hours: Vec<u8>,
    pub reduction_percentage: f64,
    pub green_score: f64,
    pub carbon_cost: f64,
    pub grade: Grade,
    pub rank: usize,
    pub total_countries: usize,
    pub trend: TrendSummary,
    pub intraday_change: f64,
    pub best_hour: Option<u8>,
    pub recommendation: &'static str,
    pub national: NationalSavings,
}

impl CountryReport {
    pub fn build(
        table: &CarbonTable,
        country: &str,
        params: &ScoringParams,
    ) -> Result<Self, CarbonError> {
        params.validate()?;

        let mean_intensity = average_intensity(table, country)?;
        let averages = country_averages(table);
        let thresholds = compute_thresholds_with(&averages, params.quantile_levels())?;
        let level = thresholds.classify(mean_intensity);

        let estimate = EmissionEstimate::new(
            mean_intensity,
            params.energy_per_task_kwh,
            params.green_factor,
        );
        let low_hours = low_carbon_hours(table, country, params.low_carbon_threshold);
        let decision = apply_policy(params.candidate_hour, &low_hours);
        let scheduled_estimate = EmissionEstimate::for_decision(
            mean_intensity,
            params.energy_per_task_kwh,
            params.green_factor,
            decision,
        );
        let (rank, total_countries) = global_rank(&averages, country)?;

        Ok(Self {
            country: country.to_string(),
            mean_intensity,
            level,
            thresholds,
            estimate,
            scheduled_estimate,
            candidate_hour: params.candidate_hour,
            decision,
            low_carbon_hours: low_hours,
            reduction_percentage: estimate.reduction_percentage(),
            green_score: green_score(mean_intensity),
            carbon_cost: carbon_cost(estimate.saved, params.carbon_price_per_kg),
            grade: thresholds.grade(mean_intensity),
            rank,
            total_countries,
            trend: trend_summary(table, country)?,
            intraday_change: intraday_change(table, country)?,
            best_hour: best_hour(table, country).ok(),
            recommendation: level.recommendation(),
            national: NationalSavings::project(estimate.saved, params.tasks_per_day),
        })
    }

    pub fn scorecard(&self) -> Vec<ScorecardRow> {
        let best_time = self
            .best_hour
            .map(|h| format!("{h}:00"))
            .unwrap_or_else(|| "N/A".to_string());

        [
            ("Carbon Level", self.level.to_string()),
            ("Global Rank", format!("{} / {}", self.rank, self.total_countries)),
            ("Trend Status", self.trend.status.to_string()),
            ("Best Execution Time", best_time),
            ("Recommendation", self.recommendation.to_string()),
        ]
        .into_iter()
        .enumerate()
        .map(|(idx, (indicator, assessment))| ScorecardRow {
            position: idx + 1,
            indicator,
            assessment,
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::fixtures::hourly;
    use time::macros::datetime;

    fn table() -> CarbonTable {
        let t0 = datetime!(2024-04-01 00:00:00 UTC);
        let mut india = vec![700.0; 24];
        india[5] = 150.0;
        india[9] = 120.0;
        let mut rows = hourly("India", t0, &india);
        rows.extend(hourly("Norway", t0, &[20.0; 24]));
        rows.extend(hourly("Germany", t0, &[350.0; 24]));
        CarbonTable::new(rows)
    }

    #[test]
    fn report_combines_all_metrics() {
        let table = table();
        let report = CountryReport::build(&table, "India", &ScoringParams::default()).unwrap();

        let expected_mean = (22.0 * 700.0 + 150.0 + 120.0) / 24.0;
        assert!((report.mean_intensity - expected_mean).abs() < 1e-9);
        assert_eq!(report.level, Level::High);
        assert_eq!(report.grade, Grade::C);
        assert_eq!(report.low_carbon_hours, vec![5, 9]);
        assert_eq!(report.decision, Decision::ExecuteNow);
        assert_eq!(report.scheduled_estimate, report.estimate);
        assert_eq!((report.rank, report.total_countries), (3, 3));
        assert_eq!(report.best_hour, Some(9));
        assert_eq!(report.recommendation, "High carbon level. Postpone tasks.");
        assert!((report.reduction_percentage - 40.0).abs() < 1e-9);
        assert_eq!(report.green_score, 0.0);
    }

    #[test]
    fn deferred_candidate_hour_saves_nothing_in_schedule() {
        let table = table();
        let params = ScoringParams {
            candidate_hour: 6,
            ..ScoringParams::default()
        };
        let report = CountryReport::build(&table, "India", &params).unwrap();
        assert_eq!(report.decision, Decision::Defer);
        assert_eq!(report.scheduled_estimate.saved, 0.0);
        assert!(report.estimate.saved > 0.0);
    }

    #[test]
    fn report_for_unknown_country_is_empty_result() {
        assert!(matches!(
            CountryReport::build(&table(), "Atlantis", &ScoringParams::default()),
            Err(CarbonError::EmptyResult { .. })
        ));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let params = ScoringParams {
            candidate_hour: 24,
            ..ScoringParams::default()
        };
        assert!(matches!(
            CountryReport::build(&table(), "India", &params),
            Err(CarbonError::InvalidParameter(_))
        ));
    }

    #[test]
    fn inverted_quantile_levels_fail_validation() {
        let params = ScoringParams {
            low_quantile: 0.9,
            high_quantile: 0.1,
            ..ScoringParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(CarbonError::InvalidParameter(_))
        ));
        assert!(ScoringParams::default().validate().is_ok());
    }

    #[test]
    fn scorecard_has_five_numbered_rows() {
        let report = CountryReport::build(&table(), "Norway", &ScoringParams::default()).unwrap();
        let rows = report.scorecard();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[0].assessment, "Low");
        assert_eq!(rows[1].assessment, "1 / 3");
        assert_eq!(rows[3].indicator, "Best Execution Time");
        assert_eq!(rows[3].assessment, "0:00");
    }

    #[test]
    fn global_status_groups_by_level() {
        let status = GlobalStatus::build(&table(), QuantileLevels::default()).unwrap();
        assert_eq!(status.countries.len(), 3);
        let high: Vec<&str> = status
            .top(Level::High, 5)
            .iter()
            .map(|c| c.country.as_str())
            .collect();
        assert_eq!(high, vec!["India"]);
        assert_eq!(status.top(Level::Low, 5)[0].country, "Norway");
    }

    #[test]
    fn global_status_of_empty_table_is_insufficient() {
        assert_eq!(
            GlobalStatus::build(&CarbonTable::default(), QuantileLevels::default()),
            Err(CarbonError::InsufficientData)
        );
    }
}
