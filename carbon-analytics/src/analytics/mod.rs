pub mod alerts;
pub mod classification;
pub mod comparison;
pub mod metrics;
pub mod prediction;
pub mod scorecard;
pub mod trend;

pub use alerts::{AlertEvent, CleanerSnapshot};
pub use classification::{classify, compute_thresholds, QuantileLevels, Thresholds};
pub use comparison::{BestCountry, Comparison, CountrySide};
pub use metrics::{average_intensity, country_averages, emission, savings};
pub use prediction::{apply_policy, best_hour, low_carbon_hours, DEFAULT_LOW_CARBON_THRESHOLD};
pub use scorecard::{ClassifiedCountry, CountryReport, GlobalStatus, ScorecardRow, ScoringParams};
pub use trend::{DailyMean, TrendSummary};
