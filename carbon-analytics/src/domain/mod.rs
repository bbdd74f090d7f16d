pub mod estimate;
pub mod level;
pub mod observation;

pub use estimate::{DelaySimulation, EmissionEstimate, NationalSavings};
pub use level::{Decision, Grade, Level, TrendPeriod, TrendStatus};
pub use observation::{CountryAverage, Observation};
