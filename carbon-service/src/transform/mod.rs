use carbon_analytics::domain::Observation;
use time::macros::datetime;

use crate::pipeline::{Envelope, PipelineError, Transform};

/// Pure validation of an `Observation`.
///
/// Rules:
/// - country must be non-empty.
/// - utc_hour must be within 0-23.
/// - carbon intensity must be finite and non-negative.
/// - timestamp must be within a broad sanity window [2000-01-01, 2100-01-01].
pub fn validate_observation(env: Envelope<Observation>) -> Result<Envelope<Observation>, PipelineError> {
    let o = &env.payload;

    if o.country.trim().is_empty() {
        return Err(PipelineError::Transform("country must not be empty".to_string()));
    }

    if o.utc_hour > 23 {
        return Err(PipelineError::Transform(format!(
            "utc_hour must be 0-23, got {}",
            o.utc_hour
        )));
    }

    if !o.carbon_intensity.is_finite() || o.carbon_intensity < 0.0 {
        return Err(PipelineError::Transform(format!(
            "carbon intensity must be a non-negative number, got {}",
            o.carbon_intensity
        )));
    }

    let min_ts = datetime!(2000-01-01 00:00:00 UTC);
    let max_ts = datetime!(2100-01-01 00:00:00 UTC);

    if o.timestamp < min_ts || o.timestamp > max_ts {
        return Err(PipelineError::Transform("timestamp out of allowed range".to_string()));
    }

    Ok(env)
}

#[derive(Clone, Default)]
pub struct ObservationValidation;

#[async_trait::async_trait]
impl Transform<Observation, Observation> for ObservationValidation {
    async fn apply(
        &self,
        input: Envelope<Observation>,
    ) -> Result<Envelope<Observation>, PipelineError> {
        match validate_observation(input) {
            Ok(env) => Ok(env),
            Err(e) => {
                metrics::counter!("carbon_validation_rejected_total").increment(1);
                Err(e)
            }
        }
    }
}
