use std::path::PathBuf;

use async_stream::stream;
use carbon_analytics::domain::Observation;
use tokio::{fs::File, io::{AsyncBufReadExt, BufReader}};

use super::parse_timestamp;
use crate::pipeline::{Envelope, EnvelopeStream, PipelineError, Source};

/// NDJSON source for `Observation`s.
///
/// Each non-empty line is a JSON object with the same field names as the CSV
/// header (`country`, `timestamp`, `utc_hour`, `carbon_intensity_gCO2_per_kWh`).
pub struct ObservationNdjsonFileSource {
    path: PathBuf,
}

#[derive(serde::Deserialize)]
struct NdjsonObservation {
    country: String,
    timestamp: String,
    utc_hour: u8,
    #[serde(rename = "carbon_intensity_gCO2_per_kWh")]
    carbon_intensity: f64,
}

impl TryFrom<NdjsonObservation> for Observation {
    type Error = PipelineError;

    fn try_from(i: NdjsonObservation) -> Result<Self, Self::Error> {
        Ok(Observation {
            timestamp: parse_timestamp(&i.timestamp)?,
            country: i.country,
            utc_hour: i.utc_hour,
            carbon_intensity: i.carbon_intensity,
        })
    }
}

impl ObservationNdjsonFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

fn parse_line(line: &str) -> Result<Observation, PipelineError> {
    let parsed: NdjsonObservation = serde_json::from_str(line)
        .map_err(|e| PipelineError::Record(format!("failed to parse json line: {e}")))?;
    parsed.try_into()
}

#[async_trait::async_trait]
impl Source<Observation> for ObservationNdjsonFileSource {
    async fn stream(&self) -> EnvelopeStream<Observation> {
        let path = self.path.clone();
        let s = stream! {
            let file = match File::open(&path).await {
                Ok(f) => f,
                Err(e) => {
                    yield Err(PipelineError::Source(format!(
                        "failed to open NDJSON file '{}': {e}",
                        path.display()
                    )));
                    return;
                }
            };
            let mut lines = BufReader::new(file).lines();

            loop {
                let line = match lines.next_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        yield Err(PipelineError::Source(format!("failed to read NDJSON line: {e}")));
                        return;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                match parse_line(&line) {
                    Ok(obs) => yield Ok(Envelope::now(obs)),
                    Err(e) => {
                        metrics::counter!("carbon_ndjson_parse_errors_total").increment(1);
                        yield Err(e);
                    }
                }
            }
        };

        Box::pin(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::io::Write;
    use time::macros::datetime;

    #[test]
    fn line_parses_into_observation() {
        let obs = parse_line(
            r#"{"country":"Norway","timestamp":"2024-01-01T03:00:00Z","utc_hour":3,"carbon_intensity_gCO2_per_kWh":28.4}"#,
        )
        .unwrap();
        assert_eq!(obs.country, "Norway");
        assert_eq!(obs.timestamp, datetime!(2024-01-01 03:00:00 UTC));
        assert_eq!(obs.utc_hour, 3);
        assert_eq!(obs.carbon_intensity, 28.4);
    }

    #[test]
    fn bad_timestamp_is_a_record_error() {
        let res = parse_line(
            r#"{"country":"Norway","timestamp":"soon","utc_hour":3,"carbon_intensity_gCO2_per_kWh":28.4}"#,
        );
        assert!(matches!(res, Err(PipelineError::Record(_))));
    }

    #[tokio::test]
    async fn stream_skips_blank_and_bad_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"country":"Norway","timestamp":"2024-01-01 00:00:00","utc_hour":0,"carbon_intensity_gCO2_per_kWh":30.0}}"#
        )
        .unwrap();
        writeln!(file).unwrap();
        writeln!(file, "{{not json").unwrap();
        file.flush().unwrap();

        let items: Vec<_> = ObservationNdjsonFileSource::new(file.path())
            .stream()
            .await
            .collect()
            .await;
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(items[1], Err(PipelineError::Record(_))));
    }
}
