use std::{fs::File, path::PathBuf};

use carbon_analytics::domain::Observation;
use csv::StringRecord;

use super::{parse_timestamp, COUNTRY_COLUMN, HOUR_COLUMN, INTENSITY_COLUMN, TIMESTAMP_COLUMN};
use crate::pipeline::{Envelope, EnvelopeStream, PipelineError, Source};

/// Delimited-file source for `Observation`s.
///
/// Expected header columns (by name, any order, extra columns ignored):
/// - country
/// - timestamp (RFC 3339, or naive date-time taken as UTC)
/// - utc_hour (0-23)
/// - carbon_intensity_gCO2_per_kWh
///
/// A row that fails to parse is reported as a record error and skipped.
pub struct ObservationCsvFileSource {
    path: PathBuf,
    delimiter: u8,
}

impl ObservationCsvFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
        }
    }

    /// Use `b'|'` for pipe-delimited `.dat` exports.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Header positions resolved once per file.
struct Columns {
    country: usize,
    timestamp: usize,
    hour: usize,
    intensity: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, PipelineError> {
        let find = |name: &str| -> Result<usize, PipelineError> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| PipelineError::Source(format!("missing column '{name}' in CSV header")))
        };

        Ok(Self {
            country: find(COUNTRY_COLUMN)?,
            timestamp: find(TIMESTAMP_COLUMN)?,
            hour: find(HOUR_COLUMN)?,
            intensity: find(INTENSITY_COLUMN)?,
        })
    }
}

fn record_to_observation(record: &StringRecord, cols: &Columns) -> Result<Observation, PipelineError> {
    let get = |idx: usize, name: &str| -> Result<&str, PipelineError> {
        record
            .get(idx)
            .map(str::trim)
            .ok_or_else(|| PipelineError::Record(format!("missing field '{name}' in CSV record")))
    };

    let country = get(cols.country, COUNTRY_COLUMN)?.to_string();
    let timestamp = parse_timestamp(get(cols.timestamp, TIMESTAMP_COLUMN)?)?;

    let hour_str = get(cols.hour, HOUR_COLUMN)?;
    let utc_hour: u8 = hour_str
        .parse()
        .map_err(|e| PipelineError::Record(format!("invalid utc_hour '{hour_str}': {e}")))?;

    let intensity_str = get(cols.intensity, INTENSITY_COLUMN)?;
    let carbon_intensity: f64 = intensity_str.parse().map_err(|e| {
        PipelineError::Record(format!("invalid carbon intensity '{intensity_str}': {e}"))
    })?;

    Ok(Observation {
        country,
        timestamp,
        utc_hour,
        carbon_intensity,
    })
}

#[async_trait::async_trait]
impl Source<Observation> for ObservationCsvFileSource {
    async fn stream(&self) -> EnvelopeStream<Observation> {
        // Blocking csv reader inside a single async task; datasets are loaded once at startup.
        let path = self.path.clone();
        let delimiter = self.delimiter;
        let s = async_stream::stream! {
            let file = match File::open(&path) {
                Ok(f) => f,
                Err(e) => {
                    yield Err(PipelineError::Source(format!(
                        "failed to open CSV file '{}': {e}",
                        path.display()
                    )));
                    return;
                }
            };
            let mut rdr = csv::ReaderBuilder::new()
                .delimiter(delimiter)
                .flexible(true)
                .from_reader(file);

            let cols = match rdr
                .headers()
                .map_err(|e| PipelineError::Source(format!("failed to read CSV headers: {e}")))
                .and_then(Columns::resolve)
            {
                Ok(c) => c,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            for result in rdr.records() {
                let parsed = result
                    .map_err(|e| PipelineError::Record(format!("failed to read CSV record: {e}")))
                    .and_then(|record| record_to_observation(&record, &cols));

                match parsed {
                    Ok(obs) => yield Ok(Envelope::now(obs)),
                    Err(e) => {
                        metrics::counter!("carbon_csv_parse_errors_total").increment(1);
                        yield Err(e);
                    }
                }
            }
        };

        Box::pin(s)
    }
}
