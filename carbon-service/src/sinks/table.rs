use std::{sync::Mutex, time::SystemTime};

use carbon_analytics::{domain::Observation, CarbonTable};
use futures::StreamExt;

use crate::pipeline::{Envelope, PipelineError, Sink};

/// Collects validated observations into an in-memory [`CarbonTable`].
///
/// Record-level errors are logged, counted and skipped; a source-level error
/// aborts the load.
#[derive(Default)]
pub struct TableSink {
    state: Mutex<Collected>,
}

#[derive(Default)]
struct Collected {
    rows: Vec<Observation>,
    rejected: u64,
}

impl TableSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejected(&self) -> u64 {
        self.state.lock().map(|s| s.rejected).unwrap_or(0)
    }

    pub fn into_table(self) -> Result<CarbonTable, PipelineError> {
        let collected = self
            .state
            .into_inner()
            .map_err(|_| PipelineError::Sink("table sink state poisoned".to_string()))?;
        Ok(CarbonTable::new(collected.rows))
    }
}

#[async_trait::async_trait]
impl Sink<Observation> for TableSink {
    async fn run<S>(&self, mut input: S) -> Result<(), PipelineError>
    where
        S: futures::Stream<Item = Result<Envelope<Observation>, PipelineError>> + Send + Unpin + 'static,
    {
        let mut rows = Vec::new();
        let mut rejected: u64 = 0;
        let mut first_received: Option<SystemTime> = None;

        while let Some(item) = input.next().await {
            let env = match item {
                Ok(env) => env,
                Err(e) if e.is_record_level() => {
                    rejected += 1;
                    metrics::counter!("carbon_rows_rejected_total").increment(1);
                    tracing::warn!(error = %e, "skipping observation");
                    continue;
                }
                Err(e) => {
                    tracing::error!(error = %e, "dataset load aborted");
                    return Err(e);
                }
            };

            first_received.get_or_insert(env.received_at);
            rows.push(env.payload);
        }

        metrics::counter!("carbon_rows_ingested_total").increment(rows.len() as u64);
        let elapsed_ms = first_received
            .and_then(|t| SystemTime::now().duration_since(t).ok())
            .map(|d| d.as_millis())
            .unwrap_or(0);
        tracing::info!(rows = rows.len(), rejected, elapsed_ms, "observations collected");

        let mut state = self
            .state
            .lock()
            .map_err(|_| PipelineError::Sink("table sink state poisoned".to_string()))?;
        state.rows.extend(rows);
        state.rejected += rejected;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn ok(country: &str, intensity: f64) -> Result<Envelope<Observation>, PipelineError> {
        Ok(Envelope::now(Observation {
            country: country.to_string(),
            timestamp: datetime!(2024-01-01 00:00:00 UTC),
            utc_hour: 0,
            carbon_intensity: intensity,
        }))
    }

    #[tokio::test]
    async fn collects_rows_and_skips_record_errors() {
        let sink = TableSink::new();
        let input = futures::stream::iter(vec![
            ok("India", 700.0),
            Err(PipelineError::Record("bad row".to_string())),
            Err(PipelineError::Transform("negative".to_string())),
            ok("France", 50.0),
        ]);

        sink.run(input).await.unwrap();
        assert_eq!(sink.rejected(), 2);

        let table = sink.into_table().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.countries(), vec!["France", "India"]);
    }

    #[tokio::test]
    async fn source_error_aborts_load() {
        let sink = TableSink::new();
        let input = futures::stream::iter(vec![
            ok("India", 700.0),
            Err(PipelineError::Source("file vanished".to_string())),
        ]);

        let res = sink.run(input).await;
        assert!(matches!(res, Err(PipelineError::Source(_))));
    }
}
