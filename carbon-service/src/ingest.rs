use std::sync::Arc;

use carbon_analytics::{domain::Observation, CarbonTable};

use crate::{
    config::{DatasetConfig, DatasetFormat},
    pipeline::{Pipeline, PipelineError, Source},
    sinks::TableSink,
    sources::{ObservationCsvFileSource, ObservationNdjsonFileSource},
    transform::ObservationValidation,
};

/// Loads the configured dataset into a table snapshot, dropping invalid rows.
pub async fn load_table(cfg: &DatasetConfig) -> Result<CarbonTable, PipelineError> {
    tracing::info!(path = %cfg.path.display(), format = ?cfg.format, "loading dataset");

    match cfg.format {
        DatasetFormat::Csv => {
            let delimiter = cfg
                .delimiter_byte()
                .map_err(|e| PipelineError::Source(e.to_string()))?;
            collect(ObservationCsvFileSource::new(&cfg.path).with_delimiter(delimiter)).await
        }
        DatasetFormat::Ndjson => collect(ObservationNdjsonFileSource::new(&cfg.path)).await,
    }
}

async fn collect<S>(source: S) -> Result<CarbonTable, PipelineError>
where
    S: Source<Observation> + Send + Sync + 'static,
{
    let pipeline: Pipeline<_, Observation, _> = Pipeline {
        source,
        transforms: vec![Arc::new(ObservationValidation::default())],
        sink: TableSink::new(),
    };

    let sink = pipeline.run().await?;
    let table = sink.into_table()?;
    tracing::info!(
        rows = table.len(),
        countries = table.countries().len(),
        "dataset loaded"
    );
    Ok(table)
}
