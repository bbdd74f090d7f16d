use carbon_analytics::analytics::ScoringParams;
use serde::Deserialize;
use std::{fs, path::PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    #[default]
    Csv,
    Ndjson,
}

fn default_delimiter() -> char {
    ','
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub format: DatasetFormat,
    /// Field separator for CSV input; `|` reads `.dat` exports.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl DatasetConfig {
    pub fn csv<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            format: DatasetFormat::Csv,
            delimiter: default_delimiter(),
        }
    }

    pub fn ndjson<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            format: DatasetFormat::Ndjson,
            ..Self::csv(path)
        }
    }

    pub fn delimiter_byte(&self) -> anyhow::Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| anyhow::anyhow!("dataset.delimiter must be a single ASCII character"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub scoring: ScoringParams,
    #[serde(default)]
    pub server: ServerConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("CARBON_CONFIG").unwrap_or_else(|_| "carbon-config.toml".to_string());
        let contents = fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read config '{path}': {e}"))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        cfg.scoring.validate()?;
        cfg.dataset.delimiter_byte()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbon_analytics::domain::TrendPeriod;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [dataset]
            path = "data/global.csv"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.dataset.format, DatasetFormat::Csv);
        assert_eq!(cfg.dataset.delimiter_byte().unwrap(), b',');
        assert_eq!(cfg.scoring, ScoringParams::default());
        assert_eq!(cfg.scoring.low_carbon_threshold, 200.0);
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:8080");
        assert!(cfg.metrics.is_none());
    }

    #[test]
    fn full_config_overrides_scoring() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [dataset]
            path = "data/global.ndjson"
            format = "ndjson"

            [scoring]
            energy_per_task_kwh = 1.2
            low_carbon_threshold = 150.0
            trend_period = "month"

            [server]
            bind_addr = "0.0.0.0:9000"

            [metrics]
            bind_addr = "127.0.0.1:9100"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.dataset.format, DatasetFormat::Ndjson);
        assert_eq!(cfg.scoring.energy_per_task_kwh, 1.2);
        assert_eq!(cfg.scoring.low_carbon_threshold, 150.0);
        assert_eq!(cfg.scoring.trend_period, TrendPeriod::Month);
        assert_eq!(cfg.scoring.green_factor, 0.6);
        assert_eq!(cfg.metrics.unwrap().bind_addr, "127.0.0.1:9100");
    }

    #[test]
    fn invalid_candidate_hour_is_rejected() {
        let res = AppConfig::from_toml_str(
            r#"
            [dataset]
            path = "x.csv"

            [scoring]
            candidate_hour = 30
            "#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn inverted_quantile_levels_are_rejected_at_load() {
        let res = AppConfig::from_toml_str(
            r#"
            [dataset]
            path = "x.csv"

            [scoring]
            low_quantile = 0.9
            high_quantile = 0.1
            "#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let res = AppConfig::from_toml_str(
            r#"
            [dataset]
            path = "x.csv"
            delimiter = "§"
            "#,
        );
        assert!(res.is_err());
    }
}
