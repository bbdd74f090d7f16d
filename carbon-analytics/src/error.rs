#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CarbonError {
    /// The requested country has no readings, so its average is undefined.
    #[error("no data for country '{country}'")]
    EmptyResult { country: String },
    #[error("at least one country average is required")]
    InsufficientData,
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl CarbonError {
    pub fn empty(country: &str) -> Self {
        Self::EmptyResult {
            country: country.to_string(),
        }
    }
}
