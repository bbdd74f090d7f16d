use time::OffsetDateTime;

/// One hourly carbon-intensity reading for a country.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    pub country: String,
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub timestamp: OffsetDateTime,
    pub utc_hour: u8,
    /// gCO2 per kWh.
    pub carbon_intensity: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CountryAverage {
    pub country: String,
    pub mean_intensity: f64,
}
