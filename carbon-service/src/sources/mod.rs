pub mod csv_file;
pub mod ndjson_file;

pub use csv_file::ObservationCsvFileSource;
pub use ndjson_file::ObservationNdjsonFileSource;

use time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    PrimitiveDateTime,
};

use crate::pipeline::PipelineError;

pub const COUNTRY_COLUMN: &str = "country";
pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const HOUR_COLUMN: &str = "utc_hour";
pub const INTENSITY_COLUMN: &str = "carbon_intensity_gCO2_per_kWh";

/// Parses an RFC 3339 timestamp, or a naive `YYYY-MM-DD HH:MM:SS` /
/// `YYYY-MM-DDTHH:MM:SS` one which is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, PipelineError> {
    let s = raw.trim();
    if let Ok(ts) = OffsetDateTime::parse(s, &Rfc3339) {
        return Ok(ts);
    }

    let space = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let tee = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    PrimitiveDateTime::parse(s, space)
        .or_else(|_| PrimitiveDateTime::parse(s, tee))
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| PipelineError::Record(format!("invalid timestamp '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-01-01T05:00:00+05:30").unwrap();
        assert_eq!(ts, datetime!(2024-01-01 05:00:00 +05:30));
    }

    #[test]
    fn naive_timestamps_are_utc() {
        let expected = datetime!(2024-01-01 05:00:00 UTC);
        assert_eq!(parse_timestamp("2024-01-01 05:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp(" 2024-01-01T05:00:00 ").unwrap(), expected);
    }

    #[test]
    fn garbage_is_a_record_error() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(PipelineError::Record(_))
        ));
    }
}
