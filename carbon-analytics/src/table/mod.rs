use std::collections::BTreeSet;

use crate::domain::Observation;

/// Immutable snapshot of loaded observations.
///
/// Rows keep their load order; time-ordered views are produced on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarbonTable {
    rows: Vec<Observation>,
}

impl CarbonTable {
    pub fn new(rows: Vec<Observation>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose country matches exactly.
    pub fn rows_for<'a, 'c>(&'a self, country: &'c str) -> impl Iterator<Item = &'a Observation> + 'c
    where
        'a: 'c,
    {
        self.rows.iter().filter(move |o| o.country == country)
    }

    /// Distinct country names, ascending.
    pub fn countries(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(|o| o.country.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Canonical spelling of a country name, matched case-insensitively.
    pub fn resolve_country(&self, name: &str) -> Option<&str> {
        let wanted = name.trim();
        self.rows
            .iter()
            .map(|o| o.country.as_str())
            .find(|c| c.eq_ignore_ascii_case(wanted))
    }

    /// The country's readings ordered by timestamp. Equal timestamps keep load order.
    pub fn time_ordered(&self, country: &str) -> Vec<&Observation> {
        let mut rows: Vec<&Observation> = self.rows_for(country).collect();
        rows.sort_by_key(|o| o.timestamp);
        rows
    }

    /// The most recent `n` readings for a country, oldest first.
    pub fn recent(&self, country: &str, n: usize) -> Vec<&Observation> {
        let mut rows = self.time_ordered(country);
        let skip = rows.len().saturating_sub(n);
        rows.split_off(skip)
    }
}

impl FromIterator<Observation> for CarbonTable {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use time::{Duration, OffsetDateTime};

    use crate::domain::Observation;

    pub fn obs(country: &str, ts: OffsetDateTime, intensity: f64) -> Observation {
        Observation {
            country: country.to_string(),
            timestamp: ts,
            utc_hour: ts.hour(),
            carbon_intensity: intensity,
        }
    }

    /// Hourly readings starting at `start`, one per value.
    pub fn hourly(country: &str, start: OffsetDateTime, values: &[f64]) -> Vec<Observation> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| obs(country, start + Duration::hours(i as i64), *v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{hourly, obs};
    use super::*;
    use time::macros::datetime;

    #[test]
    fn ordered_rows_outlive_the_country_name() {
        let t0 = datetime!(2024-01-01 00:00:00 UTC);
        let mut rows = hourly("India", t0, &[5.0, 6.0]);
        rows.reverse();
        let table = CarbonTable::new(rows);

        let ordered = {
            let name = String::from("India");
            table.time_ordered(&name)
        };
        assert_eq!(ordered.len(), 2);
        assert_eq!(ordered[0].carbon_intensity, 5.0);
    }

    #[test]
    fn countries_are_distinct_and_sorted() {
        let t0 = datetime!(2024-01-01 00:00:00 UTC);
        let table = CarbonTable::new(vec![
            obs("India", t0, 700.0),
            obs("France", t0, 50.0),
            obs("India", t0, 710.0),
        ]);
        assert_eq!(table.countries(), vec!["France", "India"]);
    }

    #[test]
    fn resolve_country_ignores_case() {
        let t0 = datetime!(2024-01-01 00:00:00 UTC);
        let table = CarbonTable::new(vec![obs("India", t0, 700.0)]);
        assert_eq!(table.resolve_country("india"), Some("India"));
        assert_eq!(table.resolve_country(" INDIA "), Some("India"));
        assert_eq!(table.resolve_country("Chile"), None);
    }

    #[test]
    fn recent_returns_latest_rows_in_time_order() {
        let t0 = datetime!(2024-01-01 00:00:00 UTC);
        let mut rows = hourly("India", t0, &[1.0, 2.0, 3.0, 4.0]);
        rows.reverse();
        let table = CarbonTable::new(rows);

        let recent: Vec<f64> = table
            .recent("India", 2)
            .iter()
            .map(|o| o.carbon_intensity)
            .collect();
        assert_eq!(recent, vec![3.0, 4.0]);
        assert_eq!(table.recent("India", 10).len(), 4);
        assert!(table.recent("France", 3).is_empty());
    }
}
