//! Change-detection alerts.
//!
//! Callers own the previous state and pass it in; nothing is remembered here.

use crate::domain::Level;

/// The cleaner side of a comparison at the time it was made.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CleanerSnapshot {
    pub country: String,
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum AlertEvent {
    LevelChanged {
        country: String,
        from: Level,
        to: Level,
    },
    CleanerCountryWorsened {
        country: String,
        previous: f64,
        current: f64,
    },
    RisingIntraday {
        country: String,
        change: f64,
    },
}

impl AlertEvent {
    pub fn message(&self) -> String {
        match self {
            AlertEvent::LevelChanged { country, from, to } => {
                format!("ALERT: {country} moved from {from} to {to}")
            }
            AlertEvent::CleanerCountryWorsened {
                country,
                previous,
                current,
            } => format!(
                "ALERT: {country} carbon pollution has increased from {previous:.2} to {current:.2} gCO2/kWh"
            ),
            AlertEvent::RisingIntraday { country, change } => {
                format!("ALERT: {country} carbon pollution trend is increasing (+{change:.2} gCO2/kWh)")
            }
        }
    }
}

/// Fires when a country's level differs from the one the caller last saw.
pub fn level_change(country: &str, previous: Option<Level>, current: Level) -> Option<AlertEvent> {
    match previous {
        Some(from) if from != current => Some(AlertEvent::LevelChanged {
            country: country.to_string(),
            from,
            to: current,
        }),
        _ => None,
    }
}

/// Fires when the cleaner country's intensity rose since the previous comparison.
pub fn cleaner_country_alert(
    previous: Option<&CleanerSnapshot>,
    current: &CleanerSnapshot,
) -> Option<AlertEvent> {
    let previous = previous?;
    (current.intensity > previous.intensity).then(|| AlertEvent::CleanerCountryWorsened {
        country: current.country.clone(),
        previous: previous.intensity,
        current: current.intensity,
    })
}

pub fn intraday_alert(country: &str, change: f64) -> Option<AlertEvent> {
    (change > 0.0).then(|| AlertEvent::RisingIntraday {
        country: country.to_string(),
        change,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_never_alerts() {
        assert_eq!(level_change("India", None, Level::High), None);
    }

    #[test]
    fn unchanged_level_does_not_alert() {
        assert_eq!(level_change("India", Some(Level::High), Level::High), None);
    }

    #[test]
    fn changed_level_alerts_with_both_levels() {
        let alert = level_change("India", Some(Level::Moderate), Level::High).unwrap();
        assert_eq!(
            alert,
            AlertEvent::LevelChanged {
                country: "India".to_string(),
                from: Level::Moderate,
                to: Level::High,
            }
        );
        assert_eq!(alert.message(), "ALERT: India moved from Moderate to High");
    }

    #[test]
    fn cleaner_country_alerts_only_on_increase() {
        let before = CleanerSnapshot {
            country: "France".to_string(),
            intensity: 55.0,
        };
        let worse = CleanerSnapshot {
            intensity: 61.5,
            ..before.clone()
        };
        let better = CleanerSnapshot {
            intensity: 50.0,
            ..before.clone()
        };

        assert!(cleaner_country_alert(None, &worse).is_none());
        assert!(cleaner_country_alert(Some(&before), &better).is_none());
        assert!(cleaner_country_alert(Some(&before), &before).is_none());
        assert_eq!(
            cleaner_country_alert(Some(&before), &worse),
            Some(AlertEvent::CleanerCountryWorsened {
                country: "France".to_string(),
                previous: 55.0,
                current: 61.5,
            })
        );
    }

    #[test]
    fn intraday_alert_requires_positive_change() {
        assert!(intraday_alert("Chile", 0.0).is_none());
        assert!(intraday_alert("Chile", -12.0).is_none());
        assert!(intraday_alert("Chile", 3.0).is_some());
    }
}
