use std::{fmt, str::FromStr};

use crate::error::CarbonError;

/// Coarse carbon classification relative to global peers.
///
/// Variants are declared in ascending order so the derived `Ord` gives
/// `Low < Moderate < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Level {
    Low,
    Moderate,
    High,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "Low",
            Level::Moderate => "Moderate",
            Level::High => "High",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            Level::High => "High carbon level. Postpone tasks.",
            Level::Moderate => "Moderate level. Optimize scheduling.",
            Level::Low => "Low level. Safe to execute.",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = CarbonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Level::Low),
            "moderate" => Ok(Level::Moderate),
            "high" => Ok(Level::High),
            other => Err(CarbonError::InvalidParameter(format!("unknown level '{other}'"))),
        }
    }
}

/// Scorecard grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Grade {
    A,
    B,
    C,
}

impl Grade {
    pub fn remark(&self) -> &'static str {
        match self {
            Grade::A => "Excellent - Low carbon footprint",
            Grade::B => "Moderate - Needs optimization",
            Grade::C => "Poor - High carbon footprint",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
        };
        f.write_str(s)
    }
}

/// Scheduling decision for a candidate hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Decision {
    ExecuteNow,
    Defer,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::ExecuteNow => f.write_str("EXECUTE_NOW"),
            Decision::Defer => f.write_str("DEFER"),
        }
    }
}

/// Window used for daily trend charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TrendPeriod {
    #[default]
    Week,
    Month,
}

impl TrendPeriod {
    pub fn days(&self) -> usize {
        match self {
            TrendPeriod::Week => 7,
            TrendPeriod::Month => 30,
        }
    }
}

impl FromStr for TrendPeriod {
    type Err = CarbonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(TrendPeriod::Week),
            "month" => Ok(TrendPeriod::Month),
            other => Err(CarbonError::InvalidParameter(format!(
                "unknown trend period '{other}', expected 'week' or 'month'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrendStatus {
    Increasing,
    Decreasing,
}

impl fmt::Display for TrendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendStatus::Increasing => f.write_str("Increasing"),
            TrendStatus::Decreasing => f.write_str("Decreasing"),
        }
    }
}
