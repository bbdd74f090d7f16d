//! Plain-text rendering of derived results for terminal output.

use std::fmt;

use carbon_analytics::analytics::{BestCountry, Comparison, CountryReport};

/// Text form of a [`CountryReport`], ending with the scorecard.
pub struct CountryReportText<'a>(pub &'a CountryReport);

impl fmt::Display for CountryReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        let s = &r.scheduled_estimate;

        writeln!(f, "Country: {}", r.country)?;
        writeln!(f, "Normal Emission: {:.2} gCO2", s.normal)?;
        writeln!(f, "Green Emission: {:.2} gCO2", s.green)?;
        writeln!(f, "Carbon Saved: {:.2} gCO2", s.saved)?;
        writeln!(
            f,
            "Decision at {}:00: {} (low-carbon hours: {})",
            r.candidate_hour,
            r.decision,
            format_hours(&r.low_carbon_hours)
        )?;
        writeln!(f)?;

        writeln!(
            f,
            "Average Intensity: {:.2} gCO2/kWh ({} carbon zone)",
            r.mean_intensity, r.level
        )?;
        writeln!(
            f,
            "Thresholds: low {:.2}, high {:.2}",
            r.thresholds.low_cut, r.thresholds.high_cut
        )?;
        writeln!(f, "Green Score: {:.1}/100", r.green_score)?;
        writeln!(f, "Reduction: {:.2}%", r.reduction_percentage)?;
        writeln!(f, "Cost Saved: {:.2}", r.carbon_cost)?;
        writeln!(f, "Carbon Grade: {} ({})", r.grade, r.grade.remark())?;
        writeln!(
            f,
            "Weekly Average: {:.2} gCO2/kWh, Monthly Average: {:.2} gCO2/kWh",
            r.trend.last_7_mean, r.trend.last_30_mean
        )?;
        writeln!(
            f,
            "National Savings: {:.2} kg/day, {:.2} tonnes/year at {} tasks/day",
            r.national.daily_kg, r.national.annual_tonnes, r.national.tasks_per_day
        )?;
        writeln!(f)?;

        writeln!(f, "Scorecard")?;
        for row in r.scorecard() {
            writeln!(f, "{:>2}. {:<20} {}", row.position, row.indicator, row.assessment)?;
        }
        Ok(())
    }
}

/// Text form of a two-country [`Comparison`].
pub struct ComparisonText<'a>(pub &'a Comparison);

impl fmt::Display for ComparisonText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0;

        if c.is_self_comparison() {
            writeln!(f, "Same country selected. Self-comparison shown.")?;
        }
        for side in [&c.x, &c.y] {
            writeln!(
                f,
                "{}: {:.2} gCO2/kWh, {:.2} gCO2 per task, {} level",
                side.country, side.mean_intensity, side.emission, side.level
            )?;
        }
        writeln!(f, "Carbon Difference: {:.2} gCO2", c.difference)?;
        writeln!(f, "Percentage Difference: {:.2}%", c.percent_difference)?;

        match &c.best {
            BestCountry::Single(country) => {
                writeln!(f, "Best Country for Green Execution: {country}")
            }
            BestCountry::Both => writeln!(f, "Both countries have nearly equal carbon intensity."),
        }
    }
}

pub fn render_country_report(report: &CountryReport) -> String {
    CountryReportText(report).to_string()
}

pub fn render_comparison(c: &Comparison) -> String {
    ComparisonText(c).to_string()
}

fn format_hours(hours: &[u8]) -> String {
    if hours.is_empty() {
        return "none".to_string();
    }
    hours
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
