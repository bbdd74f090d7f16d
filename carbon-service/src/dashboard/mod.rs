//! Read-only JSON API over a loaded table snapshot.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use carbon_analytics::{
    analytics::{
        alerts::{cleaner_country_alert, intraday_alert, level_change},
        classification::compute_thresholds_with,
        comparison::compare,
        metrics::{average_intensity, country_averages, emission, simulate_delay},
        prediction::{apply_policy, low_carbon_hours},
        trend::{daily_trend, trend_summary},
        AlertEvent, ClassifiedCountry, CleanerSnapshot, Comparison, CountryReport, DailyMean,
        GlobalStatus, ScorecardRow, ScoringParams, TrendSummary,
    },
    domain::{Decision, DelaySimulation, Level, TrendPeriod},
    CarbonError, CarbonTable,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub table: Arc<CarbonTable>,
    pub scoring: Arc<ScoringParams>,
}

impl DashboardState {
    pub fn new(table: CarbonTable, scoring: ScoringParams) -> Self {
        Self {
            table: Arc::new(table),
            scoring: Arc::new(scoring),
        }
    }

    /// Canonical country name for a user-supplied one.
    fn country(&self, name: &str) -> Result<String, DashboardError> {
        self.table
            .resolve_country(name)
            .map(str::to_string)
            .ok_or_else(|| CarbonError::empty(name).into())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Carbon(#[from] CarbonError),
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::Carbon(CarbonError::EmptyResult { .. }) => StatusCode::NOT_FOUND,
            DashboardError::Carbon(CarbonError::InvalidParameter(_)) => StatusCode::BAD_REQUEST,
            DashboardError::Carbon(CarbonError::InsufficientData) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        tracing::debug!(error = %self, status = status.as_u16(), "dashboard request failed");
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/countries", get(global_status))
        .route("/countries/:country/report", get(country_report))
        .route("/countries/:country/low-hours", get(country_low_hours))
        .route("/countries/:country/trend", get(country_trend))
        .route("/countries/:country/simulate", get(simulate))
        .route("/compare", get(compare_countries))
        .with_state(state)
}

fn count_request(endpoint: &'static str) {
    metrics::counter!("dashboard_requests_total", "endpoint" => endpoint).increment(1);
}

async fn health() -> &'static str {
    "ok"
}

/// Rows listed per level in the `/countries` summary.
const DEFAULT_TOP_PER_LEVEL: usize = 5;

#[derive(Debug, Default, Deserialize)]
pub struct CountriesQuery {
    pub top: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct GlobalStatusResponse {
    pub status: GlobalStatus,
    pub top_high: Vec<ClassifiedCountry>,
    pub top_moderate: Vec<ClassifiedCountry>,
    pub top_low: Vec<ClassifiedCountry>,
}

async fn global_status(
    State(state): State<DashboardState>,
    Query(query): Query<CountriesQuery>,
) -> Result<Json<GlobalStatusResponse>, DashboardError> {
    count_request("countries");
    let status = GlobalStatus::build(&state.table, state.scoring.quantile_levels())?;
    let n = query.top.unwrap_or(DEFAULT_TOP_PER_LEVEL);
    let top = |level: Level| status.top(level, n).into_iter().cloned().collect::<Vec<_>>();

    Ok(Json(GlobalStatusResponse {
        top_high: top(Level::High),
        top_moderate: top(Level::Moderate),
        top_low: top(Level::Low),
        status,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// Level the caller last displayed for this country.
    pub previous_level: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CountryReportResponse {
    pub report: CountryReport,
    pub scorecard: Vec<ScorecardRow>,
    pub alerts: Vec<AlertEvent>,
}

async fn country_report(
    State(state): State<DashboardState>,
    Path(country): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<CountryReportResponse>, DashboardError> {
    count_request("report");
    let country = state.country(&country)?;
    let previous_level = query
        .previous_level
        .as_deref()
        .map(str::parse::<Level>)
        .transpose()?;

    let report = CountryReport::build(&state.table, &country, &state.scoring)?;
    let alerts = level_change(&country, previous_level, report.level)
        .into_iter()
        .chain(intraday_alert(&country, report.intraday_change))
        .collect();

    Ok(Json(CountryReportResponse {
        scorecard: report.scorecard(),
        report,
        alerts,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct LowHoursQuery {
    pub threshold: Option<f64>,
    pub candidate_hour: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct LowHoursResponse {
    pub country: String,
    pub threshold: f64,
    pub hours: Vec<u8>,
    pub candidate_hour: u8,
    pub decision: Decision,
}

async fn country_low_hours(
    State(state): State<DashboardState>,
    Path(country): Path<String>,
    Query(query): Query<LowHoursQuery>,
) -> Result<Json<LowHoursResponse>, DashboardError> {
    count_request("low_hours");
    let country = state.country(&country)?;
    let threshold = query.threshold.unwrap_or(state.scoring.low_carbon_threshold);
    let candidate_hour = query.candidate_hour.unwrap_or(state.scoring.candidate_hour);
    if candidate_hour > 23 {
        return Err(CarbonError::InvalidParameter(format!(
            "candidate_hour must be 0-23, got {candidate_hour}"
        ))
        .into());
    }

    let hours = low_carbon_hours(&state.table, &country, threshold);
    let decision = apply_policy(candidate_hour, &hours);
    Ok(Json(LowHoursResponse {
        country,
        threshold,
        hours,
        candidate_hour,
        decision,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
    pub period: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrendResponse {
    pub country: String,
    pub period: TrendPeriod,
    pub summary: TrendSummary,
    pub daily: Vec<DailyMean>,
}

async fn country_trend(
    State(state): State<DashboardState>,
    Path(country): Path<String>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<TrendResponse>, DashboardError> {
    count_request("trend");
    let country = state.country(&country)?;
    let period = match query.period.as_deref() {
        Some(p) => p.parse::<TrendPeriod>()?,
        None => state.scoring.trend_period,
    };

    Ok(Json(TrendResponse {
        summary: trend_summary(&state.table, &country)?,
        daily: daily_trend(&state.table, &country, period),
        country,
        period,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct SimulateQuery {
    pub delay_hours: Option<u8>,
}

async fn simulate(
    State(state): State<DashboardState>,
    Path(country): Path<String>,
    Query(query): Query<SimulateQuery>,
) -> Result<Json<DelaySimulation>, DashboardError> {
    count_request("simulate");
    let country = state.country(&country)?;
    let avg = average_intensity(&state.table, &country)?;
    let normal = emission(avg, state.scoring.energy_per_task_kwh);
    Ok(Json(simulate_delay(normal, query.delay_hours.unwrap_or(2))?))
}

#[derive(Debug, Default, Deserialize)]
pub struct CompareQuery {
    pub x: String,
    pub y: String,
    /// Cleaner country from the caller's previous comparison, with its intensity.
    pub previous_cleaner: Option<String>,
    pub previous_intensity: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub comparison: Comparison,
    pub alert: Option<AlertEvent>,
}

async fn compare_countries(
    State(state): State<DashboardState>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<CompareResponse>, DashboardError> {
    count_request("compare");
    let x = state.country(&query.x)?;
    let y = state.country(&query.y)?;

    let averages = country_averages(&state.table);
    let thresholds = compute_thresholds_with(&averages, state.scoring.quantile_levels())?;
    let comparison = compare(
        &state.table,
        &x,
        &y,
        state.scoring.energy_per_task_kwh,
        &thresholds,
    )?;

    let previous = match (query.previous_cleaner, query.previous_intensity) {
        (Some(country), Some(intensity)) => Some(CleanerSnapshot { country, intensity }),
        _ => None,
    };
    let alert = cleaner_country_alert(previous.as_ref(), &comparison.cleaner);

    Ok(Json(CompareResponse { comparison, alert }))
}
