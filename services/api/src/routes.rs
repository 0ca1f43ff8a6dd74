use crate::infra::{deserialize_optional_date, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Local, NaiveDate, Utc};
use salary_health::error::AppError;
use salary_health::roster::RosterImporter;
use salary_health::{compose, DiagnosisResult, DiagnosticPolicy, EmployeeRecord};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use tracing::info;

/// Either `records` or `roster_csv` must be present, never both.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DiagnosisRequest {
    #[serde(default)]
    pub(crate) records: Option<Vec<EmployeeRecord>>,
    #[serde(default)]
    pub(crate) roster_csv: Option<String>,
    #[serde(default)]
    pub(crate) policy: Option<DiagnosticPolicy>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DiagnosisResponse {
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) source: RecordSource,
    pub(crate) result: DiagnosisResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum RecordSource {
    Records,
    RosterCsv,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/diagnosis", post(diagnosis_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn diagnosis_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<DiagnosisRequest>,
) -> Result<Json<DiagnosisResponse>, AppError> {
    diagnose(payload, &state.policy).map(Json)
}

fn diagnose(
    request: DiagnosisRequest,
    default_policy: &DiagnosticPolicy,
) -> Result<DiagnosisResponse, AppError> {
    let DiagnosisRequest {
        records,
        roster_csv,
        policy,
        as_of,
    } = request;

    let policy = match &policy {
        Some(policy) => {
            policy.validate()?;
            policy
        }
        None => default_policy,
    };

    let (records, source) = match (records, roster_csv) {
        (Some(records), None) => (records, RecordSource::Records),
        (None, Some(csv)) => {
            let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
            let records = RosterImporter::from_reader(Cursor::new(csv.into_bytes()), Some(as_of))?;
            (records, RecordSource::RosterCsv)
        }
        (Some(_), Some(_)) => {
            return Err(AppError::BadRequest(
                "provide either records or roster_csv, not both".to_string(),
            ))
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "records or roster_csv is required".to_string(),
            ))
        }
    };

    info!(?source, records = records.len(), "diagnosis requested");
    let result = compose(&records, policy);

    Ok(DiagnosisResponse {
        generated_at: Utc::now(),
        source,
        result,
    })
}
