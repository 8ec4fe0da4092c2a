use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use hecvat_assess::assessment::{AssessmentSnapshot, AssessmentSummary, DeltaReport};
use hecvat_assess::catalog::QuestionId;
use hecvat_assess::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryRequest {
    pub(crate) assessment: AssessmentSnapshot,
    #[serde(default)]
    pub(crate) compare: Option<AssessmentSnapshot>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeltaRequest {
    pub(crate) before: AssessmentSnapshot,
    pub(crate) after: AssessmentSnapshot,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClassifyRequest {
    pub(crate) ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClassifiedQuestion {
    pub(crate) id: String,
    pub(crate) category: String,
    pub(crate) repo_assessable: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClassifyResponse {
    pub(crate) questions: Vec<ClassifiedQuestion>,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/assessments/summary", post(summary_endpoint))
        .route("/api/v1/assessments/delta", post(delta_endpoint))
        .route("/api/v1/questions/classify", post(classify_endpoint))
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

pub(crate) async fn summary_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<SummaryRequest>,
) -> Json<AssessmentSummary> {
    let SummaryRequest {
        assessment,
        compare,
    } = payload;

    debug!(answers = assessment.answers.len(), "summarizing assessment");
    Json(AssessmentSummary::build(
        &assessment,
        &state.weights,
        compare.as_ref(),
    ))
}

pub(crate) async fn delta_endpoint(Json(payload): Json<DeltaRequest>) -> Json<DeltaReport> {
    Json(DeltaReport::build(&payload.before, &payload.after))
}

pub(crate) async fn classify_endpoint(
    Json(payload): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, AppError> {
    let questions = payload
        .ids
        .iter()
        .map(|raw| -> Result<ClassifiedQuestion, AppError> {
            let id = QuestionId::parse(raw)?;
            let classification = id.classification();
            Ok(ClassifiedQuestion {
                id: id.to_string(),
                category: classification.category,
                repo_assessable: classification.repo_assessable,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ClassifyResponse { questions }))
}
