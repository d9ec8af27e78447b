//! Axum route handlers for the Prediction API.
//!
//! The handlers are the presentation seam: each HTTP call constructs a
//! fresh `PredictionRequest` and drives its state machine. Hitting
//! `POST /api/v1/predictions` is the explicit "predict now" trigger —
//! validate-only and insight reads never invoke the scorer.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::prediction::export::{render_csv, report_filename};
use crate::prediction::insights::Insight;
use crate::prediction::orchestrator::{PredictionRecord, PredictionRequest, RequestState};
use crate::prediction::validation::Violation;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub request_id: Uuid,
    pub state: RequestState,
    pub is_valid: bool,
    pub violations: Vec<Violation>,
    /// Present only when the profile validated cleanly.
    pub insights: Vec<Insight>,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub profile: Profile,
    /// Display currency; must be a key of the currency table. Defaults to
    /// the model's native currency when omitted.
    pub currency_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub state: RequestState,
    #[serde(flatten)]
    pub record: PredictionRecord,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub records: Vec<PredictionRecord>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/predictions/validate
///
/// Runs `Received → Validated | Rejected` only. Returns the collected
/// violations, plus insights when the profile is clean. Never triggers
/// prediction — a caller may re-validate indefinitely while editing.
pub async fn handle_validate(
    Json(req): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, AppError> {
    let mut request = PredictionRequest::new(req.profile);
    let validation = request.validate();

    let insights = if validation.is_valid {
        request.insights()?
    } else {
        Vec::new()
    };

    Ok(Json(ValidateResponse {
        request_id: request.id(),
        state: request.state(),
        is_valid: validation.is_valid,
        violations: validation.violations,
        insights,
    }))
}

/// POST /api/v1/predictions
///
/// The explicit trigger: full validate → predict → derive pipeline.
/// A rejected profile answers 422 with the violation list and the scorer
/// is never invoked; scoring/derivation failures surface as structured
/// errors with no record retained.
pub async fn handle_predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, AppError> {
    let currency_code = req
        .currency_code
        .unwrap_or_else(|| state.native_currency.clone());

    let mut request = PredictionRequest::new(req.profile);
    let validation = request.validate();
    if !validation.is_valid {
        let payload = serde_json::to_string(&validation.violations).unwrap_or_default();
        return Err(AppError::UnprocessableEntity(payload));
    }

    let record = request
        .predict(
            state.scorer.as_ref(),
            &state.currencies,
            &state.benchmarks,
            &currency_code,
        )
        .await?;

    Ok(Json(PredictResponse {
        state: request.state(),
        record,
    }))
}

/// POST /api/v1/predictions/report
///
/// Renders completed prediction records as the CSV download artifact.
/// Only completed records exist client-side (a failed request never
/// produces one), so the body is simply the records to flatten.
///
/// With no server-side persistence the records are client-attested: this
/// endpoint formats what it is given and does not re-verify that each
/// record came from a completed request on this server.
pub async fn handle_report(Json(req): Json<ReportRequest>) -> Result<Response, AppError> {
    if req.records.is_empty() {
        return Err(AppError::Validation(
            "At least one completed prediction record is required".to_string(),
        ));
    }

    let csv = render_csv(&req.records)?;
    let filename = report_filename(Utc::now());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
