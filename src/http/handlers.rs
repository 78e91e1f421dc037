//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! operations in `crate::tools`.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};

use super::dto::{ApiResponse, HealthResponse};
use super::error::AppError;
use super::state::AppState;
use crate::analytics::AnalyticsResult;
use crate::domain::UserProfile;
use crate::storage::NutritionStorage;
use crate::tools::{
    self, AnalyticsParams, CreateProfileParams, DailyTotalsParams, DailyTotalsResponse,
    LogMealParams, LogMealResponse,
};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<ApiResponse<T>>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.storage.lock().await.ping() {
        Ok(()) => "connected".to_string(),
        Err(e) => {
            tracing::warn!("Health check could not reach database: {}", e);
            "unavailable".to_string()
        }
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    })
}

// =============================================================================
// Analytics
// =============================================================================

/// GET /api/analytics?userId=&period=&nutrient=
///
/// The storage lock is released before the computation runs.
pub async fn get_analytics(
    State(state): State<AppState>,
    query: Result<Query<AnalyticsParams>, QueryRejection>,
) -> HandlerResult<AnalyticsResult> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let request = params.validate()?;

    let (user, records) = {
        let storage = state.storage.lock().await;
        tools::load_analytics_input(&*storage, &request)?
    };

    let result = state
        .analytics
        .analyze(&user, request.period, &request.nutrient, &records);

    Ok(Json(ApiResponse::ok(result)))
}

// =============================================================================
// Profiles and meals
// =============================================================================

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateProfileParams>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), AppError> {
    let Json(params) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let profile = {
        let storage = state.storage.lock().await;
        tools::create_profile(&*storage, params)?
    };

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(profile))))
}

/// POST /api/meals
pub async fn log_meal(
    State(state): State<AppState>,
    body: Result<Json<LogMealParams>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<LogMealResponse>>), AppError> {
    let Json(params) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let response = {
        let storage = state.storage.lock().await;
        tools::log_meal(&*storage, params)?
    };

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(response))))
}

/// GET /api/daily?userId=&date=
pub async fn get_daily_totals(
    State(state): State<AppState>,
    query: Result<Query<DailyTotalsParams>, QueryRejection>,
) -> HandlerResult<DailyTotalsResponse> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let response = {
        let storage = state.storage.lock().await;
        tools::get_daily_totals(&*storage, params)?
    };

    Ok(Json(ApiResponse::ok(response)))
}
