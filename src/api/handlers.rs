use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{
        AnalyticsSummary, BackendInfo, BackendVariant, RecommendationResult, TrackEventRequest,
        TrainingReport,
    },
    services::training::TrainingConfig,
};

use super::AppState;

/// Event type recorded for every served recommendation
pub const RECOMMENDATION_SERVED: &str = "recommendation_served";

// Response types

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: RecommendationResult,
}

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub success: bool,
    pub model_info: BackendInfo,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub success: bool,
    pub variant_name: BackendVariant,
}

#[derive(Debug, Serialize)]
pub struct TrainResponse {
    pub success: bool,
    pub message: String,
    pub report: TrainingReport,
    pub model_info: BackendInfo,
}

#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub summary: AnalyticsSummary,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Recommend learning resources for a student
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<RecommendResponse>> {
    let Json(body) = payload.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;

    let result = state.engine.recommend(&body).map_err(|e| {
        tracing::info!(request_id = %request_id, error = %e, "Rejected recommendation request");
        e
    })?;

    tracing::info!(
        request_id = %request_id,
        predicted = ?result.predicted_categories,
        recommendation_count = result.recommendations.len(),
        "Recommendation served"
    );

    state.analytics.track(served_event(&body, &result)).await;

    Ok(Json(RecommendResponse {
        success: true,
        result,
    }))
}

/// Describe the active scoring backend
pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    Json(ModelInfoResponse {
        success: true,
        model_info: state.engine.describe_backend(),
    })
}

/// Re-run the backend fallback chain and publish the result
pub async fn reload(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<ReloadResponse>> {
    tracing::info!(request_id = %request_id, "Reloading scoring backend");

    let engine = state.engine.clone();
    let outcome = tokio::task::spawn_blocking(move || engine.reload())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(ReloadResponse {
        success: true,
        variant_name: outcome.variant_name,
    }))
}

/// Fit a new model on synthetic data, persist it and reload
pub async fn train_model(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<TrainResponse>> {
    tracing::info!(request_id = %request_id, "Training model");

    let engine = state.engine.clone();
    let report = tokio::task::spawn_blocking(move || engine.train(&TrainingConfig::default()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    tracing::info!(
        request_id = %request_id,
        accuracy = report.holdout_accuracy,
        variant = report.variant_name.name(),
        "Model training completed"
    );

    Ok(Json(TrainResponse {
        success: true,
        message: format!(
            "Model trained with holdout accuracy {:.2}",
            report.holdout_accuracy
        ),
        report,
        model_info: state.engine.describe_backend(),
    }))
}

/// Record a client-side analytics event
pub async fn track_analytics(
    State(state): State<AppState>,
    payload: Result<Json<TrackEventRequest>, JsonRejection>,
) -> AppResult<Json<TrackResponse>> {
    let Json(event) = payload.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;
    state.analytics.track(event).await;

    Ok(Json(TrackResponse {
        success: true,
        message: "Analytics tracked successfully",
    }))
}

/// Summarize recorded analytics
pub async fn analytics_summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        success: true,
        summary: state.analytics.summary().await,
    })
}

fn served_event(body: &Value, result: &RecommendationResult) -> TrackEventRequest {
    let mut recommendation_data = Map::new();
    if let Some(top) = result.predicted_categories.first() {
        recommendation_data.insert("category".to_string(), json!(top));
    }
    recommendation_data.insert(
        "predicted_categories".to_string(),
        json!(result.predicted_categories),
    );
    recommendation_data.insert(
        "recommendation_count".to_string(),
        json!(result.recommendations.len()),
    );

    TrackEventRequest {
        event_type: Some(RECOMMENDATION_SERVED.to_string()),
        user_data: body.as_object().cloned().unwrap_or_default(),
        recommendation_data,
    }
}
