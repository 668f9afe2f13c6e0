use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/predictions", prediction_routes())
        .nest("/api/analytics", analytics_routes())
        .with_state(state)
        // outermost first: the request ID must exist before the trace span is made
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// Recommendation and backend administration routes under /api/predictions
fn prediction_routes() -> Router<AppState> {
    Router::new()
        .route("/recommend", post(handlers::recommend))
        .route("/model_info", get(handlers::model_info))
        .route("/reload", post(handlers::reload))
        .route("/train_model", post(handlers::train_model))
}

/// Analytics routes under /api/analytics
fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/track", post(handlers::track_analytics))
        .route("/summary", get(handlers::analytics_summary))
}
