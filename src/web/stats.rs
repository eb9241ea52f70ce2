use crate::domain::models::PerformanceSnapshot;
use crate::error::ApiError;
use crate::state::SharedState;
use crate::web::{first, is_refresh, required, QueryPairs};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/user/stats", get(user_stats))
        .with_state(state)
}

async fn user_stats(
    State(state): State<SharedState>,
    Query(params): Query<QueryPairs>,
) -> Result<Json<PerformanceSnapshot>, ApiError> {
    let user_id = required(&params, "userId").ok_or(ApiError::BadRequest("User ID is required"))?;
    let force_refresh = is_refresh(first(&params, "refresh"));

    let snapshot = state
        .stats
        .get_or_compute(&user_id, force_refresh)
        .await
        .map_err(|e| {
            tracing::error!("Failed to compute stats for user {}: {}", user_id, e);
            ApiError::Internal("Failed to fetch user statistics")
        })?;

    Ok(Json(snapshot))
}
