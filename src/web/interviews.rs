use crate::cache::{self, CacheTtl};
use crate::domain::models::{InterviewPage, InterviewScope};
use crate::error::ApiError;
use crate::state::SharedState;
use crate::web::{first, is_refresh, required, QueryPairs};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 50;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/interviews", get(list_interviews))
        .with_state(state)
}

/// Lenient numeric query parsing: anything unparsable falls back to `default`.
fn parse_or(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

async fn list_interviews(
    State(state): State<SharedState>,
    Query(params): Query<QueryPairs>,
) -> Result<Json<InterviewPage>, ApiError> {
    let user_id = required(&params, "userId").ok_or(ApiError::BadRequest("User ID is required"))?;
    let page = parse_or(first(&params, "page"), 1).max(1);
    let limit = parse_or(first(&params, "limit"), DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let scope = InterviewScope::from(first(&params, "type").unwrap_or("user"));
    let force_refresh = is_refresh(first(&params, "refresh"));

    let (page_part, limit_part) = (page.to_string(), limit.to_string());
    let key = cache::cache_key(
        "interviews",
        &[user_id.as_str(), scope.as_str(), page_part.as_str(), limit_part.as_str()],
    );
    let offset = (page - 1) as usize * limit as usize;

    let result = cache::read_through(
        state.cache.as_ref(),
        &key,
        CacheTtl::INTERVIEW_LIST,
        force_refresh,
        || async {
            let (interviews, total) = state
                .store
                .list_interviews(&user_id, scope, offset, limit as usize)
                .await?;
            Ok::<_, crate::db::StoreError>(InterviewPage {
                interviews,
                total,
                has_more: ((offset + limit as usize) as i64) < total,
                page,
                limit,
            })
        },
    )
    .await
    .map_err(|e| {
        tracing::error!("Failed to list interviews for user {}: {}", user_id, e);
        ApiError::Internal("Failed to fetch interviews")
    })?;

    Ok(Json(result))
}
