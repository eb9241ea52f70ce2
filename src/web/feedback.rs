use crate::cache::{self, CacheTtl};
use crate::domain::models::FeedbackRecord;
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
        .route("/api/feedback", get(feedback_for_interview))
        .with_state(state)
}

async fn feedback_for_interview(
    State(state): State<SharedState>,
    Query(params): Query<QueryPairs>,
) -> Result<Json<FeedbackRecord>, ApiError> {
    let (Some(interview_id), Some(user_id)) =
        (required(&params, "interviewId"), required(&params, "userId"))
    else {
        return Err(ApiError::BadRequest("Interview ID and User ID are required"));
    };
    let key = cache::cache_key("feedback", &[interview_id.as_str(), user_id.as_str()]);

    // Misses surface as NotFound so that absent feedback is never cached
    let feedback = cache::read_through(
        state.cache.as_ref(),
        &key,
        CacheTtl::FEEDBACK,
        is_refresh(first(&params, "refresh")),
        || async {
            state
                .store
                .feedback_for_interview(&interview_id, &user_id)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to fetch feedback for interview {} (user {}): {}",
                        interview_id,
                        user_id,
                        e
                    );
                    ApiError::Internal("Failed to fetch feedback")
                })
                .and_then(|found| found.ok_or(ApiError::NotFound("Feedback not found")))
        },
    )
    .await?;

    Ok(Json(feedback))
}
