pub mod feedback;
pub mod interviews;
pub mod stats;

use crate::state::SharedState;
use axum::{routing::get, Router};

async fn health() -> &'static str {
    "OK"
}

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(stats::router(state.clone()))
        .merge(interviews::router(state.clone()))
        .merge(feedback::router(state))
}

/// Query string as raw pairs. A repeated key resolves to its first value, so
/// `?userId=a&userId=b` reads as `a` instead of failing extraction.
type QueryPairs = Vec<(String, String)>;

fn first<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Treats a query value as present only when it is non-empty.
fn required(params: &[(String, String)], name: &str) -> Option<String> {
    first(params, name)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn is_refresh(value: Option<&str>) -> bool {
    value == Some("true")
}
