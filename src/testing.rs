//! Test doubles: an in-memory record store with call counters, a cache that
//! always fails, and record builders.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::cache::{CacheError, CacheStore};
use crate::db::{RecordStore, StoreError};
use crate::domain::models::{CategoryScore, FeedbackRecord, InterviewRecord, InterviewScope};
use crate::state::{AppState, SharedState};

// ---------------------------------------------------------------------------
// MemoryRecordStore
// ---------------------------------------------------------------------------

/// Record store over plain vectors. Returns rows in insertion order, which is
/// deliberately not newest-first.
#[derive(Default)]
pub struct MemoryRecordStore {
    pub interviews: Vec<InterviewRecord>,
    pub feedback: Vec<FeedbackRecord>,
    pub interview_fetches: AtomicUsize,
    pub feedback_fetches: AtomicUsize,
    pub failing: AtomicBool,
}

impl MemoryRecordStore {
    pub fn new(interviews: Vec<InterviewRecord>, feedback: Vec<FeedbackRecord>) -> Self {
        Self {
            interviews,
            feedback,
            ..Default::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> usize {
        self.interview_fetches.load(Ordering::SeqCst) + self.feedback_fetches.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn interviews_for_user(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<InterviewRecord>, StoreError> {
        self.interview_fetches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self
            .interviews
            .iter()
            .filter(|i| i.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn feedback_for_user(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<FeedbackRecord>, StoreError> {
        self.feedback_fetches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self
            .feedback
            .iter()
            .filter(|f| f.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_interviews(
        &self,
        user_id: &str,
        scope: InterviewScope,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<InterviewRecord>, i64), StoreError> {
        self.interview_fetches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut matching: Vec<InterviewRecord> = self
            .interviews
            .iter()
            .filter(|i| match scope {
                InterviewScope::Own => i.user_id == user_id,
                InterviewScope::Latest => i.finalized && i.user_id != user_id,
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as i64;
        let page = matching.into_iter().skip(offset).take(limit).collect();
        Ok((page, total))
    }

    async fn feedback_for_interview(
        &self,
        interview_id: &str,
        user_id: &str,
    ) -> Result<Option<FeedbackRecord>, StoreError> {
        self.feedback_fetches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self
            .feedback
            .iter()
            .find(|f| f.interview_id == interview_id && f.user_id == user_id)
            .cloned())
    }
}

// ---------------------------------------------------------------------------
// FailingCache
// ---------------------------------------------------------------------------

/// Cache whose every operation fails as if Redis refused the connection.
pub struct FailingCache;

fn refused() -> CacheError {
    CacheError::Redis(redis::RedisError::from((
        redis::ErrorKind::IoError,
        "connection refused",
    )))
}

#[async_trait]
impl CacheStore for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(refused())
    }

    async fn set_ex(&self, _key: &str, _ttl_secs: u64, _value: String) -> Result<(), CacheError> {
        Err(refused())
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn interview(
    id: &str,
    user_id: &str,
    interview_type: &str,
    techstack: &[&str],
    created_at: DateTime<Utc>,
) -> InterviewRecord {
    InterviewRecord {
        id: id.to_string(),
        user_id: user_id.to_string(),
        role: "Software Engineer".to_string(),
        level: "Mid".to_string(),
        interview_type: interview_type.to_string(),
        techstack: techstack.iter().map(|t| t.to_string()).collect(),
        questions: vec!["Tell me about yourself".to_string()],
        created_at,
        finalized: true,
    }
}

pub fn feedback(
    id: &str,
    interview_id: &str,
    user_id: &str,
    total_score: i32,
    created_at: DateTime<Utc>,
) -> FeedbackRecord {
    FeedbackRecord {
        id: id.to_string(),
        interview_id: interview_id.to_string(),
        user_id: user_id.to_string(),
        total_score,
        category_scores: vec![CategoryScore {
            name: "Communication Skills".to_string(),
            score: total_score,
            comment: "Clear answers".to_string(),
        }],
        strengths: Vec::new(),
        areas_for_improvement: Vec::new(),
        final_assessment: "Solid performance".to_string(),
        created_at,
    }
}

pub fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

pub fn test_state(store: Arc<MemoryRecordStore>, cache: Arc<dyn CacheStore>) -> SharedState {
    Arc::new(AppState::new(
        store,
        cache,
        crate::analytics::performance::DEFAULT_BATCH_LIMIT,
    ))
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

pub async fn send(app: axum::Router, uri: &str) -> (axum::http::StatusCode, String) {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn get_json(app: axum::Router, uri: &str) -> (axum::http::StatusCode, serde_json::Value) {
    let (status, body) = send(app, uri).await;
    (status, serde_json::from_str(&body).unwrap())
}
