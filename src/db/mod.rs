use crate::domain::models::{CategoryScore, FeedbackRecord, InterviewRecord, InterviewScope};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read access to interview and feedback records.
///
/// Implementations are free to return rows in any order; callers that need
/// newest-first ordering sort on their side.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn interviews_for_user(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<InterviewRecord>, StoreError>;

    async fn feedback_for_user(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<FeedbackRecord>, StoreError>;

    /// One page of interviews plus the total number matching the scope.
    async fn list_interviews(
        &self,
        user_id: &str,
        scope: InterviewScope,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<InterviewRecord>, i64), StoreError>;

    async fn feedback_for_interview(
        &self,
        interview_id: &str,
        user_id: &str,
    ) -> Result<Option<FeedbackRecord>, StoreError>;
}

#[derive(Debug, FromRow)]
struct FeedbackRow {
    id: String,
    interview_id: String,
    user_id: String,
    total_score: i32,
    category_scores: Json<Vec<CategoryScore>>,
    strengths: Vec<String>,
    areas_for_improvement: Vec<String>,
    final_assessment: String,
    created_at: DateTime<Utc>,
}

impl From<FeedbackRow> for FeedbackRecord {
    fn from(row: FeedbackRow) -> Self {
        FeedbackRecord {
            id: row.id,
            interview_id: row.interview_id,
            user_id: row.user_id,
            total_score: row.total_score,
            category_scores: row.category_scores.0,
            strengths: row.strengths,
            areas_for_improvement: row.areas_for_improvement,
            final_assessment: row.final_assessment,
            created_at: row.created_at,
        }
    }
}

const INTERVIEW_COLUMNS: &str =
    "id, user_id, role, level, type, techstack, questions, created_at, finalized";

const FEEDBACK_COLUMNS: &str = "id, interview_id, user_id, total_score, category_scores, \
     strengths, areas_for_improvement, final_assessment, created_at";

/// PostgreSQL-backed record store.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn interviews_for_user(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<InterviewRecord>, StoreError> {
        let interviews = sqlx::query_as::<_, InterviewRecord>(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews \
             WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(interviews)
    }

    async fn feedback_for_user(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<FeedbackRecord>, StoreError> {
        let rows = sqlx::query_as::<_, FeedbackRow>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback \
             WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(FeedbackRecord::from).collect())
    }

    async fn list_interviews(
        &self,
        user_id: &str,
        scope: InterviewScope,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<InterviewRecord>, i64), StoreError> {
        let filter = match scope {
            InterviewScope::Own => "user_id = $1",
            InterviewScope::Latest => "finalized = true AND user_id <> $1",
        };

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM interviews WHERE {filter}"))
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        let interviews = sqlx::query_as::<_, InterviewRecord>(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews WHERE {filter} \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok((interviews, total))
    }

    async fn feedback_for_interview(
        &self,
        interview_id: &str,
        user_id: &str,
    ) -> Result<Option<FeedbackRecord>, StoreError> {
        let row = sqlx::query_as::<_, FeedbackRow>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback \
             WHERE interview_id = $1 AND user_id = $2 LIMIT 1"
        ))
        .bind(interview_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(FeedbackRecord::from))
    }
}
