use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;

/// One generated interview session, owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRecord {
    pub id: String,
    pub user_id: String,
    pub role: String,
    pub level: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub interview_type: String,
    pub techstack: Vec<String>,
    pub questions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub finalized: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub name: String,
    pub score: i32,
    pub comment: String,
}

/// Scored evaluation of a completed interview. At most one per (interview, user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub id: String,
    pub interview_id: String,
    pub user_id: String,
    pub total_score: i32,
    pub category_scores: Vec<CategoryScore>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub final_assessment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentScore {
    pub score: i32,
    pub date: DateTime<Utc>,
    pub interview_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechStackStat {
    pub count: usize,
    pub avg_score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyProgress {
    pub week: NaiveDate,
    pub interviews: usize,
    pub average_score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProgress {
    pub month: String,
    pub interviews: usize,
    pub average_score: i32,
}

/// Derived statistics for one user at one instant.
///
/// The `Default` value is the canonical empty snapshot returned for users
/// without interviews. Maps are ordered so that a snapshot serializes to the
/// same bytes after a trip through the cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSnapshot {
    pub total_interviews: usize,
    pub completed_interviews: usize,
    pub average_score: i32,
    pub best_score: i32,
    pub interviews_this_week: usize,
    pub interviews_this_month: usize,
    pub improvement_rate: i32,
    pub category_averages: BTreeMap<String, i32>,
    pub recent_scores: Vec<RecentScore>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub interview_types: BTreeMap<String, usize>,
    pub tech_stack_performance: BTreeMap<String, TechStackStat>,
    pub weekly_progress: Vec<WeeklyProgress>,
    pub monthly_progress: Vec<MonthlyProgress>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewScope {
    /// Interviews owned by the requesting user.
    Own,
    /// Finalized interviews created by anyone else.
    Latest,
}

impl InterviewScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewScope::Own => "user",
            InterviewScope::Latest => "latest",
        }
    }
}

impl From<&str> for InterviewScope {
    fn from(value: &str) -> Self {
        match value.trim() {
            "" | "user" => InterviewScope::Own,
            _ => InterviewScope::Latest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewPage {
    pub interviews: Vec<InterviewRecord>,
    pub total: i64,
    pub has_more: bool,
    pub page: u32,
    pub limit: u32,
}
