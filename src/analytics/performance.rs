use crate::db::{RecordStore, StoreError};
use crate::domain::models::{
    FeedbackRecord, InterviewRecord, MonthlyProgress, PerformanceSnapshot, RecentScore,
    TechStackStat, WeeklyProgress,
};
use crate::time_utils;
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Records fetched per collection. Statistics are computed over the newest
/// `DEFAULT_BATCH_LIMIT` interviews and feedback entries, not the full history.
pub const DEFAULT_BATCH_LIMIT: usize = 50;

const RECENT_SCORES: usize = 10;
const TOP_LABELS: usize = 5;
const IMPROVEMENT_WINDOW: usize = 5;
const WEEKS_TRACKED: i64 = 8;
const MONTHS_TRACKED: i32 = 6;

#[derive(Clone)]
pub struct StatsAggregator {
    store: Arc<dyn RecordStore>,
    batch_limit: usize,
}

impl StatsAggregator {
    pub fn new(store: Arc<dyn RecordStore>, batch_limit: usize) -> Self {
        Self {
            store,
            batch_limit: batch_limit.max(1),
        }
    }

    /// Fetches the user's records and derives their performance snapshot.
    /// Store failures propagate unchanged; nothing is retried.
    pub async fn compute_stats(&self, user_id: &str) -> Result<PerformanceSnapshot, StoreError> {
        let interviews = self.store.interviews_for_user(user_id, self.batch_limit).await?;
        if interviews.is_empty() {
            return Ok(PerformanceSnapshot::default());
        }

        let feedback = self.store.feedback_for_user(user_id, self.batch_limit).await?;
        tracing::debug!(
            "Computing stats for {} over {} interviews and {} feedback entries",
            user_id,
            interviews.len(),
            feedback.len()
        );

        Ok(build_snapshot(interviews, feedback, Utc::now()))
    }
}

/// Derives every snapshot field from one user's records, evaluated at `now`.
pub fn build_snapshot(
    mut interviews: Vec<InterviewRecord>,
    mut feedback: Vec<FeedbackRecord>,
    now: DateTime<Utc>,
) -> PerformanceSnapshot {
    if interviews.is_empty() {
        return PerformanceSnapshot::default();
    }

    interviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    feedback.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let week_ago = now - Duration::days(7);
    let month_ago = now - Duration::days(30);

    PerformanceSnapshot {
        total_interviews: interviews.len(),
        completed_interviews: feedback.len(),
        average_score: mean_score(feedback.iter()),
        best_score: feedback.iter().map(|f| f.total_score).max().unwrap_or(0),
        interviews_this_week: interviews.iter().filter(|i| i.created_at >= week_ago).count(),
        interviews_this_month: interviews.iter().filter(|i| i.created_at >= month_ago).count(),
        improvement_rate: improvement_rate(&feedback),
        category_averages: category_averages(&feedback),
        recent_scores: feedback
            .iter()
            .take(RECENT_SCORES)
            .map(|f| RecentScore {
                score: f.total_score,
                date: f.created_at,
                interview_id: f.interview_id.clone(),
            })
            .collect(),
        strengths: top_labels(feedback.iter().flat_map(|f| f.strengths.iter())),
        areas_for_improvement: top_labels(
            feedback.iter().flat_map(|f| f.areas_for_improvement.iter()),
        ),
        interview_types: interview_types(&interviews),
        tech_stack_performance: tech_stack_performance(&interviews, &feedback),
        weekly_progress: weekly_progress(&interviews, &feedback, now),
        monthly_progress: monthly_progress(&interviews, &feedback, now),
    }
}

/// Rounds halves towards positive infinity: 67.5 -> 68, -45.5 -> -45.
fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

fn mean(scores: impl Iterator<Item = i32>) -> Option<f64> {
    let (sum, count) = scores.fold((0i64, 0usize), |(sum, count), score| {
        (sum + score as i64, count + 1)
    });
    (count > 0).then(|| sum as f64 / count as f64)
}

fn mean_score<'a>(feedback: impl Iterator<Item = &'a FeedbackRecord>) -> i32 {
    mean(feedback.map(|f| f.total_score))
        .map(round_half_up)
        .unwrap_or(0)
}

/// Relative change between the newest five scores and the five before them.
/// Expects `feedback` newest-first.
fn improvement_rate(feedback: &[FeedbackRecord]) -> i32 {
    if feedback.len() < IMPROVEMENT_WINDOW * 2 {
        return 0;
    }

    let window = |range: std::ops::Range<usize>| {
        mean(feedback[range].iter().map(|f| f.total_score)).unwrap_or(0.0)
    };
    let recent = window(0..IMPROVEMENT_WINDOW);
    let previous = window(IMPROVEMENT_WINDOW..IMPROVEMENT_WINDOW * 2);
    if previous == 0.0 {
        return 0;
    }

    round_half_up((recent - previous) / previous * 100.0)
}

fn category_averages(feedback: &[FeedbackRecord]) -> BTreeMap<String, i32> {
    let mut totals: BTreeMap<&str, (i64, i64)> = BTreeMap::new();
    for category in feedback.iter().flat_map(|f| f.category_scores.iter()) {
        let entry = totals.entry(category.name.as_str()).or_default();
        entry.0 += category.score as i64;
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(name, (sum, count))| (name.to_string(), round_half_up(sum as f64 / count as f64)))
        .collect()
}

/// Most frequent labels, highest count first; equal counts sort by label.
fn top_labels<'a>(labels: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(TOP_LABELS)
        .map(|(label, _)| label.to_string())
        .collect()
}

fn interview_types(interviews: &[InterviewRecord]) -> BTreeMap<String, usize> {
    let mut types = BTreeMap::new();
    for interview in interviews {
        *types.entry(interview.interview_type.clone()).or_insert(0) += 1;
    }
    types
}

fn tech_stack_performance(
    interviews: &[InterviewRecord],
    feedback: &[FeedbackRecord],
) -> BTreeMap<String, TechStackStat> {
    let mut by_tech: BTreeMap<&str, (usize, HashSet<&str>)> = BTreeMap::new();
    for interview in interviews {
        for tech in &interview.techstack {
            let entry = by_tech.entry(tech.as_str()).or_default();
            entry.0 += 1;
            entry.1.insert(interview.id.as_str());
        }
    }

    by_tech
        .into_iter()
        .map(|(tech, (count, interview_ids))| {
            let avg_score = mean_score(
                feedback
                    .iter()
                    .filter(|f| interview_ids.contains(f.interview_id.as_str())),
            );
            (tech.to_string(), TechStackStat { count, avg_score })
        })
        .collect()
}

fn window_counts(
    interviews: &[InterviewRecord],
    feedback: &[FeedbackRecord],
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
) -> (usize, i32) {
    let in_window = |at: &DateTime<Utc>| *at >= start && end.map_or(true, |end| *at < end);
    let count = interviews.iter().filter(|i| in_window(&i.created_at)).count();
    let average = mean_score(feedback.iter().filter(|f| in_window(&f.created_at)));
    (count, average)
}

/// Eight consecutive seven-day windows, oldest first. The newest window starts
/// a week before `now` and is open-ended, so records stamped at or after `now`
/// land in it just as they count towards `interviews_this_week`.
fn weekly_progress(
    interviews: &[InterviewRecord],
    feedback: &[FeedbackRecord],
    now: DateTime<Utc>,
) -> Vec<WeeklyProgress> {
    (0..WEEKS_TRACKED)
        .rev()
        .map(|weeks_back| {
            let end = now - Duration::weeks(weeks_back);
            let start = end - Duration::weeks(1);
            let end = (weeks_back > 0).then_some(end);
            let (interviews, average_score) = window_counts(interviews, feedback, start, end);
            WeeklyProgress {
                week: start.date_naive(),
                interviews,
                average_score,
            }
        })
        .collect()
}

/// The current calendar month and the five before it, oldest first.
fn monthly_progress(
    interviews: &[InterviewRecord],
    feedback: &[FeedbackRecord],
    now: DateTime<Utc>,
) -> Vec<MonthlyProgress> {
    let current = time_utils::month_start(now);

    (0..MONTHS_TRACKED)
        .rev()
        .filter_map(|months_back| {
            let start = time_utils::add_months(current, -months_back)?;
            let end = time_utils::add_months(start, 1)?;
            let (interviews, average_score) = window_counts(
                interviews,
                feedback,
                time_utils::start_of_day(start),
                Some(time_utils::start_of_day(end)),
            );
            Some(MonthlyProgress {
                month: start.format("%Y-%m").to_string(),
                interviews,
                average_score,
            })
        })
        .collect()
}
