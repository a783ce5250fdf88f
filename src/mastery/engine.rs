use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::MasteryParams;
use crate::mastery::difficulty::select_difficulty_adaptive;
use crate::mastery::priority::calculate_priority;
use crate::mastery::sm2::calculate_next_review;
use crate::types::{Assessment, Difficulty, DifficultyCurve, MasteryRecord, Topic, Trend};

const DEFAULT_EASINESS: f64 = 2.5;

/// A graded quiz (or diagnostic) outcome for one topic.
#[derive(Debug, Clone)]
pub struct QuizResult {
    pub user_id: Uuid,
    pub topic_id: Uuid,
    /// Percentage score, 0-100.
    pub score: f64,
    pub question_count: i64,
}

/// Ranked study recommendation for one topic, joined against its next
/// upcoming assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizedTopic {
    pub topic_id: Uuid,
    pub topic_name: String,
    pub course_id: Uuid,
    pub priority: f64,
    pub mastery: f64,
    pub trend: Trend,
    pub recommended_difficulty: Difficulty,
    pub assessment_name: String,
    pub days_until_exam: i64,
}

/// Read payload for one mastery record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterySummary {
    pub topic_id: Uuid,
    pub mastery_score: f64,
    pub confidence_interval: f64,
    pub trend: Trend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_practiced: Option<NaiveDateTime>,
    pub next_review_date: NaiveDate,
    pub practice_count: i64,
    pub quiz_count: i64,
}

impl From<&MasteryRecord> for MasterySummary {
    fn from(record: &MasteryRecord) -> Self {
        Self {
            topic_id: record.topic_id,
            mastery_score: record.mastery_score,
            confidence_interval: record.confidence_interval,
            trend: record.trend,
            last_practiced: record.last_practiced_at,
            next_review_date: record.next_review_date,
            practice_count: record.practice_count,
            quiz_count: record.quiz_count,
        }
    }
}

/// Aggregate statistics across a user's mastery records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryOverview {
    pub total_topics: i64,
    pub average_mastery: f64,
    pub mastered_count: i64,
    pub proficient_count: i64,
    pub learning_count: i64,
    pub needs_review: i64,
    pub total_practice_sessions: i64,
}

/// Buckets: mastered >= 90, proficient 70-90, learning 50-70, the rest need
/// review. An empty record set averages to zero.
pub fn mastery_overview(records: &[MasteryRecord]) -> MasteryOverview {
    let mut overview = MasteryOverview::default();
    let mut score_total = 0.0;
    for record in records {
        if record.mastery_score >= 90.0 {
            overview.mastered_count += 1;
        } else if record.mastery_score >= 70.0 {
            overview.proficient_count += 1;
        } else if record.mastery_score >= 50.0 {
            overview.learning_count += 1;
        } else {
            overview.needs_review += 1;
        }
        score_total += record.mastery_score;
        overview.total_practice_sessions += record.practice_count;
    }

    overview.total_topics = records.len() as i64;
    if !records.is_empty() {
        overview.average_mastery = score_total / records.len() as f64;
    }
    overview
}

/// Mastery estimation and study recommendation engine.
///
/// Pure over its inputs: callers pass the current record snapshot and the
/// wall-clock `now`, and get back the record value to persist.
#[derive(Debug, Clone, Default)]
pub struct MasteryEngine {
    params: MasteryParams,
}

impl MasteryEngine {
    pub fn new(params: MasteryParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &MasteryParams {
        &self.params
    }

    /// First record for a (user, topic) pair, seeded from a diagnostic quiz.
    /// Confidence starts wide and narrows with question count.
    pub fn initialize_mastery(&self, quiz: &QuizResult, now: NaiveDateTime) -> MasteryRecord {
        debug_assert!(
            (0.0..=100.0).contains(&quiz.score),
            "diagnostic score is a percentage"
        );
        debug_assert!(quiz.question_count >= 1, "a quiz has at least one question");

        let record = MasteryRecord {
            user_id: quiz.user_id,
            topic_id: quiz.topic_id,
            mastery_score: quiz.score,
            confidence_interval: self.confidence_for_question_count(quiz.question_count),
            trend: Trend::New,
            easiness_factor: DEFAULT_EASINESS,
            review_interval_days: 1,
            next_review_date: now.date() + Duration::days(1),
            last_practiced_at: Some(now),
            practice_count: 1,
            quiz_count: 0,
        };

        debug!(
            user_id = %record.user_id,
            topic_id = %record.topic_id,
            mastery = record.mastery_score,
            confidence = record.confidence_interval,
            "initialized mastery record"
        );
        record
    }

    /// EWMA mastery update from a fresh quiz result. Without an existing
    /// record this is a first diagnostic and delegates to initialization.
    ///
    /// High mastery (at or above the retention threshold) hands review
    /// scheduling to SM-2; low mastery forces a next-day review no matter
    /// what the interval history says.
    pub fn update_mastery_ewma(
        &self,
        existing: Option<&MasteryRecord>,
        quiz: &QuizResult,
        now: NaiveDateTime,
    ) -> MasteryRecord {
        let Some(existing) = existing else {
            return self.initialize_mastery(quiz, now);
        };
        debug_assert!(
            (0.0..=100.0).contains(&quiz.score),
            "quiz score is a percentage"
        );

        let p = &self.params;
        let old_mastery = existing.mastery_score;
        let new_mastery = p.ewma_alpha * quiz.score + (1.0 - p.ewma_alpha) * old_mastery;

        let mut record = existing.clone();
        record.confidence_interval =
            (existing.confidence_interval * p.confidence_decay).max(p.confidence_floor);
        record.trend = self.detect_trend(old_mastery, new_mastery);

        let today = now.date();
        if new_mastery >= p.retention_threshold {
            let quality = ((quiz.score / 100.0) * 5.0).floor() as u8;
            let review = calculate_next_review(
                existing.easiness_factor,
                existing.review_interval_days,
                quality,
            );
            record.review_interval_days = review.interval_days;
            record.easiness_factor = review.easiness_factor;
            record.next_review_date = today + Duration::days(review.interval_days);
        } else {
            record.review_interval_days = 1;
            record.next_review_date = today + Duration::days(1);
        }

        record.mastery_score = new_mastery;
        record.last_practiced_at = Some(now);
        record.quiz_count += 1;

        debug!(
            user_id = %record.user_id,
            topic_id = %record.topic_id,
            mastery = record.mastery_score,
            trend = record.trend.as_str(),
            next_review = %record.next_review_date,
            "updated mastery from quiz"
        );
        record
    }

    pub fn confidence_for_question_count(&self, question_count: i64) -> f64 {
        (self.params.confidence_base / (question_count as f64).sqrt())
            .max(self.params.confidence_floor)
    }

    pub fn detect_trend(&self, old_mastery: f64, new_mastery: f64) -> Trend {
        let delta = new_mastery - old_mastery;
        if delta > self.params.trend_threshold {
            Trend::Improving
        } else if delta < -self.params.trend_threshold {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }

    /// Rank every tracked topic by urgency against its earliest upcoming
    /// incomplete assessment. Topics without such an assessment (or missing
    /// from the topic snapshot) are silently left out. Keeps the top
    /// `horizon_days * topics_per_horizon_day` entries.
    pub fn get_prioritized_topics(
        &self,
        records: &[MasteryRecord],
        topics: &[Topic],
        assessments: &[Assessment],
        curve: DifficultyCurve,
        horizon_days: i64,
        now: NaiveDateTime,
    ) -> Vec<PrioritizedTopic> {
        let topic_map: HashMap<Uuid, &Topic> = topics.iter().map(|t| (t.id, t)).collect();
        let today = now.date();

        let mut prioritized: Vec<PrioritizedTopic> = Vec::new();
        for record in records {
            let Some(topic) = topic_map.get(&record.topic_id) else {
                continue;
            };

            let next_assessment = assessments
                .iter()
                .filter(|a| {
                    !a.is_completed && a.due_date >= now && a.topic_ids.contains(&record.topic_id)
                })
                .min_by_key(|a| a.due_date);
            let Some(assessment) = next_assessment else {
                continue;
            };

            let priority = calculate_priority(
                assessment.weight_percent,
                record.mastery_score,
                record.confidence_interval,
                assessment.due_date.date(),
                record.last_practiced_at.map(|at| at.date()),
                today,
                self.params.default_recency_days,
            );

            let days_until_exam = (assessment.due_date.date() - today).num_days();
            let recommended_difficulty = select_difficulty_adaptive(
                record.mastery_score,
                record.trend,
                days_until_exam,
                curve,
            );

            prioritized.push(PrioritizedTopic {
                topic_id: record.topic_id,
                topic_name: topic.name.clone(),
                course_id: topic.course_id,
                priority,
                mastery: record.mastery_score,
                trend: record.trend,
                recommended_difficulty,
                assessment_name: assessment.name.clone(),
                days_until_exam,
            });
        }

        prioritized.sort_by(|a, b| {
            b.priority
                .partial_cmp(&a.priority)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let keep = horizon_days.max(0) as usize * self.params.topics_per_horizon_day;
        prioritized.truncate(keep);
        prioritized
    }
}
