use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::PlannerConfig;
use crate::mastery::MasteryEngine;
use crate::schedule::availability::free_blocks;
use crate::schedule::greedy::{schedule_tasks_greedy, PlacementOutcome};
use crate::schedule::persistence::{PlanWindow, ScheduleStore, StoreError};
use crate::schedule::tasks::generate_tasks;
use crate::types::{PlannerSnapshot, StudyTask};

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid planning window: {start} is after {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Scheduled hours and task count for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayLoad {
    pub hours: f64,
    pub blocks: usize,
}

/// Outcome of one generation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub scheduled: Vec<StudyTask>,
    pub unscheduled_count: usize,
    pub total_hours: f64,
    pub daily_breakdown: BTreeMap<NaiveDate, DayLoad>,
}

/// A [`ScheduleResult`] plus what caused the replan and when it ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplanResult {
    pub trigger: String,
    pub replanned_at: NaiveDateTime,
    #[serde(flatten)]
    pub result: ScheduleResult,
}

/// Composes prioritization, task generation, availability tiling, and greedy
/// placement. The only component that issues writes, through the store it is
/// handed; everything upstream is pure over the snapshot.
#[derive(Debug, Clone)]
pub struct ScheduleOrchestrator {
    config: PlannerConfig,
    engine: MasteryEngine,
}

impl ScheduleOrchestrator {
    pub fn new(config: PlannerConfig) -> Self {
        let engine = MasteryEngine::new(config.mastery.clone());
        Self { config, engine }
    }

    pub fn engine(&self) -> &MasteryEngine {
        &self.engine
    }

    /// Build and persist a schedule for `[start_date, end_date]` (inclusive).
    pub fn generate_schedule<S: ScheduleStore>(
        &self,
        snapshot: &PlannerSnapshot,
        store: &mut S,
        start_date: NaiveDate,
        end_date: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<ScheduleResult, ScheduleError> {
        if start_date > end_date {
            return Err(ScheduleError::InvalidWindow {
                start: start_date,
                end: end_date,
            });
        }

        let outcome = self.place_window(snapshot, start_date, end_date, now);
        store.insert_tasks(&outcome.scheduled)?;

        let result = summarize(outcome);
        info!(
            user_id = %snapshot.user_id,
            start = %start_date,
            end = %end_date,
            scheduled = result.scheduled.len(),
            unscheduled = result.unscheduled_count,
            total_hours = result.total_hours,
            "generated schedule"
        );
        Ok(result)
    }

    /// Rebuild the fixed horizon from today. The stale-task delete and the
    /// fresh insert reach the store as one atomic operation; tasks already
    /// in progress or finished are left alone.
    pub fn replan_schedule<S: ScheduleStore>(
        &self,
        snapshot: &PlannerSnapshot,
        store: &mut S,
        trigger: &str,
        now: NaiveDateTime,
    ) -> Result<ReplanResult, ScheduleError> {
        let today = now.date();
        let window = PlanWindow {
            start: today,
            end: today + Duration::days(self.config.scheduler.planning_horizon_days),
        };

        let outcome = self.place_window(snapshot, window.start, window.end, now);
        store.replace_window(snapshot.user_id, window, &outcome.scheduled)?;

        let result = summarize(outcome);
        info!(
            user_id = %snapshot.user_id,
            trigger,
            start = %window.start,
            end = %window.end,
            scheduled = result.scheduled.len(),
            "replanned schedule"
        );
        Ok(ReplanResult {
            trigger: trigger.to_string(),
            replanned_at: now,
            result,
        })
    }

    /// Pure planning pass over the snapshot; no writes.
    fn place_window(
        &self,
        snapshot: &PlannerSnapshot,
        start_date: NaiveDate,
        end_date: NaiveDate,
        now: NaiveDateTime,
    ) -> PlacementOutcome {
        let prioritized = self.engine.get_prioritized_topics(
            &snapshot.mastery,
            &snapshot.topics,
            &snapshot.assessments,
            snapshot.preferences.difficulty_curve,
            self.config.scheduler.planning_horizon_days,
            now,
        );
        let candidates = generate_tasks(
            snapshot.user_id,
            &prioritized,
            &snapshot.courses,
            &snapshot.assessments,
            start_date,
            end_date,
            self.config.scheduler.review_fallback_minutes,
        );
        let blocks = free_blocks(&snapshot.preferences, &snapshot.busy, start_date, end_date);
        schedule_tasks_greedy(candidates, blocks, snapshot.preferences.max_hours_per_day)
    }
}

fn summarize(outcome: PlacementOutcome) -> ScheduleResult {
    let mut daily_breakdown: BTreeMap<NaiveDate, DayLoad> = BTreeMap::new();
    let mut total_minutes: i64 = 0;
    for task in &outcome.scheduled {
        debug_assert!(task.scheduled_start.is_some(), "scheduled tasks carry a start");
        let Some(start) = task.scheduled_start else {
            continue;
        };
        let load = daily_breakdown.entry(start.date()).or_default();
        load.hours += task.estimated_duration_min as f64 / 60.0;
        load.blocks += 1;
        total_minutes += task.estimated_duration_min;
    }

    ScheduleResult {
        unscheduled_count: outcome.unscheduled.len(),
        total_hours: total_minutes as f64 / 60.0,
        daily_breakdown,
        scheduled: outcome.scheduled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::persistence::MemoryScheduleStore;
    use crate::types::{
        Assessment, AssessmentKind, Course, MasteryRecord, Topic, Trend, UserPreferences,
    };
    use uuid::Uuid;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn snapshot() -> PlannerSnapshot {
        let user_id = Uuid::new_v4();
        let course = Course {
            id: Uuid::new_v4(),
            name: "Calculus II".to_string(),
            is_archived: false,
        };
        let topic = Topic {
            id: Uuid::new_v4(),
            course_id: course.id,
            name: "Integration by parts".to_string(),
            order_index: 0,
            estimated_difficulty: 3.0,
            prerequisite_topic_ids: vec![],
        };
        let assessment = Assessment {
            id: Uuid::new_v4(),
            course_id: course.id,
            name: "Midterm".to_string(),
            kind: AssessmentKind::Midterm,
            weight_percent: 30.0,
            due_date: date(8).and_hms_opt(9, 0, 0).unwrap(),
            estimated_duration_min: Some(90),
            is_completed: false,
            topic_ids: vec![topic.id],
        };
        let record = MasteryRecord {
            user_id,
            topic_id: topic.id,
            mastery_score: 55.0,
            confidence_interval: 10.0,
            trend: Trend::Stable,
            easiness_factor: 2.5,
            review_interval_days: 1,
            next_review_date: date(4),
            last_practiced_at: Some(date(1).and_hms_opt(18, 0, 0).unwrap()),
            practice_count: 3,
            quiz_count: 2,
        };

        PlannerSnapshot {
            user_id,
            preferences: UserPreferences::default(),
            courses: vec![course],
            topics: vec![topic],
            mastery: vec![record],
            assessments: vec![assessment],
            busy: vec![],
        }
    }

    #[test]
    fn test_inverted_window_is_rejected() {
        let orchestrator = ScheduleOrchestrator::new(PlannerConfig::default());
        let mut store = MemoryScheduleStore::new();
        let err = orchestrator
            .generate_schedule(
                &snapshot(),
                &mut store,
                date(10),
                date(3),
                date(3).and_hms_opt(7, 0, 0).unwrap(),
            )
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidWindow { .. }));
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn test_generate_persists_and_summarizes() {
        let orchestrator = ScheduleOrchestrator::new(PlannerConfig::default());
        let mut store = MemoryScheduleStore::new();
        let snap = snapshot();
        let now = date(3).and_hms_opt(7, 0, 0).unwrap();

        let result = orchestrator
            .generate_schedule(&snap, &mut store, date(3), date(9), now)
            .unwrap();

        // The 45-minute practice task lands in the first 50-minute block;
        // the 90-minute review fits no block at all and stays unscheduled.
        assert_eq!(result.scheduled.len(), 1);
        assert_eq!(result.unscheduled_count, 1);
        assert!((result.total_hours - 0.75).abs() < 1e-9);

        let placed = &result.scheduled[0];
        assert_eq!(placed.title, "Practice: Integration by parts");
        assert_eq!(
            placed.scheduled_start,
            Some(date(3).and_hms_opt(8, 0, 0).unwrap())
        );
        assert_eq!(store.tasks_for(snap.user_id).len(), 1);

        let first_day = result.daily_breakdown.get(&date(3)).copied().unwrap();
        assert_eq!(first_day.blocks, 1);
        assert!((first_day.hours - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_replan_is_idempotent_over_unchanged_data() {
        let orchestrator = ScheduleOrchestrator::new(PlannerConfig::default());
        let mut store = MemoryScheduleStore::new();
        let snap = snapshot();
        let now = date(3).and_hms_opt(7, 0, 0).unwrap();

        let first = orchestrator
            .replan_schedule(&snap, &mut store, "assessment_created", now)
            .unwrap();
        let second = orchestrator
            .replan_schedule(&snap, &mut store, "manual", now)
            .unwrap();

        let placements = |r: &ReplanResult| -> Vec<(String, Option<NaiveDateTime>)> {
            r.result
                .scheduled
                .iter()
                .map(|t| (t.title.clone(), t.scheduled_start))
                .collect()
        };
        assert_eq!(placements(&first), placements(&second));
        assert_eq!(
            store.tasks_for(snap.user_id).len(),
            second.result.scheduled.len(),
            "replan replaces rather than accumulates"
        );
        assert_eq!(second.trigger, "manual");
        assert_eq!(second.replanned_at, now);
    }
}
