use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use uuid::Uuid;

use crate::types::{StudyTask, TaskStatus};

#[derive(Debug, Error)]
#[error("schedule store failure: {0}")]
pub struct StoreError(pub String);

/// Date-inclusive span of days a replan rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PlanWindow {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        let day = at.date();
        self.start <= day && day <= self.end
    }
}

/// A replan only refreshes tasks the scheduler still owns: pending or
/// scheduled, placed inside the window. In-progress, completed, and skipped
/// tasks stay untouched.
pub fn is_replaceable(task: &StudyTask, window: &PlanWindow) -> bool {
    matches!(task.status, TaskStatus::Pending | TaskStatus::Scheduled)
        && task
            .scheduled_start
            .map_or(false, |start| window.contains(start))
}

/// Write side of scheduling. The planner issues exactly two mutations;
/// everything else (reads, ownership checks, locking) lives behind the
/// implementation.
pub trait ScheduleStore {
    /// Persist freshly scheduled tasks.
    fn insert_tasks(&mut self, tasks: &[StudyTask]) -> Result<(), StoreError>;

    /// Drop every replaceable task in the window for this user and insert
    /// the fresh batch, as one atomic unit. On error the previous schedule
    /// must survive intact; partial application violates the contract.
    fn replace_window(
        &mut self,
        user_id: Uuid,
        window: PlanWindow,
        fresh: &[StudyTask],
    ) -> Result<(), StoreError>;
}

/// Vec-backed store for tests and single-process embedders.
#[derive(Debug, Clone, Default)]
pub struct MemoryScheduleStore {
    tasks: Vec<StudyTask>,
}

impl MemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[StudyTask] {
        &self.tasks
    }

    pub fn tasks_for(&self, user_id: Uuid) -> Vec<&StudyTask> {
        self.tasks.iter().filter(|t| t.user_id == user_id).collect()
    }
}

impl ScheduleStore for MemoryScheduleStore {
    fn insert_tasks(&mut self, tasks: &[StudyTask]) -> Result<(), StoreError> {
        self.tasks.extend_from_slice(tasks);
        Ok(())
    }

    fn replace_window(
        &mut self,
        user_id: Uuid,
        window: PlanWindow,
        fresh: &[StudyTask],
    ) -> Result<(), StoreError> {
        self.tasks
            .retain(|task| task.user_id != user_id || !is_replaceable(task, &window));
        self.tasks.extend_from_slice(fresh);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Difficulty, TaskType};

    fn window() -> PlanWindow {
        PlanWindow {
            start: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        }
    }

    fn task_at(user_id: Uuid, day: u32, status: TaskStatus) -> StudyTask {
        let start = NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        StudyTask {
            id: Uuid::new_v4(),
            user_id,
            course_id: Uuid::new_v4(),
            topic_id: None,
            assessment_id: None,
            title: "Review for Midterm".to_string(),
            task_type: TaskType::Review,
            difficulty: Difficulty::Medium,
            estimated_duration_min: 60,
            priority_score: 5.0,
            status,
            scheduled_start: Some(start),
            scheduled_end: Some(start + chrono::Duration::minutes(60)),
        }
    }

    #[test]
    fn test_unplaced_task_is_never_replaceable() {
        let mut task = task_at(Uuid::new_v4(), 5, TaskStatus::Pending);
        task.scheduled_start = None;
        assert!(!is_replaceable(&task, &window()));
    }

    #[test]
    fn test_replace_window_scope() {
        let user = Uuid::new_v4();
        let other_user = Uuid::new_v4();

        let in_window_scheduled = task_at(user, 5, TaskStatus::Scheduled);
        let in_window_completed = task_at(user, 6, TaskStatus::Completed);
        let in_window_in_progress = task_at(user, 6, TaskStatus::InProgress);
        let before_window = task_at(user, 1, TaskStatus::Scheduled);
        let foreign = task_at(other_user, 5, TaskStatus::Scheduled);

        let mut store = MemoryScheduleStore::new();
        store
            .insert_tasks(&[
                in_window_scheduled.clone(),
                in_window_completed.clone(),
                in_window_in_progress.clone(),
                before_window.clone(),
                foreign.clone(),
            ])
            .unwrap();

        let fresh = task_at(user, 4, TaskStatus::Scheduled);
        store.replace_window(user, window(), &[fresh.clone()]).unwrap();

        let ids: Vec<Uuid> = store.tasks().iter().map(|t| t.id).collect();
        assert!(!ids.contains(&in_window_scheduled.id), "stale scheduled task dropped");
        assert!(ids.contains(&in_window_completed.id));
        assert!(ids.contains(&in_window_in_progress.id));
        assert!(ids.contains(&before_window.id));
        assert!(ids.contains(&foreign.id));
        assert!(ids.contains(&fresh.id));
    }

    #[test]
    fn test_tasks_for_filters_by_user() {
        let user = Uuid::new_v4();
        let mut store = MemoryScheduleStore::new();
        store
            .insert_tasks(&[
                task_at(user, 5, TaskStatus::Scheduled),
                task_at(Uuid::new_v4(), 5, TaskStatus::Scheduled),
            ])
            .unwrap();

        assert_eq!(store.tasks_for(user).len(), 1);
        assert_eq!(store.tasks().len(), 2);
    }
}
