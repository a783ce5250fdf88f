use std::collections::HashSet;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::mastery::PrioritizedTopic;
use crate::types::{Assessment, Course, Difficulty, StudyTask, TaskStatus, TaskType};

const PRACTICE_EASY_CEILING: f64 = 40.0;
const PRACTICE_MEDIUM_CEILING: f64 = 70.0;

const PRACTICE_EASY_MINUTES: i64 = 30;
const PRACTICE_MEDIUM_MINUTES: i64 = 45;
const PRACTICE_HARD_MINUTES: i64 = 60;

/// Session length and difficulty for a practice task, banded by mastery.
/// Weak topics get short easy sessions; strong topics get longer hard ones.
fn practice_shape(mastery: f64) -> (Difficulty, i64) {
    if mastery < PRACTICE_EASY_CEILING {
        (Difficulty::Easy, PRACTICE_EASY_MINUTES)
    } else if mastery < PRACTICE_MEDIUM_CEILING {
        (Difficulty::Medium, PRACTICE_MEDIUM_MINUTES)
    } else {
        (Difficulty::Hard, PRACTICE_HARD_MINUTES)
    }
}

/// One practice task per prioritized topic whose course is still active.
/// The priority score carries over from the engine unchanged.
pub fn practice_tasks(
    user_id: Uuid,
    prioritized: &[PrioritizedTopic],
    courses: &[Course],
) -> Vec<StudyTask> {
    let active: HashSet<Uuid> = courses
        .iter()
        .filter(|c| !c.is_archived)
        .map(|c| c.id)
        .collect();

    prioritized
        .iter()
        .filter(|row| active.contains(&row.course_id))
        .map(|row| {
            let (difficulty, duration) = practice_shape(row.mastery);
            StudyTask {
                id: Uuid::new_v4(),
                user_id,
                course_id: row.course_id,
                topic_id: Some(row.topic_id),
                assessment_id: None,
                title: format!("Practice: {}", row.topic_name),
                task_type: TaskType::ProblemSet,
                difficulty,
                estimated_duration_min: duration,
                priority_score: row.priority,
                status: TaskStatus::Pending,
                scheduled_start: None,
                scheduled_end: None,
            }
        })
        .collect()
}

/// One review task per incomplete assessment due inside the window (dates
/// inclusive). Priority rises linearly as the due date nears: due on the
/// window start scores 10, a week out scores 9.
pub fn review_tasks(
    user_id: Uuid,
    assessments: &[Assessment],
    window_start: NaiveDate,
    window_end: NaiveDate,
    fallback_minutes: i64,
) -> Vec<StudyTask> {
    assessments
        .iter()
        .filter(|a| {
            !a.is_completed
                && a.due_date.date() >= window_start
                && a.due_date.date() <= window_end
        })
        .map(|assessment| {
            let days_until = (assessment.due_date.date() - window_start).num_days();
            StudyTask {
                id: Uuid::new_v4(),
                user_id,
                course_id: assessment.course_id,
                topic_id: None,
                assessment_id: Some(assessment.id),
                title: format!("Review for {}", assessment.name),
                task_type: TaskType::Review,
                difficulty: Difficulty::Medium,
                estimated_duration_min: assessment
                    .estimated_duration_min
                    .unwrap_or(fallback_minutes),
                priority_score: 10.0 - days_until as f64 / 7.0,
                status: TaskStatus::Pending,
                scheduled_start: None,
                scheduled_end: None,
            }
        })
        .collect()
}

/// All candidate tasks for one planning window: practice first, reviews
/// appended after. The resulting order is the tie-break order downstream.
pub fn generate_tasks(
    user_id: Uuid,
    prioritized: &[PrioritizedTopic],
    courses: &[Course],
    assessments: &[Assessment],
    window_start: NaiveDate,
    window_end: NaiveDate,
    review_fallback_minutes: i64,
) -> Vec<StudyTask> {
    let mut tasks = practice_tasks(user_id, prioritized, courses);
    tasks.extend(review_tasks(
        user_id,
        assessments,
        window_start,
        window_end,
        review_fallback_minutes,
    ));
    tasks
}
