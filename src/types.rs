use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum Trend {
    #[default]
    New,
    Improving,
    Stable,
    Declining,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Declining => "declining",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "improving" => Self::Improving,
            "stable" => Self::Stable,
            "declining" => Self::Declining,
            _ => Self::New,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    ExamLevel,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::ExamLevel => "exam_level",
        }
    }

    /// One step up, capped at exam level.
    pub fn harder(&self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium => Self::Hard,
            _ => Self::ExamLevel,
        }
    }

    /// One step down, floored at easy.
    pub fn easier(&self) -> Self {
        match self {
            Self::ExamLevel => Self::Hard,
            Self::Hard => Self::Medium,
            _ => Self::Easy,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "easy" => Self::Easy,
            "hard" => Self::Hard,
            "exam_level" => Self::ExamLevel,
            _ => Self::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum DifficultyCurve {
    Gentle,
    #[default]
    Balanced,
    Aggressive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentKind {
    Quiz,
    Assignment,
    Midterm,
    Final,
    Project,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Reading,
    ProblemSet,
    Quiz,
    Review,
    Project,
    Flashcards,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum TaskStatus {
    #[default]
    Pending,
    Scheduled,
    InProgress,
    Completed,
    Skipped,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }

    /// Legal moves: pending -> scheduled -> in_progress -> completed, with
    /// pending and scheduled also allowed to drop out to skipped.
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, TaskStatus::Scheduled)
                | (Self::Pending, TaskStatus::Skipped)
                | (Self::Scheduled, TaskStatus::InProgress)
                | (Self::Scheduled, TaskStatus::Skipped)
                | (Self::InProgress, TaskStatus::Completed)
        )
    }
}

#[derive(Debug, thiserror::Error)]
#[error("illegal task status transition: {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: TaskStatus,
    pub to: TaskStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub is_archived: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    pub order_index: i32,
    pub estimated_difficulty: f64,
    #[serde(default)]
    pub prerequisite_topic_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    pub kind: AssessmentKind,
    pub weight_percent: f64,
    pub due_date: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration_min: Option<i64>,
    pub is_completed: bool,
    /// Topics this assessment covers, flattened from the join table.
    pub topic_ids: Vec<Uuid>,
}

/// Per-(user, topic) mastery state. Created by the engine on the first
/// diagnostic or quiz result and mutated only through engine updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryRecord {
    pub user_id: Uuid,
    pub topic_id: Uuid,
    pub mastery_score: f64,
    pub confidence_interval: f64,
    pub trend: Trend,
    pub easiness_factor: f64,
    pub review_interval_days: i64,
    pub next_review_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_practiced_at: Option<NaiveDateTime>,
    pub practice_count: i64,
    pub quiz_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyAvailability {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
}

impl Default for WeeklyAvailability {
    fn default() -> Self {
        Self {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: true,
            sunday: true,
        }
    }
}

impl WeeklyAvailability {
    pub fn is_enabled(&self, day: Weekday) -> bool {
        match day {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub max_hours_per_day: f64,
    pub preferred_block_length_min: i64,
    pub break_length_min: i64,
    pub earliest_start_time: NaiveTime,
    pub latest_end_time: NaiveTime,
    pub weekly_availability: WeeklyAvailability,
    pub difficulty_curve: DifficultyCurve,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            max_hours_per_day: 4.0,
            preferred_block_length_min: 50,
            break_length_min: 10,
            earliest_start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            latest_end_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
            weekly_availability: WeeklyAvailability::default(),
            difficulty_curve: DifficultyCurve::default(),
        }
    }
}

/// An occupied interval imported from the learner's calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusyBlock {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyTask {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_id: Option<Uuid>,
    pub title: String,
    pub task_type: TaskType,
    pub difficulty: Difficulty,
    pub estimated_duration_min: i64,
    pub priority_score: f64,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_start: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_end: Option<NaiveDateTime>,
}

impl StudyTask {
    /// Assign the task into a time slot. The end is always derived from the
    /// estimated duration so the two scheduled fields cannot drift apart.
    pub fn place(&mut self, start: NaiveDateTime) {
        self.scheduled_start = Some(start);
        self.scheduled_end = Some(start + chrono::Duration::minutes(self.estimated_duration_min));
        self.status = TaskStatus::Scheduled;
    }

    /// Explicit status transition; rejects anything outside the state machine.
    pub fn transition_to(&mut self, next: TaskStatus) -> Result<(), InvalidTransition> {
        if !self.status.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

/// Flat, already-joined view of everything the planner needs for one user.
/// The caller materializes this from its stores; the core never follows live
/// relations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerSnapshot {
    pub user_id: Uuid,
    pub preferences: UserPreferences,
    pub courses: Vec<Course>,
    pub topics: Vec<Topic>,
    pub mastery: Vec<MasteryRecord>,
    pub assessments: Vec<Assessment>,
    pub busy: Vec<BusyBlock>,
}
