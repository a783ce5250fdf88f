//! # studyflow-core - adaptive study planning algorithms
//!
//! Pure-Rust implementation of the planning core behind an adaptive study
//! scheduler:
//!
//! - **Mastery estimation** - EWMA score tracking with a shrinking
//!   confidence interval and trend detection
//! - **SM-2 spaced repetition** - easiness-factor review spacing for
//!   well-learned topics
//! - **Exam-aware prioritization** - weight, knowledge gap, urgency, and
//!   recency combined into a single priority score
//! - **Greedy timetabling** - candidate tasks placed into free time blocks
//!   under a per-day budget
//!
//! ## Module structure
//!
//! - [`mastery`] - mastery engine, SM-2, difficulty selection, priority
//! - [`schedule`] - availability tiling, task generation, greedy placement,
//!   generate/replan orchestration
//! - [`types`] - shared domain model (courses, topics, assessments, tasks)
//! - [`config`] - tunable parameters with environment overrides
//!
//! Every algorithm is a pure function over an input snapshot: callers pass
//! the current state and the wall-clock `now`, and persist the returned
//! values through a [`schedule::ScheduleStore`].
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use studyflow_core::mastery::{MasteryEngine, QuizResult};
//! use uuid::Uuid;
//!
//! let engine = MasteryEngine::default();
//! let diagnostic = QuizResult {
//!     user_id: Uuid::new_v4(),
//!     topic_id: Uuid::new_v4(),
//!     score: 80.0,
//!     question_count: 16,
//! };
//! let now = NaiveDate::from_ymd_opt(2025, 3, 3)
//!     .unwrap()
//!     .and_hms_opt(9, 0, 0)
//!     .unwrap();
//!
//! let record = engine.initialize_mastery(&diagnostic, now);
//! assert_eq!(record.mastery_score, 80.0);
//! assert_eq!(record.confidence_interval, 5.0);
//! ```

pub mod config;
pub mod mastery;
pub mod schedule;
pub mod types;

pub use config::{MasteryParams, PlannerConfig, SchedulerParams};
pub use mastery::{
    mastery_overview, MasteryEngine, MasteryOverview, MasterySummary, PrioritizedTopic, QuizResult,
};
pub use schedule::{
    MemoryScheduleStore, PlacementOutcome, ReplanResult, ScheduleError, ScheduleOrchestrator,
    ScheduleResult, ScheduleStore, TimeBlock,
};
pub use types::*;
