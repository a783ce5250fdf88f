//! Mastery estimation: EWMA score tracking with a shrinking confidence
//! interval, trend detection, SM-2 review spacing, and exam-aware topic
//! prioritization.

pub mod difficulty;
pub mod engine;
pub mod priority;
pub mod sm2;

pub use difficulty::{select_difficulty_adaptive, select_difficulty_by_mastery};
pub use engine::{
    mastery_overview, MasteryEngine, MasteryOverview, MasterySummary, PrioritizedTopic, QuizResult,
};
pub use priority::calculate_priority;
pub use sm2::{calculate_next_review, ReviewSchedule};
