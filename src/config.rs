use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasteryParams {
    /// EWMA weight given to the newest quiz observation.
    pub ewma_alpha: f64,
    /// Minimum score delta before a trend counts as improving/declining.
    pub trend_threshold: f64,
    /// Confidence interval never shrinks below this.
    pub confidence_floor: f64,
    /// Numerator of the initial confidence estimate (base / sqrt(questions)).
    pub confidence_base: f64,
    /// Geometric shrink applied to the confidence interval per update.
    pub confidence_decay: f64,
    /// Mastery at or above this enters the spaced-repetition branch;
    /// below it, review falls back to daily.
    pub retention_threshold: f64,
    /// Days-since-practice assumed for topics never practiced.
    pub default_recency_days: i64,
    /// Prioritization keeps horizon_days * this many topics.
    pub topics_per_horizon_day: usize,
}

impl Default for MasteryParams {
    fn default() -> Self {
        Self {
            ewma_alpha: 0.3,
            trend_threshold: 5.0,
            confidence_floor: 5.0,
            confidence_base: 20.0,
            confidence_decay: 0.9,
            retention_threshold: 70.0,
            default_recency_days: 30,
            topics_per_horizon_day: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerParams {
    /// Default planning horizon in days, used by replanning and by topic
    /// prioritization during generation.
    pub planning_horizon_days: i64,
    /// Review task duration when the assessment has no estimate.
    pub review_fallback_minutes: i64,
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            planning_horizon_days: 7,
            review_fallback_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub mastery: MasteryParams,
    pub scheduler: SchedulerParams,
}

impl PlannerConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("PLANNER_EWMA_ALPHA") {
            config.mastery.ewma_alpha = val.parse().unwrap_or(0.3);
        }
        if let Ok(val) = std::env::var("PLANNER_TREND_THRESHOLD") {
            config.mastery.trend_threshold = val.parse().unwrap_or(5.0);
        }
        if let Ok(val) = std::env::var("PLANNER_HORIZON_DAYS") {
            config.scheduler.planning_horizon_days = val.parse().unwrap_or(7);
        }
        if let Ok(val) = std::env::var("PLANNER_TOPICS_PER_HORIZON_DAY") {
            config.mastery.topics_per_horizon_day = val.parse().unwrap_or(2);
        }

        config
    }
}
