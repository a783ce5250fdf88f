use serde::{Deserialize, Serialize};

const MIN_EASINESS: f64 = 1.3;
const SECOND_INTERVAL_DAYS: i64 = 6;

/// Next review interval and updated easiness factor for one topic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewSchedule {
    pub interval_days: i64,
    pub easiness_factor: f64,
}

/// SM-2 update. Quality is recall quality on the 0-5 scale; anything below 3
/// resets the interval to a day, otherwise the interval walks the classic
/// 1, 6, then interval * EF progression.
pub fn calculate_next_review(
    easiness_factor: f64,
    current_interval: i64,
    quality: u8,
) -> ReviewSchedule {
    debug_assert!(quality <= 5, "recall quality is a 0-5 scale");

    let miss = (5 - quality.min(5)) as f64;
    let new_ef = (easiness_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASINESS);

    let interval_days = if quality < 3 {
        1
    } else {
        match current_interval {
            0 => 1,
            1 => SECOND_INTERVAL_DAYS,
            n => (n as f64 * new_ef).floor() as i64,
        }
    };

    ReviewSchedule {
        interval_days,
        easiness_factor: new_ef,
    }
}
