use crate::types::{Difficulty, DifficultyCurve, Trend};

const EASY_BAND_CEILING: f64 = 40.0;
const MEDIUM_BAND_CEILING: f64 = 60.0;
const HARD_BAND_CEILING: f64 = 80.0;

/// Plain mastery banding: weaker topics get gentler material.
pub fn select_difficulty_by_mastery(mastery: f64) -> Difficulty {
    if mastery < EASY_BAND_CEILING {
        Difficulty::Easy
    } else if mastery < MEDIUM_BAND_CEILING {
        Difficulty::Medium
    } else if mastery < HARD_BAND_CEILING {
        Difficulty::Hard
    } else {
        Difficulty::ExamLevel
    }
}

/// Banded difficulty adjusted by trend and curve preference, then overridden
/// by exam proximity: with a week left a solid topic drills at exam level,
/// while a weak topic three days out drops to medium to rebuild footing.
pub fn select_difficulty_adaptive(
    mastery: f64,
    trend: Trend,
    days_until_exam: i64,
    curve: DifficultyCurve,
) -> Difficulty {
    let mut difficulty = select_difficulty_by_mastery(mastery);

    match trend {
        Trend::Declining => difficulty = difficulty.easier(),
        Trend::Improving if curve == DifficultyCurve::Aggressive => {
            difficulty = difficulty.harder();
        }
        _ => {}
    }

    if days_until_exam <= 7 && mastery >= 60.0 {
        return Difficulty::ExamLevel;
    }
    if days_until_exam <= 3 && mastery < 60.0 {
        return Difficulty::Medium;
    }

    difficulty
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mastery_bands() {
        assert_eq!(select_difficulty_by_mastery(0.0), Difficulty::Easy);
        assert_eq!(select_difficulty_by_mastery(39.9), Difficulty::Easy);
        assert_eq!(select_difficulty_by_mastery(40.0), Difficulty::Medium);
        assert_eq!(select_difficulty_by_mastery(59.9), Difficulty::Medium);
        assert_eq!(select_difficulty_by_mastery(60.0), Difficulty::Hard);
        assert_eq!(select_difficulty_by_mastery(79.9), Difficulty::Hard);
        assert_eq!(select_difficulty_by_mastery(80.0), Difficulty::ExamLevel);
        assert_eq!(select_difficulty_by_mastery(100.0), Difficulty::ExamLevel);
    }

    #[test]
    fn test_declining_trend_steps_down() {
        let picked =
            select_difficulty_adaptive(65.0, Trend::Declining, 30, DifficultyCurve::Balanced);
        assert_eq!(picked, Difficulty::Medium, "hard band minus one step");
    }

    #[test]
    fn test_improving_only_steps_up_on_aggressive_curve() {
        let balanced =
            select_difficulty_adaptive(50.0, Trend::Improving, 30, DifficultyCurve::Balanced);
        assert_eq!(balanced, Difficulty::Medium);

        let aggressive =
            select_difficulty_adaptive(50.0, Trend::Improving, 30, DifficultyCurve::Aggressive);
        assert_eq!(aggressive, Difficulty::Hard);
    }

    #[test]
    fn test_exam_week_overrides_trend() {
        // Declining would step down to medium, but the exam is close and
        // mastery is solid enough for exam-level drills.
        let picked =
            select_difficulty_adaptive(75.0, Trend::Declining, 5, DifficultyCurve::Balanced);
        assert_eq!(picked, Difficulty::ExamLevel);
    }

    #[test]
    fn test_last_days_with_weak_mastery_settle_on_medium() {
        let picked = select_difficulty_adaptive(30.0, Trend::Stable, 2, DifficultyCurve::Balanced);
        assert_eq!(picked, Difficulty::Medium);
    }

    #[test]
    fn test_far_exam_keeps_banded_choice() {
        let picked = select_difficulty_adaptive(85.0, Trend::Stable, 60, DifficultyCurve::Gentle);
        assert_eq!(picked, Difficulty::ExamLevel);
    }
}
