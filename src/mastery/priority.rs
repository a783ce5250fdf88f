use chrono::NaiveDate;

/// Composite urgency score for one topic against its next assessment.
///
/// Multiplies assessment weight, mastery gap, exam urgency and estimate
/// confidence, then divides by practice recency so long-untouched topics
/// float up. Topics never practiced score as if untouched for
/// `default_recency_days`.
pub fn calculate_priority(
    weight_percent: f64,
    mastery_score: f64,
    confidence_interval: f64,
    exam_date: NaiveDate,
    last_practiced: Option<NaiveDate>,
    today: NaiveDate,
    default_recency_days: i64,
) -> f64 {
    let weight = weight_percent / 100.0;
    let gap = 1.0 - mastery_score / 100.0;

    let days_until_exam = (exam_date - today).num_days().max(1);
    let urgency = 1.0 / days_until_exam as f64;

    let confidence_factor = 1.0 / (1.0 + confidence_interval / 100.0);

    let days_since_practice = last_practiced
        .map(|practiced| (today - practiced).num_days().max(0))
        .unwrap_or(default_recency_days);
    let recency_factor = 1.0 / (1.0 + days_since_practice as f64);

    (weight * gap * urgency * confidence_factor) / recency_factor
}
