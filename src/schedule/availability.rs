use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::{BusyBlock, UserPreferences};

/// A contiguous span of free study time within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlock {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeBlock {
    pub fn duration_min(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn day(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn overlaps(&self, busy: &BusyBlock) -> bool {
        busy.start < self.end && busy.end > self.start
    }
}

/// Tile every enabled day in `[start_date, end_date]` (inclusive) with
/// candidate blocks of the preferred length, separated by the preferred
/// break, then drop candidates colliding with busy time.
///
/// The cursor walks a fixed grid: a candidate lost to a busy block still
/// consumes its grid slot, so the day is never re-packed around meetings.
pub fn free_blocks(
    preferences: &UserPreferences,
    busy: &[BusyBlock],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Vec<TimeBlock> {
    let block_len = Duration::minutes(preferences.preferred_block_length_min);
    let break_len = Duration::minutes(preferences.break_length_min);

    let mut blocks = Vec::new();
    let mut day = start_date;
    while day <= end_date {
        if preferences.weekly_availability.is_enabled(day.weekday()) {
            let latest = day.and_time(preferences.latest_end_time);
            let mut cursor = day.and_time(preferences.earliest_start_time);
            while cursor + block_len <= latest {
                let candidate = TimeBlock {
                    start: cursor,
                    end: cursor + block_len,
                };
                if !busy.iter().any(|b| candidate.overlaps(b)) {
                    blocks.push(candidate);
                }
                cursor = candidate.end + break_len;
            }
        }
        day += Duration::days(1);
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn prefs(earliest: (u32, u32), latest: (u32, u32)) -> UserPreferences {
        UserPreferences {
            earliest_start_time: NaiveTime::from_hms_opt(earliest.0, earliest.1, 0).unwrap(),
            latest_end_time: NaiveTime::from_hms_opt(latest.0, latest.1, 0).unwrap(),
            ..UserPreferences::default()
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        date(d).and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_two_hour_window_fits_two_default_blocks() {
        // 50-minute blocks with 10-minute breaks: 08:00 and 09:00 fit, the
        // next grid slot would end past 10:00.
        let blocks = free_blocks(&prefs((8, 0), (10, 0)), &[], date(3), date(3));
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].start, at(3, 8, 0));
        assert_eq!(blocks[0].end, at(3, 8, 50));
        assert_eq!(blocks[1].start, at(3, 9, 0));
        assert_eq!(blocks[1].end, at(3, 9, 50));
    }

    #[test]
    fn test_block_may_end_exactly_at_latest_end() {
        let mut p = prefs((8, 0), (8, 50));
        p.break_length_min = 10;
        let blocks = free_blocks(&p, &[], date(3), date(3));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].end, at(3, 8, 50));
    }

    #[test]
    fn test_busy_block_consumes_its_grid_slot() {
        let busy = vec![BusyBlock {
            start: at(3, 8, 30),
            end: at(3, 9, 0),
        }];
        let blocks = free_blocks(&prefs((8, 0), (10, 0)), &busy, date(3), date(3));
        // The 08:00 candidate collides; 09:00 starts exactly when the busy
        // interval ends and survives.
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start, at(3, 9, 0));
    }

    #[test]
    fn test_touching_busy_block_does_not_collide() {
        let busy = vec![BusyBlock {
            start: at(3, 8, 50),
            end: at(3, 9, 0),
        }];
        let blocks = free_blocks(&prefs((8, 0), (10, 0)), &busy, date(3), date(3));
        assert_eq!(blocks.len(), 2, "half-open overlap keeps back-to-back blocks");
    }

    #[test]
    fn test_disabled_weekday_yields_nothing() {
        let mut p = prefs((8, 0), (12, 0));
        p.weekly_availability.saturday = false;
        // 2025-03-08 is a Saturday.
        let blocks = free_blocks(&p, &[], date(8), date(8));
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_range_is_inclusive_of_both_ends() {
        let blocks = free_blocks(&prefs((8, 0), (9, 0)), &[], date(3), date(4));
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].day(), date(3));
        assert_eq!(blocks[1].day(), date(4));
    }

    #[test]
    fn test_inverted_range_yields_nothing() {
        let blocks = free_blocks(&prefs((8, 0), (12, 0)), &[], date(4), date(3));
        assert!(blocks.is_empty());
    }
}
