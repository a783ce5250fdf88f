use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::schedule::availability::TimeBlock;
use crate::types::StudyTask;

/// Scheduled/unscheduled partition of one greedy placement run. A task
/// landing in `unscheduled` is an expected outcome, not a failure.
#[derive(Debug, Clone, Default)]
pub struct PlacementOutcome {
    pub scheduled: Vec<StudyTask>,
    pub unscheduled: Vec<StudyTask>,
}

/// Place tasks into free blocks, highest priority first.
///
/// Tasks are sorted descending by `priority_score` with a stable sort, so
/// equal priorities keep their creation order. Each task takes the first
/// block in the pool's current order that is long enough and whose day still
/// has budget under `max_hours_per_day`. A consumed block leaves the pool;
/// its unused tail, if any, is appended to the back of the pool rather than
/// reinserted chronologically, so a later task can be offered an earlier
/// leftover slot only after every untouched block.
pub fn schedule_tasks_greedy(
    tasks: Vec<StudyTask>,
    blocks: Vec<TimeBlock>,
    max_hours_per_day: f64,
) -> PlacementOutcome {
    debug_assert!(max_hours_per_day >= 0.0, "daily budget cannot be negative");
    let daily_cap_min = (max_hours_per_day * 60.0).round() as i64;

    let mut ordered = tasks;
    ordered.sort_by(|a, b| {
        b.priority_score
            .partial_cmp(&a.priority_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut pool = blocks;
    let mut day_used: HashMap<NaiveDate, i64> = HashMap::new();
    let mut outcome = PlacementOutcome::default();

    for mut task in ordered {
        let needed = task.estimated_duration_min;
        let fit = pool.iter().position(|block| {
            block.duration_min() >= needed
                && day_used.get(&block.day()).copied().unwrap_or(0) + needed <= daily_cap_min
        });

        match fit {
            Some(index) => {
                let block = pool.remove(index);
                task.place(block.start);
                *day_used.entry(block.day()).or_insert(0) += needed;

                let tail = TimeBlock {
                    start: block.start + Duration::minutes(needed),
                    end: block.end,
                };
                if tail.duration_min() > 0 {
                    pool.push(tail);
                }
                outcome.scheduled.push(task);
            }
            None => outcome.unscheduled.push(task),
        }
    }

    outcome
}
