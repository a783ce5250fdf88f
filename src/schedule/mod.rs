//! Schedule construction: free-time tiling, candidate task generation,
//! greedy placement under a daily budget, and the generate/replan
//! orchestration that persists the outcome.

pub mod availability;
pub mod greedy;
pub mod orchestrator;
pub mod persistence;
pub mod tasks;

pub use availability::{free_blocks, TimeBlock};
pub use greedy::{schedule_tasks_greedy, PlacementOutcome};
pub use orchestrator::{DayLoad, ReplanResult, ScheduleError, ScheduleOrchestrator, ScheduleResult};
pub use persistence::{is_replaceable, MemoryScheduleStore, PlanWindow, ScheduleStore, StoreError};
pub use tasks::{generate_tasks, practice_tasks, review_tasks};
