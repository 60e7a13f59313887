//! Domain models and derived views
//!
//! Pure computation over task snapshots, no I/O. The storage layer owns
//! mutation; everything here derives views from a read-only collection.

mod board;
mod plan;
mod stages;
mod task;

pub use board::{group_by_status, StatusBoard};
pub use plan::{parse_plan, DraftTask, PlanError};
pub use stages::{layer, StagePlan};
pub use task::{Task, TaskStatus};
