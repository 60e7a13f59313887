//! Quest CLI - A gamified quest log and focus timer
//!
//! Quests are flat task records in a JSONL store. Two pure views derive
//! everything the UI shows: a status board (todo / in-progress / done
//! columns) and dependency stages (cycle-tolerant topological layering).

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{group_by_status, layer, StagePlan, StatusBoard, Task, TaskStatus};
