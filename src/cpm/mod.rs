//! Critical Path Method core.
//!
//! Three stages, leaf-first:
//!
//! - **`graph`**: turns flat task and dependency lists into a validated
//!   DAG with a topological order.
//! - **`solver`**: forward and backward passes over the DAG producing
//!   early/late dates, float, and the critical path.
//! - **`cascade`**: applies a single task mutation and re-solves the
//!   forward-reachable subgraph atomically.
//!
//! All stages are pure: state is passed in and returned, never held
//! across calls. Each pass is O(V + E) and runs synchronously.
//!
//! # Reference
//! Kelley & Walker (1959), "Critical-Path Planning and Scheduling"

pub mod cascade;
pub mod graph;
pub mod solver;

pub use cascade::{reschedule_task, CascadeMode, RescheduleOptions, RescheduleResult, TaskPatch};
pub use graph::TaskGraph;
pub use solver::solve_schedule;
