//! Scheduling domain models.
//!
//! Plain value types for representing a project's schedule state and
//! the engine's computed outputs. No live object graph and no cyclic
//! back-references: tasks and dependencies are flat lists, rebuilt into
//! an explicit adjacency structure per solve.

mod allocation;
mod baseline;
mod earned_value;
mod schedule;
mod task;

pub use allocation::{
    AllocationStatus, AllocationThresholds, DateRange, ResourceAllocation,
};
pub use baseline::{Baseline, BaselineComparison, BaselineItem, BaselineSummary, BaselineVariance};
pub use earned_value::{EvMetrics, EvSnapshot, TaskCost};
pub use schedule::{
    ConstraintViolation, ScheduleNode, ScheduleSolution, SolveMode, ViolationKind,
    ViolationSeverity,
};
pub use task::{ConstraintType, Dependency, DependencyKind, Task, TaskStatus};
