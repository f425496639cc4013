//! Engine error taxonomy.
//!
//! Every variant carries the structured data a caller needs to render a
//! precise message: offending task or resource ids and the computed
//! values that triggered rejection.
//!
//! Structural errors (`CycleDetected`) abort an operation with no
//! partial output. Per-task constraint issues are normally collected
//! into a solution's violation list instead; `ConstraintViolations`
//! appears only when a caller opts into treating them as blocking.

use thiserror::Error;

use crate::models::ConstraintViolation;

/// Errors produced by the scheduling and governance engine.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// The dependency graph is not a DAG. Fatal; the input data must be
    /// fixed before any solve. Retrying with unchanged input never
    /// succeeds.
    #[error("dependency cycle detected involving tasks: {task_ids:?}")]
    CycleDetected {
        /// Tasks remaining with nonzero in-degree after the topological
        /// sort exhausted its queue — every member of some cycle.
        task_ids: Vec<String>,
    },

    /// Computed dates contradict hard constraints and the caller asked
    /// for violations to block.
    #[error("{} constraint violation(s); first: {}", violations.len(), first_violation_message(violations))]
    ConstraintViolations {
        /// All violations found by the solve.
        violations: Vec<ConstraintViolation>,
    },

    /// Attempt to mutate the items of a locked baseline. Always fatal;
    /// baselines are superseded, never edited.
    #[error("baseline {baseline_id} is locked; items cannot be mutated")]
    BaselineLocked {
        /// The baseline whose items were targeted.
        baseline_id: String,
    },

    /// An allocation write classified `Warning` arrived without a
    /// non-empty justification. Recoverable by resubmitting with one.
    #[error(
        "resource {resource_id} would be at {total_percentage}%: justification required"
    )]
    OverallocationJustificationRequired {
        /// Resource that would be overallocated.
        resource_id: String,
        /// Cumulative percentage over the overlap window.
        total_percentage: f64,
    },

    /// An allocation write classified `Critical` arrived without an
    /// approval marker. Recoverable by resubmitting with one.
    #[error("resource {resource_id} would be at {total_percentage}%: approval required")]
    OverallocationApprovalRequired {
        /// Resource that would be overallocated.
        resource_id: String,
        /// Cumulative percentage over the overlap window.
        total_percentage: f64,
    },

    /// End before start, or a non-positive duration on a non-milestone
    /// task. Fatal input validation.
    #[error("task {task_id} has invalid date range [{start_min}, {end_min}]")]
    InvalidDateRange {
        /// Offending task (or resource allocation holder).
        task_id: String,
        /// Range start (minutes).
        start_min: i64,
        /// Range end (minutes).
        end_min: i64,
    },

    /// A dependency or operation referenced a task id that is not in
    /// the supplied task list.
    #[error("unknown task: {task_id}")]
    UnknownTask {
        /// The missing id.
        task_id: String,
    },

    /// Two tasks in the input share an id.
    #[error("duplicate task id: {task_id}")]
    DuplicateTaskId {
        /// The repeated id.
        task_id: String,
    },

    /// Percent complete outside 0–100.
    #[error("task {task_id} has percent complete {value} outside 0-100")]
    InvalidPercentComplete {
        /// Offending task.
        task_id: String,
        /// The out-of-range value.
        value: u8,
    },

    /// A snapshot for this as-of date already exists. Snapshots are
    /// append-only; the existing row must be removed by the storage
    /// layer before recomputing.
    #[error("earned value snapshot for as-of {as_of_min} already exists")]
    SnapshotExists {
        /// The duplicated as-of date (minutes).
        as_of_min: i64,
    },
}

fn first_violation_message(violations: &[ConstraintViolation]) -> String {
    violations
        .first()
        .map(|v| v.message.clone())
        .unwrap_or_default()
}

impl EngineError {
    /// Whether this error is the caller's to fix (validation-class)
    /// rather than an engine fault. Transport layers map these to
    /// client-error semantics.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        // Every variant in this taxonomy is caused by input or policy;
        // the engine has no server-fault class.
        true
    }

    /// Whether resubmitting with an added field can succeed.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::OverallocationJustificationRequired { .. }
                | Self::OverallocationApprovalRequired { .. }
        )
    }
}
