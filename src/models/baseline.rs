//! Baseline models.
//!
//! A baseline is an immutable frozen copy of a project's planned
//! schedule, captured for later variance comparison. Baselines are
//! locked at creation; their items are only ever superseded by a new
//! baseline, never edited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An immutable schedule snapshot header.
///
/// At most one baseline per project may be active at a time; activating
/// a new one deactivates the previous (see
/// [`activate_baseline`](crate::baseline::activate_baseline)).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Baseline {
    /// Unique baseline identifier.
    pub id: Uuid,
    /// Project this baseline belongs to.
    pub project_id: String,
    /// Human-readable name (e.g., "Contract signature").
    pub name: String,
    /// Capture timestamp.
    pub created_at: DateTime<Utc>,
    /// Always `true` once created; a locked baseline's items are never
    /// mutated.
    pub locked: bool,
    /// Whether this is the project's current comparison reference.
    pub active: bool,
}

/// A frozen per-task schedule row tied to a [`Baseline`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineItem {
    /// Owning baseline.
    pub baseline_id: Uuid,
    /// Task this row freezes.
    pub task_id: String,
    /// Planned start at capture time (minutes).
    pub baseline_start_min: Option<i64>,
    /// Planned end at capture time (minutes).
    pub baseline_end_min: Option<i64>,
    /// Whether the task was on the critical path at capture time.
    pub was_critical: bool,
}

/// Per-task variance between a baseline and the current schedule.
///
/// Positive variance means the current schedule is later than the
/// baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineVariance {
    /// Task this row describes.
    pub task_id: String,
    /// Current planned start minus baseline start (minutes).
    pub start_variance_min: i64,
    /// Current planned end minus baseline end (minutes).
    pub end_variance_min: i64,
    /// `end_variance - start_variance` (minutes).
    pub duration_variance_min: i64,
    /// Critical-path membership at baseline capture time.
    pub was_critical: bool,
}

/// Project-level variance summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineSummary {
    /// Tasks whose planned end now falls after the baseline end.
    pub late_task_count: usize,
    /// Largest single-task end slip (minutes, 0 if nothing slipped).
    pub max_slip_min: i64,
    /// End slip accumulated along tasks that were critical in the
    /// baseline. Isolates schedule-driving delay from slack absorbed
    /// by non-critical tasks.
    pub critical_slip_min: i64,
}

/// Output of a baseline comparison.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaselineComparison {
    /// The date the comparison was taken for (minutes).
    pub as_of_min: i64,
    /// Per-task variances, one per baseline item.
    pub items: Vec<BaselineVariance>,
    /// Project-level rollup.
    pub summary: BaselineSummary,
}
