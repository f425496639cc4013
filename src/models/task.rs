//! Task and dependency models.
//!
//! A task is a unit of project work with planned and actual dates on a
//! continuous time axis. Dependencies link tasks with one of the four
//! standard precedence relationships plus an optional lag.
//!
//! # Time Representation
//! All times are in minutes relative to a scheduling epoch (t=0).
//! The consumer defines what t=0 means (e.g., project kickoff, midnight UTC).
//!
//! # Reference
//! PMI (2021), "PMBOK Guide", Ch. 6: Schedule Management

use serde::{Deserialize, Serialize};

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Work has not begun.
    #[default]
    NotStarted,
    /// Work is underway.
    InProgress,
    /// Work is finished.
    Completed,
    /// Work is paused pending an external decision.
    OnHold,
}

/// Date constraint applied to a task.
///
/// Constraints bound the solver's computed dates: "no earlier than"
/// constraints raise the early-start floor, "must finish on" and
/// "no later than" constraints lower the late-finish ceiling.
/// A constraint tightens, never loosens, the unconstrained value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintType {
    /// Schedule as early as predecessors allow (default).
    #[default]
    Asap,
    /// Early start may not precede the constraint date.
    StartNoEarlierThan,
    /// Early start is pinned to the constraint date.
    MustStartOn,
    /// Late finish is pinned to the constraint date.
    MustFinishOn,
    /// Late finish may not exceed the constraint date.
    FinishNoLaterThan,
}

impl ConstraintType {
    /// Whether this constraint pins or floors the earliest start.
    #[inline]
    pub fn bounds_start(self) -> bool {
        matches!(self, Self::StartNoEarlierThan | Self::MustStartOn)
    }

    /// Whether this constraint pins or caps the latest finish.
    #[inline]
    pub fn bounds_finish(self) -> bool {
        matches!(self, Self::MustFinishOn | Self::FinishNoLaterThan)
    }
}

/// A schedulable unit of project work.
///
/// Planned and actual dates are nullable: an unplanned task contributes
/// zero duration, and actuals are absent until work is recorded.
/// Milestones always have zero duration regardless of dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Owning phase, if the project is phased.
    pub phase_id: Option<String>,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Planned start (minutes). `None` = not yet planned.
    pub planned_start_min: Option<i64>,
    /// Planned end (minutes). `None` = not yet planned.
    pub planned_end_min: Option<i64>,
    /// Actual start (minutes). `None` = work not started.
    pub actual_start_min: Option<i64>,
    /// Actual end (minutes). `None` = work not finished.
    pub actual_end_min: Option<i64>,
    /// Progress, 0–100.
    pub percent_complete: u8,
    /// Zero-duration marker event.
    pub is_milestone: bool,
    /// Date constraint applied during solving.
    pub constraint_type: ConstraintType,
    /// Constraint date (minutes). Required by every type except `Asap`.
    pub constraint_date_min: Option<i64>,
    /// Work-breakdown-structure code (e.g., "1.2.3").
    pub wbs_code: String,
}

impl Task {
    /// Creates a new task with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            phase_id: None,
            status: TaskStatus::NotStarted,
            planned_start_min: None,
            planned_end_min: None,
            actual_start_min: None,
            actual_end_min: None,
            percent_complete: 0,
            is_milestone: false,
            constraint_type: ConstraintType::Asap,
            constraint_date_min: None,
            wbs_code: String::new(),
        }
    }

    /// Sets the task name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the owning phase.
    pub fn with_phase(mut self, phase_id: impl Into<String>) -> Self {
        self.phase_id = Some(phase_id.into());
        self
    }

    /// Sets the planned window.
    pub fn with_planned(mut self, start_min: i64, end_min: i64) -> Self {
        self.planned_start_min = Some(start_min);
        self.planned_end_min = Some(end_min);
        self
    }

    /// Sets the actual window. Either bound may be `None`.
    pub fn with_actual(mut self, start_min: Option<i64>, end_min: Option<i64>) -> Self {
        self.actual_start_min = start_min;
        self.actual_end_min = end_min;
        self
    }

    /// Sets the progress percentage (clamped to 0–100).
    pub fn with_percent_complete(mut self, pct: u8) -> Self {
        self.percent_complete = pct.min(100);
        self
    }

    /// Marks this task as a milestone.
    pub fn milestone(mut self) -> Self {
        self.is_milestone = true;
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets a date constraint.
    pub fn with_constraint(mut self, constraint: ConstraintType, date_min: i64) -> Self {
        self.constraint_type = constraint;
        self.constraint_date_min = Some(date_min);
        self
    }

    /// Sets the WBS code.
    pub fn with_wbs(mut self, wbs: impl Into<String>) -> Self {
        self.wbs_code = wbs.into();
        self
    }

    /// Planned duration in minutes. Zero for milestones or unplanned tasks.
    pub fn planned_duration_min(&self) -> i64 {
        if self.is_milestone {
            return 0;
        }
        match (self.planned_start_min, self.planned_end_min) {
            (Some(s), Some(e)) => e - s,
            _ => 0,
        }
    }

    /// Duration using actual dates where present, falling back to planned.
    ///
    /// An in-flight task (actual start, no actual end) keeps its planned
    /// duration measured from the actual start.
    pub fn actual_duration_min(&self) -> i64 {
        if self.is_milestone {
            return 0;
        }
        match (self.actual_start_min, self.actual_end_min) {
            (Some(s), Some(e)) => e - s,
            _ => self.planned_duration_min(),
        }
    }

    /// Whether both planned bounds are present.
    #[inline]
    pub fn is_planned(&self) -> bool {
        self.planned_start_min.is_some() && self.planned_end_min.is_some()
    }
}

/// Precedence relationship between two tasks.
///
/// The four standard kinds, named from the predecessor's perspective:
/// `FinishToStart` means the successor's start waits on the
/// predecessor's finish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyKind {
    /// Successor starts after predecessor finishes (the common case).
    #[default]
    FinishToStart,
    /// Successor starts after predecessor starts.
    StartToStart,
    /// Successor finishes after predecessor finishes.
    FinishToFinish,
    /// Successor finishes after predecessor starts.
    StartToFinish,
}

/// A dependency edge between two tasks.
///
/// The set of dependencies over a project must form a DAG; the graph
/// builder rejects cycles before any solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    /// Task that constrains.
    pub predecessor_id: String,
    /// Task that is constrained.
    pub successor_id: String,
    /// Relationship kind.
    pub kind: DependencyKind,
    /// Lag in minutes. Negative values model lead.
    pub lag_min: i64,
}

impl Dependency {
    /// Creates a finish-to-start dependency with zero lag.
    pub fn new(predecessor_id: impl Into<String>, successor_id: impl Into<String>) -> Self {
        Self {
            predecessor_id: predecessor_id.into(),
            successor_id: successor_id.into(),
            kind: DependencyKind::FinishToStart,
            lag_min: 0,
        }
    }

    /// Sets the relationship kind.
    pub fn with_kind(mut self, kind: DependencyKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the lag (negative = lead).
    pub fn with_lag(mut self, lag_min: i64) -> Self {
        self.lag_min = lag_min;
        self
    }
}
