//! Earned value models.
//!
//! Standard EVM quantities as of a given date: planned value, earned
//! value, actual cost, and the derived indices. Index metrics are
//! `Option<f64>` because a zero denominator makes them undefined — they
//! must surface as "not yet available", never as 0 or infinity.
//!
//! # Reference
//! PMI (2019), "The Standard for Earned Value Management"

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cost inputs for one task.
///
/// The engine does not compute cost accrual; budgets and actuals are
/// supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCost {
    /// Task these figures belong to.
    pub task_id: String,
    /// Budgeted cost (the task's share of total budget).
    pub budget: f64,
    /// Actual cost recorded to date.
    pub actual_cost: f64,
}

impl TaskCost {
    /// Creates cost inputs for a task.
    pub fn new(task_id: impl Into<String>, budget: f64, actual_cost: f64) -> Self {
        Self {
            task_id: task_id.into(),
            budget,
            actual_cost,
        }
    }
}

/// Computed EVM metrics as of a date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvMetrics {
    /// Planned value: budgeted cost of work scheduled by the as-of date.
    pub pv: f64,
    /// Earned value: budgeted cost of work actually performed.
    pub ev: f64,
    /// Actual cost of work performed.
    pub ac: f64,
    /// Budget at completion: sum of all task budgets.
    pub bac: f64,
    /// Cost performance index `EV / AC`. `None` when `AC == 0`.
    pub cpi: Option<f64>,
    /// Schedule performance index `EV / PV`. `None` when `PV == 0`.
    pub spi: Option<f64>,
    /// Estimate at completion: `BAC / CPI`, or `AC + (BAC - EV)` when
    /// CPI is unavailable.
    pub eac: f64,
    /// Estimate to complete: `EAC - AC`.
    pub etc: f64,
    /// Variance at completion: `BAC - EAC`.
    pub vac: f64,
}

impl EvMetrics {
    /// Cost variance `EV - AC`. Negative = over budget.
    #[inline]
    pub fn cost_variance(&self) -> f64 {
        self.ev - self.ac
    }

    /// Schedule variance `EV - PV`. Negative = behind schedule.
    #[inline]
    pub fn schedule_variance(&self) -> f64 {
        self.ev - self.pv
    }
}

/// A persisted EVM computation for a given as-of date.
///
/// Snapshots are append-only: a new computation never overwrites a
/// prior snapshot with the same as-of date (duplicates are rejected;
/// see [`snapshot_earned_value`](crate::earned_value::snapshot_earned_value)).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvSnapshot {
    /// Unique snapshot identifier.
    pub id: Uuid,
    /// Project this snapshot belongs to.
    pub project_id: String,
    /// The date the metrics were computed for (minutes).
    pub as_of_min: i64,
    /// Capture timestamp.
    pub created_at: DateTime<Utc>,
    /// The computed metrics.
    pub metrics: EvMetrics,
}
