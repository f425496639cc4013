//! Earned value computation and snapshotting.
//!
//! Computes the standard EVM quantities as of a date from task
//! progress and caller-supplied cost data. The engine does not accrue
//! cost; budgets and actuals arrive as inputs.
//!
//! # Formulas
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | PV | Σ budget of work scheduled by the as-of date (pro-rated for in-progress) |
//! | EV | Σ budget × percent complete / 100 |
//! | AC | Σ actual cost recorded to date |
//! | CPI | EV / AC (`None` when AC = 0) |
//! | SPI | EV / PV (`None` when PV = 0) |
//! | EAC | BAC / CPI, or AC + (BAC − EV) when CPI is unavailable |
//! | ETC | EAC − AC |
//! | VAC | BAC − EAC |
//!
//! A `None` index must surface as "not yet available" — never 0, never
//! infinity.
//!
//! # Reference
//! PMI (2019), "The Standard for Earned Value Management"

use chrono::Utc;
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{EvMetrics, EvSnapshot, Task, TaskCost};

/// Computes EVM metrics for a project as of a date.
///
/// Planned value counts a task's full budget once its planned finish is
/// at or before `as_of_min`, a pro-rated fraction (elapsed ÷ total,
/// clamped to [0, 1]) while the task is in flight, and nothing before
/// its planned start. Tasks missing from `costs` contribute zero.
pub fn compute_earned_value(tasks: &[Task], costs: &[TaskCost], as_of_min: i64) -> EvMetrics {
    let mut pv = 0.0;
    let mut ev = 0.0;
    let mut ac = 0.0;
    let mut bac = 0.0;

    for task in tasks {
        let cost = costs.iter().find(|c| c.task_id == task.id);
        let budget = cost.map(|c| c.budget).unwrap_or(0.0);
        bac += budget;
        ac += cost.map(|c| c.actual_cost).unwrap_or(0.0);
        ev += budget * f64::from(task.percent_complete) / 100.0;
        pv += budget * planned_fraction(task, as_of_min);
    }

    let cpi = ratio(ev, ac);
    let spi = ratio(ev, pv);

    let eac = match cpi {
        Some(cpi) if cpi != 0.0 => bac / cpi,
        // No cost performance signal yet: remaining work at budget rate.
        _ => ac + (bac - ev),
    };

    EvMetrics {
        pv,
        ev,
        ac,
        bac,
        cpi,
        spi,
        eac,
        etc: eac - ac,
        vac: bac - eac,
    }
}

/// Persists an EVM computation as an append-only snapshot.
///
/// Idempotency policy: a snapshot for an as-of date that already exists
/// in `existing` is **rejected** with [`EngineError::SnapshotExists`] —
/// never silently upserted — so historical trend rows are immutable.
/// The storage layer owns deletion when recomputation is wanted.
pub fn snapshot_earned_value(
    existing: &[EvSnapshot],
    project_id: &str,
    tasks: &[Task],
    costs: &[TaskCost],
    as_of_min: i64,
) -> Result<EvSnapshot, EngineError> {
    if existing
        .iter()
        .any(|s| s.project_id == project_id && s.as_of_min == as_of_min)
    {
        tracing::warn!(project_id, as_of_min, "duplicate earned value snapshot rejected");
        return Err(EngineError::SnapshotExists { as_of_min });
    }

    let metrics = compute_earned_value(tasks, costs, as_of_min);
    Ok(EvSnapshot {
        id: Uuid::new_v4(),
        project_id: project_id.to_string(),
        as_of_min,
        created_at: Utc::now(),
        metrics,
    })
}

/// Fraction of a task's budget planned to be spent by `as_of_min`.
fn planned_fraction(task: &Task, as_of_min: i64) -> f64 {
    let (Some(start), Some(end)) = (task.planned_start_min, task.planned_end_min) else {
        return 0.0;
    };
    if end <= as_of_min {
        return 1.0;
    }
    if start >= as_of_min {
        return 0.0;
    }
    let total = end - start;
    if total <= 0 {
        // Zero-duration work (milestones) planned exactly at as_of was
        // caught by the `end <= as_of` arm; anything left is not due.
        return 0.0;
    }
    let elapsed = as_of_min - start;
    (elapsed as f64 / total as f64).clamp(0.0, 1.0)
}

/// `numerator / denominator`, or `None` when the denominator is zero.
fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}
