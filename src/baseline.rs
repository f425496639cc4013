//! Baseline capture, activation, and variance comparison.
//!
//! `create_baseline` freezes the current planned schedule (and its
//! critical-path membership) into immutable rows. `compare_baseline`
//! re-solves the current state and reports per-task and project-level
//! variance against the frozen copy. Slip along baseline-critical tasks
//! is tracked separately: it is the delay that drives the project
//! finish, as opposed to slack absorbed by non-critical tasks.
//!
//! Baselines are locked at creation. The only mutation the engine
//! models — editing an item — always fails with `BaselineLocked`.

use chrono::Utc;
use uuid::Uuid;

use crate::cpm::graph::TaskGraph;
use crate::cpm::solver;
use crate::error::EngineError;
use crate::models::{
    Baseline, BaselineComparison, BaselineItem, BaselineSummary, BaselineVariance, Dependency,
    SolveMode, Task,
};
use crate::validation;

/// Captures the current planned schedule as a new locked baseline.
///
/// Runs a planned-mode solve to record each task's critical-path
/// membership at capture time. The returned baseline is locked and
/// inactive; activate it with [`activate_baseline`].
pub fn create_baseline(
    tasks: &[Task],
    dependencies: &[Dependency],
    project_id: &str,
    name: &str,
) -> Result<(Baseline, Vec<BaselineItem>), EngineError> {
    validation::validate_tasks(tasks).map_err(validation::first_error)?;
    validation::validate_dependencies(tasks, dependencies).map_err(validation::first_error)?;

    let graph = TaskGraph::build(tasks, dependencies)?;
    let project_start = earliest_planned_start(tasks);
    let solution = solver::solve_on_graph(&graph, tasks, SolveMode::Planned, project_start);

    let baseline = Baseline {
        id: Uuid::new_v4(),
        project_id: project_id.to_string(),
        name: name.to_string(),
        created_at: Utc::now(),
        locked: true,
        active: false,
    };

    let items = tasks
        .iter()
        .map(|task| BaselineItem {
            baseline_id: baseline.id,
            task_id: task.id.clone(),
            baseline_start_min: task.planned_start_min,
            baseline_end_min: task.planned_end_min,
            was_critical: solution
                .node(&task.id)
                .map(|n| n.is_critical)
                .unwrap_or(false),
        })
        .collect();

    tracing::debug!(project_id, baseline_id = %baseline.id, "baseline captured");
    Ok((baseline, items))
}

/// Marks one baseline active and deactivates every other baseline of
/// the same project. Returns the updated list.
///
/// # Errors
/// [`EngineError::UnknownTask`] (carrying the baseline id) when the id
/// is not present in the list.
pub fn activate_baseline(
    baselines: &[Baseline],
    baseline_id: Uuid,
) -> Result<Vec<Baseline>, EngineError> {
    let target = baselines
        .iter()
        .find(|b| b.id == baseline_id)
        .ok_or_else(|| EngineError::UnknownTask {
            task_id: baseline_id.to_string(),
        })?;
    let project_id = target.project_id.clone();

    let updated = baselines
        .iter()
        .map(|b| {
            let mut b = b.clone();
            if b.project_id == project_id {
                b.active = b.id == baseline_id;
            }
            b
        })
        .collect();
    Ok(updated)
}

/// The only item mutation the engine exposes, and it always fails:
/// baselines are locked at creation and superseded, never edited.
pub fn update_baseline_item(
    baseline: &Baseline,
    _item: &BaselineItem,
) -> Result<(), EngineError> {
    // All baselines are created locked; the check is kept explicit so
    // the invariant lives in one place.
    debug_assert!(baseline.locked);
    Err(EngineError::BaselineLocked {
        baseline_id: baseline.id.to_string(),
    })
}

/// Compares the current schedule against a baseline.
///
/// Re-solves the current tasks in planned mode, then reports per-task
/// start/end/duration variance in minutes (positive = later than
/// baseline) and a project summary. Tasks without planned dates on
/// either side contribute zero variance. `as_of_min` is recorded on the
/// comparison so trend consumers know which point in time it describes.
pub fn compare_baseline(
    items: &[BaselineItem],
    current_tasks: &[Task],
    dependencies: &[Dependency],
    as_of_min: i64,
) -> Result<BaselineComparison, EngineError> {
    validation::validate_tasks(current_tasks).map_err(validation::first_error)?;
    validation::validate_dependencies(current_tasks, dependencies)
        .map_err(validation::first_error)?;

    // The solve validates the current dependency set is still a DAG;
    // variance itself reads planned dates.
    let graph = TaskGraph::build(current_tasks, dependencies)?;
    let project_start = earliest_planned_start(current_tasks);
    let _solution = solver::solve_on_graph(&graph, current_tasks, SolveMode::Planned, project_start);

    let mut variances = Vec::with_capacity(items.len());
    let mut summary = BaselineSummary::default();

    for item in items {
        let current = current_tasks.iter().find(|t| t.id == item.task_id);

        let start_variance = variance(
            current.and_then(|t| t.planned_start_min),
            item.baseline_start_min,
        );
        let end_variance = variance(
            current.and_then(|t| t.planned_end_min),
            item.baseline_end_min,
        );

        if end_variance > 0 {
            summary.late_task_count += 1;
            summary.max_slip_min = summary.max_slip_min.max(end_variance);
            if item.was_critical {
                summary.critical_slip_min += end_variance;
            }
        }

        variances.push(BaselineVariance {
            task_id: item.task_id.clone(),
            start_variance_min: start_variance,
            end_variance_min: end_variance,
            duration_variance_min: end_variance - start_variance,
            was_critical: item.was_critical,
        });
    }

    Ok(BaselineComparison {
        as_of_min,
        items: variances,
        summary,
    })
}

fn variance(current: Option<i64>, baseline: Option<i64>) -> i64 {
    match (current, baseline) {
        (Some(c), Some(b)) => c - b,
        _ => 0,
    }
}

fn earliest_planned_start(tasks: &[Task]) -> i64 {
    tasks
        .iter()
        .filter_map(|t| t.planned_start_min)
        .min()
        .unwrap_or(0)
}
