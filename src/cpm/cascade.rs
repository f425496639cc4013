//! Reschedule cascading.
//!
//! Applies a single task mutation and propagates it through the
//! dependency graph. In `Forward` mode only the changed task and its
//! successor-reachable subgraph are re-solved in the forward direction;
//! the updated early values are merged into the full node set and the
//! backward pass is recomputed over the merge (a stale backward pass
//! would break the `late >= early` invariant).
//!
//! # Atomicity
//! The cascader works on owned copies and returns whole results:
//! either the caller receives every updated task and node, or (when a
//! violation is configured as blocking) an error and nothing else.
//! Partial cascades are impossible by construction. Serializing
//! concurrent mutations of the same project remains the caller's
//! responsibility — the engine is a pure function of its snapshot.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{
    ConstraintType, ConstraintViolation, Dependency, ScheduleSolution, SolveMode, Task,
};
use crate::validation;

use super::graph::TaskGraph;
use super::solver;

/// How far a mutation propagates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CascadeMode {
    /// Apply the change to the target task only.
    None,
    /// Re-solve the target and everything reachable via successor
    /// edges.
    #[default]
    Forward,
}

/// A partial update to one task. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    /// New planned start (minutes).
    pub planned_start_min: Option<i64>,
    /// New planned end (minutes).
    pub planned_end_min: Option<i64>,
    /// New progress percentage.
    pub percent_complete: Option<u8>,
    /// New milestone flag.
    pub is_milestone: Option<bool>,
    /// New constraint. `Some((Asap, None))` clears an existing one.
    pub constraint: Option<(ConstraintType, Option<i64>)>,
}

impl TaskPatch {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new planned start.
    pub fn planned_start(mut self, start_min: i64) -> Self {
        self.planned_start_min = Some(start_min);
        self
    }

    /// Sets a new planned end.
    pub fn planned_end(mut self, end_min: i64) -> Self {
        self.planned_end_min = Some(end_min);
        self
    }

    /// Sets a new progress percentage.
    pub fn percent_complete(mut self, pct: u8) -> Self {
        self.percent_complete = Some(pct);
        self
    }

    /// Sets the milestone flag.
    pub fn milestone(mut self, is_milestone: bool) -> Self {
        self.is_milestone = Some(is_milestone);
        self
    }

    /// Sets a new constraint.
    pub fn constraint(mut self, constraint: ConstraintType, date_min: Option<i64>) -> Self {
        self.constraint = Some((constraint, date_min));
        self
    }

    fn apply(&self, task: &mut Task) {
        if let Some(start) = self.planned_start_min {
            task.planned_start_min = Some(start);
        }
        if let Some(end) = self.planned_end_min {
            task.planned_end_min = Some(end);
        }
        if let Some(pct) = self.percent_complete {
            task.percent_complete = pct.min(100);
        }
        if let Some(ms) = self.is_milestone {
            task.is_milestone = ms;
        }
        if let Some((constraint, date)) = self.constraint {
            task.constraint_type = constraint;
            task.constraint_date_min = date;
        }
    }
}

/// Cascade policy knobs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RescheduleOptions {
    /// Treat constraint violations as fatal: the cascade returns an
    /// error and no updated state instead of violation warnings.
    pub block_on_violation: bool,
}

/// Output of a reschedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleResult {
    /// The directly patched task.
    pub updated_task_id: String,
    /// Successors whose schedule was recomputed, in topological order.
    /// Empty in `CascadeMode::None`.
    pub cascaded_task_ids: Vec<String>,
    /// Constraint violations present after the patch (warnings unless
    /// `block_on_violation` was set, in which case they arrive as an
    /// error instead).
    pub violations: Vec<ConstraintViolation>,
    /// The full task list with the patch applied.
    pub tasks: Vec<Task>,
    /// The re-solved schedule.
    pub solution: ScheduleSolution,
}

/// Applies a patch to one task and cascades the change.
///
/// The input `tasks` are not modified; the updated list is returned in
/// the result. Planned mode is used throughout — cascading operates on
/// the plan, not on actuals.
///
/// # Errors
/// - [`EngineError::UnknownTask`] when `task_id` is not in `tasks`
/// - [`EngineError::InvalidDateRange`] when the patch produces an
///   invalid planned window
/// - [`EngineError::CycleDetected`] when the dependency set is not a DAG
/// - [`EngineError::ConstraintViolations`] when violations exist and
///   `options.block_on_violation` is set
pub fn reschedule_task(
    tasks: &[Task],
    dependencies: &[Dependency],
    task_id: &str,
    patch: &TaskPatch,
    cascade_mode: CascadeMode,
    options: RescheduleOptions,
) -> Result<RescheduleResult, EngineError> {
    let target_pos = tasks
        .iter()
        .position(|t| t.id == task_id)
        .ok_or_else(|| EngineError::UnknownTask {
            task_id: task_id.to_string(),
        })?;

    let mut updated: Vec<Task> = tasks.to_vec();
    patch.apply(&mut updated[target_pos]);

    validation::validate_tasks(&updated).map_err(validation::first_error)?;
    validation::validate_dependencies(&updated, dependencies)
        .map_err(validation::first_error)?;

    let graph = TaskGraph::build(&updated, dependencies)?;
    let target_index = target_pos; // arena order == input order

    // Project start: the engine has no ambient epoch, so reuse the
    // earliest planned start as the forward-pass floor.
    let project_start = updated
        .iter()
        .filter_map(|t| t.planned_start_min)
        .min()
        .unwrap_or(0);

    let (solution, cascaded_task_ids) = match cascade_mode {
        CascadeMode::None => {
            // No propagation: solve for visibility only and report the
            // violations the patch introduced on the target itself.
            let mut solution =
                solver::solve_on_graph(&graph, &updated, SolveMode::Planned, project_start);
            solution.violations.retain(|v| v.task_id == task_id);
            (solution, Vec::new())
        }
        CascadeMode::Forward => {
            let solution = forward_restricted_solve(&graph, &updated, project_start, target_index);
            let reachable = graph.reachable_from(target_index);
            let cascaded: Vec<String> = graph
                .topo_order()
                .iter()
                .copied()
                .filter(|i| reachable.contains(i))
                .map(|i| graph.id_of(i).to_string())
                .collect();
            (solution, cascaded)
        }
    };

    if options.block_on_violation && !solution.violations.is_empty() {
        tracing::warn!(
            task_id,
            violation_count = solution.violations.len(),
            "reschedule blocked by constraint violations"
        );
        return Err(EngineError::ConstraintViolations {
            violations: solution.violations,
        });
    }

    tracing::debug!(
        task_id,
        cascaded = cascaded_task_ids.len(),
        "reschedule applied"
    );

    Ok(RescheduleResult {
        updated_task_id: task_id.to_string(),
        cascaded_task_ids,
        violations: solution.violations.clone(),
        tasks: updated,
        solution,
    })
}

/// Full solve of the pre-patch state, then a forward re-pass restricted
/// to the target and its reachable successors, then a fresh backward
/// pass over the merged early values.
fn forward_restricted_solve(
    graph: &TaskGraph,
    updated: &[Task],
    project_start: i64,
    target_index: usize,
) -> ScheduleSolution {
    let inputs = solver::build_inputs(updated, SolveMode::Planned);
    let n = graph.len();
    let mut es = vec![0i64; n];
    let mut ef = vec![0i64; n];

    // Baseline forward pass over everything so non-reachable nodes
    // carry valid values for the restricted pass to read.
    let mut violations = Vec::new();
    solver::forward_pass(
        graph,
        &inputs,
        project_start,
        None,
        &mut es,
        &mut ef,
        &mut violations,
    );

    // Restricted re-pass: the target plus everything reachable from it.
    let mut restrict = graph.reachable_from(target_index);
    restrict.insert(target_index);
    violations.clear();
    solver::forward_pass(
        graph,
        &inputs,
        project_start,
        Some(&restrict),
        &mut es,
        &mut ef,
        &mut violations,
    );

    let finish = solver::project_finish(graph, &ef, project_start);
    let (ls, lf) = solver::backward_pass(graph, &inputs, finish);
    solver::assemble(graph, &es, &ef, &ls, &lf, finish, violations)
}
