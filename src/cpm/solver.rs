//! CPM forward/backward solver.
//!
//! # Algorithm
//!
//! 1. Forward pass in topological order: each task's early start is the
//!    maximum contribution over its predecessor edges (floored at the
//!    project start), with the four relationship kinds applied per edge;
//!    early finish = early start + duration.
//! 2. Backward pass in reverse topological order: each task's late
//!    finish is the minimum contribution over its successor edges
//!    (project finish for sinks); late start = late finish - duration.
//! 3. Total float = late start - early start; a task is critical iff
//!    its float is zero. The critical path is the set of all critical
//!    tasks and need not be a single linear chain.
//!
//! Date constraints tighten, never loosen: "no earlier than" raises the
//! early-start floor, "no later than" lowers the late-finish ceiling.
//! A constraint the graph cannot honor is reported as a non-fatal
//! [`ConstraintViolation`], not an error — the caller decides whether a
//! constraint-violating schedule is acceptable.
//!
//! # Complexity
//! O(V + E) per pass.
//!
//! # Reference
//! Kelley & Walker (1959), "Critical-Path Planning and Scheduling"

use std::collections::HashSet;

use crate::error::EngineError;
use crate::models::{
    ConstraintType, ConstraintViolation, DependencyKind, Dependency, ScheduleNode,
    ScheduleSolution, SolveMode, Task, ViolationKind, ViolationSeverity,
};
use crate::validation;

use super::graph::TaskGraph;

/// Per-node solver inputs, resolved from a task and the solve mode.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NodeInput {
    duration_min: i64,
    constraint: ConstraintType,
    constraint_date_min: Option<i64>,
    /// Recorded actual start; pins the early start in `Actual` mode.
    actual_start_min: Option<i64>,
}

/// Resolves solver inputs for every task in arena order.
pub(crate) fn build_inputs(tasks: &[Task], mode: SolveMode) -> Vec<NodeInput> {
    tasks
        .iter()
        .map(|t| NodeInput {
            duration_min: match mode {
                SolveMode::Planned => t.planned_duration_min(),
                SolveMode::Actual => t.actual_duration_min(),
            },
            constraint: t.constraint_type,
            constraint_date_min: t.constraint_date_min,
            actual_start_min: match mode {
                SolveMode::Planned => None,
                SolveMode::Actual => t.actual_start_min,
            },
        })
        .collect()
}

/// Runs the forward pass, writing early start/finish into `es`/`ef`.
///
/// When `restrict` is given, only those nodes are recomputed; the rest
/// keep their existing values and still contribute as predecessors.
/// This is what makes the cascader's subgraph re-solve possible.
pub(crate) fn forward_pass(
    graph: &TaskGraph,
    inputs: &[NodeInput],
    project_start_min: i64,
    restrict: Option<&HashSet<usize>>,
    es: &mut [i64],
    ef: &mut [i64],
    violations: &mut Vec<ConstraintViolation>,
) {
    for &i in graph.topo_order() {
        if let Some(set) = restrict {
            if !set.contains(&i) {
                continue;
            }
        }

        let input = inputs[i];
        let duration = input.duration_min;

        let mut early_start = project_start_min;
        for edge in graph.predecessors(i) {
            let candidate = match edge.kind {
                DependencyKind::FinishToStart => ef[edge.other] + edge.lag_min,
                DependencyKind::StartToStart => es[edge.other] + edge.lag_min,
                // Finish-side kinds constrain the successor's finish;
                // translate back to a start via the duration.
                DependencyKind::FinishToFinish => ef[edge.other] + edge.lag_min - duration,
                DependencyKind::StartToFinish => es[edge.other] + edge.lag_min - duration,
            };
            early_start = early_start.max(candidate);
        }

        match (input.constraint, input.constraint_date_min) {
            (ConstraintType::Asap, _) => {}
            (constraint, None) => {
                violations.push(ConstraintViolation {
                    kind: ViolationKind::MissingConstraintDate,
                    task_id: graph.id_of(i).to_string(),
                    severity: ViolationSeverity::Warning,
                    computed_min: None,
                    constraint_min: None,
                    message: format!(
                        "task {} has constraint {constraint:?} without a date; treated as ASAP",
                        graph.id_of(i)
                    ),
                });
            }
            (ConstraintType::StartNoEarlierThan, Some(date)) => {
                early_start = early_start.max(date);
            }
            (ConstraintType::MustStartOn, Some(date)) => {
                if date >= early_start {
                    early_start = date;
                } else {
                    violations.push(ConstraintViolation {
                        kind: ViolationKind::StartConstraintInfeasible,
                        task_id: graph.id_of(i).to_string(),
                        severity: ViolationSeverity::Critical,
                        computed_min: Some(early_start),
                        constraint_min: Some(date),
                        message: format!(
                            "task {} cannot start before {early_start} but must start on {date}",
                            graph.id_of(i)
                        ),
                    });
                }
            }
            // Finish-side constraints are checked after EF below.
            (ConstraintType::MustFinishOn | ConstraintType::FinishNoLaterThan, Some(_)) => {}
        }

        // A recorded actual start is a fact, not a preference.
        if let Some(actual) = input.actual_start_min {
            early_start = actual;
        }

        let early_finish = early_start + duration;

        if input.constraint.bounds_finish() {
            if let Some(date) = input.constraint_date_min {
                if early_finish > date {
                    violations.push(ConstraintViolation {
                        kind: ViolationKind::FinishConstraintInfeasible,
                        task_id: graph.id_of(i).to_string(),
                        severity: ViolationSeverity::Critical,
                        computed_min: Some(early_finish),
                        constraint_min: Some(date),
                        message: format!(
                            "task {} cannot finish before {early_finish} but is constrained to {date}",
                            graph.id_of(i)
                        ),
                    });
                }
            }
        }

        es[i] = early_start;
        ef[i] = early_finish;
    }
}

/// Runs the backward pass, returning (late start, late finish).
pub(crate) fn backward_pass(
    graph: &TaskGraph,
    inputs: &[NodeInput],
    project_finish_min: i64,
) -> (Vec<i64>, Vec<i64>) {
    let n = graph.len();
    let mut ls = vec![0i64; n];
    let mut lf = vec![0i64; n];

    for &i in graph.topo_order().iter().rev() {
        let duration = inputs[i].duration_min;

        let mut late_finish = if graph.successors(i).is_empty() {
            project_finish_min
        } else {
            let mut min_lf = i64::MAX;
            for edge in graph.successors(i) {
                let candidate = match edge.kind {
                    DependencyKind::FinishToStart => ls[edge.other] - edge.lag_min,
                    DependencyKind::StartToStart => ls[edge.other] - edge.lag_min + duration,
                    DependencyKind::FinishToFinish => lf[edge.other] - edge.lag_min,
                    DependencyKind::StartToFinish => lf[edge.other] - edge.lag_min + duration,
                };
                min_lf = min_lf.min(candidate);
            }
            min_lf
        };

        // A finish constraint tightens, never loosens.
        if inputs[i].constraint.bounds_finish() {
            if let Some(date) = inputs[i].constraint_date_min {
                late_finish = late_finish.min(date);
            }
        }

        lf[i] = late_finish;
        ls[i] = late_finish - duration;
    }

    (ls, lf)
}

/// Project finish: the maximum early finish over all sink tasks.
pub(crate) fn project_finish(graph: &TaskGraph, ef: &[i64], project_start_min: i64) -> i64 {
    graph
        .sinks()
        .into_iter()
        .map(|i| ef[i])
        .max()
        .unwrap_or(project_start_min)
}

/// Assembles a [`ScheduleSolution`] from computed vectors.
pub(crate) fn assemble(
    graph: &TaskGraph,
    es: &[i64],
    ef: &[i64],
    ls: &[i64],
    lf: &[i64],
    finish_min: i64,
    violations: Vec<ConstraintViolation>,
) -> ScheduleSolution {
    let mut nodes = Vec::with_capacity(graph.len());
    let mut critical = Vec::new();

    for i in 0..graph.len() {
        let total_float = ls[i] - es[i];
        let is_critical = total_float == 0;
        if is_critical {
            critical.push(graph.id_of(i).to_string());
        }
        nodes.push(ScheduleNode {
            task_id: graph.id_of(i).to_string(),
            early_start_min: es[i],
            early_finish_min: ef[i],
            late_start_min: ls[i],
            late_finish_min: lf[i],
            total_float_min: total_float,
            is_critical,
        });
    }

    ScheduleSolution {
        nodes,
        critical_path_task_ids: critical,
        project_finish_min: finish_min,
        violations,
    }
}

/// Solves on an already-built graph. Shared by the public entry point,
/// the cascader, and the baseline comparator.
pub(crate) fn solve_on_graph(
    graph: &TaskGraph,
    tasks: &[Task],
    mode: SolveMode,
    project_start_min: i64,
) -> ScheduleSolution {
    let inputs = build_inputs(tasks, mode);
    let n = graph.len();
    let mut es = vec![0i64; n];
    let mut ef = vec![0i64; n];
    let mut violations = Vec::new();

    forward_pass(
        graph,
        &inputs,
        project_start_min,
        None,
        &mut es,
        &mut ef,
        &mut violations,
    );
    let finish = project_finish(graph, &ef, project_start_min);
    let (ls, lf) = backward_pass(graph, &inputs, finish);

    if !violations.is_empty() {
        tracing::warn!(
            violation_count = violations.len(),
            "solve completed with constraint violations"
        );
    }

    assemble(graph, &es, &ef, &ls, &lf, finish, violations)
}

/// Computes a project's full CPM schedule.
///
/// The same deterministic algorithm runs against whichever date inputs
/// `mode` selects: planned dates, or actuals with planned fallback.
/// `project_start_min` is the epoch used for unconstrained roots.
///
/// Structural problems (duplicate ids, invalid date ranges, unknown
/// dependency endpoints, cycles) are fatal. Constraint contradictions
/// are returned in the solution's violation list instead.
///
/// # Example
/// ```
/// use cpm_engine::cpm::solve_schedule;
/// use cpm_engine::models::{Dependency, SolveMode, Task};
///
/// let tasks = vec![
///     Task::new("design").with_planned(0, 480),
///     Task::new("build").with_planned(480, 1440),
/// ];
/// let deps = vec![Dependency::new("design", "build")];
///
/// let solution = solve_schedule(&tasks, &deps, SolveMode::Planned, 0).unwrap();
/// assert_eq!(solution.project_finish_min, 1440);
/// assert_eq!(solution.critical_path_task_ids, vec!["design", "build"]);
/// ```
pub fn solve_schedule(
    tasks: &[Task],
    dependencies: &[Dependency],
    mode: SolveMode,
    project_start_min: i64,
) -> Result<ScheduleSolution, EngineError> {
    validation::validate_tasks(tasks).map_err(validation::first_error)?;
    validation::validate_dependencies(tasks, dependencies).map_err(validation::first_error)?;

    let graph = TaskGraph::build(tasks, dependencies)?;
    tracing::debug!(
        tasks = tasks.len(),
        dependencies = dependencies.len(),
        ?mode,
        "solving schedule"
    );

    Ok(solve_on_graph(&graph, tasks, mode, project_start_min))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DependencyKind;

    fn dur_task(id: &str, start: i64, end: i64) -> Task {
        Task::new(id).with_planned(start, end)
    }

    #[test]
    fn test_linear_chain() {
        let tasks = vec![dur_task("A", 0, 100), dur_task("B", 0, 50)];
        let deps = vec![Dependency::new("A", "B")];
        let solution = solve_schedule(&tasks, &deps, SolveMode::Planned, 0).unwrap();

        let a = solution.node("A").unwrap();
        let b = solution.node("B").unwrap();
        assert_eq!((a.early_start_min, a.early_finish_min), (0, 100));
        assert_eq!((b.early_start_min, b.early_finish_min), (100, 150));
        assert_eq!(solution.project_finish_min, 150);
        assert!(a.is_critical && b.is_critical);
        assert_eq!(a.total_float_min, 0);
    }

    #[test]
    fn test_parallel_branch_float() {
        // A -> B(50) -> D, A -> C(100) -> D: B has 50 float, C none
        let tasks = vec![
            dur_task("A", 0, 100),
            dur_task("B", 0, 50),
            dur_task("C", 0, 100),
            dur_task("D", 0, 30),
        ];
        let deps = vec![
            Dependency::new("A", "B"),
            Dependency::new("A", "C"),
            Dependency::new("B", "D"),
            Dependency::new("C", "D"),
        ];
        let solution = solve_schedule(&tasks, &deps, SolveMode::Planned, 0).unwrap();

        let b = solution.node("B").unwrap();
        let c = solution.node("C").unwrap();
        assert_eq!(b.total_float_min, 50);
        assert!(!b.is_critical);
        assert_eq!(c.total_float_min, 0);
        assert!(c.is_critical);
        assert_eq!(solution.project_finish_min, 230);
        assert_eq!(solution.critical_path_task_ids, vec!["A", "C", "D"]);
    }

    #[test]
    fn test_all_floats_non_negative_and_path_exists() {
        let tasks = vec![
            dur_task("A", 0, 60),
            dur_task("B", 0, 120),
            dur_task("C", 0, 30),
            dur_task("D", 0, 90),
            dur_task("E", 0, 45),
        ];
        let deps = vec![
            Dependency::new("A", "C"),
            Dependency::new("B", "C"),
            Dependency::new("C", "D"),
            Dependency::new("C", "E"),
        ];
        let solution = solve_schedule(&tasks, &deps, SolveMode::Planned, 0).unwrap();

        for node in &solution.nodes {
            assert!(node.total_float_min >= 0, "float for {}", node.task_id);
            assert!(node.late_start_min >= node.early_start_min);
            assert!(node.late_finish_min >= node.early_finish_min);
        }
        // Critical set contains a root and a sink
        assert!(solution.critical_path_task_ids.contains(&"B".to_string()));
        assert!(solution.critical_path_task_ids.contains(&"D".to_string()));
    }

    #[test]
    fn test_lag_and_lead() {
        let tasks = vec![dur_task("A", 0, 100), dur_task("B", 0, 50)];

        let lagged = vec![Dependency::new("A", "B").with_lag(30)];
        let solution = solve_schedule(&tasks, &lagged, SolveMode::Planned, 0).unwrap();
        assert_eq!(solution.node("B").unwrap().early_start_min, 130);

        let lead = vec![Dependency::new("A", "B").with_lag(-20)];
        let solution = solve_schedule(&tasks, &lead, SolveMode::Planned, 0).unwrap();
        assert_eq!(solution.node("B").unwrap().early_start_min, 80);
    }

    #[test]
    fn test_start_to_start() {
        let tasks = vec![dur_task("A", 0, 100), dur_task("B", 0, 50)];
        let deps =
            vec![Dependency::new("A", "B").with_kind(DependencyKind::StartToStart).with_lag(10)];
        let solution = solve_schedule(&tasks, &deps, SolveMode::Planned, 0).unwrap();
        assert_eq!(solution.node("B").unwrap().early_start_min, 10);
        assert_eq!(solution.node("B").unwrap().early_finish_min, 60);
    }

    #[test]
    fn test_finish_to_finish() {
        let tasks = vec![dur_task("A", 0, 100), dur_task("B", 0, 30)];
        let deps = vec![Dependency::new("A", "B").with_kind(DependencyKind::FinishToFinish)];
        let solution = solve_schedule(&tasks, &deps, SolveMode::Planned, 0).unwrap();
        // B must finish no earlier than A's finish: EF 100, ES 70
        let b = solution.node("B").unwrap();
        assert_eq!(b.early_finish_min, 100);
        assert_eq!(b.early_start_min, 70);
    }

    #[test]
    fn test_start_to_finish() {
        let tasks = vec![dur_task("A", 0, 100), dur_task("B", 0, 30)];
        let deps = vec![Dependency::new("A", "B")
            .with_kind(DependencyKind::StartToFinish)
            .with_lag(40)];
        let solution = solve_schedule(&tasks, &deps, SolveMode::Planned, 0).unwrap();
        // B's finish waits on A's start (0) + 40; floor at project start
        // keeps ES >= 0, so ES 10, EF 40
        let b = solution.node("B").unwrap();
        assert_eq!(b.early_finish_min, 40);
        assert_eq!(b.early_start_min, 10);
    }

    #[test]
    fn test_milestone_zero_duration() {
        let tasks = vec![
            dur_task("A", 0, 100),
            Task::new("M").with_planned(0, 0).milestone(),
        ];
        let deps = vec![Dependency::new("A", "M")];
        let solution = solve_schedule(&tasks, &deps, SolveMode::Planned, 0).unwrap();
        let m = solution.node("M").unwrap();
        assert_eq!(m.early_start_min, 100);
        assert_eq!(m.early_finish_min, 100);
        assert!(m.is_critical);
    }

    #[test]
    fn test_start_no_earlier_than_raises_floor() {
        let tasks = vec![
            dur_task("A", 0, 100),
            dur_task("B", 0, 50).with_constraint(ConstraintType::StartNoEarlierThan, 200),
        ];
        let deps = vec![Dependency::new("A", "B")];
        let solution = solve_schedule(&tasks, &deps, SolveMode::Planned, 0).unwrap();
        assert_eq!(solution.node("B").unwrap().early_start_min, 200);
        assert!(solution.is_feasible());
    }

    #[test]
    fn test_root_constraint_is_its_start() {
        let tasks = vec![dur_task("A", 0, 100).with_constraint(ConstraintType::StartNoEarlierThan, 60)];
        let solution = solve_schedule(&tasks, &[], SolveMode::Planned, 0).unwrap();
        assert_eq!(solution.node("A").unwrap().early_start_min, 60);
    }

    #[test]
    fn test_must_finish_on_infeasible_is_warning_not_error() {
        // A takes 100 min but must finish by 50: violation, not Err
        let tasks = vec![dur_task("A", 0, 100).with_constraint(ConstraintType::MustFinishOn, 50)];
        let solution = solve_schedule(&tasks, &[], SolveMode::Planned, 0).unwrap();
        assert!(!solution.is_feasible());
        let v = &solution.violations[0];
        assert_eq!(v.kind, ViolationKind::FinishConstraintInfeasible);
        assert_eq!(v.task_id, "A");
        assert_eq!(v.computed_min, Some(100));
        assert_eq!(v.constraint_min, Some(50));
    }

    #[test]
    fn test_must_finish_on_tightens_late_dates() {
        // A(100) -> B(50); B must finish on 200 while unconstrained LF
        // would be 150... use a feasible tighten: project finish 150,
        // constraint 150 keeps float zero; constraint 160 would loosen
        // and must be ignored in favor of min().
        let tasks = vec![
            dur_task("A", 0, 100),
            dur_task("B", 0, 50).with_constraint(ConstraintType::MustFinishOn, 160),
        ];
        let deps = vec![Dependency::new("A", "B")];
        let solution = solve_schedule(&tasks, &deps, SolveMode::Planned, 0).unwrap();
        let b = solution.node("B").unwrap();
        // Sink LF = project finish 150, not the later constraint date
        assert_eq!(b.late_finish_min, 150);
    }

    #[test]
    fn test_constraint_without_date_reported() {
        let mut task = dur_task("A", 0, 100);
        task.constraint_type = ConstraintType::MustFinishOn;
        let solution = solve_schedule(&[task], &[], SolveMode::Planned, 0).unwrap();
        assert_eq!(
            solution.violations[0].kind,
            ViolationKind::MissingConstraintDate
        );
    }

    #[test]
    fn test_actual_mode_pins_started_tasks() {
        let tasks = vec![
            dur_task("A", 0, 100).with_actual(Some(30), None),
            dur_task("B", 0, 50),
        ];
        let deps = vec![Dependency::new("A", "B")];

        let planned = solve_schedule(&tasks, &deps, SolveMode::Planned, 0).unwrap();
        assert_eq!(planned.node("A").unwrap().early_start_min, 0);

        let actual = solve_schedule(&tasks, &deps, SolveMode::Actual, 0).unwrap();
        assert_eq!(actual.node("A").unwrap().early_start_min, 30);
        assert_eq!(actual.node("B").unwrap().early_start_min, 130);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let tasks = vec![
            dur_task("A", 0, 60),
            dur_task("B", 0, 120),
            dur_task("C", 0, 30),
        ];
        let deps = vec![Dependency::new("A", "C"), Dependency::new("B", "C")];

        let first = solve_schedule(&tasks, &deps, SolveMode::Planned, 0).unwrap();
        let second = solve_schedule(&tasks, &deps, SolveMode::Planned, 0).unwrap();
        assert_eq!(first.nodes, second.nodes);
        assert_eq!(first.critical_path_task_ids, second.critical_path_task_ids);
        assert_eq!(first.project_finish_min, second.project_finish_min);
    }

    #[test]
    fn test_cycle_is_fatal() {
        let tasks = vec![dur_task("A", 0, 10), dur_task("B", 0, 10), dur_task("C", 0, 10)];
        let deps = vec![
            Dependency::new("A", "B"),
            Dependency::new("B", "C"),
            Dependency::new("C", "A"),
        ];
        let err = solve_schedule(&tasks, &deps, SolveMode::Planned, 0).unwrap_err();
        match err {
            EngineError::CycleDetected { task_ids } => {
                assert_eq!(task_ids, vec!["A", "B", "C"]);
            }
            other => panic!("expected CycleDetected, got {other:?}"),
        }
    }

    #[test]
    fn test_unplanned_task_contributes_zero_duration() {
        let tasks = vec![dur_task("A", 0, 100), Task::new("B")];
        let deps = vec![Dependency::new("A", "B")];
        let solution = solve_schedule(&tasks, &deps, SolveMode::Planned, 0).unwrap();
        let b = solution.node("B").unwrap();
        assert_eq!(b.early_start_min, 100);
        assert_eq!(b.early_finish_min, 100);
    }
}
