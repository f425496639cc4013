//! Schedule solution model.
//!
//! [`ScheduleNode`] is the per-task output of a CPM solve: early/late
//! start and finish, total float, and critical-path membership. Nodes
//! are derived fresh on every solve and never mutated in place.
//!
//! [`ScheduleSolution`] bundles the nodes with the critical path, the
//! project finish, and any non-fatal constraint violations collected
//! during the passes.
//!
//! # Reference
//! Kelley & Walker (1959), "Critical-Path Planning and Scheduling"

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which date inputs a solve reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveMode {
    /// Planned dates and durations.
    #[default]
    Planned,
    /// Actual dates where present, falling back to planned for
    /// incomplete tasks.
    Actual,
}

/// Solver output for a single task.
///
/// Invariants (checked by the solver, relied on by consumers):
/// `late_start >= early_start`, `late_finish >= early_finish`,
/// `total_float == late_start - early_start`, and
/// `is_critical == (total_float == 0)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleNode {
    /// Task this node describes.
    pub task_id: String,
    /// Earliest feasible start (minutes).
    pub early_start_min: i64,
    /// Earliest feasible finish (minutes).
    pub early_finish_min: i64,
    /// Latest start that does not delay the project (minutes).
    pub late_start_min: i64,
    /// Latest finish that does not delay the project (minutes).
    pub late_finish_min: i64,
    /// Slack: `late_start - early_start` (minutes).
    pub total_float_min: i64,
    /// Whether the task lies on the critical path (zero float).
    pub is_critical: bool,
}

/// Severity of a constraint violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViolationSeverity {
    /// Informational — no scheduling impact.
    Info,
    /// The schedule is usable but misses a stated preference.
    Warning,
    /// A hard constraint cannot be met; the schedule is suspect.
    Critical,
}

/// Kinds of constraint violations a solve can report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// A must-finish-on / no-later-than date precedes the minimum
    /// feasible finish given the task's predecessors.
    FinishConstraintInfeasible,
    /// A must-start-on date precedes the earliest feasible start.
    StartConstraintInfeasible,
    /// A constraint type other than ASAP carries no constraint date.
    MissingConstraintDate,
}

/// A non-fatal constraint violation.
///
/// Violations are collected and returned alongside a best-effort
/// solution rather than aborting: a schedule with one infeasible
/// constraint is still useful to inspect. Callers decide whether to
/// treat the list as blocking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    /// Kind of violation.
    pub kind: ViolationKind,
    /// Offending task.
    pub task_id: String,
    /// Severity level.
    pub severity: ViolationSeverity,
    /// The date the solver computed (minutes), where applicable.
    pub computed_min: Option<i64>,
    /// The constraint date that was contradicted (minutes).
    pub constraint_min: Option<i64>,
    /// Human-readable description.
    pub message: String,
}

/// Complete output of a CPM solve.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleSolution {
    /// Per-task timing nodes.
    pub nodes: Vec<ScheduleNode>,
    /// IDs of all zero-float tasks. Not necessarily one linear chain;
    /// parallel critical chains are valid.
    pub critical_path_task_ids: Vec<String>,
    /// Maximum early finish over all sink tasks (minutes).
    pub project_finish_min: i64,
    /// Non-fatal constraint violations found during the passes.
    pub violations: Vec<ConstraintViolation>,
}

impl ScheduleSolution {
    /// Finds the node for a given task.
    pub fn node(&self, task_id: &str) -> Option<&ScheduleNode> {
        self.nodes.iter().find(|n| n.task_id == task_id)
    }

    /// Nodes indexed by task id.
    pub fn nodes_by_id(&self) -> HashMap<&str, &ScheduleNode> {
        self.nodes.iter().map(|n| (n.task_id.as_str(), n)).collect()
    }

    /// Whether no constraint was violated.
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of critical tasks.
    pub fn critical_count(&self) -> usize {
        self.critical_path_task_ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, es: i64, ef: i64, ls: i64, lf: i64) -> ScheduleNode {
        ScheduleNode {
            task_id: id.into(),
            early_start_min: es,
            early_finish_min: ef,
            late_start_min: ls,
            late_finish_min: lf,
            total_float_min: ls - es,
            is_critical: ls == es,
        }
    }

    #[test]
    fn test_solution_queries() {
        let solution = ScheduleSolution {
            nodes: vec![node("A", 0, 100, 0, 100), node("B", 100, 150, 120, 170)],
            critical_path_task_ids: vec!["A".into()],
            project_finish_min: 170,
            violations: Vec::new(),
        };

        assert!(solution.is_feasible());
        assert_eq!(solution.critical_count(), 1);
        assert_eq!(solution.node("A").unwrap().early_finish_min, 100);
        assert!(solution.node("Z").is_none());

        let by_id = solution.nodes_by_id();
        assert_eq!(by_id["B"].total_float_min, 20);
    }

    #[test]
    fn test_violation_severity_ordering() {
        assert!(ViolationSeverity::Critical > ViolationSeverity::Warning);
        assert!(ViolationSeverity::Warning > ViolationSeverity::Info);
    }

    #[test]
    fn test_solution_serde_round_trip() {
        let solution = ScheduleSolution {
            nodes: vec![node("A", 0, 100, 0, 100)],
            critical_path_task_ids: vec!["A".into()],
            project_finish_min: 100,
            violations: vec![ConstraintViolation {
                kind: ViolationKind::FinishConstraintInfeasible,
                task_id: "A".into(),
                severity: ViolationSeverity::Warning,
                computed_min: Some(100),
                constraint_min: Some(50),
                message: "finish 100 exceeds must-finish-on 50".into(),
            }],
        };
        let json = serde_json::to_string(&solution).unwrap();
        let back: ScheduleSolution = serde_json::from_str(&json).unwrap();
        assert_eq!(back.nodes, solution.nodes);
    }
}
