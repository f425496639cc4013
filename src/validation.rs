//! Input validation for scheduling operations.
//!
//! Checks structural integrity of tasks, dependencies, and allocation
//! requests before the engine runs. Detects:
//! - Duplicate task IDs
//! - Invalid date ranges (end before start, non-positive duration on
//!   non-milestones)
//! - Percent complete outside 0–100
//! - Dependencies referencing unknown tasks or a task itself
//!
//! Validation is a pure preprocessing step: guard functions return all
//! detected errors and mutate nothing. Cycle detection is not done
//! here — the graph builder owns it (Kahn's algorithm reports every
//! task on a cycle, which a local check cannot).

use std::collections::HashSet;

use crate::error::EngineError;
use crate::models::{Dependency, ResourceAllocation, Task};

/// Validation result: `Ok(())` or every detected error.
pub type ValidationResult = Result<(), Vec<EngineError>>;

/// Validates a task list.
///
/// Checks:
/// 1. No duplicate task IDs
/// 2. Planned and actual ranges have end >= start; non-milestone
///    planned ranges have positive duration
/// 3. Percent complete within 0–100
pub fn validate_tasks(tasks: &[Task]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for task in tasks {
        if !seen.insert(task.id.as_str()) {
            errors.push(EngineError::DuplicateTaskId {
                task_id: task.id.clone(),
            });
        }

        if let (Some(s), Some(e)) = (task.planned_start_min, task.planned_end_min) {
            let bad = if task.is_milestone { e < s } else { e <= s };
            if bad {
                errors.push(EngineError::InvalidDateRange {
                    task_id: task.id.clone(),
                    start_min: s,
                    end_min: e,
                });
            }
        }

        if let (Some(s), Some(e)) = (task.actual_start_min, task.actual_end_min) {
            if e < s {
                errors.push(EngineError::InvalidDateRange {
                    task_id: task.id.clone(),
                    start_min: s,
                    end_min: e,
                });
            }
        }

        if task.percent_complete > 100 {
            errors.push(EngineError::InvalidPercentComplete {
                task_id: task.id.clone(),
                value: task.percent_complete,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates dependency references against a task list.
///
/// Checks that both endpoints of every edge exist and that no task
/// depends on itself.
pub fn validate_dependencies(tasks: &[Task], dependencies: &[Dependency]) -> ValidationResult {
    let ids: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    let mut errors = Vec::new();

    for dep in dependencies {
        if !ids.contains(dep.predecessor_id.as_str()) {
            errors.push(EngineError::UnknownTask {
                task_id: dep.predecessor_id.clone(),
            });
        }
        if !ids.contains(dep.successor_id.as_str()) {
            errors.push(EngineError::UnknownTask {
                task_id: dep.successor_id.clone(),
            });
        }
        if dep.predecessor_id == dep.successor_id {
            errors.push(EngineError::CycleDetected {
                task_ids: vec![dep.predecessor_id.clone()],
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates an allocation request before governance.
///
/// Checks the date range and that the percentage is positive.
pub fn validate_allocation(allocation: &ResourceAllocation) -> ValidationResult {
    let mut errors = Vec::new();

    if allocation.range.end_min <= allocation.range.start_min {
        errors.push(EngineError::InvalidDateRange {
            task_id: allocation.resource_id.clone(),
            start_min: allocation.range.start_min,
            end_min: allocation.range.end_min,
        });
    }

    if allocation.percentage <= 0.0 {
        errors.push(EngineError::InvalidPercentComplete {
            task_id: allocation.resource_id.clone(),
            value: 0,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Surfaces the first of a guard's errors as the operation's error.
///
/// Engine entry points return a single `EngineError`; callers wanting
/// the full list invoke the guard functions directly.
pub(crate) fn first_error(errors: Vec<EngineError>) -> EngineError {
    errors
        .into_iter()
        .next()
        .unwrap_or(EngineError::UnknownTask {
            task_id: String::new(),
        })
}
