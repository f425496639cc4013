//! End-to-end workflow over the public API: plan a small project,
//! baseline it, slip a task with a forward cascade, then measure the
//! damage through baseline variance, earned value, and allocation
//! governance.

use cpm_engine::allocation::{classify_allocation, govern_allocation};
use cpm_engine::baseline::{activate_baseline, compare_baseline, create_baseline};
use cpm_engine::cpm::{reschedule_task, solve_schedule, CascadeMode, RescheduleOptions, TaskPatch};
use cpm_engine::earned_value::{compute_earned_value, snapshot_earned_value};
use cpm_engine::error::EngineError;
use cpm_engine::models::{
    AllocationStatus, AllocationThresholds, DateRange, Dependency, DependencyKind,
    ResourceAllocation, SolveMode, Task, TaskCost,
};

const DAY: i64 = 24 * 60;

/// Design -> Build -> Test chain with a parallel Docs branch and a
/// closing Release milestone.
fn project() -> (Vec<Task>, Vec<Dependency>) {
    let tasks = vec![
        Task::new("design").with_name("Design").with_planned(0, 5 * DAY),
        Task::new("build").with_name("Build").with_planned(5 * DAY, 15 * DAY),
        Task::new("test").with_name("Test").with_planned(15 * DAY, 18 * DAY),
        Task::new("docs").with_name("Docs").with_planned(DAY, 5 * DAY),
        Task::new("release")
            .with_name("Release")
            .with_planned(18 * DAY, 18 * DAY)
            .milestone(),
    ];
    let deps = vec![
        Dependency::new("design", "build"),
        Dependency::new("build", "test"),
        // Docs start once design starts, after a one-day lag
        Dependency::new("design", "docs")
            .with_kind(DependencyKind::StartToStart)
            .with_lag(DAY),
        Dependency::new("test", "release"),
        Dependency::new("docs", "release"),
    ];
    (tasks, deps)
}

#[test]
fn plan_slip_and_measure() {
    let (tasks, deps) = project();

    // 1. Initial solve: the design-build-test chain is critical.
    let solution = solve_schedule(&tasks, &deps, SolveMode::Planned, 0).unwrap();
    assert!(solution.is_feasible());
    assert_eq!(solution.project_finish_min, 18 * DAY);
    assert_eq!(
        solution.critical_path_task_ids,
        vec!["design", "build", "test", "release"]
    );
    let docs = solution.node("docs").unwrap();
    assert!(!docs.is_critical);
    assert_eq!(docs.total_float_min, 13 * DAY);

    // 2. Freeze the plan and make it the active baseline.
    let (baseline, items) = create_baseline(&tasks, &deps, "P1", "kickoff").unwrap();
    let baselines = activate_baseline(&[baseline.clone()], baseline.id).unwrap();
    assert!(baselines[0].active);

    // 3. Build slips by three days; the cascade pushes test and release.
    let patch = TaskPatch::new().planned_end(18 * DAY);
    let result = reschedule_task(
        &tasks,
        &deps,
        "build",
        &patch,
        CascadeMode::Forward,
        RescheduleOptions::default(),
    )
    .unwrap();
    assert_eq!(result.cascaded_task_ids, vec!["test", "release"]);
    assert_eq!(result.solution.project_finish_min, 21 * DAY);
    assert_eq!(result.solution.node("test").unwrap().early_start_min, 18 * DAY);
    // Docs is not downstream of build and keeps its dates
    assert_eq!(result.solution.node("docs").unwrap().early_start_min, DAY);

    // 4. Variance against the kickoff baseline, taken at day 20.
    //    Planned dates only moved for build itself; the solver's pushed
    //    dates live in the solution until the caller writes them back.
    let comparison = compare_baseline(&items, &result.tasks, &deps, 20 * DAY).unwrap();
    assert_eq!(comparison.as_of_min, 20 * DAY);
    let build = comparison
        .items
        .iter()
        .find(|v| v.task_id == "build")
        .unwrap();
    assert_eq!(build.end_variance_min, 3 * DAY);
    assert_eq!(build.duration_variance_min, 3 * DAY);
    assert!(build.was_critical);
    assert_eq!(comparison.summary.late_task_count, 1);
    assert_eq!(comparison.summary.max_slip_min, 3 * DAY);
    assert_eq!(comparison.summary.critical_slip_min, 3 * DAY);
}

#[test]
fn earned_value_over_a_slipping_project() {
    let (mut tasks, _) = project();
    tasks[0].percent_complete = 100; // design done
    tasks[1].percent_complete = 30; // build behind plan

    let costs = vec![
        TaskCost::new("design", 5_000.0, 5_500.0),
        TaskCost::new("build", 10_000.0, 4_000.0),
        TaskCost::new("test", 3_000.0, 0.0),
        TaskCost::new("docs", 2_000.0, 0.0),
    ];

    // Day 10: design and docs fully planned, build half way through
    // its day 5-15 window, test not started.
    let metrics = compute_earned_value(&tasks, &costs, 10 * DAY);
    assert_eq!(metrics.bac, 20_000.0);
    assert_eq!(metrics.pv, 12_000.0);
    assert_eq!(metrics.ev, 8_000.0); // 5000 + 3000
    assert_eq!(metrics.ac, 9_500.0);

    let cpi = metrics.cpi.unwrap();
    let spi = metrics.spi.unwrap();
    assert!(cpi < 1.0 && spi < 1.0);
    // EAC extrapolates the overrun: BAC / CPI > BAC
    assert!(metrics.eac > metrics.bac);
    assert!(metrics.vac < 0.0);

    // Snapshots are append-only per (project, as-of)
    let snap = snapshot_earned_value(&[], "P1", &tasks, &costs, 10 * DAY).unwrap();
    let err = snapshot_earned_value(&[snap], "P1", &tasks, &costs, 10 * DAY).unwrap_err();
    assert!(matches!(err, EngineError::SnapshotExists { .. }));
}

#[test]
fn allocation_gating_across_projects() {
    let thresholds = AllocationThresholds::default();
    let window = DateRange::new(0, 30 * DAY);

    // The lead is already at 70% on P1.
    let existing = vec![ResourceAllocation::new("lead", "P1", 70.0, window)];

    // Adding 20% lands at 90%: Tentative, written without ceremony.
    let light = ResourceAllocation::new("lead", "P2", 20.0, window);
    let decision = govern_allocation(&existing, &light, &thresholds).unwrap();
    assert_eq!(decision.status, AllocationStatus::Tentative);

    // Adding 40% lands at 110%: Warning, needs a justification.
    let heavy = ResourceAllocation::new("lead", "P2", 40.0, window);
    assert!(matches!(
        govern_allocation(&existing, &heavy, &thresholds),
        Err(EngineError::OverallocationJustificationRequired { .. })
    ));
    let heavy = heavy.with_justification("P2 go-live overlaps P1 close-out");
    govern_allocation(&existing, &heavy, &thresholds).unwrap();

    // Adding 60% lands at 130%: Critical, approval on top.
    let extreme = ResourceAllocation::new("lead", "P3", 60.0, window)
        .with_justification("firefighting");
    assert!(matches!(
        govern_allocation(&existing, &extreme, &thresholds),
        Err(EngineError::OverallocationApprovalRequired { .. })
    ));
    let extreme = extreme.with_approval("pmo");
    let decision = govern_allocation(&existing, &extreme, &thresholds).unwrap();
    assert_eq!(decision.status, AllocationStatus::Critical);
    assert_eq!(decision.total_percentage, 130.0);

    // A commitment next quarter never stacks with this window.
    let later = ResourceAllocation::new("lead", "P4", 90.0, DateRange::new(90 * DAY, 120 * DAY));
    let decision = classify_allocation(&existing, &later, &thresholds);
    assert_eq!(decision.total_percentage, 90.0);
    assert_eq!(decision.status, AllocationStatus::Tentative);
}
