//! Project scheduling and resource governance engine.
//!
//! Provides deterministic critical-path scheduling, dependency-driven
//! reschedule cascading, baseline variance tracking, earned value
//! analysis, and resource allocation governance. The engine is pure
//! computation over caller-supplied data — persistence, calendars, and
//! transport belong to the layers above.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Task`, `Dependency`, `ScheduleSolution`,
//!   `Baseline`, `EvMetrics`, `ResourceAllocation`, `AllocationThresholds`
//! - **`cpm`**: Critical Path Method solver (forward/backward pass, float,
//!   critical path) and the reschedule cascader
//! - **`baseline`**: Baseline capture, activation, and variance comparison
//! - **`earned_value`**: PV/EV/AC and the derived indices, plus
//!   append-only snapshots
//! - **`allocation`**: Cumulative-commitment classification and
//!   justification/approval gating
//! - **`validation`**: Input integrity checks (duplicate IDs, date ranges,
//!   dependency endpoints)
//! - **`error`**: The engine's error taxonomy
//!
//! # Time Representation
//!
//! All schedule arithmetic is in whole minutes (`i64`) relative to a
//! caller-defined epoch; fields carry a `_min` suffix. Callers convert
//! to and from wall-clock time at the boundary.
//!
//! # References
//!
//! - Kelley & Walker (1959), "Critical-Path Planning and Scheduling"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - PMI (2019), "The Standard for Earned Value Management"

pub mod allocation;
pub mod baseline;
pub mod cpm;
pub mod earned_value;
pub mod error;
pub mod models;
pub mod validation;
