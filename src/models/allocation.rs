//! Resource allocation models.
//!
//! An allocation commits a percentage of a resource to a project over a
//! date range. Allocations overlapping in time for the same resource
//! compose additively; the governor classifies the combined commitment
//! against configurable thresholds.
//!
//! # Time Representation
//! Ranges are half-open intervals `[start, end)` in minutes relative to
//! the scheduling epoch.

use serde::{Deserialize, Serialize};

/// A time interval [start, end).
///
/// Half-open: includes start, excludes end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Interval start (minutes, inclusive).
    pub start_min: i64,
    /// Interval end (minutes, exclusive).
    pub end_min: i64,
}

impl DateRange {
    /// Creates a new range.
    pub fn new(start_min: i64, end_min: i64) -> Self {
        Self { start_min, end_min }
    }

    /// Length of this range (minutes).
    #[inline]
    pub fn duration_min(&self) -> i64 {
        self.end_min - self.start_min
    }

    /// Whether a timestamp falls within this range.
    #[inline]
    pub fn contains(&self, time_min: i64) -> bool {
        time_min >= self.start_min && time_min < self.end_min
    }

    /// Whether two ranges overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_min < other.end_min && other.start_min < self.end_min
    }
}

/// A percentage commitment of a resource to a project over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceAllocation {
    /// Resource being committed.
    pub resource_id: String,
    /// Project the commitment belongs to.
    pub project_id: String,
    /// Committed share of capacity (100.0 = full time).
    pub percentage: f64,
    /// Commitment window.
    pub range: DateRange,
    /// Reason for over-commitment. Required for `Warning` writes.
    pub justification: Option<String>,
    /// Approver marker (e.g., an approver's user id). Required for
    /// `Critical` writes.
    pub approved_by: Option<String>,
}

impl ResourceAllocation {
    /// Creates an allocation.
    pub fn new(
        resource_id: impl Into<String>,
        project_id: impl Into<String>,
        percentage: f64,
        range: DateRange,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            project_id: project_id.into(),
            percentage,
            range,
            justification: None,
            approved_by: None,
        }
    }

    /// Attaches a justification.
    pub fn with_justification(mut self, justification: impl Into<String>) -> Self {
        self.justification = Some(justification.into());
        self
    }

    /// Attaches an approval marker.
    pub fn with_approval(mut self, approved_by: impl Into<String>) -> Self {
        self.approved_by = Some(approved_by.into());
        self
    }

    /// Whether a non-empty justification is attached.
    pub fn has_justification(&self) -> bool {
        self.justification
            .as_deref()
            .map(|j| !j.trim().is_empty())
            .unwrap_or(false)
    }

    /// Whether an approval marker is attached.
    pub fn has_approval(&self) -> bool {
        self.approved_by
            .as_deref()
            .map(|a| !a.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Classification of a resource's cumulative commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AllocationStatus {
    /// Comfortably under capacity.
    Safe,
    /// Approaching capacity.
    Tentative,
    /// Over capacity; write requires a justification.
    Warning,
    /// Far over capacity; write additionally requires approval.
    Critical,
}

impl AllocationStatus {
    /// Whether a write at this status requires a justification.
    #[inline]
    pub fn requires_justification(self) -> bool {
        matches!(self, Self::Warning | Self::Critical)
    }

    /// Whether a write at this status requires an approval marker.
    #[inline]
    pub fn requires_approval(self) -> bool {
        matches!(self, Self::Critical)
    }
}

/// Classification thresholds, as cumulative percentages.
///
/// Deployment configuration, not hard-coded policy: a tenant can tune
/// the bands. The defaults give Safe < 80, Tentative 80–100,
/// Warning 100–120, Critical > 120.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationThresholds {
    /// Totals strictly below this are `Safe`.
    pub safe_below: f64,
    /// Totals in `[safe_below, tentative_up_to]` are `Tentative`.
    pub tentative_up_to: f64,
    /// Totals in `(tentative_up_to, warning_up_to]` are `Warning`;
    /// above is `Critical`.
    pub warning_up_to: f64,
}

impl Default for AllocationThresholds {
    fn default() -> Self {
        Self {
            safe_below: 80.0,
            tentative_up_to: 100.0,
            warning_up_to: 120.0,
        }
    }
}

impl AllocationThresholds {
    /// Whether the three bounds are ordered and non-negative.
    pub fn is_valid(&self) -> bool {
        self.safe_below >= 0.0
            && self.safe_below <= self.tentative_up_to
            && self.tentative_up_to <= self.warning_up_to
    }

    /// Classifies a cumulative percentage.
    pub fn classify(&self, total: f64) -> AllocationStatus {
        if total < self.safe_below {
            AllocationStatus::Safe
        } else if total <= self.tentative_up_to {
            AllocationStatus::Tentative
        } else if total <= self.warning_up_to {
            AllocationStatus::Warning
        } else {
            AllocationStatus::Critical
        }
    }
}
