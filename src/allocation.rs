//! Resource allocation governance.
//!
//! Before an allocation is written, the governor sums the resource's
//! existing commitments over every range overlapping the proposed one
//! and classifies the combined total against the configured thresholds.
//! Over-commitment is allowed, but gated: `Warning` writes need a
//! justification, `Critical` writes additionally need an approval
//! marker. The engine never silently caps or rewrites a percentage.
//!
//! Classification is additive worst case: every overlapping row counts
//! in full, even rows that do not overlap each other. The finer-grained
//! [`peak_allocation`] sweep answers "what is the worst concurrent
//! load" as a read-only query.

use crate::error::EngineError;
use crate::models::{AllocationStatus, AllocationThresholds, DateRange, ResourceAllocation};
use crate::validation;

/// Outcome of classifying a proposed allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationDecision {
    /// Band the combined commitment falls in.
    pub status: AllocationStatus,
    /// Cumulative percentage over the proposed range: every existing
    /// overlapping row plus the proposed allocation itself.
    pub total_percentage: f64,
    /// Whether the write needs a non-empty justification.
    pub requires_justification: bool,
    /// Whether the write additionally needs an approval marker.
    pub requires_approval: bool,
}

/// Classifies a proposed allocation against a resource's existing
/// commitments.
///
/// Pure query: computes the combined percentage over the proposed range
/// and the resulting [`AllocationStatus`], without enforcing anything.
/// Rows for other resources are ignored.
pub fn classify_allocation(
    existing: &[ResourceAllocation],
    proposed: &ResourceAllocation,
    thresholds: &AllocationThresholds,
) -> AllocationDecision {
    let total = proposed.percentage
        + existing
            .iter()
            .filter(|a| a.resource_id == proposed.resource_id && a.range.overlaps(&proposed.range))
            .map(|a| a.percentage)
            .sum::<f64>();
    let status = thresholds.classify(total);
    AllocationDecision {
        status,
        total_percentage: total,
        requires_justification: status.requires_justification(),
        requires_approval: status.requires_approval(),
    }
}

/// Validates and gates an allocation write.
///
/// Returns the decision when the write is admissible. A `Warning`-band
/// write without a non-empty justification fails with
/// [`EngineError::OverallocationJustificationRequired`]; a
/// `Critical`-band write without an approval marker fails with
/// [`EngineError::OverallocationApprovalRequired`] (a justification
/// alone is not enough at `Critical`). Both are recoverable by
/// resubmitting the same allocation with the missing field attached.
pub fn govern_allocation(
    existing: &[ResourceAllocation],
    proposed: &ResourceAllocation,
    thresholds: &AllocationThresholds,
) -> Result<AllocationDecision, EngineError> {
    validation::validate_allocation(proposed).map_err(validation::first_error)?;

    let decision = classify_allocation(existing, proposed, thresholds);

    if decision.requires_approval && !proposed.has_approval() {
        tracing::warn!(
            resource_id = %proposed.resource_id,
            total = decision.total_percentage,
            "critical overallocation rejected without approval"
        );
        return Err(EngineError::OverallocationApprovalRequired {
            resource_id: proposed.resource_id.clone(),
            total_percentage: decision.total_percentage,
        });
    }
    if decision.requires_justification && !proposed.has_justification() {
        tracing::warn!(
            resource_id = %proposed.resource_id,
            total = decision.total_percentage,
            "overallocation rejected without justification"
        );
        return Err(EngineError::OverallocationJustificationRequired {
            resource_id: proposed.resource_id.clone(),
            total_percentage: decision.total_percentage,
        });
    }

    Ok(decision)
}

/// Peak cumulative percentage committed for `resource_id` over any
/// moment inside `window`, from `existing` rows alone.
///
/// Sweeps the range boundaries that fall inside the window; between two
/// consecutive boundaries the committed set is constant, so sampling
/// each segment start is exact.
pub fn peak_allocation(
    existing: &[ResourceAllocation],
    resource_id: &str,
    window: &DateRange,
) -> f64 {
    let rows: Vec<&ResourceAllocation> = existing
        .iter()
        .filter(|a| a.resource_id == resource_id && a.range.overlaps(window))
        .collect();
    if rows.is_empty() {
        return 0.0;
    }

    let mut points: Vec<i64> = vec![window.start_min];
    for row in &rows {
        if window.contains(row.range.start_min) {
            points.push(row.range.start_min);
        }
    }
    points.sort_unstable();
    points.dedup();

    points
        .into_iter()
        .map(|t| {
            rows.iter()
                .filter(|r| r.range.contains(t))
                .map(|r| r.percentage)
                .sum::<f64>()
        })
        .fold(0.0, f64::max)
}
