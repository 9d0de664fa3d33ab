//! Priority-based scheduling-conflict resolver.
//!
//! # Responsibility
//! - Detect overlaps between a candidate block and the existing snapshot.
//! - Displace lower-priority occupants or reschedule the candidate.
//!
//! # Invariants
//! - Intervals are half-open; boundary-touching blocks never conflict.
//! - A strictly higher candidate score displaces every conflicting block;
//!   an equal or lower score reschedules the candidate (ties favor the
//!   incumbent).
//! - Displaced blocks and a rescheduled candidate keep their original
//!   duration; displaced blocks come back with status `Scheduled`.
//! - The input snapshot is never mutated; callers persist the returned
//!   values.

use crate::model::time_block::{BlockStatus, BlockValidationError, TimeBlock};

/// Outcome of resolving one candidate against a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The candidate at its final position.
    pub placed: TimeBlock,
    /// Existing blocks that were moved to make room, in snapshot order.
    ///
    /// Non-empty only when the candidate outranked every conflict.
    pub displaced: Vec<TimeBlock>,
}

impl Resolution {
    /// Whether the candidate landed at its requested interval with nothing
    /// else moved.
    pub fn is_unchanged(&self, candidate: &TimeBlock) -> bool {
        self.displaced.is_empty()
            && self.placed.start_ms == candidate.start_ms
            && self.placed.end_ms == candidate.end_ms
    }
}

/// Places `candidate` against `existing`, resolving overlaps by priority.
///
/// Pure function: no I/O, no shared state. The caller owns persisting
/// `placed` and every entry of `displaced` back to the store.
///
/// # Contract
/// - Entries sharing the candidate's `uuid` are ignored, so re-resolving an
///   already-persisted placement against a full snapshot is a no-op.
/// - `existing` order is the tie-break order: when several conflicts share
///   the maximal end time, the first encountered wins.
///
/// # Errors
/// - Returns the candidate's validation error when its title is blank or its
///   interval is empty/inverted. The snapshot is assumed already valid.
pub fn resolve(
    candidate: &TimeBlock,
    existing: &[TimeBlock],
) -> Result<Resolution, BlockValidationError> {
    candidate.validate()?;

    let conflicts: Vec<&TimeBlock> = existing
        .iter()
        .filter(|block| block.uuid != candidate.uuid && block.overlaps(candidate))
        .collect();

    if conflicts.is_empty() {
        return Ok(Resolution {
            placed: candidate.clone(),
            displaced: Vec::new(),
        });
    }

    let candidate_score = candidate.priority.score();
    let max_conflict_score = conflicts
        .iter()
        .map(|block| block.priority.score())
        .max()
        .unwrap_or(0);

    if candidate_score > max_conflict_score {
        // Candidate wins: push every conflict to start right after it,
        // each keeping its own duration. A displaced block re-enters the
        // calendar as scheduled regardless of its prior state.
        let displaced = conflicts
            .iter()
            .map(|block| {
                let mut moved = (*block).clone();
                let duration = moved.duration_ms();
                moved.start_ms = candidate.end_ms;
                moved.end_ms = candidate.end_ms + duration;
                moved.status = BlockStatus::Scheduled;
                moved
            })
            .collect();

        return Ok(Resolution {
            placed: candidate.clone(),
            displaced,
        });
    }

    // Candidate yields: reschedule it after the latest-ending conflict.
    // Strictly-greater comparison keeps the first of tied end times.
    let mut latest_end = conflicts[0].end_ms;
    for block in &conflicts[1..] {
        if block.end_ms > latest_end {
            latest_end = block.end_ms;
        }
    }

    let mut placed = candidate.clone();
    let duration = placed.duration_ms();
    placed.start_ms = latest_end;
    placed.end_ms = latest_end + duration;

    Ok(Resolution {
        placed,
        displaced: Vec::new(),
    })
}
