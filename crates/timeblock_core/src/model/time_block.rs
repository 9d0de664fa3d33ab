//! Time-block domain model.
//!
//! # Responsibility
//! - Define the canonical scheduled-interval record and its priority tiers.
//! - Provide validation used by every write and resolution path.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another block.
//! - The interval is half-open `[start_ms, end_ms)` and `end_ms > start_ms`.
//! - `created_at_ms` / `updated_at_ms` are owned by the store; in-memory
//!   values are ignored on writes and refreshed on read-back.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a scheduled time-block.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type BlockId = Uuid;

/// Eisenhower-style priority tier, ordered by scheduling weight.
///
/// Serialized with the kebab-case names used by the external calendar schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    /// Highest tier, score 3.
    #[serde(rename = "urgent-important")]
    UrgentImportant,
    /// Score 2.
    #[serde(rename = "important")]
    Important,
    /// Score 1.
    #[serde(rename = "urgent")]
    Urgent,
    /// Lowest tier, score 0.
    #[serde(rename = "neither")]
    Neither,
}

impl Priority {
    /// Numeric rank used to totally order tiers during conflict resolution.
    pub fn score(self) -> u8 {
        match self {
            Self::UrgentImportant => 3,
            Self::Important => 2,
            Self::Urgent => 1,
            Self::Neither => 0,
        }
    }
}

/// Lifecycle state of a time-block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockStatus {
    /// Placed on the calendar; the only state the resolver produces.
    Scheduled,
    /// Handed off to a delegation service.
    Delegated,
    /// Finished.
    Completed,
    /// No longer planned.
    Cancelled,
}

/// Validation error for time-block field invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockValidationError {
    /// Title must contain at least one non-whitespace character.
    EmptyTitle,
    /// `end_ms` must be strictly greater than `start_ms`.
    InvalidInterval { start_ms: i64, end_ms: i64 },
}

impl Display for BlockValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "time-block title cannot be empty"),
            Self::InvalidInterval { start_ms, end_ms } => write!(
                f,
                "time-block interval is invalid: end {end_ms} must be after start {start_ms}"
            ),
        }
    }
}

impl Error for BlockValidationError {}

/// Canonical scheduled calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    /// Stable global ID used for linking, updates and auditing.
    pub uuid: BlockId,
    /// Display title.
    pub title: String,
    /// Interval start, Unix epoch milliseconds.
    pub start_ms: i64,
    /// Interval end, Unix epoch milliseconds. Exclusive.
    pub end_ms: i64,
    /// Scheduling weight used by the conflict resolver.
    pub priority: Priority,
    /// Whether the task may be handed to a delegation service.
    ///
    /// Carried for the delegation workflow; the resolver ignores it.
    pub delegatable: bool,
    /// Lifecycle state.
    pub status: BlockStatus,
    /// Store-assigned creation timestamp, epoch milliseconds.
    pub created_at_ms: i64,
    /// Store-assigned last-write timestamp, epoch milliseconds.
    pub updated_at_ms: i64,
}

impl TimeBlock {
    /// Creates a scheduled block with a generated stable ID.
    ///
    /// # Invariants
    /// - `status` starts as `Scheduled`.
    /// - Store timestamps start at zero until the first write.
    pub fn new(title: impl Into<String>, start_ms: i64, end_ms: i64, priority: Priority) -> Self {
        Self::with_id(Uuid::new_v4(), title, start_ms, end_ms, priority)
    }

    /// Creates a block with a caller-provided stable ID.
    ///
    /// Used by import/restore paths where identity already exists externally.
    pub fn with_id(
        uuid: BlockId,
        title: impl Into<String>,
        start_ms: i64,
        end_ms: i64,
        priority: Priority,
    ) -> Self {
        Self {
            uuid,
            title: title.into(),
            start_ms,
            end_ms,
            priority,
            delegatable: false,
            status: BlockStatus::Scheduled,
            created_at_ms: 0,
            updated_at_ms: 0,
        }
    }

    /// Checks field invariants required before persistence or resolution.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank.
    /// - `InvalidInterval` when `end_ms <= start_ms`.
    pub fn validate(&self) -> Result<(), BlockValidationError> {
        if self.title.trim().is_empty() {
            return Err(BlockValidationError::EmptyTitle);
        }
        if self.end_ms <= self.start_ms {
            return Err(BlockValidationError::InvalidInterval {
                start_ms: self.start_ms,
                end_ms: self.end_ms,
            });
        }
        Ok(())
    }

    /// Interval length in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    /// Half-open interval overlap test.
    ///
    /// An interval ending exactly when another starts does not overlap.
    pub fn overlaps(&self, other: &TimeBlock) -> bool {
        self.start_ms < other.end_ms && other.start_ms < self.end_ms
    }
}
