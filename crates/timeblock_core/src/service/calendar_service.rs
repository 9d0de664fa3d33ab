//! Calendar use-case service.
//!
//! # Responsibility
//! - Schedule candidate blocks: snapshot, resolve, persist placements.
//! - Provide export/import and obfuscated backup/restore of calendar data.
//!
//! # Invariants
//! - The repository is injected explicitly; no process-wide singleton.
//! - Scheduling persists the placed candidate and every displaced block, or
//!   nothing when validation fails up front.
//! - Import/restore replace the whole block set transactionally.

use crate::model::time_block::{BlockId, BlockValidationError, TimeBlock};
use crate::obfuscate::{self, ObfuscateError};
use crate::repo::block_repo::{BlockRepository, RepoError};
use crate::schedule::resolver::{resolve, Resolution};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// JSON envelope for export/import and backup payloads.
///
/// Mirrors the external calendar schema: blocks plus the owner's hourly
/// rate used by delegation budgeting. The rate's seeded default lives in
/// the initial migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarSnapshot {
    pub time_blocks: Vec<TimeBlock>,
    pub hourly_rate: f64,
}

/// Service error for calendar use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Candidate or imported block failed field validation.
    Validation(BlockValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Export/import payload could not be (de)serialized.
    Serde(serde_json::Error),
    /// Backup payload could not be decoded.
    Obfuscation(ObfuscateError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Serde(err) => write!(f, "invalid calendar payload: {err}"),
            Self::Obfuscation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Serde(err) => Some(err),
            Self::Obfuscation(err) => Some(err),
        }
    }
}

impl From<BlockValidationError> for ServiceError {
    fn from(value: BlockValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

impl From<ObfuscateError> for ServiceError {
    fn from(value: ObfuscateError) -> Self {
        Self::Obfuscation(value)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Use-case service wrapper over a block repository.
pub struct CalendarService<R: BlockRepository> {
    repo: R,
}

impl<R: BlockRepository> CalendarService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Schedules a candidate block, resolving conflicts by priority.
    ///
    /// # Contract
    /// - Snapshot order is repository insertion order, which fixes the
    ///   resolver's end-time tie-break.
    /// - The placed candidate is created (or updated when it already exists)
    ///   and every displaced block is written back.
    ///
    /// # Side effects
    /// - Emits `schedule_block` logging events with conflict counts.
    pub fn schedule(&self, candidate: &TimeBlock) -> ServiceResult<Resolution> {
        let snapshot = self.repo.list_blocks()?;
        let resolution = match resolve(candidate, &snapshot) {
            Ok(resolution) => resolution,
            Err(err) => {
                warn!(
                    "event=schedule_block module=service status=rejected block={} error={}",
                    candidate.uuid, err
                );
                return Err(err.into());
            }
        };

        if snapshot.iter().any(|block| block.uuid == candidate.uuid) {
            self.repo.update_block(&resolution.placed)?;
        } else {
            self.repo.create_block(&resolution.placed)?;
        }

        for moved in &resolution.displaced {
            self.repo.update_block(moved)?;
        }

        info!(
            "event=schedule_block module=service status=ok block={} rescheduled={} displaced={}",
            resolution.placed.uuid,
            resolution.placed.start_ms != candidate.start_ms,
            resolution.displaced.len()
        );

        Ok(resolution)
    }

    /// Lists all blocks in insertion order.
    pub fn list_blocks(&self) -> ServiceResult<Vec<TimeBlock>> {
        Ok(self.repo.list_blocks()?)
    }

    /// Owner's hourly rate from persisted settings.
    pub fn hourly_rate(&self) -> ServiceResult<f64> {
        Ok(self.repo.hourly_rate()?)
    }

    /// Fetches one block by ID.
    pub fn get_block(&self, id: BlockId) -> ServiceResult<Option<TimeBlock>> {
        Ok(self.repo.get_block(id)?)
    }

    /// Removes a block outright.
    ///
    /// Deletion is a store operation; the resolver never deletes.
    pub fn delete_block(&self, id: BlockId) -> ServiceResult<()> {
        self.repo.delete_block(id)?;
        info!("event=delete_block module=service status=ok block={}", id);
        Ok(())
    }

    /// Serializes the full calendar, including the stored hourly rate, to
    /// pretty-printed JSON.
    pub fn export_json(&self) -> ServiceResult<String> {
        let snapshot = CalendarSnapshot {
            time_blocks: self.repo.list_blocks()?,
            hourly_rate: self.repo.hourly_rate()?,
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Replaces the calendar from a JSON export.
    ///
    /// Every block is validated before the transactional replacement; a bad
    /// payload leaves existing data untouched. The imported hourly rate is
    /// persisted with the blocks.
    pub fn import_json(&mut self, payload: &str) -> ServiceResult<usize> {
        let snapshot: CalendarSnapshot = serde_json::from_str(payload)?;
        for block in &snapshot.time_blocks {
            block.validate()?;
        }

        self.repo.replace_all_blocks(&snapshot.time_blocks)?;
        self.repo.set_hourly_rate(snapshot.hourly_rate)?;

        info!(
            "event=import_calendar module=service status=ok blocks={}",
            snapshot.time_blocks.len()
        );
        Ok(snapshot.time_blocks.len())
    }

    /// Exports the calendar as an XOR-obfuscated hex payload.
    pub fn backup(&self, key: &str) -> ServiceResult<String> {
        let json = self.export_json()?;
        Ok(obfuscate::encode(&json, key)?)
    }

    /// Restores the calendar from a payload produced by [`Self::backup`].
    pub fn restore(&mut self, payload: &str, key: &str) -> ServiceResult<usize> {
        let json = obfuscate::decode(payload, key)?;
        self.import_json(&json)
    }
}
