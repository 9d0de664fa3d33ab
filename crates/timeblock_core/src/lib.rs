//! Core domain logic for priority time-blocking.
//! This crate is the single source of truth for scheduling invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod obfuscate;
pub mod parse;
pub mod repo;
pub mod schedule;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::time_block::{
    BlockId, BlockStatus, BlockValidationError, Priority, TimeBlock,
};
pub use parse::time::{parse_timestamp_ms, TimeParseError};
pub use repo::block_repo::{BlockRepository, RepoError, RepoResult, SqliteBlockRepository};
pub use schedule::resolver::{resolve, Resolution};
pub use service::calendar_service::{
    CalendarService, CalendarSnapshot, ServiceError, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
