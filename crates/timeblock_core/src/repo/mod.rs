//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for time-blocks.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `TimeBlock::validate()` before
//!   persistence.
//! - `list_blocks` preserves insertion order; the resolver's tie-break
//!   depends on it.

pub mod block_repo;
