//! Domain model for priority time-blocking.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep a single time-block shape shared by resolver, storage and export.
//!
//! # Invariants
//! - Every domain object is identified by a stable `BlockId`.
//! - A block's interval is half-open: `[start_ms, end_ms)` with
//!   `end_ms > start_ms`.

pub mod time_block;
