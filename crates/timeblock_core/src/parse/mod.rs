//! Input parsing collaborators for the scheduling pipeline.
//!
//! # Responsibility
//! - Turn free-form user/agent time strings into epoch-millisecond
//!   timestamps before a candidate reaches the resolver.
//!
//! # Invariants
//! - Parsers are pure; the caller supplies the reference instant used for
//!   clock-only inputs.

pub mod time;
