//! Priority-based conflict resolution for calendar placement.
//!
//! # Responsibility
//! - Decide where a candidate time-block lands relative to existing blocks.
//! - Keep resolution a pure computation; persistence stays in the service
//!   layer.
//!
//! # Invariants
//! - Resolution never mutates the snapshot it is given.
//! - The only status a resolution produces is `Scheduled`.

pub mod resolver;
