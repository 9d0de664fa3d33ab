//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate resolver and repository calls into use-case level APIs.
//! - Keep embedding layers decoupled from storage and codec details.

pub mod calendar_service;
