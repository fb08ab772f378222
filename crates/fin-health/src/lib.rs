//! Financial health scoring and budget alerting for personal and small-business ledgers.
//!
//! Persistence, authentication, and realtime delivery stay with external collaborators;
//! this crate owns the scoring rules, the recompute schedule, and alert deduplication.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
