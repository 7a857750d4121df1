//! Orchestration layer for prerecordings.
//!
//! Sits between the shows service (events and schedules) and object storage
//! (audio payloads), validating that every operation targets a real instance
//! of a prerecorded event before touching storage.

pub mod error;
pub mod prerecordings;

pub use error::PrerecordingsError;
pub use prerecordings::{ListOutcome, ListParams, PrerecordingsService};
