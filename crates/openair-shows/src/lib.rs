//! HTTP client for the shows service.
//!
//! The shows service owns events and their schedules. This crate exposes the
//! `ShowsClient` trait consumed by the orchestration layer, a reqwest-backed
//! implementation with bounded retry, and a canned client for tests.

pub mod client;
pub mod error;
pub mod testing;

pub use client::{HttpShowsClient, ShowsClient};
pub use error::ShowsError;
