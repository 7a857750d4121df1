//! HTTP handlers

pub mod ping;
pub mod prerecordings;
