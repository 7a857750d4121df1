//! Openair Core Library
//!
//! This crate provides the domain models, object-key codec, configuration,
//! and error types shared across all openair components.

pub mod config;
pub mod error;
pub mod keys;
pub mod models;

// Re-export commonly used types
pub use config::{Config, S3Config, ServerConfig, ShowsConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use keys::{decode_key, encode_key, event_prefix, KeyError};
pub use models::{
    Event, EventInstance, EventType, ListOrder, Prerecording, Schedule, ScheduleList,
};
