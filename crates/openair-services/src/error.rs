//! Prerecordings orchestration errors

use chrono::NaiveDateTime;
use openair_core::keys::KeyError;
use openair_core::models::EventType;
use openair_shows::ShowsError;
use openair_storage::StorageError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PrerecordingsError {
    #[error("Event not found: {0}")]
    EventNotFound(Uuid),

    #[error("Bad event type: {0}")]
    BadEventType(EventType),

    #[error("Instance of event {event} starting at {start} not found")]
    InstanceNotFound { event: Uuid, start: NaiveDateTime },

    #[error("Prerecording of event {event} starting at {start} not found")]
    PrerecordingNotFound { event: Uuid, start: NaiveDateTime },

    #[error("Event {event} has an invalid timezone: {timezone}")]
    InvalidTimezone { event: Uuid, timezone: String },

    #[error(transparent)]
    MalformedKey(#[from] KeyError),

    #[error("Shows service error: {0}")]
    Shows(#[from] ShowsError),

    #[error("Storage error: {0}")]
    Storage(#[source] StorageError),
}

impl PrerecordingsError {
    /// Map a storage failure where a missing object is an upstream fault,
    /// not a missing prerecording (listing, uploading).
    pub(crate) fn storage(error: StorageError) -> Self {
        PrerecordingsError::Storage(error)
    }

    /// Map a storage failure on a keyed operation, translating a missing
    /// object into a missing prerecording.
    pub(crate) fn keyed_storage(event: Uuid, start: NaiveDateTime, error: StorageError) -> Self {
        match error {
            StorageError::NotFound(_) => PrerecordingsError::PrerecordingNotFound { event, start },
            other => PrerecordingsError::Storage(other),
        }
    }
}
