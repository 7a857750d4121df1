//! Prerecording models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An uploaded audio file tied to a scheduled instance of an event.
///
/// The start time is naive and expressed in the event's timezone, exactly as
/// it appears in the instance's schedule entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prerecording {
    /// Identifier of the event.
    pub event: Uuid,
    /// Start time of the event instance in event timezone.
    pub start: NaiveDateTime,
}

/// Ordering applied to listing results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListOrder {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}
