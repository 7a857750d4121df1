//! Event and schedule models as exposed by the shows service.
//!
//! Instance times are naive datetimes in the event's own timezone; the
//! timezone itself travels on the event as an IANA zone name.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Live,
    Replay,
    Prerecorded,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventType::Live => "live",
            EventType::Replay => "replay",
            EventType::Prerecorded => "prerecorded",
        };
        write!(f, "{name}")
    }
}

/// An event known to the shows service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Identifier of the event.
    pub id: Uuid,
    /// Kind of the event.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// IANA timezone name the event's instance times are expressed in.
    pub timezone: String,
}

/// A single scheduled occurrence of an event, in event-local time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInstance {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// An event together with its instances inside a queried window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub event: Event,
    pub instances: Vec<EventInstance>,
}

/// Schedule query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleList {
    pub schedules: Vec<Schedule>,
}
