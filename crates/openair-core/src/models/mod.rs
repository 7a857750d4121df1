//! Domain models shared across openair components

pub mod events;
pub mod prerecordings;

pub use events::{Event, EventInstance, EventType, Schedule, ScheduleList};
pub use prerecordings::{ListOrder, Prerecording};
