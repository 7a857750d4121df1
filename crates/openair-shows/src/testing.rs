//! Canned shows client for tests

use crate::client::ShowsClient;
use crate::error::ShowsError;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use openair_core::models::{Event, Schedule, ScheduleList};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// Shows client backed by canned events and schedules.
///
/// Records call counts and the last requested schedule window so tests can
/// assert on collaborator traffic.
#[derive(Default)]
pub struct StaticShowsClient {
    events: Vec<Event>,
    schedules: Vec<Schedule>,
    event_calls: AtomicUsize,
    schedule_calls: AtomicUsize,
    last_window: Mutex<Option<(NaiveDateTime, NaiveDateTime)>>,
}

impl StaticShowsClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedules.push(schedule);
        self
    }

    /// Number of event lookups performed.
    pub fn event_calls(&self) -> usize {
        self.event_calls.load(Ordering::SeqCst)
    }

    /// Number of schedule queries performed.
    pub fn schedule_calls(&self) -> usize {
        self.schedule_calls.load(Ordering::SeqCst)
    }

    /// The `[start, end)` window of the most recent schedule query.
    pub fn last_window(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        *self.last_window.lock().unwrap()
    }
}

#[async_trait]
impl ShowsClient for StaticShowsClient {
    async fn get_event(&self, id: Uuid) -> Result<Option<Event>, ShowsError> {
        self.event_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.events.iter().find(|e| e.id == id).cloned())
    }

    async fn list_schedules(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        event: Uuid,
    ) -> Result<ScheduleList, ShowsError> {
        self.schedule_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_window.lock().unwrap() = Some((start, end));

        let schedules = self
            .schedules
            .iter()
            .filter(|s| s.event.id == event)
            .cloned()
            .collect();

        Ok(ScheduleList { schedules })
    }
}
