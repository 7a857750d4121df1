//! Prerecordings orchestration service.
//!
//! Every operation resolves the event (and for keyed operations, the exact
//! schedule instance) with the shows service before touching storage, so a
//! prerecording can only ever exist for a scheduled instance of a
//! prerecorded event.

use crate::error::PrerecordingsError;
use chrono::offset::LocalResult;
use chrono::{Duration, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use openair_core::keys::{decode_key, encode_key, event_prefix};
use openair_core::models::{Event, EventInstance, EventType, ListOrder, Prerecording};
use openair_shows::ShowsClient;
use openair_storage::{ObjectStat, ObjectStorage, ObjectStream};
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::AsyncRead;
use uuid::Uuid;

/// Listing parameters. Times are naive, in the event's timezone, and the
/// bounds are strict (`start > after`, `start < before`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ListParams {
    pub after: Option<NaiveDateTime>,
    pub before: Option<NaiveDateTime>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub order: Option<ListOrder>,
}

/// Listing results. `count` is the number of matches before pagination;
/// `limit` and `offset` echo the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOutcome {
    pub count: usize,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub prerecordings: Vec<Prerecording>,
}

/// Service to manage prerecordings.
#[derive(Clone)]
pub struct PrerecordingsService {
    shows: Arc<dyn ShowsClient>,
    storage: Arc<dyn ObjectStorage>,
}

impl PrerecordingsService {
    pub fn new(shows: Arc<dyn ShowsClient>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { shows, storage }
    }

    /// List prerecordings of an event.
    pub async fn list(
        &self,
        event: Uuid,
        params: ListParams,
    ) -> Result<ListOutcome, PrerecordingsError> {
        if self.prerecorded_event(event).await?.is_none() {
            return Err(PrerecordingsError::EventNotFound(event));
        }

        let objects = self
            .storage
            .list(&event_prefix(event))
            .await
            .map_err(PrerecordingsError::storage)?;

        let mut prerecordings = objects
            .iter()
            .map(|object| -> Result<Prerecording, PrerecordingsError> {
                let (event, start) = decode_key(&object.key)?;
                Ok(Prerecording { event, start })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(after) = params.after {
            prerecordings.retain(|p| p.start > after);
        }
        if let Some(before) = params.before {
            prerecordings.retain(|p| p.start < before);
        }

        match params.order {
            Some(ListOrder::Ascending) => prerecordings.sort_by(|a, b| a.start.cmp(&b.start)),
            Some(ListOrder::Descending) => prerecordings.sort_by(|a, b| b.start.cmp(&a.start)),
            None => {}
        }

        // Count covers everything that matched, not just the returned page.
        let count = prerecordings.len();

        if let Some(offset) = params.offset {
            prerecordings = prerecordings.split_off(offset.min(count));
        }
        if let Some(limit) = params.limit {
            prerecordings.truncate(limit);
        }

        Ok(ListOutcome {
            count,
            limit: params.limit,
            offset: params.offset,
            prerecordings,
        })
    }

    /// Download a prerecording as metadata plus a payload stream.
    pub async fn download(
        &self,
        event: Uuid,
        start: NaiveDateTime,
    ) -> Result<(ObjectStat, ObjectStream), PrerecordingsError> {
        self.require_instance(event, start).await?;

        let key = encode_key(event, start);
        self.storage
            .get(&key)
            .await
            .map_err(|e| PrerecordingsError::keyed_storage(event, start, e))
    }

    /// Get a prerecording's metadata without transferring its payload.
    pub async fn head_download(
        &self,
        event: Uuid,
        start: NaiveDateTime,
    ) -> Result<ObjectStat, PrerecordingsError> {
        self.require_instance(event, start).await?;

        let key = encode_key(event, start);
        self.storage
            .stat(&key)
            .await
            .map_err(|e| PrerecordingsError::keyed_storage(event, start, e))
    }

    /// Upload a prerecording, replacing any previous payload for the same
    /// instance.
    pub async fn upload(
        &self,
        event: Uuid,
        start: NaiveDateTime,
        content_type: &str,
        content_length: Option<u64>,
        data: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> Result<(), PrerecordingsError> {
        self.require_instance(event, start).await?;

        let key = encode_key(event, start);
        self.storage
            .put(&key, content_type, content_length, data)
            .await
            .map_err(PrerecordingsError::storage)?;

        tracing::info!(event = %event, start = %start, "Prerecording uploaded");
        Ok(())
    }

    /// Delete a prerecording.
    pub async fn delete(
        &self,
        event: Uuid,
        start: NaiveDateTime,
    ) -> Result<(), PrerecordingsError> {
        self.require_instance(event, start).await?;

        let key = encode_key(event, start);
        self.storage
            .delete(&key)
            .await
            .map_err(|e| PrerecordingsError::keyed_storage(event, start, e))?;

        tracing::info!(event = %event, start = %start, "Prerecording deleted");
        Ok(())
    }

    /// Fetch an event, requiring it to be prerecorded when it exists.
    async fn prerecorded_event(&self, event: Uuid) -> Result<Option<Event>, PrerecordingsError> {
        let Some(found) = self.shows.get_event(event).await? else {
            return Ok(None);
        };

        if found.event_type != EventType::Prerecorded {
            return Err(PrerecordingsError::BadEventType(found.event_type));
        }

        Ok(Some(found))
    }

    /// Resolve the schedule instance with the exact given start time, looking
    /// through the whole local day of `start` in the event's timezone.
    async fn instance(
        &self,
        event: Uuid,
        start: NaiveDateTime,
    ) -> Result<Option<EventInstance>, PrerecordingsError> {
        let Some(found) = self.prerecorded_event(event).await? else {
            return Ok(None);
        };

        let tz: Tz = found
            .timezone
            .parse()
            .map_err(|_| PrerecordingsError::InvalidTimezone {
                event,
                timezone: found.timezone.clone(),
            })?;

        let (window_start, window_end) = local_day_window(tz, start).ok_or_else(|| {
            PrerecordingsError::InvalidTimezone {
                event,
                timezone: found.timezone.clone(),
            }
        })?;

        let schedules = self
            .shows
            .list_schedules(window_start, window_end, event)
            .await?;

        let Some(schedule) = schedules.schedules.into_iter().next() else {
            return Ok(None);
        };

        if schedule.event.event_type != EventType::Prerecorded {
            return Err(PrerecordingsError::BadEventType(schedule.event.event_type));
        }

        Ok(schedule
            .instances
            .into_iter()
            .find(|instance| instance.start == start))
    }

    async fn require_instance(
        &self,
        event: Uuid,
        start: NaiveDateTime,
    ) -> Result<EventInstance, PrerecordingsError> {
        self.instance(event, start)
            .await?
            .ok_or(PrerecordingsError::InstanceNotFound { event, start })
    }
}

/// UTC window `[start, end)` covering the entire local day of `start` in the
/// given timezone, as naive UTC datetimes.
///
/// Local midnight is resolved to the earlier offset when DST repeats it; when
/// DST removes it entirely, the window opens at the first local time that
/// exists, probed in one-hour steps.
fn local_day_window(tz: Tz, start: NaiveDateTime) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let mut local = start.date().and_time(NaiveTime::MIN);

    for _ in 0..24 {
        match tz.from_local_datetime(&local) {
            LocalResult::Single(resolved) | LocalResult::Ambiguous(resolved, _) => {
                let window_start = resolved.naive_utc();
                return Some((window_start, window_start + Duration::days(1)));
            }
            LocalResult::None => local += Duration::hours(1),
        }
    }

    None
}
