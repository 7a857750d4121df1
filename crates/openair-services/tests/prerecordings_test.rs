//! Scenario tests for the prerecordings service with in-memory collaborators.

use chrono::NaiveDateTime;
use futures::StreamExt;
use openair_core::keys::encode_key;
use openair_core::models::{Event, EventInstance, EventType, ListOrder, Schedule};
use openair_services::{ListParams, PrerecordingsError, PrerecordingsService};
use openair_shows::testing::StaticShowsClient;
use openair_storage::MemoryStorage;
use std::sync::Arc;
use uuid::Uuid;

fn naive(s: &str) -> NaiveDateTime {
    s.parse().unwrap()
}

fn event(id: Uuid, event_type: EventType) -> Event {
    Event {
        id,
        event_type,
        timezone: "Europe/Warsaw".to_string(),
    }
}

fn schedule(ev: Event, starts: &[&str]) -> Schedule {
    Schedule {
        event: ev,
        instances: starts
            .iter()
            .map(|s| EventInstance {
                start: naive(s),
                end: naive(s) + chrono::Duration::hours(2),
            })
            .collect(),
    }
}

struct Fixture {
    service: PrerecordingsService,
    shows: Arc<StaticShowsClient>,
    storage: MemoryStorage,
}

fn fixture(shows: StaticShowsClient) -> Fixture {
    let shows = Arc::new(shows);
    let storage = MemoryStorage::new();
    let service = PrerecordingsService::new(shows.clone(), Arc::new(storage.clone()));
    Fixture {
        service,
        shows,
        storage,
    }
}

fn seed(storage: &MemoryStorage, id: Uuid, starts: &[&str]) {
    for s in starts {
        storage.set_object(&encode_key(id, naive(s)), "audio/mpeg", b"data".to_vec());
    }
}

#[tokio::test]
async fn list_of_unknown_event_fails() {
    let fx = fixture(StaticShowsClient::new());

    let result = fx.service.list(Uuid::new_v4(), ListParams::default()).await;
    assert!(matches!(result, Err(PrerecordingsError::EventNotFound(_))));
}

#[tokio::test]
async fn list_of_live_event_is_a_bad_request() {
    let id = Uuid::new_v4();
    let fx = fixture(StaticShowsClient::new().with_event(event(id, EventType::Live)));

    let result = fx.service.list(id, ListParams::default()).await;
    assert!(matches!(
        result,
        Err(PrerecordingsError::BadEventType(EventType::Live))
    ));
}

#[tokio::test]
async fn list_of_event_without_prerecordings_is_empty() {
    let id = Uuid::new_v4();
    let fx = fixture(StaticShowsClient::new().with_event(event(id, EventType::Prerecorded)));

    let outcome = fx.service.list(id, ListParams::default()).await.unwrap();
    assert_eq!(outcome.count, 0);
    assert!(outcome.prerecordings.is_empty());
}

#[tokio::test]
async fn list_only_sees_the_requested_event() {
    let id = Uuid::new_v4();
    let other = Uuid::new_v4();
    let fx = fixture(StaticShowsClient::new().with_event(event(id, EventType::Prerecorded)));
    seed(&fx.storage, id, &["2024-06-01T10:00:00"]);
    seed(&fx.storage, other, &["2024-06-01T11:00:00"]);

    let outcome = fx.service.list(id, ListParams::default()).await.unwrap();
    assert_eq!(outcome.count, 1);
    assert_eq!(outcome.prerecordings[0].event, id);
}

#[tokio::test]
async fn list_filters_with_strict_bounds() {
    let id = Uuid::new_v4();
    let fx = fixture(StaticShowsClient::new().with_event(event(id, EventType::Prerecorded)));
    seed(
        &fx.storage,
        id,
        &[
            "2024-06-01T10:00:00",
            "2024-06-01T11:00:00",
            "2024-06-01T12:00:00",
        ],
    );

    let params = ListParams {
        after: Some(naive("2024-06-01T10:00:00")),
        before: Some(naive("2024-06-01T12:00:00")),
        ..Default::default()
    };
    let outcome = fx.service.list(id, params).await.unwrap();

    // Bounds are exclusive on both sides.
    assert_eq!(outcome.count, 1);
    assert_eq!(outcome.prerecordings[0].start, naive("2024-06-01T11:00:00"));
}

#[tokio::test]
async fn list_orders_ascending_and_descending() {
    let id = Uuid::new_v4();
    let fx = fixture(StaticShowsClient::new().with_event(event(id, EventType::Prerecorded)));
    seed(
        &fx.storage,
        id,
        &[
            "2024-06-01T12:00:00",
            "2024-06-01T10:00:00",
            "2024-06-01T11:00:00",
        ],
    );

    let ascending = fx
        .service
        .list(
            id,
            ListParams {
                order: Some(ListOrder::Ascending),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let descending = fx
        .service
        .list(
            id,
            ListParams {
                order: Some(ListOrder::Descending),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let asc_starts: Vec<_> = ascending.prerecordings.iter().map(|p| p.start).collect();
    let mut desc_starts: Vec<_> = descending.prerecordings.iter().map(|p| p.start).collect();
    desc_starts.reverse();

    assert_eq!(
        asc_starts,
        vec![
            naive("2024-06-01T10:00:00"),
            naive("2024-06-01T11:00:00"),
            naive("2024-06-01T12:00:00"),
        ]
    );
    assert_eq!(asc_starts, desc_starts);
}

#[tokio::test]
async fn list_counts_all_matches_before_pagination() {
    let id = Uuid::new_v4();
    let fx = fixture(StaticShowsClient::new().with_event(event(id, EventType::Prerecorded)));
    seed(
        &fx.storage,
        id,
        &[
            "2024-06-01T10:00:00",
            "2024-06-01T11:00:00",
            "2024-06-01T12:00:00",
            "2024-06-01T13:00:00",
        ],
    );

    let params = ListParams {
        limit: Some(2),
        offset: Some(1),
        order: Some(ListOrder::Ascending),
        ..Default::default()
    };
    let outcome = fx.service.list(id, params).await.unwrap();

    assert_eq!(outcome.count, 4);
    assert_eq!(outcome.limit, Some(2));
    assert_eq!(outcome.offset, Some(1));
    let starts: Vec<_> = outcome.prerecordings.iter().map(|p| p.start).collect();
    assert_eq!(
        starts,
        vec![naive("2024-06-01T11:00:00"), naive("2024-06-01T12:00:00")]
    );
}

#[tokio::test]
async fn list_with_offset_beyond_matches_returns_empty_page() {
    let id = Uuid::new_v4();
    let fx = fixture(StaticShowsClient::new().with_event(event(id, EventType::Prerecorded)));
    seed(&fx.storage, id, &["2024-06-01T10:00:00"]);

    let params = ListParams {
        offset: Some(10),
        ..Default::default()
    };
    let outcome = fx.service.list(id, params).await.unwrap();

    assert_eq!(outcome.count, 1);
    assert!(outcome.prerecordings.is_empty());
}

#[tokio::test]
async fn list_faults_on_foreign_objects_under_the_prefix() {
    let id = Uuid::new_v4();
    let fx = fixture(StaticShowsClient::new().with_event(event(id, EventType::Prerecorded)));
    fx.storage
        .set_object(&format!("{id}/not-a-timestamp"), "audio/mpeg", vec![0]);

    let result = fx.service.list(id, ListParams::default()).await;
    assert!(matches!(result, Err(PrerecordingsError::MalformedKey(_))));
}

#[tokio::test]
async fn download_requires_a_scheduled_instance() {
    let id = Uuid::new_v4();
    let ev = event(id, EventType::Prerecorded);
    let fx = fixture(
        StaticShowsClient::new()
            .with_event(ev.clone())
            .with_schedule(schedule(ev, &["2024-06-01T10:00:00"])),
    );

    let result = fx.service.download(id, naive("2024-06-01T18:00:00")).await;
    assert!(matches!(
        result,
        Err(PrerecordingsError::InstanceNotFound { .. })
    ));
}

#[tokio::test]
async fn download_of_missing_prerecording_is_distinct_from_missing_instance() {
    let id = Uuid::new_v4();
    let ev = event(id, EventType::Prerecorded);
    let fx = fixture(
        StaticShowsClient::new()
            .with_event(ev.clone())
            .with_schedule(schedule(ev, &["2024-06-01T10:00:00"])),
    );

    // The instance exists but nothing was uploaded for it.
    let result = fx.service.download(id, naive("2024-06-01T10:00:00")).await;
    assert!(matches!(
        result,
        Err(PrerecordingsError::PrerecordingNotFound { .. })
    ));
}

#[tokio::test]
async fn upload_then_download_roundtrips() {
    let id = Uuid::new_v4();
    let start = naive("2024-06-01T10:00:00");
    let ev = event(id, EventType::Prerecorded);
    let fx = fixture(
        StaticShowsClient::new()
            .with_event(ev.clone())
            .with_schedule(schedule(ev, &["2024-06-01T10:00:00"])),
    );

    let reader = Box::pin(std::io::Cursor::new(b"abc".to_vec()));
    fx.service
        .upload(id, start, "audio/mpeg", Some(3), reader)
        .await
        .unwrap();

    let (stat, mut body) = fx.service.download(id, start).await.unwrap();
    assert_eq!(stat.content_type, "audio/mpeg");
    assert_eq!(stat.size, 3);

    let chunk = body.next().await.unwrap().unwrap();
    assert_eq!(&chunk[..], b"abc");
}

#[tokio::test]
async fn upload_queries_the_utc_window_of_the_local_day() {
    let id = Uuid::new_v4();
    let start = naive("2024-06-01T10:00:00");
    let ev = event(id, EventType::Prerecorded);
    let fx = fixture(
        StaticShowsClient::new()
            .with_event(ev.clone())
            .with_schedule(schedule(ev, &["2024-06-01T10:00:00"])),
    );

    let reader = Box::pin(std::io::Cursor::new(b"abc".to_vec()));
    fx.service
        .upload(id, start, "audio/mpeg", Some(3), reader)
        .await
        .unwrap();

    // Warsaw is UTC+2 in June, so the local day starts at 22:00 UTC.
    assert_eq!(
        fx.shows.last_window(),
        Some((naive("2024-05-31T22:00:00"), naive("2024-06-01T22:00:00")))
    );
}

#[tokio::test]
async fn upload_to_live_event_is_a_bad_request() {
    let id = Uuid::new_v4();
    let fx = fixture(StaticShowsClient::new().with_event(event(id, EventType::Live)));

    let reader = Box::pin(std::io::Cursor::new(b"abc".to_vec()));
    let result = fx
        .service
        .upload(id, naive("2024-06-01T10:00:00"), "audio/mpeg", Some(3), reader)
        .await;

    assert!(matches!(
        result,
        Err(PrerecordingsError::BadEventType(EventType::Live))
    ));
    assert_eq!(fx.storage.object_count(), 0);
}

#[tokio::test]
async fn upload_replaces_the_previous_payload() {
    let id = Uuid::new_v4();
    let start = naive("2024-06-01T10:00:00");
    let ev = event(id, EventType::Prerecorded);
    let fx = fixture(
        StaticShowsClient::new()
            .with_event(ev.clone())
            .with_schedule(schedule(ev, &["2024-06-01T10:00:00"])),
    );

    let first = Box::pin(std::io::Cursor::new(b"first".to_vec()));
    fx.service
        .upload(id, start, "audio/mpeg", Some(5), first)
        .await
        .unwrap();

    let second = Box::pin(std::io::Cursor::new(b"second".to_vec()));
    fx.service
        .upload(id, start, "audio/wav", Some(6), second)
        .await
        .unwrap();

    let (stat, _) = fx.service.download(id, start).await.unwrap();
    assert_eq!(stat.content_type, "audio/wav");
    assert_eq!(stat.size, 6);
    assert_eq!(fx.storage.object_count(), 1);
}

#[tokio::test]
async fn head_download_returns_metadata_only() {
    let id = Uuid::new_v4();
    let start = naive("2024-06-01T10:00:00");
    let ev = event(id, EventType::Prerecorded);
    let fx = fixture(
        StaticShowsClient::new()
            .with_event(ev.clone())
            .with_schedule(schedule(ev, &["2024-06-01T10:00:00"])),
    );
    seed(&fx.storage, id, &["2024-06-01T10:00:00"]);

    let stat = fx.service.head_download(id, start).await.unwrap();
    assert_eq!(stat.content_type, "audio/mpeg");
    assert_eq!(stat.size, 4);
    assert!(!stat.tag.is_empty());
}

#[tokio::test]
async fn delete_removes_the_prerecording() {
    let id = Uuid::new_v4();
    let start = naive("2024-06-01T10:00:00");
    let ev = event(id, EventType::Prerecorded);
    let fx = fixture(
        StaticShowsClient::new()
            .with_event(ev.clone())
            .with_schedule(schedule(ev, &["2024-06-01T10:00:00"])),
    );
    seed(&fx.storage, id, &["2024-06-01T10:00:00"]);

    fx.service.delete(id, start).await.unwrap();
    assert_eq!(fx.storage.object_count(), 0);

    // The instance is still scheduled, so a second delete reports the
    // missing payload, not a missing instance.
    let result = fx.service.delete(id, start).await;
    assert!(matches!(
        result,
        Err(PrerecordingsError::PrerecordingNotFound { .. })
    ));
}
