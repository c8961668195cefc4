//! EventStore contract tests.
//!
//! These tests verify the append/get contract of the EventStore trait.
//! Each storage implementation should run these tests.

use chrono::{Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use foldstore::interfaces::{EventStore, StorageError, MAX_BATCH};
use foldstore::model::Event;

/// Payload type used across the contract tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestPayload {
    pub kind: String,
    pub data: String,
}

/// Create a test event with the conventional `<sequence>_<subject>` id.
pub fn make_event(subject: &str, seq: u64) -> Event<TestPayload> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    Event {
        id: format!("{}_{}", seq, subject),
        subject: subject.to_string(),
        sequence: Some(seq),
        source: "contract-tests".to_string(),
        time: base + Duration::seconds(seq as i64),
        payload: TestPayload {
            kind: "created".to_string(),
            data: format!("payload-{}", seq),
        },
    }
}

/// Create `count` sequential events for a subject, starting at `start`.
pub fn make_events(subject: &str, start: u64, count: u64) -> Vec<Event<TestPayload>> {
    (start..start + count)
        .map(|seq| make_event(subject, seq))
        .collect()
}

pub async fn test_append_and_get_roundtrip<E: EventStore<TestPayload>>(store: &E) {
    let subject = "test_roundtrip";
    let events = make_events(subject, 1, 3);

    store
        .append(events.clone())
        .await
        .expect("append should succeed");

    let got = store.get(subject).await.expect("get should succeed");
    assert_eq!(got.len(), 3, "should have 3 events");

    // newest first, fields intact
    for (read, written) in got.iter().zip(events.iter().rev()) {
        assert_eq!(read, written);
    }
}

pub async fn test_append_empty_batch<E: EventStore<TestPayload>>(store: &E) {
    let subject = "test_empty_batch";

    store
        .append(vec![])
        .await
        .expect("empty append should succeed");

    let got = store.get(subject).await.expect("get should succeed");
    assert!(got.is_empty(), "should have no events");
}

pub async fn test_append_accepts_full_batch<E: EventStore<TestPayload>>(store: &E) {
    let subject = "test_full_batch";

    store
        .append(make_events(subject, 1, MAX_BATCH as u64))
        .await
        .expect("batch at the limit should succeed");

    let got = store.get(subject).await.expect("get should succeed");
    assert_eq!(got.len(), MAX_BATCH);
}

pub async fn test_append_rejects_oversized_batch<E: EventStore<TestPayload>>(store: &E) {
    let subject = "test_oversized_batch";
    let oversized = make_events(subject, 1, MAX_BATCH as u64 + 1);

    let result = store.append(oversized).await;
    match result {
        Err(StorageError::BatchTooLarge { len, max }) => {
            assert_eq!(len, MAX_BATCH + 1);
            assert_eq!(max, MAX_BATCH);
        }
        other => panic!("expected BatchTooLarge, got {:?}", other),
    }

    // whole-batch rejection: nothing was written
    let got = store.get(subject).await.expect("get should succeed");
    assert!(got.is_empty(), "rejected batch must not leave rows behind");
}

pub async fn test_subject_isolation<E: EventStore<TestPayload>>(store: &E) {
    store
        .append(make_events("test_iso_a", 1, 3))
        .await
        .expect("append should succeed");
    store
        .append(make_events("test_iso_b", 1, 4))
        .await
        .expect("append should succeed");

    let a = store.get("test_iso_a").await.expect("get should succeed");
    let b = store.get("test_iso_b").await.expect("get should succeed");

    assert_eq!(a.len(), 3);
    assert_eq!(b.len(), 4);
    assert!(a.iter().all(|e| e.subject == "test_iso_a"));
    assert!(b.iter().all(|e| e.subject == "test_iso_b"));
}

pub async fn test_sequence_derived_from_id<E: EventStore<TestPayload>>(store: &E) {
    let subject = "test_seq_fallback";

    let mut with_prefix = make_event(subject, 7);
    with_prefix.sequence = None;

    let mut opaque = make_event(subject, 8);
    opaque.sequence = None;
    opaque.id = "opaque-id".to_string();

    store
        .append(vec![with_prefix, opaque])
        .await
        .expect("append should succeed");

    let got = store.get(subject).await.expect("get should succeed");
    assert_eq!(got.len(), 2);

    // newest first: the opaque id defaulted to sequence 1, the prefixed
    // id parsed to 7
    assert_eq!(got[0].id, "opaque-id");
    assert_eq!(got[0].sequence, Some(1));
    assert_eq!(got[1].id, format!("7_{}", subject));
    assert_eq!(got[1].sequence, Some(7));
}

/// A batch may span multiple subjects and still lands atomically.
pub async fn test_mixed_subject_batch<E: EventStore<TestPayload>>(store: &E) {
    let mut batch = make_events("test_mixed_a", 1, 2);
    batch.extend(make_events("test_mixed_b", 1, 2));

    store.append(batch).await.expect("append should succeed");

    let a = store.get("test_mixed_a").await.expect("get should succeed");
    let b = store.get("test_mixed_b").await.expect("get should succeed");
    assert_eq!(a.len(), 2);
    assert_eq!(b.len(), 2);
}
