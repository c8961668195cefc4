//! SnapshotStore and ProjectionReader contract tests.
//!
//! These tests verify the snapshot-accelerated read: the latest snapshot
//! for a projection name plus the events stored after the event it last
//! considered, scoped to the resolved search key, in replay order.

use foldstore::interfaces::{EventStore, ProjectionReader, SnapshotStore};
use foldstore::model::Snapshot;

use super::event_store_tests::{make_events, TestPayload};

/// Snapshot state type used across the contract tests.
pub type TestState = String;

fn make_snapshot(name: &str, last_considered_event: &str, state: &str) -> Snapshot<TestState> {
    Snapshot {
        name: name.to_string(),
        last_considered_event: last_considered_event.to_string(),
        schema_version: 1,
        state: state.to_string(),
    }
}

pub async fn test_read_without_snapshot<E, R>(events: &E, reader: &R)
where
    E: EventStore<TestPayload>,
    R: ProjectionReader<TestState, TestPayload>,
{
    events
        .append(make_events("test_nosnap_a", 1, 3))
        .await
        .expect("append should succeed");
    events
        .append(make_events("test_nosnap_b", 1, 3))
        .await
        .expect("append should succeed");

    let projection = reader
        .read("test_nosnap_a", None)
        .await
        .expect("read should succeed");

    assert_eq!(projection.id, "test_nosnap_a");
    assert!(projection.snapshot.is_none(), "no snapshot was ever written");
    assert_eq!(projection.events.len(), 3, "all subject events returned");

    // replay order: oldest first
    assert_eq!(projection.events[0].id, "1_test_nosnap_a");
    assert_eq!(projection.events[2].id, "3_test_nosnap_a");
}

/// The full snapshot-accelerated scenario: two subjects, a snapshot
/// marking the first subject's third event, three more events on each.
/// Reading the projection with the subject override returns the snapshot
/// state plus exactly the three events stored after the marked one.
pub async fn test_snapshot_accelerated_read<E, S, R>(events: &E, snapshots: &S, reader: &R)
where
    E: EventStore<TestPayload>,
    S: SnapshotStore<TestState>,
    R: ProjectionReader<TestState, TestPayload>,
{
    events
        .append(make_events("id1", 1, 3))
        .await
        .expect("append should succeed");
    events
        .append(make_events("id2", 1, 3))
        .await
        .expect("append should succeed");

    let before = reader.read("id1", None).await.expect("read should succeed");
    assert!(before.snapshot.is_none());
    assert_eq!(before.events.len(), 3);

    snapshots
        .put(make_snapshot("test_accel", "3_id1", "foo"))
        .await
        .expect("put should succeed");

    events
        .append(make_events("id1", 4, 3))
        .await
        .expect("append should succeed");
    events
        .append(make_events("id2", 4, 3))
        .await
        .expect("append should succeed");

    let projection = reader
        .read("test_accel", Some("id1"))
        .await
        .expect("read should succeed");

    assert_eq!(projection.id, "id1");

    let snapshot = projection.snapshot.expect("snapshot should be returned");
    assert_eq!(snapshot.name, "test_accel");
    assert_eq!(snapshot.state, "foo");
    assert_eq!(snapshot.last_considered_event, "3_id1");
    assert_eq!(snapshot.schema_version, 1);

    // exactly the events stored after 3_id1: not before it, not itself
    assert_eq!(projection.events.len(), 3);
    assert_eq!(projection.events[0].id, "4_id1");
    assert_eq!(projection.events[1].id, "5_id1");
    assert_eq!(projection.events[2].id, "6_id1");
}

pub async fn test_latest_snapshot_wins<E, S, R>(events: &E, snapshots: &S, reader: &R)
where
    E: EventStore<TestPayload>,
    S: SnapshotStore<TestState>,
    R: ProjectionReader<TestState, TestPayload>,
{
    let subject = "test_latest";

    events
        .append(make_events(subject, 1, 3))
        .await
        .expect("append should succeed");

    snapshots
        .put(make_snapshot(subject, &format!("1_{}", subject), "one"))
        .await
        .expect("put should succeed");
    snapshots
        .put(make_snapshot(subject, &format!("2_{}", subject), "two"))
        .await
        .expect("put should succeed");

    let projection = reader.read(subject, None).await.expect("read should succeed");

    let snapshot = projection.snapshot.expect("snapshot should be returned");
    assert_eq!(snapshot.state, "two", "most recent snapshot row wins");

    assert_eq!(projection.events.len(), 1);
    assert_eq!(projection.events[0].id, format!("3_{}", subject));
}

/// A snapshot referencing an event id that no longer exists falls back to
/// the zero boundary instead of failing.
pub async fn test_dangling_snapshot_reference<E, S, R>(events: &E, snapshots: &S, reader: &R)
where
    E: EventStore<TestPayload>,
    S: SnapshotStore<TestState>,
    R: ProjectionReader<TestState, TestPayload>,
{
    let subject = "test_dangling";

    events
        .append(make_events(subject, 1, 2))
        .await
        .expect("append should succeed");

    snapshots
        .put(make_snapshot(subject, "99_ghost", "stale"))
        .await
        .expect("put should succeed");

    let projection = reader.read(subject, None).await.expect("read should succeed");

    let snapshot = projection.snapshot.expect("snapshot should be returned");
    assert_eq!(snapshot.state, "stale");
    assert_eq!(
        projection.events.len(),
        2,
        "zero boundary returns the full subject log"
    );
}

pub async fn test_read_idempotent<E, S, R>(events: &E, snapshots: &S, reader: &R)
where
    E: EventStore<TestPayload>,
    S: SnapshotStore<TestState>,
    R: ProjectionReader<TestState, TestPayload>,
{
    let subject = "test_idempotent";

    events
        .append(make_events(subject, 1, 3))
        .await
        .expect("append should succeed");
    snapshots
        .put(make_snapshot(subject, &format!("1_{}", subject), "base"))
        .await
        .expect("put should succeed");

    let first = reader.read(subject, None).await.expect("read should succeed");
    let second = reader.read(subject, None).await.expect("read should succeed");

    assert_eq!(first, second, "read with no intervening writes is stable");
}
