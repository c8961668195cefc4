//! Snapshot storage interface.

use async_trait::async_trait;

use super::Result;
use crate::model::Snapshot;

/// Interface for snapshot persistence.
///
/// Snapshots are an optimization to avoid replaying entire event history.
/// The table is append-only: `put` adds a new row and never overwrites or
/// deletes prior rows, so the most recently written row for a name is the
/// authoritative one.
///
/// Implementations:
/// - `SqliteSnapshotStore`: SQLite storage
/// - `PostgresSnapshotStore`: PostgreSQL storage
#[async_trait]
pub trait SnapshotStore<S>: Send + Sync {
    /// Append a snapshot row.
    async fn put(&self, snapshot: Snapshot<S>) -> Result<()>;
}
