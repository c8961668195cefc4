//! Projection read interface.

use async_trait::async_trait;

use super::Result;
use crate::model::Projection;

/// Interface for snapshot-accelerated projection reads.
///
/// Implementations:
/// - `SqliteProjectionReader`: SQLite storage
/// - `PostgresProjectionReader`: PostgreSQL storage
#[async_trait]
pub trait ProjectionReader<S, P>: Send + Sync {
    /// Read the current state inputs for a projection.
    ///
    /// Returns the latest snapshot written under `name` (or `None` if no
    /// snapshot exists) together with every event for the resolved search
    /// key (`subject` override if given, otherwise `name`) whose storage
    /// position is strictly greater than the position of the event the
    /// snapshot last considered, in replay order.
    ///
    /// Both lookups execute inside one read-consistent unit of work: a
    /// snapshot written concurrently between the two queries cannot cause
    /// events to be double-counted or skipped. A snapshot referencing an
    /// event id that no longer exists falls back to the zero boundary and
    /// is not an error.
    async fn read(&self, name: &str, subject: Option<&str>) -> Result<Projection<S, P>>;
}
