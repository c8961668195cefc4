//! Event storage interface.

use async_trait::async_trait;

use crate::codec::CodecError;
use crate::model::Event;

/// Maximum number of events accepted in a single `append` batch.
pub const MAX_BATCH: usize = 50;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
///
/// Absence is never an error: a projection with no snapshot or an empty
/// event delta is a normal, successfully returned result.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("batch of {len} events exceeds the limit of {max}")]
    BatchTooLarge { len: usize, max: usize },

    #[error("invalid stored timestamp: {millis}")]
    InvalidTimestamp { millis: i64 },

    #[cfg(any(feature = "sqlite", feature = "postgres"))]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Interface for event persistence.
///
/// Events form an append-only log per subject. Rows are never mutated or
/// deleted by this layer; lifecycle ends only via external retention
/// policy.
///
/// Implementations:
/// - `SqliteEventStore`: SQLite storage
/// - `PostgresEventStore`: PostgreSQL storage
#[async_trait]
pub trait EventStore<P>: Send + Sync {
    /// Append a batch of events, possibly spanning multiple subjects.
    ///
    /// The whole batch is written as one atomic unit: either every row
    /// lands or none do, so readers never observe a partial append. An
    /// empty batch is a no-op success; a batch larger than [`MAX_BATCH`]
    /// fails with [`StorageError::BatchTooLarge`] before any store access.
    ///
    /// Sequence uniqueness per subject is a caller precondition; this
    /// layer does not serialize or deduplicate concurrent appends for the
    /// same subject. No retry is performed on failure.
    async fn append(&self, events: Vec<Event<P>>) -> Result<()>;

    /// Retrieve all events for a subject, newest first (storage position
    /// descending).
    ///
    /// Events read back carry the persisted sequence number.
    async fn get(&self, subject: &str) -> Result<Vec<Event<P>>>;
}
