//! Shared storage helper functions.
//!
//! Common logic for event sequence resolution and timestamp normalization
//! used across storage backend implementations.

use chrono::{DateTime, Utc};

use crate::interfaces::{Result, StorageError};
use crate::model::Event;

/// Resolve the sequence number to persist for an event.
///
/// An explicit sequence wins. Otherwise the sequence is derived from the
/// event id via [`sequence_from_id`].
pub fn resolve_sequence<P>(event: &Event<P>) -> u64 {
    match event.sequence {
        Some(seq) => seq,
        None => sequence_from_id(&event.id),
    }
}

/// Parse the per-subject sequence number from an event id of the form
/// `<sequence>_<subject>`.
///
/// Ids without a numeric prefix before the first `_` default to sequence 1.
pub fn sequence_from_id(id: &str) -> u64 {
    id.split('_')
        .next()
        .and_then(|prefix| prefix.parse().ok())
        .unwrap_or(1)
}

/// Convert a stored epoch-millisecond timestamp back to a `DateTime`.
pub fn datetime_from_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or(StorageError::InvalidTimestamp { millis })
}
