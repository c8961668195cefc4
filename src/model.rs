//! Core data model: events, snapshots, and projection read results.

use chrono::{DateTime, Utc};

/// A domain event produced by an aggregate.
///
/// The payload is opaque to this layer; it is encoded and decoded through
/// the codec supplied to the storage backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<P> {
    /// Globally unique event id, conventionally `<sequence>_<subject>`.
    pub id: String,
    /// Identifier of the aggregate instance whose log this event belongs to.
    pub subject: String,
    /// Per-subject 1-based sequence number.
    ///
    /// When `None`, the persisted sequence is derived from the leading
    /// numeric prefix of `id` before the first `_`; an absent or
    /// non-numeric prefix defaults to `1`. Events read back from storage
    /// always carry the persisted sequence.
    pub sequence: Option<u64>,
    /// Origin of the event.
    pub source: String,
    /// When the event occurred. Persisted as epoch milliseconds.
    pub time: DateTime<Utc>,
    /// Domain payload, interpreted only by the owning aggregate layer.
    pub payload: P,
}

/// A saved fold of all events up to and including a marked event.
///
/// Snapshot history is append-only; only the most recently written row for
/// a name is authoritative.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<S> {
    /// Projection name this snapshot belongs to.
    pub name: String,
    /// Id of the last event folded into `state`.
    pub last_considered_event: String,
    /// Schema version of the materialized state.
    pub schema_version: u32,
    /// Materialized projection state.
    pub state: S,
}

/// Result of a projection read: the latest snapshot (if any) plus the
/// events stored after it, in replay order.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection<S, P> {
    /// The resolved search key: the subject override if one was given,
    /// otherwise the projection name.
    pub id: String,
    /// Latest snapshot for the projection name, or `None` if none was
    /// ever written.
    pub snapshot: Option<Snapshot<S>>,
    /// Events with a storage position after the snapshot boundary,
    /// oldest first.
    pub events: Vec<Event<P>>,
}
