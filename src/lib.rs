//! Foldstore - snapshot-accelerated persistence for event-sourced aggregates.
//!
//! Durably appends domain events keyed by subject, and serves projection
//! reads as the latest saved snapshot plus every event stored after it, so
//! callers can fold the delta onto the snapshot state instead of replaying
//! full history.

pub mod codec;
pub mod config;
pub mod interfaces;
pub mod model;
pub mod storage;

pub use codec::{Codec, CodecError, JsonCodec};
pub use interfaces::{EventStore, ProjectionReader, Result, SnapshotStore, StorageError, MAX_BATCH};
pub use model::{Event, Projection, Snapshot};
