//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query
//! building. `position` is the store-assigned auto-increment primary key
//! that serves as the global storage position for replay ordering.

use sea_query::Iden;

/// Events table schema.
#[derive(Iden)]
pub enum Events {
    Table,
    #[iden = "position"]
    Position,
    #[iden = "subject"]
    Subject,
    #[iden = "sequence"]
    Sequence,
    #[iden = "event_id"]
    EventId,
    #[iden = "source"]
    Source,
    #[iden = "time"]
    Time,
    #[iden = "payload"]
    Payload,
}

/// Snapshots table schema.
#[derive(Iden)]
pub enum Snapshots {
    Table,
    #[iden = "position"]
    Position,
    #[iden = "name"]
    Name,
    #[iden = "last_considered_event_id"]
    LastConsideredEventId,
    #[iden = "schema_version"]
    SchemaVersion,
    #[iden = "state_data"]
    StateData,
}

/// SQLite DDL for the events table.
#[cfg(feature = "sqlite")]
pub const SQLITE_CREATE_EVENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS events (
    position INTEGER PRIMARY KEY AUTOINCREMENT,
    subject TEXT NOT NULL,
    sequence INTEGER NOT NULL,
    event_id TEXT NOT NULL,
    source TEXT NOT NULL,
    time INTEGER NOT NULL,
    payload BLOB NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_events_subject ON events(subject);
CREATE INDEX IF NOT EXISTS idx_events_event_id ON events(event_id);
"#;

/// SQLite DDL for the snapshots table.
#[cfg(feature = "sqlite")]
pub const SQLITE_CREATE_SNAPSHOTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS snapshots (
    position INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    last_considered_event_id TEXT NOT NULL,
    schema_version INTEGER NOT NULL,
    state_data BLOB NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_snapshots_name ON snapshots(name);
"#;

/// PostgreSQL DDL for the events table.
#[cfg(feature = "postgres")]
pub const POSTGRES_CREATE_EVENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS events (
    position BIGSERIAL PRIMARY KEY,
    subject TEXT NOT NULL,
    sequence BIGINT NOT NULL,
    event_id TEXT NOT NULL,
    source TEXT NOT NULL,
    time BIGINT NOT NULL,
    payload BYTEA NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_events_subject ON events(subject);
CREATE INDEX IF NOT EXISTS idx_events_event_id ON events(event_id);
"#;

/// PostgreSQL DDL for the snapshots table.
#[cfg(feature = "postgres")]
pub const POSTGRES_CREATE_SNAPSHOTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS snapshots (
    position BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    last_considered_event_id TEXT NOT NULL,
    schema_version BIGINT NOT NULL,
    state_data BYTEA NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_snapshots_name ON snapshots(name);
"#;
