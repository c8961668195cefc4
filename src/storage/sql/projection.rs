//! Unified SQL ProjectionReader implementation.
//!
//! The snapshot-accelerated read: latest snapshot for the projection name,
//! then the storage position of the event the snapshot last considered
//! (matched by event id), then every event for the search key past that
//! boundary in replay order. All three queries run inside one
//! read-consistent unit of work so a concurrent snapshot write cannot make
//! the two lookups disagree.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::codec::Codec;

use super::SqlDatabase;

/// SQL-based implementation of ProjectionReader.
///
/// This generic implementation works with any SQL database that implements
/// the `SqlDatabase` trait (PostgreSQL, SQLite). Snapshot state and event
/// payloads each pass through their own caller-supplied codec.
pub struct SqlProjectionReader<DB: SqlDatabase, S, P> {
    pool: DB::Pool,
    snapshot_codec: Arc<dyn Codec<S>>,
    event_codec: Arc<dyn Codec<P>>,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase, S, P> SqlProjectionReader<DB, S, P> {
    /// Create a new SQL projection reader with the given pool and codecs.
    pub fn new(
        pool: DB::Pool,
        snapshot_codec: Arc<dyn Codec<S>>,
        event_codec: Arc<dyn Codec<P>>,
    ) -> Self {
        Self {
            pool,
            snapshot_codec,
            event_codec,
            _marker: PhantomData,
        }
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &DB::Pool {
        &self.pool
    }
}

/// Macro to implement ProjectionReader for a specific SQL backend.
///
/// The `begin_read` parameter is the statement that opens the consistent
/// read unit: a plain `BEGIN` for SQLite (each transaction sees one
/// point-in-time view), `BEGIN ISOLATION LEVEL REPEATABLE READ` for
/// PostgreSQL (the default READ COMMITTED takes a new view per statement).
macro_rules! impl_projection_reader {
    ($db_type:ty, $conn_type:ty, $feature:literal, begin_read: $begin_read:literal) => {
        #[cfg(feature = $feature)]
        impl<S: Send + Sync + 'static, P: Send + Sync + 'static>
            SqlProjectionReader<$db_type, S, P>
        {
            /// Execute the snapshot and delta lookups within an
            /// already-started transaction.
            async fn read_in_unit(
                conn: &mut $conn_type,
                name: &str,
                search_key: &str,
                snapshot_codec: &dyn crate::codec::Codec<S>,
                event_codec: &dyn crate::codec::Codec<P>,
            ) -> crate::interfaces::Result<crate::model::Projection<S, P>> {
                use sea_query::{Expr, Order, Query};
                use sqlx::Row;

                use crate::storage::schema::{Events, Snapshots};

                // Latest snapshot row for the projection name, if any.
                let stmt = Query::select()
                    .columns([
                        Snapshots::Name,
                        Snapshots::LastConsideredEventId,
                        Snapshots::SchemaVersion,
                        Snapshots::StateData,
                    ])
                    .from(Snapshots::Table)
                    .and_where(Expr::col(Snapshots::Name).eq(name))
                    .order_by(Snapshots::Position, Order::Desc)
                    .limit(1)
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let row = sqlx::query(&sql).fetch_optional(&mut *conn).await?;

                let snapshot = match row {
                    Some(row) => {
                        let schema_version: i64 = row.get("schema_version");
                        let state_data: Vec<u8> = row.get("state_data");

                        Some(crate::model::Snapshot {
                            name: row.get("name"),
                            last_considered_event: row.get("last_considered_event_id"),
                            schema_version: schema_version as u32,
                            state: snapshot_codec.decode(&state_data)?,
                        })
                    }
                    None => None,
                };

                // Storage position of the event the snapshot last
                // considered. No snapshot, or a snapshot referencing an
                // event id that no longer exists, falls back to the zero
                // boundary.
                let boundary: i64 = match &snapshot {
                    Some(snap) => {
                        let stmt = Query::select()
                            .column(Events::Position)
                            .from(Events::Table)
                            .and_where(
                                Expr::col(Events::EventId)
                                    .eq(snap.last_considered_event.as_str()),
                            )
                            .limit(1)
                            .to_owned();

                        let sql = <$db_type>::build_select(stmt);
                        sqlx::query(&sql)
                            .fetch_optional(&mut *conn)
                            .await?
                            .map(|row| row.get("position"))
                            .unwrap_or(0)
                    }
                    None => 0,
                };

                // Replay delta: everything for the search key past the
                // boundary, oldest first.
                let stmt = Query::select()
                    .columns([
                        Events::Subject,
                        Events::Sequence,
                        Events::EventId,
                        Events::Source,
                        Events::Time,
                        Events::Payload,
                    ])
                    .from(Events::Table)
                    .and_where(Expr::col(Events::Subject).eq(search_key))
                    .and_where(Expr::col(Events::Position).gt(boundary))
                    .order_by(Events::Position, Order::Asc)
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;

                let mut events = Vec::with_capacity(rows.len());
                for row in rows {
                    let sequence: i64 = row.get("sequence");
                    let time: i64 = row.get("time");
                    let payload: Vec<u8> = row.get("payload");

                    events.push(crate::model::Event {
                        id: row.get("event_id"),
                        subject: row.get("subject"),
                        sequence: Some(sequence as u64),
                        source: row.get("source"),
                        time: crate::storage::helpers::datetime_from_millis(time)?,
                        payload: event_codec.decode(&payload)?,
                    });
                }

                Ok(crate::model::Projection {
                    id: search_key.to_string(),
                    snapshot,
                    events,
                })
            }
        }

        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl<S: Send + Sync + 'static, P: Send + Sync + 'static>
            crate::interfaces::ProjectionReader<S, P> for SqlProjectionReader<$db_type, S, P>
        {
            async fn read(
                &self,
                name: &str,
                subject: Option<&str>,
            ) -> crate::interfaces::Result<crate::model::Projection<S, P>> {
                let search_key = subject.unwrap_or(name);

                tracing::debug!(name, search_key, "reading projection");

                let mut conn = self.pool.acquire().await?;
                sqlx::query($begin_read).execute(&mut *conn).await?;

                let result = Self::read_in_unit(
                    &mut conn,
                    name,
                    search_key,
                    &*self.snapshot_codec,
                    &*self.event_codec,
                )
                .await;

                match result {
                    Ok(projection) => {
                        sqlx::query("COMMIT").execute(&mut *conn).await?;
                        Ok(projection)
                    }
                    Err(e) => {
                        let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                        Err(e)
                    }
                }
            }
        }
    };
}

impl_projection_reader!(
    super::sqlite::Sqlite,
    sqlx::SqliteConnection,
    "sqlite",
    begin_read: "BEGIN"
);
impl_projection_reader!(
    super::postgres::Postgres,
    sqlx::PgConnection,
    "postgres",
    begin_read: "BEGIN ISOLATION LEVEL REPEATABLE READ"
);
