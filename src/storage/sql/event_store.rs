//! Unified SQL EventStore implementation.
//!
//! Uses a macro to generate implementations for each SQL backend,
//! eliminating code duplication while maintaining type safety. The write
//! unit of work differs per backend: SQLite opens the transaction with
//! `BEGIN IMMEDIATE`, PostgreSQL with a plain `BEGIN`.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::codec::Codec;

use super::SqlDatabase;

/// SQL-based implementation of EventStore.
///
/// This generic implementation works with any SQL database that implements
/// the `SqlDatabase` trait (PostgreSQL, SQLite). Payloads pass through the
/// caller-supplied codec on the way in and out.
pub struct SqlEventStore<DB: SqlDatabase, P> {
    pool: DB::Pool,
    codec: Arc<dyn Codec<P>>,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase, P> SqlEventStore<DB, P> {
    /// Create a new SQL event store with the given pool and payload codec.
    pub fn new(pool: DB::Pool, codec: Arc<dyn Codec<P>>) -> Self {
        Self {
            pool,
            codec,
            _marker: PhantomData,
        }
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &DB::Pool {
        &self.pool
    }
}

/// Macro to implement EventStore for a specific SQL backend.
///
/// The `begin_write` parameter is the statement that opens the atomic
/// write unit. SQLite uses `BEGIN IMMEDIATE` to acquire the write lock
/// upfront, preventing deadlocks when concurrent DEFERRED transactions
/// race to upgrade from shared to exclusive.
macro_rules! impl_event_store {
    ($db_type:ty, $conn_type:ty, $feature:literal, begin_write: $begin_write:literal) => {
        #[cfg(feature = $feature)]
        impl<P: Send + Sync + 'static> SqlEventStore<$db_type, P> {
            /// Create the events table and indexes if they do not exist.
            pub async fn init(&self) -> crate::interfaces::Result<()> {
                sqlx::raw_sql(<$db_type as SqlDatabase>::CREATE_EVENTS_TABLE)
                    .execute(&self.pool)
                    .await?;
                Ok(())
            }

            /// Insert events within an already-started transaction.
            async fn insert_events(
                conn: &mut $conn_type,
                codec: &dyn crate::codec::Codec<P>,
                events: Vec<crate::model::Event<P>>,
            ) -> crate::interfaces::Result<()> {
                use sea_query::Query;

                use crate::storage::schema::Events;

                for event in events {
                    let sequence = crate::storage::helpers::resolve_sequence(&event);
                    let time = event.time.timestamp_millis();
                    let payload = codec.encode(&event.payload)?;

                    let stmt = Query::insert()
                        .into_table(Events::Table)
                        .columns([
                            Events::Subject,
                            Events::Sequence,
                            Events::EventId,
                            Events::Source,
                            Events::Time,
                            Events::Payload,
                        ])
                        .values_panic([
                            event.subject.into(),
                            (sequence as i64).into(),
                            event.id.into(),
                            event.source.into(),
                            time.into(),
                            payload.into(),
                        ])
                        .to_owned();

                    let sql = <$db_type>::build_insert(stmt);
                    sqlx::query(&sql).execute(&mut *conn).await?;
                }

                Ok(())
            }
        }

        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl<P: Send + Sync + 'static> crate::interfaces::EventStore<P>
            for SqlEventStore<$db_type, P>
        {
            async fn append(
                &self,
                events: Vec<crate::model::Event<P>>,
            ) -> crate::interfaces::Result<()> {
                use crate::interfaces::{StorageError, MAX_BATCH};

                if events.is_empty() {
                    return Ok(());
                }

                if events.len() > MAX_BATCH {
                    return Err(StorageError::BatchTooLarge {
                        len: events.len(),
                        max: MAX_BATCH,
                    });
                }

                tracing::debug!(count = events.len(), "appending event batch");

                let mut conn = self.pool.acquire().await?;
                sqlx::query($begin_write).execute(&mut *conn).await?;

                let result = Self::insert_events(&mut conn, &*self.codec, events).await;

                match result {
                    Ok(()) => {
                        sqlx::query("COMMIT").execute(&mut *conn).await?;
                        Ok(())
                    }
                    Err(e) => {
                        let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                        Err(e)
                    }
                }
            }

            async fn get(
                &self,
                subject: &str,
            ) -> crate::interfaces::Result<Vec<crate::model::Event<P>>> {
                use sea_query::{Expr, Order, Query};
                use sqlx::Row;

                use crate::storage::schema::Events;

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
                    .and_where(Expr::col(Events::Subject).eq(subject))
                    .order_by(Events::Position, Order::Desc)
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

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
                        payload: self.codec.decode(&payload)?,
                    });
                }

                Ok(events)
            }
        }
    };
}

impl_event_store!(
    super::sqlite::Sqlite,
    sqlx::SqliteConnection,
    "sqlite",
    begin_write: "BEGIN IMMEDIATE"
);
impl_event_store!(
    super::postgres::Postgres,
    sqlx::PgConnection,
    "postgres",
    begin_write: "BEGIN"
);
