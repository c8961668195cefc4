//! Unified SQL SnapshotStore implementation.
//!
//! Uses a macro to generate implementations for each SQL backend. Unlike
//! the event log, no explicit transaction is needed: `put` is a single
//! append-only row insert.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::codec::Codec;

use super::SqlDatabase;

/// SQL-based implementation of SnapshotStore.
///
/// This generic implementation works with any SQL database that implements
/// the `SqlDatabase` trait (PostgreSQL, SQLite).
pub struct SqlSnapshotStore<DB: SqlDatabase, S> {
    pool: DB::Pool,
    codec: Arc<dyn Codec<S>>,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase, S> SqlSnapshotStore<DB, S> {
    /// Create a new SQL snapshot store with the given pool and state codec.
    pub fn new(pool: DB::Pool, codec: Arc<dyn Codec<S>>) -> Self {
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

/// Macro to implement SnapshotStore for a specific SQL backend.
macro_rules! impl_snapshot_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        impl<S: Send + Sync + 'static> SqlSnapshotStore<$db_type, S> {
            /// Create the snapshots table and index if they do not exist.
            pub async fn init(&self) -> crate::interfaces::Result<()> {
                sqlx::raw_sql(<$db_type as SqlDatabase>::CREATE_SNAPSHOTS_TABLE)
                    .execute(&self.pool)
                    .await?;
                Ok(())
            }
        }

        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl<S: Send + Sync + 'static> crate::interfaces::SnapshotStore<S>
            for SqlSnapshotStore<$db_type, S>
        {
            async fn put(
                &self,
                snapshot: crate::model::Snapshot<S>,
            ) -> crate::interfaces::Result<()> {
                use sea_query::Query;

                use crate::storage::schema::Snapshots;

                let state_data = self.codec.encode(&snapshot.state)?;

                tracing::debug!(name = %snapshot.name, "appending snapshot");

                let stmt = Query::insert()
                    .into_table(Snapshots::Table)
                    .columns([
                        Snapshots::Name,
                        Snapshots::LastConsideredEventId,
                        Snapshots::SchemaVersion,
                        Snapshots::StateData,
                    ])
                    .values_panic([
                        snapshot.name.into(),
                        snapshot.last_considered_event.into(),
                        (snapshot.schema_version as i64).into(),
                        state_data.into(),
                    ])
                    .to_owned();

                let sql = <$db_type>::build_insert(stmt);
                sqlx::query(&sql).execute(&self.pool).await?;

                Ok(())
            }
        }
    };
}

impl_snapshot_store!(super::sqlite::Sqlite, "sqlite");
impl_snapshot_store!(super::postgres::Postgres, "postgres");
