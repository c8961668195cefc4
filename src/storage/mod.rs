//! Storage implementations.

use std::sync::Arc;

use tracing::{error, info};

use crate::codec::Codec;
use crate::config::StorageConfig;
use crate::interfaces::{EventStore, ProjectionReader, SnapshotStore};

pub mod helpers;

#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub mod schema;

#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub mod sql;

#[cfg(feature = "sqlite")]
pub use sql::sqlite::{SqliteEventStore, SqliteProjectionReader, SqliteSnapshotStore};

#[cfg(feature = "postgres")]
pub use sql::postgres::{PostgresEventStore, PostgresProjectionReader, PostgresSnapshotStore};

pub use crate::interfaces::{Result, StorageError};

/// The trait objects produced by [`init_storage`].
pub type Stores<S, P> = (
    Arc<dyn EventStore<P>>,
    Arc<dyn SnapshotStore<S>>,
    Arc<dyn ProjectionReader<S, P>>,
);

/// Initialize storage based on configuration.
///
/// Builds the pool for the configured backend, creates the tables if
/// needed, and returns (EventStore, SnapshotStore, ProjectionReader)
/// implementations sharing that pool.
pub async fn init_storage<S, P>(
    config: &StorageConfig,
    snapshot_codec: Arc<dyn Codec<S>>,
    event_codec: Arc<dyn Codec<P>>,
) -> std::result::Result<Stores<S, P>, Box<dyn std::error::Error>>
where
    S: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    info!("Storage: {} at {}", config.storage_type, config.path);

    match config.storage_type.as_str() {
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            if let Some(parent) = std::path::Path::new(&config.path).parent() {
                std::fs::create_dir_all(parent)?;
            }

            let pool =
                sqlx::SqlitePool::connect(&format!("sqlite:{}?mode=rwc", config.path)).await?;

            let event_store = Arc::new(SqliteEventStore::new(pool.clone(), event_codec.clone()));
            event_store.init().await?;

            let snapshot_store = Arc::new(SqliteSnapshotStore::new(
                pool.clone(),
                snapshot_codec.clone(),
            ));
            snapshot_store.init().await?;

            let reader = Arc::new(SqliteProjectionReader::new(pool, snapshot_codec, event_codec));

            Ok((event_store, snapshot_store, reader))
        }
        #[cfg(feature = "postgres")]
        "postgres" => {
            let pool = sqlx::PgPool::connect(&config.path).await?;

            let event_store = Arc::new(PostgresEventStore::new(pool.clone(), event_codec.clone()));
            event_store.init().await?;

            let snapshot_store = Arc::new(PostgresSnapshotStore::new(
                pool.clone(),
                snapshot_codec.clone(),
            ));
            snapshot_store.init().await?;

            let reader = Arc::new(PostgresProjectionReader::new(pool, snapshot_codec, event_codec));

            Ok((event_store, snapshot_store, reader))
        }
        other => {
            error!("Unknown storage type: {}", other);
            Err(format!("Unknown or disabled storage type: {}", other).into())
        }
    }
}
