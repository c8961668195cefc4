//! Unified SQL storage implementations.
//!
//! This module provides shared implementations for SQL-based storage
//! backends (PostgreSQL, SQLite). The implementations are parameterized by
//! database type using the `SqlDatabase` trait; the trait impls are
//! generated per backend, carrying the backend's transaction-begin
//! statements so each unit of work gets the right locking and isolation.

mod event_store;
mod projection;
mod query;
mod snapshot_store;

pub use event_store::SqlEventStore;
pub use projection::SqlProjectionReader;
pub use query::SqlDatabase;
pub use snapshot_store::SqlSnapshotStore;

#[cfg(feature = "postgres")]
pub mod postgres {
    //! PostgreSQL database backend.

    use sea_query::PostgresQueryBuilder;
    use sqlx::PgPool;

    use crate::storage::schema;

    /// PostgreSQL database marker type.
    pub struct Postgres;

    impl super::SqlDatabase for Postgres {
        type Pool = PgPool;

        const CREATE_EVENTS_TABLE: &'static str = schema::POSTGRES_CREATE_EVENTS_TABLE;
        const CREATE_SNAPSHOTS_TABLE: &'static str = schema::POSTGRES_CREATE_SNAPSHOTS_TABLE;

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }

        fn build_insert(stmt: sea_query::InsertStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }
    }

    /// PostgreSQL event store.
    pub type PostgresEventStore<P> = super::SqlEventStore<Postgres, P>;

    /// PostgreSQL snapshot store.
    pub type PostgresSnapshotStore<S> = super::SqlSnapshotStore<Postgres, S>;

    /// PostgreSQL projection reader.
    pub type PostgresProjectionReader<S, P> = super::SqlProjectionReader<Postgres, S, P>;
}

#[cfg(feature = "sqlite")]
pub mod sqlite {
    //! SQLite database backend.

    use sea_query::SqliteQueryBuilder;
    use sqlx::SqlitePool;

    use crate::storage::schema;

    /// SQLite database marker type.
    pub struct Sqlite;

    impl super::SqlDatabase for Sqlite {
        type Pool = SqlitePool;

        const CREATE_EVENTS_TABLE: &'static str = schema::SQLITE_CREATE_EVENTS_TABLE;
        const CREATE_SNAPSHOTS_TABLE: &'static str = schema::SQLITE_CREATE_SNAPSHOTS_TABLE;

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }

        fn build_insert(stmt: sea_query::InsertStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }
    }

    /// SQLite event store.
    pub type SqliteEventStore<P> = super::SqlEventStore<Sqlite, P>;

    /// SQLite snapshot store.
    pub type SqliteSnapshotStore<S> = super::SqlSnapshotStore<Sqlite, S>;

    /// SQLite projection reader.
    pub type SqliteProjectionReader<S, P> = super::SqlProjectionReader<Sqlite, S, P>;
}
