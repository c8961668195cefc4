//! SQL database abstraction trait.

/// Trait for SQL database backends.
///
/// This trait abstracts over different SQL databases (PostgreSQL, SQLite)
/// by providing the pool type, the query building methods, and the DDL
/// each backend needs for the append-only tables.
pub trait SqlDatabase: Send + Sync + 'static {
    /// The connection pool type for this database.
    type Pool: Clone + Send + Sync;

    /// DDL for the events log. Safe to run repeatedly.
    const CREATE_EVENTS_TABLE: &'static str;

    /// DDL for the snapshot table. Safe to run repeatedly.
    const CREATE_SNAPSHOTS_TABLE: &'static str;

    /// Build a SQL query string from a sea-query SELECT statement.
    fn build_select(stmt: sea_query::SelectStatement) -> String;

    /// Build a SQL query string from a sea-query INSERT statement.
    fn build_insert(stmt: sea_query::InsertStatement) -> String;
}
