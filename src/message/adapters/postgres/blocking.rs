//! Blocking operation helpers for the `PostgreSQL` store.
//!
//! Provides utilities for offloading synchronous Diesel operations to a
//! dedicated thread pool, avoiding blocking the async executor.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};

use crate::message::{error::StoreError, ports::store::StoreResult};

/// `PostgreSQL` connection pool type.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Pooled connection type for internal use.
pub(super) type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Runs a blocking database operation on a dedicated thread pool.
///
/// Wraps the closure in [`tokio::task::spawn_blocking`] to prevent
/// blocking the async executor's worker threads.
pub(super) async fn run_blocking<F, T>(f: F) -> StoreResult<T>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::unavailable(format!("task join error: {e}")))?
}

/// Obtains a connection from the pool.
///
/// Pool acquisition failure means the backend is unreachable right now, so
/// it maps to the transient [`StoreError::Unavailable`] class.
pub(super) fn get_conn(pool: &PgPool) -> StoreResult<PooledConn> {
    pool.get().map_err(|e| StoreError::unavailable(e.to_string()))
}
