//! SQL connections for MySQL and PostgreSQL.
//!
//! [`SqlPool`] wraps a sea-orm pool behind the [`SqlConnection`] trait and
//! [`DatabaseManager`] keeps the named connections of an application.

mod manager;
mod options;
mod pool;

pub use manager::DatabaseManager;
pub use options::{MySqlOptions, PoolOptions, PostgresOptions};
pub use pool::{Session, SharedSqlConnection, SqlConnection, SqlPool};

#[cfg(any(test, feature = "test-utils"))]
pub use pool::MockSqlConnection;
