//! Infrastructure layer - connections to external systems
//!
//! - SQL databases (MySQL, PostgreSQL) through sea-orm
//! - Caches (Redis, Memcache)

pub mod cache;
#[cfg(feature = "database")]
pub mod database;
