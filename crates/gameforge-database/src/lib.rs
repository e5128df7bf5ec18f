//! # gameforge-database
//!
//! PostgreSQL connection management, schema migrations, and concrete
//! repositories for the GameForge versioned file store.
//!
//! Reads go straight to the pool. Writes that must be atomic take a
//! `&mut PgConnection` borrowed from a transaction opened by the caller.

pub mod connection;
pub mod error;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
