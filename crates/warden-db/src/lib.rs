//! Warden Database — SurrealDB connection management, schema
//! migrations and the account repository.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - The [`AccountRepository`](warden_core::repository::AccountRepository)
//!   implementation ([`repository::SurrealAccountRepository`])
//! - Error types ([`DbError`])

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
