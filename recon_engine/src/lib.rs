//! Order Reconciliation Engine
//!
//! This library holds the local side of the order reconciliation pipeline: the normalized order record types, the
//! terminal-status policy, and the SQLite store that tracks which orders still need their details captured.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`SqliteDatabase`]). Low-level queries live in simple functions that accept a
//!    `&mut SqliteConnection`, so they compose into atomic transactions where the caller needs one. You should never
//!    need to access the tables directly; use the methods on [`SqliteDatabase`].
//! 2. The domain types ([`mod@db_types`]) and pure helpers ([`mod@helpers`]): work-set merging and paid-at timestamp
//!    conversion. These never touch I/O and are shared by the fetcher tooling.
#[cfg(feature = "sqlite")]
mod db;

pub mod db_types;
pub mod helpers;

#[cfg(all(any(feature = "test_utils", test), feature = "sqlite"))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use db::{db_url, new_pool, orders, OrderDbError, SqliteDatabase, StoreStats};
