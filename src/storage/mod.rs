//! Keyword Index Storage Module
//!
//! Persisted keyword-to-file index shared by the background indexer and the
//! query path.
//!
//! ## Core Concepts
//! - **Interface**: `IndexStore` is the only surface the rest of the crate depends on
//!   (lookup, delete, insert, initialize).
//! - **Engine**: `KeywordIndex` keeps postings in concurrent maps so lookups proceed
//!   while the indexer writes, and removes a vanished path from every keyword at once.
//! - **Persistence**: the whole index is snapshotted to disk with `bincode` and
//!   reloaded on startup.

pub mod memory;
pub mod snapshot;
pub mod store;
