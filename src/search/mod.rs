//! Search Service Module
//!
//! Resolves keyword queries against the shared index and shapes the matches for
//! the HTTP boundary.
//!
//! ## Responsibilities
//! - **Splitting**: Turning the raw `keyword` parameter into ordered terms.
//! - **Resolution**: Looking each term up, merging the candidates into one
//!   deduplicated list, and reading the files that still exist.
//! - **Eviction**: Deleting index entries for files that vanished from disk, at the
//!   moment a query runs into them.
//! - **Assembly**: Wrapping the matches into the `{"files": [...]}` payload.
//!
//! ## Submodules
//! - **`engine`**: `QueryResolver`, the lookup/merge/evict loop.
//! - **`handlers`**: HTTP request handler for the Axum web server.
//! - **`tokenizer`**: Query splitting and text-to-keyword extraction.
//! - **`types`**: Result containers and the response DTOs.

pub mod engine;
pub mod handlers;
pub mod tokenizer;
pub mod types;
