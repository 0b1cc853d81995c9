//! imgrep web service library
//!
//! Serves keyword search over a persisted index of image files while a background
//! task keeps filling that index. The binary (`main.rs`) only parses configuration
//! and hands over to `server::runtime`.
//!
//! ## Modules
//! - **`config`**: Command-line flags and their environment fallbacks.
//! - **`indexer`**: Background walk of the image tree, keyword extraction, pruning.
//! - **`search`**: Query resolution (lookup, dedup, existence check, lazy eviction)
//!   and the JSON response shape.
//! - **`server`**: Axum router and process lifecycle.
//! - **`storage`**: The `IndexStore` interface and the snapshot-backed `KeywordIndex`.

pub mod config;
pub mod indexer;
pub mod search;
pub mod server;
pub mod storage;
