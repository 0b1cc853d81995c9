//! Indexer Module
//!
//! Populates the keyword index in the background.
//!
//! ## Workflow
//! 1. **Walk**: Recursively lists files under the configured root.
//! 2. **Filter**: Keeps files with a known image extension.
//! 3. **Extract**: Asks the `KeywordExtractor` which keywords describe each file.
//! 4. **Store**: Writes the associations, prunes entries for files that disappeared
//!    and persists the index.

pub mod extract;
pub mod scanner;
