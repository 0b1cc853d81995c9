//! Index Store Interface
//!
//! The contract the query path and the indexer share. Implementations must allow
//! lookups to run concurrently with writes, and must remove a path from a keyword's
//! association in a single step so a concurrent lookup sees it either before or
//! after the removal, never in between.

use anyhow::Result;
use std::path::{Path, PathBuf};

pub trait IndexStore: Send + Sync {
    /// Loads persisted state from `source`. A missing snapshot yields an empty index.
    fn initialize(&self, source: &Path) -> Result<()>;

    /// Returns the paths associated with `keyword`, in first-insertion order.
    ///
    /// Case-insensitive matching folds ASCII letters only.
    fn lookup(&self, keyword: &str, case_insensitive: bool) -> Result<Vec<PathBuf>>;

    /// Removes `path` from every keyword association. Unknown paths are a no-op.
    fn delete(&self, path: &Path) -> Result<()>;

    /// Associates `keyword` with `path`. Repeated inserts are idempotent.
    fn insert(&self, keyword: &str, path: &Path) -> Result<()>;

    /// Every path currently referenced by at least one keyword.
    fn paths(&self) -> Vec<PathBuf>;

    /// Saves unsaved changes, for stores that keep them in memory.
    fn persist(&self) -> Result<()> {
        Ok(())
    }
}
