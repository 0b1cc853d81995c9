use super::tokenizer::split_keywords;
use super::types::{FileResult, ResultSet};
use crate::storage::store::IndexStore;

use anyhow::Result;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Match keywords ignoring ASCII case.
    pub case_insensitive: bool,
    /// Upper bound for reading a single file; exceeding it counts as a read failure.
    pub read_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            read_timeout: Duration::from_secs(5),
        }
    }
}

enum Outcome {
    Found(Vec<u8>),
    Vanished,
    Unreadable,
}

/// Resolves multi-keyword queries against the shared index.
///
/// Holds no per-query state, so one resolver serves any number of concurrent
/// requests. The index may be empty or still filling up; queries see whatever it
/// holds at the moment of each lookup.
pub struct QueryResolver {
    store: Arc<dyn IndexStore>,
    config: ResolverConfig,
}

impl QueryResolver {
    pub fn new(store: Arc<dyn IndexStore>, config: ResolverConfig) -> Arc<Self> {
        Arc::new(Self { store, config })
    }

    /// Looks up every keyword in `query` and returns the union of matching files.
    ///
    /// Terms are processed in order and candidates in lookup order, so the first
    /// keyword to reach a path decides its position. Indexed paths that no longer
    /// exist are deleted from the store on the way. Per-term and per-file failures
    /// are logged and skipped; a path that failed to read is not tried again by a
    /// later term of the same query.
    pub async fn resolve(&self, query: &str) -> Result<ResultSet> {
        let mut results = ResultSet::new();

        for keyword in split_keywords(query) {
            let candidates = match self.store.lookup(keyword, self.config.case_insensitive) {
                Ok(paths) => paths,
                Err(e) => {
                    tracing::warn!("Lookup failed for keyword '{}': {:#}", keyword, e);
                    continue;
                }
            };

            tracing::debug!("Keyword '{}' matched {} files", keyword, candidates.len());

            for path in candidates {
                if results.is_settled(&path) {
                    continue;
                }

                match self.load_candidate(&path).await {
                    Outcome::Found(bytes) => {
                        results.push(FileResult { path, bytes });
                    }
                    Outcome::Vanished => self.evict(&path),
                    Outcome::Unreadable => {
                        results.skip(path);
                    }
                }
            }
        }

        tracing::debug!("Query '{}' resolved to {} files", query.trim(), results.len());
        Ok(results)
    }

    async fn load_candidate(&self, path: &Path) -> Outcome {
        // Only NotFound proves the entry is stale; any other stat error falls
        // through to the read, which reports it.
        if let Err(e) = tokio::fs::metadata(path).await
            && e.kind() == ErrorKind::NotFound
        {
            return Outcome::Vanished;
        }

        match tokio::time::timeout(self.config.read_timeout, tokio::fs::read(path)).await {
            Ok(Ok(bytes)) => Outcome::Found(bytes),
            Ok(Err(e)) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                Outcome::Unreadable
            }
            Err(_) => {
                tracing::warn!(
                    "Reading {} exceeded {:?}, skipping",
                    path.display(),
                    self.config.read_timeout
                );
                Outcome::Unreadable
            }
        }
    }

    fn evict(&self, path: &Path) {
        match self.store.delete(path) {
            Ok(()) => tracing::info!("Evicted missing file {} from index", path.display()),
            Err(e) => tracing::error!("Failed to evict {}: {:#}", path.display(), e),
        }
    }
}
