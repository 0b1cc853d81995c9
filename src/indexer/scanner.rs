//! Background Indexing Pass
//!
//! Walks the configured tree, extracts keywords for every image file and writes the
//! associations into the shared store. The server launches it with `start` and never
//! waits for it, so queries run against whatever has been written so far.

use super::extract::{KeywordExtractor, is_image};
use crate::storage::store::IndexStore;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

#[derive(Debug, Clone, Default)]
pub struct IndexerOptions {
    /// Repeat the pass with this delay between runs. `None` runs a single pass.
    pub rescan_interval: Option<Duration>,
}

/// Counters for one pass over the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub files_seen: usize,
    pub files_indexed: usize,
    pub keywords_written: usize,
    pub pruned: usize,
}

pub struct Indexer {
    root: PathBuf,
    store: Arc<dyn IndexStore>,
    extractor: Arc<dyn KeywordExtractor>,
    options: IndexerOptions,
}

impl Indexer {
    pub fn new(
        root: PathBuf,
        store: Arc<dyn IndexStore>,
        extractor: Arc<dyn KeywordExtractor>,
        options: IndexerOptions,
    ) -> Arc<Self> {
        Arc::new(Self {
            root,
            store,
            extractor,
            options,
        })
    }

    /// Spawns the indexing task and returns immediately.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!("Indexer started on {}", self.root.display());

            loop {
                let started = Instant::now();
                let indexer = self.clone();
                match tokio::task::spawn_blocking(move || indexer.run_pass()).await {
                    Ok(report) => tracing::info!(
                        "Indexing pass finished in {:?}: {} images seen, {} indexed, {} keywords, {} pruned",
                        started.elapsed(),
                        report.files_seen,
                        report.files_indexed,
                        report.keywords_written,
                        report.pruned
                    ),
                    Err(e) => tracing::error!("Indexing pass panicked: {}", e),
                }

                match self.options.rescan_interval {
                    Some(interval) => tokio::time::sleep(interval).await,
                    None => break,
                }
            }

            tracing::info!("Indexer stopped");
        })
    }

    /// Runs one full pass: index every image under the root, then drop entries for
    /// files under the root that no longer exist.
    pub fn run_pass(&self) -> PassReport {
        let mut report = PassReport::default();

        if !self.root.is_dir() {
            tracing::error!("Index root {} is not a directory", self.root.display());
            return report;
        }

        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_image(entry.path()) {
                continue;
            }

            report.files_seen += 1;
            match self.index_file(entry.path()) {
                Ok(0) => {}
                Ok(written) => {
                    report.files_indexed += 1;
                    report.keywords_written += written;
                }
                Err(e) => {
                    tracing::warn!("Failed to index {}: {:#}", entry.path().display(), e);
                }
            }
        }

        report.pruned = self.prune_missing();

        if let Err(e) = self.store.persist() {
            tracing::error!("Failed to persist index after pass: {:#}", e);
        }

        report
    }

    fn index_file(&self, path: &Path) -> Result<usize> {
        let keywords = self.extractor.extract(path)?;

        let mut written = 0;
        for keyword in keywords.iter() {
            match self.store.insert(keyword, path) {
                Ok(()) => written += 1,
                Err(e) => tracing::warn!(
                    "Failed to store keyword '{}' for {}: {:#}",
                    keyword,
                    path.display(),
                    e
                ),
            }
        }

        tracing::trace!("Indexed {} with {} keywords", path.display(), written);
        Ok(written)
    }

    fn prune_missing(&self) -> usize {
        let mut pruned = 0;

        for path in self.store.paths() {
            if !path.starts_with(&self.root) {
                continue;
            }
            let missing = matches!(
                std::fs::symlink_metadata(&path),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound
            );
            if !missing {
                continue;
            }

            match self.store.delete(&path) {
                Ok(()) => pruned += 1,
                Err(e) => tracing::warn!("Failed to prune {}: {:#}", path.display(), e),
            }
        }

        pruned
    }
}
