use super::snapshot::{Snapshot, SnapshotEntry, read_snapshot, write_snapshot};
use super::store::IndexStore;

use anyhow::{Context, Result};
use dashmap::DashMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Posting {
    keyword: String,
    path: PathBuf,
}

/// Keyword index held in memory and persisted as a `bincode` snapshot.
///
/// `forward` maps the ASCII-folded keyword to its postings and is the only table
/// lookups touch. `reverse` maps a path to the folded keywords that reference it so
/// a delete can reach every association. Writers that need both tables lock the
/// `reverse` entry before the `forward` entry.
///
/// Flushes are serialized by `flush_lock`; the indexer, the snapshot loop and
/// shutdown may all ask for one at the same time.
pub struct KeywordIndex {
    forward: DashMap<String, Vec<Posting>>,
    reverse: DashMap<PathBuf, HashSet<String>>,
    dirty: AtomicBool,
    snapshot_path: RwLock<Option<PathBuf>>,
    flush_lock: Mutex<()>,
}

impl KeywordIndex {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates an index and loads it from `source`.
    pub fn open(source: &Path) -> Result<Arc<Self>> {
        let index = Self::new();
        index.initialize(source)?;
        Ok(index)
    }

    pub fn keyword_count(&self) -> usize {
        self.forward.len()
    }

    pub fn path_count(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.snapshot_path
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Writes the current associations to the snapshot file.
    ///
    /// Does nothing when the index was never initialized from a path.
    pub fn flush(&self) -> Result<()> {
        let Some(path) = self.snapshot_path() else {
            tracing::debug!("No snapshot path configured, skipping flush");
            return Ok(());
        };

        // Held across copy, write and rename: writers share the `.tmp` file.
        let _guard = self
            .flush_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Mutations racing with the copy below mark the index dirty again.
        self.dirty.store(false, Ordering::SeqCst);

        let entries: Vec<SnapshotEntry> = self
            .forward
            .iter()
            .flat_map(|entry| {
                entry
                    .value()
                    .iter()
                    .map(|posting| SnapshotEntry {
                        keyword: posting.keyword.clone(),
                        path: posting.path.clone(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        let count = entries.len();
        if let Err(e) = write_snapshot(&path, &Snapshot::new(entries)) {
            self.dirty.store(true, Ordering::SeqCst);
            return Err(e);
        }

        tracing::debug!("Flushed {} associations to {}", count, path.display());
        Ok(())
    }

    pub fn flush_if_dirty(&self) -> Result<bool> {
        if !self.is_dirty() {
            return Ok(false);
        }
        self.flush()?;
        Ok(true)
    }

    /// Periodically persists unsaved changes until the runtime shuts down.
    pub fn spawn_snapshot_loop(self: Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;

            loop {
                interval.tick().await;
                let index = self.clone();
                match tokio::task::spawn_blocking(move || index.flush_if_dirty()).await {
                    Ok(Ok(true)) => tracing::debug!("Index snapshot saved"),
                    Ok(Ok(false)) => {}
                    Ok(Err(e)) => tracing::error!("Failed to save index snapshot: {:#}", e),
                    Err(e) => tracing::error!("Snapshot task panicked: {}", e),
                }
            }
        })
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }
}

impl Default for KeywordIndex {
    fn default() -> Self {
        Self {
            forward: DashMap::new(),
            reverse: DashMap::new(),
            dirty: AtomicBool::new(false),
            snapshot_path: RwLock::new(None),
            flush_lock: Mutex::new(()),
        }
    }
}

impl IndexStore for KeywordIndex {
    fn initialize(&self, source: &Path) -> Result<()> {
        if let Some(parent) = source.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create index directory {}", parent.display())
            })?;
        }

        *self
            .snapshot_path
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(source.to_path_buf());

        match read_snapshot(source)? {
            Some(snapshot) => {
                let count = snapshot.entries.len();
                for entry in snapshot.entries {
                    self.insert(&entry.keyword, &entry.path)?;
                }
                self.dirty.store(false, Ordering::SeqCst);
                tracing::info!(
                    "Loaded {} associations ({} keywords, {} files) from {}",
                    count,
                    self.keyword_count(),
                    self.path_count(),
                    source.display()
                );
            }
            None => {
                tracing::info!("No index snapshot at {}, starting empty", source.display());
            }
        }

        Ok(())
    }

    fn lookup(&self, keyword: &str, case_insensitive: bool) -> Result<Vec<PathBuf>> {
        let folded = keyword.to_ascii_lowercase();

        let Some(postings) = self.forward.get(&folded) else {
            return Ok(Vec::new());
        };

        let mut seen = HashSet::new();
        Ok(postings
            .iter()
            .filter(|posting| case_insensitive || posting.keyword == keyword)
            .filter(|posting| seen.insert(posting.path.clone()))
            .map(|posting| posting.path.clone())
            .collect())
    }

    fn delete(&self, path: &Path) -> Result<()> {
        let Some((_, keywords)) = self.reverse.remove(path) else {
            return Ok(());
        };

        for folded in keywords.iter() {
            if let Some(mut postings) = self.forward.get_mut(folded) {
                postings.retain(|posting| posting.path != path);
            }
            self.forward
                .remove_if(folded, |_, postings| postings.is_empty());
        }

        self.mark_dirty();
        tracing::debug!(
            "Removed {} from {} keyword associations",
            path.display(),
            keywords.len()
        );
        Ok(())
    }

    fn insert(&self, keyword: &str, path: &Path) -> Result<()> {
        if keyword.is_empty() {
            anyhow::bail!("Cannot index an empty keyword for {}", path.display());
        }

        let folded = keyword.to_ascii_lowercase();
        let mut keywords = self.reverse.entry(path.to_path_buf()).or_default();
        let mut postings = self.forward.entry(folded.clone()).or_default();

        if postings
            .iter()
            .any(|posting| posting.keyword == keyword && posting.path == path)
        {
            return Ok(());
        }

        postings.push(Posting {
            keyword: keyword.to_string(),
            path: path.to_path_buf(),
        });
        keywords.insert(folded);
        drop(postings);
        drop(keywords);

        self.mark_dirty();
        Ok(())
    }

    fn paths(&self) -> Vec<PathBuf> {
        self.reverse
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    fn persist(&self) -> Result<()> {
        self.flush_if_dirty().map(|_| ())
    }
}
