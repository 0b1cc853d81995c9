use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A resolved match: an existing file and the bytes read from it for this query.
#[derive(Debug, Clone, PartialEq)]
pub struct FileResult {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Results of one query, in first-discovery order, at most one entry per path.
///
/// Also remembers paths that failed to read during the query so later terms
/// do not try them again. Those never reach the response.
#[derive(Debug, Default)]
pub struct ResultSet {
    files: Vec<FileResult>,
    accepted: HashSet<PathBuf>,
    skipped: HashSet<PathBuf>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.accepted.contains(path)
    }

    /// Whether `path` was already accepted or skipped by this query.
    pub fn is_settled(&self, path: &Path) -> bool {
        self.accepted.contains(path) || self.skipped.contains(path)
    }

    /// Records a path that could not be read. Returns false if it was already known.
    pub fn skip(&mut self, path: PathBuf) -> bool {
        !self.accepted.contains(&path) && self.skipped.insert(path)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &Path> {
        self.skipped.iter().map(PathBuf::as_path)
    }

    /// Appends `result` unless its path is already present. Returns whether it was added.
    pub fn push(&mut self, result: FileResult) -> bool {
        if !self.accepted.insert(result.path.clone()) {
            return false;
        }
        self.files.push(result);
        true
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> Vec<&Path> {
        self.files.iter().map(|f| f.path.as_path()).collect()
    }

    pub fn files(&self) -> &[FileResult] {
        &self.files
    }

    pub fn into_files(self) -> Vec<FileResult> {
        self.files
    }
}

/// One file in the search response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultRow {
    pub filename: String,
    #[serde(serialize_with = "encode_bytes", deserialize_with = "decode_bytes")]
    pub bytes: Vec<u8>,
}

/// Body of `/imgrep/search`: `{"files": [{"filename": ..., "bytes": ...}]}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchResponse {
    pub files: Vec<ResultRow>,
}

/// Shapes a `ResultSet` for transport. Pure; order is preserved.
pub fn assemble(results: ResultSet) -> SearchResponse {
    SearchResponse {
        files: results
            .into_files()
            .into_iter()
            .map(|file| ResultRow {
                filename: file.path.to_string_lossy().into_owned(),
                bytes: file.bytes,
            })
            .collect(),
    }
}

// File contents travel as standard base64 so the page can build data URIs from them.
fn encode_bytes<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}

fn decode_bytes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let encoded = String::deserialize(deserializer)?;
    STANDARD
        .decode(encoded.as_bytes())
        .map_err(serde::de::Error::custom)
}
