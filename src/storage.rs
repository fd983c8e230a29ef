use crate::repo_ref::{RefError, RepoRef};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the repository list file inside the config directory.
pub const REPO_FILE_NAME: &str = "repos.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    InvalidRef(#[from] RefError),
    #[error("repo already exists: {0}")]
    Duplicate(String),
    #[error("repo not found: {0}")]
    NotFound(String),
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize repository list: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Abstract persistence for the list of tracked repositories.
///
/// Implementors only provide `load` and `save`; `add` and `remove` are
/// expressed on top of them.
pub trait RepoStorage {
    /// Return the stored references in insertion order. A missing file is an
    /// empty list.
    fn load(&self) -> Result<Vec<String>, StoreError>;
    /// Replace the stored list
    fn save(&self, repos: &[String]) -> Result<(), StoreError>;

    /// Normalize `raw`, reject duplicates and append it.
    fn add(&self, raw: &str) -> Result<RepoRef, StoreError> {
        let repo = RepoRef::normalize(raw)?;
        let repos = self.load()?;
        let updated = insert_repo(&repos, &repo)?;
        self.save(&updated)?;
        tracing::info!(repo = %repo, "added repository");
        Ok(repo)
    }

    /// Remove the first entry matching `raw` and return it as stored.
    fn remove(&self, raw: &str) -> Result<String, StoreError> {
        let target = raw.trim();
        if target.is_empty() {
            return Err(RefError::Empty.into());
        }
        let repos = self.load()?;
        let (updated, removed) = remove_repo(&repos, target)?;
        self.save(&updated)?;
        tracing::info!(repo = %removed, "removed repository");
        Ok(removed)
    }
}

/// Repository list kept as a pretty-printed JSON array on disk.
pub struct FileRepoStore {
    path: PathBuf,
}

impl FileRepoStore {
    pub fn new(config_dir: &Path) -> Self {
        FileRepoStore {
            path: config_dir.join(REPO_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl RepoStorage for FileRepoStore {
    fn load(&self) -> Result<Vec<String>, StoreError> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        Ok(parse_repo_list(&content))
    }

    fn save(&self, repos: &[String]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let mut json = serde_json::to_string_pretty(repos)?;
        json.push('\n');
        let mut file = File::create(&self.path).map_err(|e| self.io_error(e))?;
        file.write_all(json.as_bytes()).map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

/// Parses the content of the repository list file.
///
/// - Empty or whitespace-only content yields an empty list.
/// - Content that is not a JSON array yields an empty list and a warning.
/// - Non-string array entries are skipped.
pub fn parse_repo_list(content: &[u8]) -> Vec<String> {
    if content.iter().all(|b| b.is_ascii_whitespace()) {
        return Vec::new();
    }

    match serde_json::from_slice::<Value>(content) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(repo) => Some(repo),
                other => {
                    tracing::warn!(entry = %other, "skipping non-string repository entry");
                    None
                }
            })
            .collect(),
        Ok(_) => {
            tracing::warn!("repository list is not a JSON array, treating as empty");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, "malformed repository list, treating as empty");
            Vec::new()
        }
    }
}

/// Returns a copy of `repos` with `repo` appended.
///
/// Fails with `StoreError::Duplicate` when an entry equal to `repo` ignoring
/// ASCII case is already present. `repos` is never modified.
pub fn insert_repo(repos: &[String], repo: &RepoRef) -> Result<Vec<String>, StoreError> {
    let canonical = repo.to_string();
    if repos.iter().any(|r| r.eq_ignore_ascii_case(&canonical)) {
        return Err(StoreError::Duplicate(canonical));
    }
    let mut updated = repos.to_vec();
    updated.push(canonical);
    Ok(updated)
}

/// Returns a copy of `repos` without the first entry matching `target`,
/// together with the removed entry.
pub fn remove_repo(repos: &[String], target: &str) -> Result<(Vec<String>, String), StoreError> {
    let idx = repos
        .iter()
        .position(|r| r.eq_ignore_ascii_case(target) || r == target)
        .ok_or_else(|| StoreError::NotFound(target.to_string()))?;
    let mut updated = repos.to_vec();
    let removed = updated.remove(idx);
    Ok((updated, removed))
}
