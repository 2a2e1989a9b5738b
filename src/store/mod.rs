use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

pub type ConvertedIds = BTreeSet<u64>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read converted set: {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse converted set: {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to create state directory: {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to back up unreadable converted set: {path}: {source}")]
    Backup {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write converted set: {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Where the converted marks live between sessions.
pub trait ConvertedStore {
    /// A store that has never been written yields an empty set.
    fn load(&self) -> Result<ConvertedIds, StoreError>;

    fn save(&mut self, ids: &ConvertedIds) -> Result<(), StoreError>;
}

/// A single JSON file holding an array of record ids.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where an unparsable state file is moved before it gets overwritten.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".bak");
        PathBuf::from(name)
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }

    // moves a state file that does not hold an id array out of the way
    fn back_up_unparsed(&self) -> Result<(), StoreError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(StoreError::Read {
                    path: self.display(),
                    source: e,
                })
            }
        };
        let parsed = serde_json::from_slice::<Vec<u64>>(&raw);
        if raw.iter().all(u8::is_ascii_whitespace) || parsed.is_ok() {
            return Ok(());
        }
        let backup = self.backup_path();
        std::fs::rename(&self.path, &backup).map_err(|e| StoreError::Backup {
            path: backup.display().to_string(),
            source: e,
        })?;
        tracing::warn!(backup = %backup.display(), "moved unreadable converted set aside");
        Ok(())
    }
}

impl ConvertedStore for JsonFileStore {
    fn load(&self) -> Result<ConvertedIds, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ConvertedIds::new()),
            Err(e) => {
                return Err(StoreError::Read {
                    path: self.display(),
                    source: e,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(ConvertedIds::new());
        }
        let ids: Vec<u64> = serde_json::from_str(&raw).map_err(|e| StoreError::Parse {
            path: self.display(),
            source: e,
        })?;
        Ok(ids.into_iter().collect())
    }

    fn save(&mut self, ids: &ConvertedIds) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::CreateDir {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        self.back_up_unparsed()?;
        let ids: Vec<u64> = ids.iter().copied().collect();
        // a Vec<u64> always serializes
        let body = serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string());
        std::fs::write(&self.path, body).map_err(|e| StoreError::Write {
            path: self.display(),
            source: e,
        })
    }
}

/// Keeps the set in memory only; counts writes so callers can observe them.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    ids: ConvertedIds,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
            writes: 0,
        }
    }

    pub fn ids(&self) -> &ConvertedIds {
        &self.ids
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ConvertedStore for MemoryStore {
    fn load(&self) -> Result<ConvertedIds, StoreError> {
        Ok(self.ids.clone())
    }

    fn save(&mut self, ids: &ConvertedIds) -> Result<(), StoreError> {
        self.ids = ids.clone();
        self.writes += 1;
        Ok(())
    }
}
