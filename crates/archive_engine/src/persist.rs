use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use archive_core::{ChannelDirectory, StateError};
use archive_logging::{archive_info, archive_warn};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("state directory missing or not writable: {0}")]
    StateDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    State(#[from] StateError),
}

/// JSON file holding the channel directory between sessions.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing state is an empty directory; unreadable or corrupt state is
    /// logged and also treated as empty.
    pub fn load(&self) -> ChannelDirectory {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return ChannelDirectory::new();
            }
            Err(err) => {
                archive_warn!("Failed to read channel state from {:?}: {}", self.path, err);
                return ChannelDirectory::new();
            }
        };

        match ChannelDirectory::restore(&content) {
            Ok(directory) => {
                archive_info!(
                    "Loaded {} cached channels from {:?}",
                    directory.len(),
                    self.path
                );
                directory
            }
            Err(err) => {
                archive_warn!("Failed to parse channel state from {:?}: {}", self.path, err);
                ChannelDirectory::new()
            }
        }
    }

    /// Writes to a temp file next to the target, then renames over it.
    pub fn save(&self, directory: &ChannelDirectory) -> Result<(), PersistError> {
        let content = directory.to_json()?;
        let dir = self.state_dir()?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&self.path).map_err(|e| PersistError::Io(e.error))?;
        Ok(())
    }

    fn state_dir(&self) -> Result<PathBuf, PersistError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if dir.exists() {
            let meta = fs::metadata(&dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
            if !meta.is_dir() {
                return Err(PersistError::StateDir(format!("{dir:?} is not a directory")));
            }
        } else {
            fs::create_dir_all(&dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
        }
        Ok(dir)
    }
}
