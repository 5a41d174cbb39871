//! File-based state persistence implementation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::address::Address;

use super::{LoadResult, StateError, StateStore};

/// File-based implementation of [`StateStore`].
///
/// The file holds the raw address text and nothing else, so it can be
/// inspected or edited by hand.
///
/// # Atomic Writes
///
/// Uses write-to-temp-then-rename to prevent torn writes:
/// 1. Write to `{path}.tmp`
/// 2. Rename `{path}.tmp` to `{path}`
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Creates a new file-based state store at the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Performs the blocking save operation.
    ///
    /// Separated out so it can be wrapped in `spawn_blocking`.
    fn save_blocking(path: &Path, content: &str) -> Result<(), StateError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(StateError::Write)?;
            }
        }

        // Append .tmp instead of replacing the extension
        // (current_ip.txt -> current_ip.txt.tmp, not current_ip.tmp)
        let temp_path = PathBuf::from(format!("{}.tmp", path.display()));

        std::fs::write(&temp_path, content).map_err(StateError::Write)?;
        std::fs::rename(&temp_path, path).map_err(StateError::Write)?;

        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> LoadResult {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return LoadResult::NotFound,
            Err(e) => {
                return LoadResult::Corrupted {
                    reason: format!("Failed to read file: {e}"),
                };
            }
        };

        Address::new(&content).map_or_else(
            |_| LoadResult::Corrupted {
                reason: "File is empty".to_string(),
            },
            LoadResult::Loaded,
        )
    }

    async fn save(&self, address: &Address) -> Result<(), StateError> {
        let path = self.path.clone();
        let content = address.as_str().to_string();

        tokio::task::spawn_blocking(move || Self::save_blocking(&path, &content))
            .await
            .map_err(StateError::Task)?
    }
}
