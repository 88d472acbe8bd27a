//! Where the JSON document store lives on disk.

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the storage directory.
pub const STORAGE_PATH_ENV: &str = "STORAGE_PATH";

const DEFAULT_STORAGE_PATH: &str = "storage/db";
const DEFAULT_FILE_NAME: &str = "lowdb.json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub storage_path: PathBuf,
    pub file_name: String,
}

impl StoreConfig {
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }

    /// Reads `STORAGE_PATH` (default `storage/db`). Relative paths resolve
    /// against the current directory.
    pub fn from_env() -> Self {
        let raw = env::var(STORAGE_PATH_ENV).unwrap_or_else(|_| DEFAULT_STORAGE_PATH.to_string());
        Self::new(resolve(Path::new(&raw)))
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn file_path(&self) -> PathBuf {
        self.storage_path.join(&self.file_name)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn resolve(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
