//! JsonFileStore - the whole collection kept in memory, flushed to one JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::in_memory::{InMemoryStore, Tables};
use super::{DocumentStore, Row};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

/// File-backed document store.
///
/// The file holds a JSON object mapping table names to arrays of rows.
/// Every `write` re-serializes the full collection. Clones share state.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    inner: InMemoryStore,
    path: PathBuf,
}

impl JsonFileStore {
    /// Opens the store described by `config`, creating the storage directory
    /// tree if needed. A missing file starts an empty store.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        fs::create_dir_all(&config.storage_path)
            .map_err(|e| StoreError::io(&config.storage_path, e))?;

        let path = config.file_path();
        let tables = load(&path)?;
        debug!(path = %path.display(), tables = tables.len(), "opened json document store");

        Ok(Self {
            inner: InMemoryStore::from_tables(tables),
            path,
        })
    }

    /// Opens the store configured by the environment (`STORAGE_PATH`).
    pub fn open_default() -> StoreResult<Self> {
        Self::open(&StoreConfig::from_env())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Discards in-memory state and re-reads the file.
    pub fn reload(&self) -> StoreResult<()> {
        self.inner.replace(load(&self.path)?)
    }
}

fn load(path: &Path) -> StoreResult<Tables> {
    if !path.exists() {
        return Ok(Tables::new());
    }

    let raw = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    if raw.trim().is_empty() {
        return Ok(Tables::new());
    }

    serde_json::from_str(&raw).map_err(|e| StoreError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

impl DocumentStore for JsonFileStore {
    fn has_table(&self, table: &str) -> StoreResult<bool> {
        self.inner.has_table(table)
    }

    fn create_table(&self, table: &str) -> StoreResult<()> {
        self.inner.create_table(table)
    }

    fn rows(&self, table: &str) -> StoreResult<Vec<Row>> {
        self.inner.rows(table)
    }

    fn filter(&self, table: &str, predicate: &dyn Fn(&Row) -> bool) -> StoreResult<Vec<Row>> {
        self.inner.filter(table, predicate)
    }

    fn push(&self, table: &str, row: Row) -> StoreResult<()> {
        self.inner.push(table, row)
    }

    fn assign(&self, table: &str, matcher: &Row, partial: &Row) -> StoreResult<bool> {
        self.inner.assign(table, matcher, partial)
    }

    fn remove(&self, table: &str, matcher: &Row) -> StoreResult<usize> {
        self.inner.remove(table, matcher)
    }

    fn write(&self) -> StoreResult<()> {
        let tables = self.inner.snapshot()?;
        let bytes = serde_json::to_vec_pretty(&tables)?;
        fs::write(&self.path, bytes).map_err(|e| StoreError::io(&self.path, e))?;
        self.inner.write()
    }
}
