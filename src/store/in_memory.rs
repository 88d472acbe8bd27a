//! InMemoryStore - IndexMap-backed document store for testing and development.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use super::{matches, DocumentStore, Row};
use crate::error::{StoreError, StoreResult};

pub(crate) type Tables = IndexMap<String, Vec<Row>>;

/// In-memory document store.
///
/// Clone-friendly via Arc: every clone sees the same tables. `write` only
/// counts flushes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    writes: Arc<AtomicU64>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_tables(tables: Tables) -> Self {
        Self {
            tables: Arc::new(RwLock::new(tables)),
            writes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of times `write` has been called.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Names of every table, in creation order.
    pub fn tables(&self) -> StoreResult<Vec<String>> {
        Ok(self.read("tables")?.keys().cloned().collect())
    }

    pub(crate) fn snapshot(&self) -> StoreResult<Tables> {
        Ok(self.read("snapshot")?.clone())
    }

    pub(crate) fn replace(&self, tables: Tables) -> StoreResult<()> {
        *self.write_lock("replace")? = tables;
        Ok(())
    }

    fn read(&self, operation: &'static str) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }

    fn write_lock(&self, operation: &'static str) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }
}

impl DocumentStore for InMemoryStore {
    fn has_table(&self, table: &str) -> StoreResult<bool> {
        Ok(self.read("has_table")?.contains_key(table))
    }

    fn create_table(&self, table: &str) -> StoreResult<()> {
        self.write_lock("create_table")?
            .insert(table.to_string(), Vec::new());
        Ok(())
    }

    fn rows(&self, table: &str) -> StoreResult<Vec<Row>> {
        Ok(self
            .read("rows")?
            .get(table)
            .cloned()
            .unwrap_or_default())
    }

    fn filter(&self, table: &str, predicate: &dyn Fn(&Row) -> bool) -> StoreResult<Vec<Row>> {
        let tables = self.read("filter")?;
        Ok(tables
            .get(table)
            .map(|rows| rows.iter().filter(|row| predicate(row)).cloned().collect())
            .unwrap_or_default())
    }

    fn push(&self, table: &str, row: Row) -> StoreResult<()> {
        self.write_lock("push")?
            .entry(table.to_string())
            .or_default()
            .push(row);
        Ok(())
    }

    fn assign(&self, table: &str, matcher: &Row, partial: &Row) -> StoreResult<bool> {
        let mut tables = self.write_lock("assign")?;
        let target = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| matches(row, matcher)));

        match target {
            Some(row) => {
                for (key, value) in partial {
                    row.insert(key.clone(), value.clone());
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove(&self, table: &str, matcher: &Row) -> StoreResult<usize> {
        let mut tables = self.write_lock("remove")?;
        let Some(rows) = tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|row| !matches(row, matcher));
        Ok(before - rows.len())
    }

    fn write(&self) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
