use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::Record;
use crate::error::StoreResult;
use crate::store::{matcher, DocumentStore, Row};

/// Input to [`Record::update`]: one attribute or a mapping of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Changes {
    One(String, Value),
    Many(Row),
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for Changes {
    fn from((attr, value): (K, V)) -> Self {
        Changes::One(attr.into(), value.into())
    }
}

impl From<Row> for Changes {
    fn from(row: Row) -> Self {
        Changes::Many(row)
    }
}

/// Integer value of a stored key, whether it was written as `2` or `2.0`.
fn integral_key(value: &Value) -> Option<i64> {
    if let Some(id) = value.as_i64() {
        return Some(id);
    }
    if value.as_u64().is_some() {
        return Some(i64::MAX);
    }
    value
        .as_f64()
        .filter(|id| id.is_finite() && id.fract() == 0.0)
        .map(|id| id as i64)
}

impl<S: DocumentStore + Clone> Record<S> {
    /// True iff the identity is set and a row with it is in the table now.
    pub fn exists(&self) -> StoreResult<bool> {
        let Some(id) = self.id() else {
            return Ok(false);
        };
        let found = self
            .store
            .find_one(&self.table(), &matcher(self.primary_key(), id.clone()))?;
        Ok(found.is_some())
    }

    /// The identity a new row would get: a UUID when the model does not
    /// auto-increment, otherwise one past the table's largest integer key.
    ///
    /// Reads then appends without a lock; only safe with a single writer.
    pub fn next_id(&self) -> StoreResult<Value> {
        if !self.model.auto_increment() {
            return Ok(Value::String(Uuid::new_v4().to_string()));
        }

        let primary_key = self.primary_key();
        let max = self
            .store
            .rows(&self.table())?
            .iter()
            .filter_map(|row| row.get(primary_key).and_then(integral_key))
            .max();

        Ok(Value::from(max.map_or(1, |max| max.saturating_add(1))))
    }

    /// Loads the row with the given primary key onto this record, bypassing
    /// the fillable gate. A miss leaves the record untouched.
    pub fn find(&mut self, id: impl Into<Value>) -> StoreResult<&mut Self> {
        let found = self
            .store
            .find_one(&self.table(), &matcher(self.primary_key(), id.into()))?;
        if let Some(row) = found {
            self.hydrate(row);
        }
        Ok(self)
    }

    /// Returns this record when `find(id)` hits. Otherwise creates and saves a
    /// fresh record filled with `defaults`, whose id comes from
    /// [`Record::next_id`] and need not equal `id`.
    pub fn find_or_create(mut self, id: impl Into<Value>, defaults: &Row) -> StoreResult<Self> {
        self.find(id)?;
        if self.exists()? {
            return Ok(self);
        }

        let mut created = Record::of(self.model, self.store.clone())?;
        created.fill(defaults);
        created.save()?;
        Ok(created)
    }

    /// Sets each change through the fillable gate, then saves.
    pub fn update(&mut self, changes: impl Into<Changes>) -> StoreResult<&mut Self> {
        match changes.into() {
            Changes::One(attr, value) => {
                self.set(&attr, value);
            }
            Changes::Many(row) => self.fill(&row),
        }
        self.save()
    }

    /// Writes every present fillable attribute (getters applied) to the store.
    ///
    /// An existing row is merged in place; otherwise a new row is appended
    /// under a fresh identity. Flushes, then clears every dirty marker.
    pub fn save(&mut self) -> StoreResult<&mut Self> {
        let mut payload = Row::new();
        for attr in self.model.fillable() {
            if let Some(value) = self.value(attr) {
                payload.insert(attr.to_string(), value);
            }
        }

        let table = self.table();
        let primary_key = self.primary_key();

        if self.exists()? {
            let id = self.id().cloned().unwrap_or(Value::Null);
            self.store
                .assign(&table, &matcher(primary_key, id.clone()), &payload)?;
            debug!(table = %table, id = %id, fields = payload.len(), "updated record");
        } else {
            let id = self.next_id()?;
            self.set_raw(primary_key, id.clone());

            let mut row = matcher(primary_key, id.clone());
            for (attr, value) in payload {
                if attr != primary_key {
                    row.insert(attr, value);
                }
            }
            self.store.push(&table, row)?;
            debug!(table = %table, id = %id, "inserted record");
        }

        self.store.write()?;
        self.clear_dirty(None);
        Ok(self)
    }

    /// Removes this record's row and forgets its identity. Returns false when
    /// there was no stored row.
    pub fn delete(&mut self) -> StoreResult<bool> {
        if !self.exists()? {
            return Ok(false);
        }

        let table = self.table();
        let primary_key = self.primary_key();
        let id = self.id().cloned().unwrap_or(Value::Null);
        let removed = self.store.remove(&table, &matcher(primary_key, id.clone()))?;
        self.store.write()?;
        self.attributes.shift_remove(primary_key);
        debug!(table = %table, id = %id, removed, "deleted record");
        Ok(removed > 0)
    }
}
