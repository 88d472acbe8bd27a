//! Records - typed accessor for one model's table.

use serde_json::Value;

use crate::error::StoreResult;
use crate::model::{Model, ModelType};
use crate::record::Record;
use crate::store::{DocumentStore, Row};

/// Typed entry point for working with records of a single model.
pub struct Records<'a, S> {
    store: &'a S,
    model: ModelType,
}

impl<'a, S: DocumentStore + Clone> Records<'a, S> {
    pub fn new<M: Model>(store: &'a S) -> Self {
        Self {
            store,
            model: M::model_type(),
        }
    }

    pub fn model(&self) -> ModelType {
        self.model
    }

    /// An empty, unsaved record.
    pub fn new_record(&self) -> StoreResult<Record<S>> {
        Record::of(self.model, self.store.clone())
    }

    /// The record with the given primary key, if it exists.
    pub fn find(&self, id: impl Into<Value>) -> StoreResult<Option<Record<S>>> {
        let mut record = self.new_record()?;
        record.find(id)?;
        if record.exists()? {
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }

    pub fn find_or_create(&self, id: impl Into<Value>, defaults: &Row) -> StoreResult<Record<S>> {
        self.new_record()?.find_or_create(id, defaults)
    }

    /// Fills a new record through the fillable gate and saves it.
    pub fn create(&self, attributes: &Row) -> StoreResult<Record<S>> {
        let mut record = self.new_record()?;
        record.fill(attributes);
        record.save()?;
        Ok(record)
    }

    /// Every record matching the equality filter, in store order.
    pub fn where_eq(&self, filter: &Row) -> StoreResult<Vec<Record<S>>> {
        Ok(self.new_record()?.where_eq(filter, None)?.into_vec())
    }

    /// The first record matching the equality filter.
    pub fn first_where(&self, filter: &Row) -> StoreResult<Option<Record<S>>> {
        match self.new_record()?.where_eq(filter, Some(1))?.into_one() {
            Some(record) if record.exists()? => Ok(Some(record)),
            _ => Ok(None),
        }
    }

    pub fn all(&self) -> StoreResult<Vec<Record<S>>> {
        self.new_record()?.all()
    }
}

/// Extension trait for typed record access on any cloneable store.
pub trait RecordsExt: DocumentStore + Clone + Sized {
    /// Get a typed record accessor.
    fn records<M: Model>(&self) -> Records<'_, Self> {
        Records::new::<M>(self)
    }
}

impl<S: DocumentStore + Clone> RecordsExt for S {}
