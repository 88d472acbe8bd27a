//! Records - one conceptual row of a model's table.
//!
//! A record is an attribute bag plus a set of dirty attribute names, bound
//! to a model type and a store handle. Existence is never cached: it is
//! re-derived from the store every time it is asked for.
//!
//! ## Example
//!
//! ```ignore
//! let store = InMemoryStore::new();
//!
//! let mut ann = Record::new::<User>(store.clone())?;
//! ann.set("name", "Ann");
//! ann.save()?;
//!
//! let loaded = Record::with_id::<User>(store, 1)?;
//! assert_eq!(loaded.value("name"), Some(json!("Ann")));
//! ```

mod persistence;
mod query;
mod relations;

use std::fmt;

use indexmap::IndexSet;
use serde::ser::{Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::error::StoreResult;
use crate::model::{Model, ModelType};
use crate::store::{DocumentStore, Row};

pub use persistence::Changes;
pub use query::Matches;
pub use relations::Related;

/// Result of [`Record::set`]. Writes to non-fillable attributes are dropped,
/// never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Applied,
    RejectedNotFillable,
}

impl SetOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SetOutcome::Applied)
    }
}

/// What [`Record::get`] resolves an attribute name to.
#[derive(Debug, Clone)]
pub enum Attribute<S> {
    Value(Value),
    One(Record<S>),
    Many(Vec<Record<S>>),
}

impl<S> Attribute<S> {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Attribute::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Attribute::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_one(self) -> Option<Record<S>> {
        match self {
            Attribute::One(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_many(self) -> Option<Vec<Record<S>>> {
        match self {
            Attribute::Many(records) => Some(records),
            _ => None,
        }
    }
}

impl<S> From<Related<S>> for Attribute<S> {
    fn from(related: Related<S>) -> Self {
        match related {
            Related::One(record) => Attribute::One(record),
            Related::Many(records) => Attribute::Many(records),
        }
    }
}

/// A model instance.
#[derive(Clone)]
pub struct Record<S> {
    model: ModelType,
    store: S,
    attributes: Row,
    dirty: IndexSet<String>,
}

impl<S: DocumentStore + Clone> Record<S> {
    /// An empty, unsaved record. Creates the model's table if missing.
    pub fn new<M: Model>(store: S) -> StoreResult<Self> {
        Self::of(M::model_type(), store)
    }

    /// Like [`Record::new`] for a type-erased model.
    pub fn of(model: ModelType, store: S) -> StoreResult<Self> {
        let table = model.table();
        if !store.has_table(&table)? {
            store.create_table(&table)?;
            store.write()?;
            debug!(model = model.name(), table = %table, "created table");
        }
        Ok(Self::detached(model, store))
    }

    /// Loads the row with the given primary key. The record is returned even
    /// when nothing matched; check [`Record::exists`].
    pub fn with_id<M: Model>(store: S, id: impl Into<Value>) -> StoreResult<Self> {
        let mut record = Self::new::<M>(store)?;
        record.find(id)?;
        Ok(record)
    }

    /// An unsaved record filled from `attributes` through the fillable gate.
    pub fn from_attributes<M: Model>(store: S, attributes: &Row) -> StoreResult<Self> {
        let mut record = Self::new::<M>(store)?;
        record.fill(attributes);
        Ok(record)
    }

    /// Fills from `lookup`, then runs [`Record::find_or_create`] with the
    /// lookup mapping itself as the id.
    pub fn find_or_create_by<M: Model>(store: S, lookup: Row, defaults: &Row) -> StoreResult<Self> {
        let mut record = Self::new::<M>(store)?;
        record.fill(&lookup);
        record.find_or_create(Value::Object(lookup), defaults)
    }
}

impl<S> Record<S> {
    /// A record with no table bootstrap, used when hydrating rows already read
    /// from the store.
    pub(crate) fn detached(model: ModelType, store: S) -> Self {
        Self {
            model,
            store,
            attributes: Row::new(),
            dirty: IndexSet::new(),
        }
    }

    pub(crate) fn hydrate(&mut self, row: Row) {
        for (attr, value) in row {
            self.attributes.insert(attr, value);
        }
    }

    pub fn model(&self) -> ModelType {
        self.model
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn table(&self) -> String {
        self.model.table()
    }

    pub fn primary_key(&self) -> &'static str {
        self.model.primary_key()
    }

    /// The identity, if set. `null`, `false`, `0` and `""` count as unset,
    /// so a stored row keyed by one of them is never seen as existing.
    pub fn id(&self) -> Option<&Value> {
        self.raw(self.primary_key()).filter(|id| !is_blank_identity(id))
    }

    pub fn attributes(&self) -> &Row {
        &self.attributes
    }

    pub fn has_attribute(&self, attr: &str) -> bool {
        self.attributes.contains_key(attr)
    }

    pub fn has_relation(&self, attr: &str) -> bool {
        self.model.relation(attr).is_some()
    }

    pub fn has_getter(&self, attr: &str) -> bool {
        self.model.getter(attr).is_some()
    }

    pub fn has_setter(&self, attr: &str) -> bool {
        self.model.setter(attr).is_some()
    }

    pub fn is_fillable(&self, attr: &str) -> bool {
        self.model.is_fillable(attr)
    }

    pub fn is_hidden(&self, attr: &str) -> bool {
        self.model.is_hidden(attr)
    }

    /// The stored value with no getter applied.
    pub fn raw(&self, attr: &str) -> Option<&Value> {
        self.attributes.get(attr)
    }

    /// The getter-transformed value of a present attribute. Does not consult
    /// relations.
    pub fn value(&self, attr: &str) -> Option<Value> {
        let raw = self.attributes.get(attr)?;
        Some(match self.model.getter(attr) {
            Some(getter) => getter(raw),
            None => raw.clone(),
        })
    }

    /// Stores a value directly, bypassing the fillable gate, setters and
    /// dirty tracking.
    pub fn set_raw(&mut self, attr: &str, value: impl Into<Value>) -> &mut Self {
        self.attributes.insert(attr.to_string(), value.into());
        self
    }

    pub fn set(&mut self, attr: &str, value: impl Into<Value>) -> SetOutcome {
        if !self.model.is_fillable(attr) {
            return SetOutcome::RejectedNotFillable;
        }

        self.dirty.insert(attr.to_string());
        let value = value.into();
        let value = match self.model.setter(attr) {
            Some(setter) => setter(value),
            None => value,
        };
        self.attributes.insert(attr.to_string(), value);
        SetOutcome::Applied
    }

    /// Applies [`Record::set`] to every entry, in the mapping's order.
    pub fn fill(&mut self, attributes: &Row) {
        for (attr, value) in attributes {
            self.set(attr, value.clone());
        }
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn is_attribute_dirty(&self, attr: &str) -> bool {
        self.dirty.contains(attr)
    }

    /// Dirty attribute names, in the order they were first written.
    pub fn dirty_attributes(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    /// Clears one dirty marker, or all of them with `None`.
    pub fn clear_dirty(&mut self, attr: Option<&str>) -> &mut Self {
        match attr {
            Some(attr) => {
                self.dirty.shift_remove(attr);
            }
            None => self.dirty.clear(),
        }
        self
    }

    /// Every present attribute except hidden ones, getters applied.
    pub fn to_object(&self) -> Row {
        self.attributes
            .keys()
            .filter(|attr| !self.model.is_hidden(attr))
            .filter_map(|attr| self.value(attr).map(|value| (attr.clone(), value)))
            .collect()
    }
}

impl<S: DocumentStore + Clone> Record<S> {
    /// Resolves an attribute: a present attribute (getter applied) first,
    /// then a declared relation. Unknown names resolve to `None`.
    pub fn get(&self, attr: &str) -> StoreResult<Option<Attribute<S>>> {
        if let Some(value) = self.value(attr) {
            return Ok(Some(Attribute::Value(value)));
        }

        if self.has_relation(attr) {
            return Ok(self.get_relation(attr)?.map(Attribute::from));
        }

        Ok(None)
    }
}

impl<S> Serialize for Record<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        self.to_object().serialize(serializer)
    }
}

impl<S> fmt::Debug for Record<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("model", &self.model.name())
            .field("attributes", &self.attributes)
            .field("dirty", &self.dirty)
            .finish()
    }
}

fn is_blank_identity(id: &Value) -> bool {
    match id {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
