use serde_json::Value;
use tracing::trace;

use super::Record;
use crate::error::StoreResult;
use crate::model::ModelType;
use crate::store::{json_eq, DocumentStore, Row};

/// Result of [`Record::where_eq`]. The variant follows the limit passed in.
#[derive(Debug, Clone)]
pub enum Matches<S> {
    /// No limit: every match, in store order.
    All(Vec<Record<S>>),
    /// Limit of one: the match, or the record `where_eq` was called on when
    /// nothing matched. Check `exists` to tell them apart.
    One(Record<S>),
    /// Limit above one: at most that many matches.
    First(Vec<Record<S>>),
}

impl<S> Matches<S> {
    pub fn into_vec(self) -> Vec<Record<S>> {
        match self {
            Matches::All(records) | Matches::First(records) => records,
            Matches::One(record) => vec![record],
        }
    }

    pub fn into_one(self) -> Option<Record<S>> {
        match self {
            Matches::One(record) => Some(record),
            Matches::All(records) | Matches::First(records) => records.into_iter().next(),
        }
    }
}

fn compared_value(model: &ModelType, attr: &str, stored: &Value) -> Value {
    match model.getter(attr) {
        Some(getter) => getter(stored),
        None => stored.clone(),
    }
}

fn satisfies(model: &ModelType, row: &Row, filter: &Row) -> bool {
    filter.iter().all(|(attr, expected)| match row.get(attr) {
        Some(stored) => json_eq(&compared_value(model, attr, stored), expected),
        None => false,
    })
}

impl<S: DocumentStore + Clone> Record<S> {
    /// Equality query over this record's table.
    ///
    /// A row matches when it has every filter key and the stored value (getter
    /// applied, if declared) equals the filter value. Matched rows become new
    /// records hydrated without the fillable gate. `Some(0)` counts as no
    /// limit.
    pub fn where_eq(&self, filter: &Row, limit: Option<usize>) -> StoreResult<Matches<S>> {
        let model = self.model;
        let table = model.table();
        let rows = self
            .store
            .filter(&table, &|row| satisfies(&model, row, filter))?;
        trace!(table = %table, matched = rows.len(), ?limit, "where scan");

        let limit = limit.filter(|limit| *limit > 0);
        let mut records: Vec<_> = rows
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|row| {
                let mut record = Record::detached(model, self.store.clone());
                record.hydrate(row);
                record
            })
            .collect();

        Ok(match limit {
            None => Matches::All(records),
            Some(1) => match records.pop() {
                Some(record) => Matches::One(record),
                None => Matches::One(self.clone()),
            },
            Some(_) => Matches::First(records),
        })
    }

    /// Every row of the table as records, in store order.
    pub fn all(&self) -> StoreResult<Vec<Record<S>>> {
        Ok(self.where_eq(&Row::new(), None)?.into_vec())
    }
}
