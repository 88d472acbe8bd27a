use tracing::debug;

use super::{Matches, Record};
use crate::error::StoreResult;
use crate::model::RelationKind;
use crate::store::{matcher, DocumentStore};

/// A resolved relation.
#[derive(Debug, Clone)]
pub enum Related<S> {
    One(Record<S>),
    Many(Vec<Record<S>>),
}

impl<S> Related<S> {
    pub fn into_one(self) -> Option<Record<S>> {
        match self {
            Related::One(record) => Some(record),
            Related::Many(_) => None,
        }
    }

    pub fn into_many(self) -> Vec<Record<S>> {
        match self {
            Related::One(record) => vec![record],
            Related::Many(records) => records,
        }
    }
}

impl<S: DocumentStore + Clone> Record<S> {
    /// Resolves a declared relation against the store.
    ///
    /// `None` when the name is not a relation, or a single-valued relation
    /// has no existing target. `HasMany` always yields a (possibly empty) list
    /// of fresh records.
    pub fn get_relation(&self, attr: &str) -> StoreResult<Option<Related<S>>> {
        let Some(relation) = self.model.relation(attr) else {
            return Ok(None);
        };

        let mut target = Record::of(relation.target, self.store.clone())?;
        let key = relation.foreign_key(&self.model);

        match relation.kind {
            RelationKind::BelongsTo => {
                let Some(id) = self.raw(&key).filter(|id| !id.is_null()).cloned() else {
                    debug!(model = self.model.name(), relation = attr, key = %key, "foreign key unset");
                    return Ok(None);
                };
                target.find(id)?;
                if target.exists()? {
                    return Ok(Some(Related::One(target)));
                }
                Ok(None)
            }
            RelationKind::HasOne => {
                let Some(id) = self.id().cloned() else {
                    return Ok(None);
                };
                if let Matches::One(found) = target.where_eq(&matcher(&key, id), Some(1))? {
                    if found.exists()? {
                        return Ok(Some(Related::One(found)));
                    }
                }
                Ok(None)
            }
            RelationKind::HasMany => {
                let Some(id) = self.id().cloned() else {
                    return Ok(Some(Related::Many(Vec::new())));
                };
                let mut live = Vec::new();
                for record in target.where_eq(&matcher(&key, id), None)?.into_vec() {
                    if record.exists()? {
                        live.push(record);
                    }
                }
                Ok(Some(Related::Many(live)))
            }
        }
    }
}
