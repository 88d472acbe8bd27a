use super::ModelType;

/// Which side of a relation holds the foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Foreign key on this record, pointing at the target's primary key.
    BelongsTo,
    /// Foreign key on the target, pointing back here. At most one match.
    HasOne,
    /// Foreign key on the target, pointing back here. Every match.
    HasMany,
}

/// A named relation declared by a model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relation {
    pub kind: RelationKind,
    pub target: ModelType,
    /// Foreign key override. Defaults to the target's foreign key for
    /// `BelongsTo`, and to the owner's for `HasOne`/`HasMany`.
    pub key: Option<&'static str>,
}

impl Relation {
    pub const fn new(kind: RelationKind, target: ModelType) -> Self {
        Self {
            kind,
            target,
            key: None,
        }
    }

    pub const fn belongs_to(target: ModelType) -> Self {
        Self::new(RelationKind::BelongsTo, target)
    }

    pub const fn has_one(target: ModelType) -> Self {
        Self::new(RelationKind::HasOne, target)
    }

    pub const fn has_many(target: ModelType) -> Self {
        Self::new(RelationKind::HasMany, target)
    }

    pub const fn with_key(self, key: &'static str) -> Self {
        Self {
            key: Some(key),
            ..self
        }
    }

    /// The foreign key column, given the owning model.
    pub fn foreign_key(&self, owner: &ModelType) -> String {
        if let Some(key) = self.key {
            return key.to_string();
        }
        match self.kind {
            RelationKind::BelongsTo => self.target.foreign_key(),
            RelationKind::HasOne | RelationKind::HasMany => owner.foreign_key(),
        }
    }
}
