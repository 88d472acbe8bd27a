//! Models - static per-type policy for records.
//!
//! A model type is usually a unit struct carrying nothing but its policy:
//! which attributes may be set, which are hidden from serialization, how
//! attributes transform on read and write, and which relations it declares.
//! Instances live in [`Record`](crate::Record).
//!
//! ## Example
//!
//! ```ignore
//! use docrecord::Model;
//!
//! #[derive(Model)]
//! #[model(fillable("name", "team_id"), hidden("password"), belongs_to(team = Team))]
//! struct User;
//!
//! assert_eq!(User::table(), "users");
//! assert_eq!(User::foreign_key(), "user_id");
//! ```

mod relation;

use serde_json::Value;

use crate::naming;

pub use relation::{Relation, RelationKind};

/// Read transform applied to a stored attribute value.
pub type Getter = fn(&Value) -> Value;

/// Write transform applied before a value is stored.
pub type Setter = fn(Value) -> Value;

/// Trait for types describing a table of records.
pub trait Model: 'static {
    /// Canonical type name, e.g. `"User"`.
    const NAME: &'static str;

    /// Table override. `None` derives the plural snake case of `NAME`.
    const TABLE: Option<&'static str> = None;

    const PRIMARY_KEY: &'static str = "id";

    /// Integer ids counted up from the table maximum; otherwise UUIDs.
    const AUTO_INCREMENT: bool = true;

    /// Attributes settable through `set`/`fill`.
    const FILLABLE: &'static [&'static str] = &[];

    /// Attributes excluded from `to_object`.
    const HIDDEN: &'static [&'static str] = &[];

    const GETTERS: &'static [(&'static str, Getter)] = &[];

    const SETTERS: &'static [(&'static str, Setter)] = &[];

    const RELATIONS: &'static [(&'static str, Relation)] = &[];

    fn table() -> String {
        Self::model_type().table()
    }

    fn foreign_key() -> String {
        Self::model_type().foreign_key()
    }

    fn model_type() -> ModelType {
        ModelType::of::<Self>()
    }
}

/// Type-erased handle to a model's static policy.
///
/// Relations between models point at each other, so the relation table is
/// reached through a function pointer rather than stored inline.
#[derive(Clone, Copy)]
pub struct ModelType {
    name: &'static str,
    table: Option<&'static str>,
    primary_key: &'static str,
    auto_increment: bool,
    fillable: &'static [&'static str],
    hidden: &'static [&'static str],
    getters: &'static [(&'static str, Getter)],
    setters: &'static [(&'static str, Setter)],
    relations: fn() -> &'static [(&'static str, Relation)],
}

fn relations_of<M: Model + ?Sized>() -> &'static [(&'static str, Relation)] {
    M::RELATIONS
}

impl ModelType {
    pub const fn of<M: Model + ?Sized>() -> Self {
        Self {
            name: M::NAME,
            table: M::TABLE,
            primary_key: M::PRIMARY_KEY,
            auto_increment: M::AUTO_INCREMENT,
            fillable: M::FILLABLE,
            hidden: M::HIDDEN,
            getters: M::GETTERS,
            setters: M::SETTERS,
            relations: relations_of::<M>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn table(&self) -> String {
        match self.table {
            Some(table) => table.to_string(),
            None => naming::table_name(self.name),
        }
    }

    pub fn foreign_key(&self) -> String {
        naming::foreign_key(self.name)
    }

    pub fn primary_key(&self) -> &'static str {
        self.primary_key
    }

    pub fn auto_increment(&self) -> bool {
        self.auto_increment
    }

    pub fn fillable(&self) -> &'static [&'static str] {
        self.fillable
    }

    pub fn is_fillable(&self, attr: &str) -> bool {
        self.fillable.iter().any(|name| *name == attr)
    }

    pub fn is_hidden(&self, attr: &str) -> bool {
        self.hidden.iter().any(|name| *name == attr)
    }

    pub fn getter(&self, attr: &str) -> Option<Getter> {
        lookup(self.getters, attr)
    }

    pub fn setter(&self, attr: &str) -> Option<Setter> {
        lookup(self.setters, attr)
    }

    pub fn relation(&self, attr: &str) -> Option<Relation> {
        lookup((self.relations)(), attr)
    }

    pub fn relations(&self) -> &'static [(&'static str, Relation)] {
        (self.relations)()
    }
}

fn lookup<T: Copy>(table: &[(&'static str, T)], attr: &str) -> Option<T> {
    table
        .iter()
        .find(|(name, _)| *name == attr)
        .map(|(_, entry)| *entry)
}

impl std::fmt::Debug for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelType")
            .field("name", &self.name)
            .field("table", &self.table())
            .field("primary_key", &self.primary_key)
            .finish()
    }
}

impl PartialEq for ModelType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.table() == other.table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shout(value: &Value) -> Value {
        match value.as_str() {
            Some(s) => Value::String(s.to_uppercase()),
            None => value.clone(),
        }
    }

    struct Author;
    struct BlogPost;

    impl Model for Author {
        const NAME: &'static str = "Author";
        const FILLABLE: &'static [&'static str] = &["name"];
        const HIDDEN: &'static [&'static str] = &["secret"];
        const GETTERS: &'static [(&'static str, Getter)] = &[("name", shout as Getter)];
        const RELATIONS: &'static [(&'static str, Relation)] =
            &[("posts", Relation::has_many(ModelType::of::<BlogPost>()))];
    }

    impl Model for BlogPost {
        const NAME: &'static str = "BlogPost";
        const AUTO_INCREMENT: bool = false;
        const RELATIONS: &'static [(&'static str, Relation)] =
            &[("author", Relation::belongs_to(ModelType::of::<Author>()))];
    }

    #[test]
    fn derives_names_from_type() {
        assert_eq!(Author::table(), "authors");
        assert_eq!(BlogPost::table(), "blog_posts");
        assert_eq!(BlogPost::foreign_key(), "blog_post_id");
    }

    #[test]
    fn policy_lookups() {
        let author = Author::model_type();
        assert!(author.is_fillable("name"));
        assert!(!author.is_fillable("secret"));
        assert!(author.is_hidden("secret"));
        assert_eq!(author.getter("name").unwrap()(&json!("ann")), json!("ANN"));
        assert!(author.setter("name").is_none());
        assert!(!BlogPost::model_type().auto_increment());
    }

    #[test]
    fn mutually_referencing_relations_resolve() {
        let posts = Author::model_type().relation("posts").unwrap();
        assert_eq!(posts.kind, RelationKind::HasMany);
        assert_eq!(posts.target.name(), "BlogPost");

        let author = posts.target.relation("author").unwrap();
        assert_eq!(author.target, Author::model_type());
        assert!(Author::model_type().relation("missing").is_none());
    }
}
