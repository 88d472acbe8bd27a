//! Document stores - table-keyed collections of flat JSON rows.
//!
//! Records talk to storage only through [`DocumentStore`], so any backend
//! (the in-memory fake, the JSON file, something else) can be swapped in.
//!
//! ## Example
//!
//! ```ignore
//! use docrecord::{DocumentStore, InMemoryStore, Row};
//! use serde_json::json;
//!
//! let store = InMemoryStore::new();
//! store.create_table("users")?;
//! store.push("users", row(json!({ "id": 1, "name": "Ann" })))?;
//! store.write()?;
//! ```

mod in_memory;
mod json_file;

use serde_json::Value;

use crate::error::StoreResult;

pub use in_memory::InMemoryStore;
pub use json_file::JsonFileStore;

/// One flat record in a table. Keys keep their insertion order.
pub type Row = serde_json::Map<String, Value>;

/// Abstract table-oriented storage for rows.
///
/// Mutations (`create_table`, `push`, `assign`, `remove`) change in-memory
/// state only; `write` persists it.
pub trait DocumentStore: Send + Sync {
    /// True iff the table key exists.
    fn has_table(&self, table: &str) -> StoreResult<bool>;

    /// Initializes the table to an empty sequence.
    fn create_table(&self, table: &str) -> StoreResult<()>;

    /// Snapshot of every row in the table, in store order.
    /// A missing table reads as empty.
    fn rows(&self, table: &str) -> StoreResult<Vec<Row>>;

    /// All rows satisfying the predicate, in store order.
    fn filter(&self, table: &str, predicate: &dyn Fn(&Row) -> bool) -> StoreResult<Vec<Row>>;

    /// Appends a row to the table, creating the table if needed.
    fn push(&self, table: &str, row: Row) -> StoreResult<()>;

    /// Shallow-merges `partial` onto the first row matching `matcher`.
    /// Returns false when nothing matched.
    fn assign(&self, table: &str, matcher: &Row, partial: &Row) -> StoreResult<bool>;

    /// Removes every row matching `matcher`. Returns how many were removed.
    fn remove(&self, table: &str, matcher: &Row) -> StoreResult<usize>;

    /// Persists the current state to durable storage.
    fn write(&self) -> StoreResult<()>;

    /// First row matching an equality mapping.
    fn find_one(&self, table: &str, matcher: &Row) -> StoreResult<Option<Row>> {
        Ok(self
            .filter(table, &|row| matches(row, matcher))?
            .into_iter()
            .next())
    }
}

/// Equality match: every matcher key is present on the row with an equal value.
pub fn matches(row: &Row, matcher: &Row) -> bool {
    matcher.iter().all(|(key, expected)| {
        row.get(key)
            .is_some_and(|stored| json_eq(stored, expected))
    })
}

/// Value equality where numbers compare by magnitude, so `3` equals `3.0`.
/// Everything else, including numbers nested in arrays or objects, uses `==`.
pub fn json_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
                a == b
            } else if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
                a == b
            } else {
                a.as_f64() == b.as_f64()
            }
        }
        _ => left == right,
    }
}

/// Builds a single-entry matcher.
pub fn matcher(key: &str, value: Value) -> Row {
    let mut row = Row::new();
    row.insert(key.to_string(), value);
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn matches_requires_every_key() {
        let stored = row(json!({ "id": 1, "name": "Ann", "age": 30 }));

        assert!(matches(&stored, &row(json!({ "name": "Ann" }))));
        assert!(matches(&stored, &row(json!({ "name": "Ann", "age": 30 }))));
        assert!(!matches(&stored, &row(json!({ "name": "Ann", "age": 31 }))));
        assert!(!matches(&stored, &row(json!({ "email": null }))));
    }

    #[test]
    fn empty_matcher_matches_everything() {
        assert!(matches(&row(json!({ "id": 1 })), &Row::new()));
    }

    #[test]
    fn matcher_is_strict_about_types() {
        let stored = row(json!({ "id": 1 }));
        assert!(!matches(&stored, &matcher("id", json!("1"))));
        assert!(matches(&stored, &matcher("id", json!(1))));
    }

    #[test]
    fn integral_floats_match_integers() {
        let stored = row(json!({ "id": 2.0, "team_id": 3 }));
        assert!(matches(&stored, &matcher("id", json!(2))));
        assert!(matches(&stored, &matcher("team_id", json!(3.0))));
        assert!(!matches(&stored, &matcher("team_id", json!(3.5))));
    }

    #[test]
    fn json_eq_only_relaxes_numbers() {
        assert!(json_eq(&json!(u64::MAX), &json!(u64::MAX)));
        assert!(json_eq(&json!(-4), &json!(-4.0)));
        assert!(!json_eq(&json!(i64::MAX), &json!(i64::MAX - 1)));
        assert!(!json_eq(&json!("3"), &json!(3)));
        assert!(!json_eq(&json!(null), &json!(0)));
    }
}
