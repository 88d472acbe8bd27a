//! Naming conventions shared by models: table names and foreign keys.

use convert_case::{Case, Casing};

/// `UserProfile` -> `user_profile`
pub fn snake_case(name: &str) -> String {
    name.to_case(Case::Snake)
}

/// Naive English plural, good enough for table names.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let sibilant = ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| word.ends_with(suffix));
    if sibilant {
        return format!("{}es", word);
    }

    if let Some(stem) = word.strip_suffix('y') {
        let vowel_before = stem
            .chars()
            .last()
            .map(|c| "aeiou".contains(c))
            .unwrap_or(false);
        if !stem.is_empty() && !vowel_before {
            return format!("{}ies", stem);
        }
    }

    format!("{}s", word)
}

/// Table backing a model type: plural snake case of its name.
pub fn table_name(model: &str) -> String {
    pluralize(&snake_case(model))
}

/// Default foreign key pointing at a model type: `<snake_name>_id`.
pub fn foreign_key(model: &str) -> String {
    format!("{}_id", snake_case(model))
}
