//! Shared models for integration tests: a small blogging schema.

#![allow(dead_code)]

use docrecord::{InMemoryStore, Model, Row};
use serde_json::Value;

pub fn row(value: Value) -> Row {
    value
        .as_object()
        .cloned()
        .expect("fixture must be a JSON object")
}

pub fn store() -> InMemoryStore {
    InMemoryStore::new()
}

pub fn lowercase(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.trim().to_lowercase()),
        other => other,
    }
}

pub fn title_case(value: &Value) -> Value {
    match value.as_str() {
        Some(s) => {
            let mut chars = s.chars();
            match chars.next() {
                Some(first) => Value::String(first.to_uppercase().collect::<String>() + chars.as_str()),
                None => value.clone(),
            }
        }
        None => value.clone(),
    }
}

#[derive(Model)]
#[model(
    fillable("name", "email", "password", "team_id"),
    hidden("password"),
    getter(name = title_case),
    setter(email = lowercase),
    belongs_to(team = Team),
    has_one(profile = Profile),
    has_many(posts = Post, key = "author_id"),
)]
pub struct User;

#[derive(Model)]
#[model(fillable("name"), has_many(members = User))]
pub struct Team;

#[derive(Model)]
#[model(fillable("bio", "user_id"), belongs_to(user = User))]
pub struct Profile;

#[derive(Model)]
#[model(
    fillable("title", "author_id", "status"),
    belongs_to(author = User, key = "author_id"),
)]
pub struct Post;

#[derive(Model)]
#[model(table = "audit_log", auto_increment = false, primary_key = "uuid")]
#[model(fillable("action"))]
pub struct AuditEntry;
