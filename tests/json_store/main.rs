//! Records persisted through the JSON file store.

#[path = "../support/mod.rs"]
mod support;

use std::fs;

use docrecord::{DocumentStore, JsonFileStore, Record, RecordsExt, StoreConfig, StoreError};
use serde_json::{json, Value};
use support::{row, Post, User};

fn open(dir: &tempfile::TempDir) -> JsonFileStore {
    JsonFileStore::open(&StoreConfig::new(dir.path().join("storage").join("db"))).unwrap()
}

#[test]
fn construction_bootstraps_table_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir);

    Record::new::<User>(store.clone()).unwrap();

    assert!(store.path().ends_with("storage/db/lowdb.json"));
    let raw = fs::read_to_string(store.path()).unwrap();
    let parsed: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, json!({ "users": [] }));
}

#[test]
fn saves_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = open(&dir);
        let users = store.records::<User>();
        users.create(&row(json!({ "name": "ann" }))).unwrap();
        let mut bo = users.create(&row(json!({ "name": "bo" }))).unwrap();
        bo.update(("email", "BO@MAIL.TEST")).unwrap();
    }

    let store = open(&dir);
    let users = store.records::<User>();
    let bo = users.find(2).unwrap().unwrap();
    assert_eq!(bo.value("email"), Some(json!("bo@mail.test")));
    assert_eq!(users.all().unwrap().len(), 2);
}

#[test]
fn relations_resolve_after_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = open(&dir);
        store
            .records::<User>()
            .create(&row(json!({ "name": "writer" })))
            .unwrap();
        store
            .records::<Post>()
            .create(&row(json!({ "title": "hello", "author_id": 1 })))
            .unwrap();
    }

    let store = open(&dir);
    let post = Record::with_id::<Post>(store, 1).unwrap();
    let author = post.get("author").unwrap().unwrap().into_one().unwrap();
    assert_eq!(author.value("name"), Some(json!("Writer")));
}

#[test]
fn other_handles_see_changes_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let reader = open(&dir);
    Record::new::<User>(reader.clone()).unwrap();
    let writer = open(&dir);

    writer
        .records::<User>()
        .create(&row(json!({ "name": "late" })))
        .unwrap();
    assert!(reader.records::<User>().find(1).unwrap().is_none());

    reader.reload().unwrap();
    assert!(reader.records::<User>().find(1).unwrap().is_some());
}

#[test]
fn malformed_store_surfaces_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path());
    fs::write(config.file_path(), "[1, 2, 3]").unwrap();

    let err = JsonFileStore::open(&config).err().unwrap();
    assert!(matches!(err, StoreError::Malformed { .. }));
}

#[test]
fn deleted_rows_are_flushed() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir);
    let mut user = store
        .records::<User>()
        .create(&row(json!({ "name": "gone" })))
        .unwrap();
    assert!(user.delete().unwrap());

    let reopened = open(&dir);
    assert!(reopened.rows("users").unwrap().is_empty());
}
