mod common;

use authors_core::db::migrations::latest_version;
use authors_core::model::author::now_epoch_ms;
use authors_core::{
    Author, AuthorStore, AuthorsRepository, NewAuthor, RepoError, SqliteAuthorStore, StoreError,
    UniqueKey,
};
use common::{memory_repo, open_sqlite, sqlite_repo, Seed};
use rusqlite::Connection;
use uuid::Uuid;

const MISSING_ID: &str = "75714d4e-50e8-46dc-8182-d6f5ce99359a";

fn missing_id() -> Uuid {
    Uuid::parse_str(MISSING_ID).unwrap()
}

fn assert_not_found(err: RepoError) {
    assert!(matches!(err, RepoError::NotFound(id) if id == missing_id()));
    assert_eq!(
        err.to_string(),
        format!("Author not found using id: {MISSING_ID}")
    );
}

#[test]
fn create_then_find_by_id_roundtrip() {
    let conn = open_sqlite();
    let repo = sqlite_repo(&conn);

    let data = NewAuthor::new("Ada Lovelace", "ada@example.com");
    let created = repo.create(&data).unwrap();
    assert_eq!(created.name, data.name);
    assert_eq!(created.email, data.email);
    assert!(created.created_at > 0);

    let loaded = repo.find_by_id(created.id).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn both_stores_stamp_ids_and_created_at_on_create() {
    let conn = open_sqlite();
    let sqlite = sqlite_repo(&conn);
    let memory = memory_repo();

    let before = now_epoch_ms();
    let from_sqlite = sqlite.create(&NewAuthor::new("s", "s@x.com")).unwrap();
    let from_memory = memory.create(&NewAuthor::new("m", "m@x.com")).unwrap();
    let after = now_epoch_ms();

    for created in [&from_sqlite, &from_memory] {
        assert!((before..=after).contains(&created.created_at));
        assert_eq!(created.id.get_version_num(), 4);
    }
    assert_ne!(from_sqlite.id, from_memory.id);
}

#[test]
fn missing_id_fails_find_update_and_delete() {
    let conn = open_sqlite();
    let repo = sqlite_repo(&conn);

    assert_not_found(repo.find_by_id(missing_id()).unwrap_err());

    let mut ghost = Author::new("ghost", "ghost@example.com");
    ghost.id = missing_id();
    assert_not_found(repo.update(&ghost).unwrap_err());

    assert_not_found(repo.delete(missing_id()).unwrap_err());
}

#[test]
fn update_returns_stored_record_and_keeps_created_at() {
    let conn = open_sqlite();
    let repo = sqlite_repo(&conn);
    let created = repo
        .create(&NewAuthor::new("draft", "draft@example.com"))
        .unwrap();

    let mut changed = created.clone();
    changed.name = "test".to_string();
    changed.email = "test@test.com".to_string();
    changed.created_at = 1;

    let updated = repo.update(&changed).unwrap();
    assert_eq!(updated.name, "test");
    assert_eq!(updated.email, "test@test.com");
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(repo.find_by_id(created.id).unwrap(), updated);
}

#[test]
fn delete_returns_pre_image_and_removes_row() {
    let conn = open_sqlite();
    let repo = sqlite_repo(&conn);
    let created = repo
        .create(&NewAuthor::new("gone", "gone@example.com"))
        .unwrap();

    let deleted = repo.delete(created.id).unwrap();
    assert_eq!(deleted, created);
    assert!(matches!(
        repo.find_by_id(created.id),
        Err(RepoError::NotFound(_))
    ));
}

#[test]
fn find_by_email_is_optional() {
    let conn = open_sqlite();
    let repo = sqlite_repo(&conn);

    assert!(repo.find_by_email("test@test.com").unwrap().is_none());

    let created = repo
        .create(&NewAuthor::new("Mail", "mail@example.com"))
        .unwrap();
    assert_eq!(
        repo.find_by_email("mail@example.com").unwrap(),
        Some(created)
    );
}

#[test]
fn duplicate_email_surfaces_store_conflict() {
    let conn = open_sqlite();
    let repo = sqlite_repo(&conn);
    repo.create(&NewAuthor::new("one", "dup@example.com"))
        .unwrap();
    let other = repo
        .create(&NewAuthor::new("two", "two@example.com"))
        .unwrap();

    let create_err = repo
        .create(&NewAuthor::new("three", "dup@example.com"))
        .unwrap_err();
    assert!(matches!(
        create_err,
        RepoError::Store(StoreError::UniqueViolation { field: "email", .. })
    ));

    let mut clash = other.clone();
    clash.email = "dup@example.com".to_string();
    let update_err = repo.update(&clash).unwrap_err();
    assert!(matches!(
        update_err,
        RepoError::Store(StoreError::UniqueViolation { field: "email", .. })
    ));
    assert_eq!(repo.find_by_id(other.id).unwrap().email, "two@example.com");
}

#[test]
fn create_and_update_store_fields_as_given() {
    let conn = open_sqlite();
    let repo = sqlite_repo(&conn);

    let local = repo
        .create(&NewAuthor::new("root", "root@localhost"))
        .unwrap();
    assert_eq!(repo.find_by_id(local.id).unwrap().email, "root@localhost");

    let imported = Author::new("x", "admin@intranet");
    repo.store().seed(&imported);
    let mut renamed = imported.clone();
    renamed.name = "Admin".to_string();

    let updated = repo.update(&renamed).unwrap();
    assert_eq!(updated.name, "Admin");
    assert_eq!(updated.email, "admin@intranet");
}

#[test]
fn memory_store_renames_imported_record() {
    let repo = memory_repo();
    let imported = Author::new("x", "admin@intranet");
    repo.store().seed(&imported);

    let mut renamed = imported.clone();
    renamed.name = "Admin".to_string();
    assert_eq!(repo.update(&renamed).unwrap().name, "Admin");
}

#[test]
fn store_lookup_by_unique_keys() {
    let conn = open_sqlite();
    let store = SqliteAuthorStore::try_new(&conn).unwrap();
    let seeded = common::author("Key", "key@example.com", 42);
    store.seed(&seeded);

    assert_eq!(
        store.find_unique(UniqueKey::Id(seeded.id)).unwrap(),
        Some(seeded.clone())
    );
    assert_eq!(
        store.find_unique(UniqueKey::Email("key@example.com")).unwrap(),
        Some(seeded)
    );
    assert_eq!(store.count(None).unwrap(), 1);
}

#[test]
fn memory_store_backs_the_same_contract() {
    let repo = memory_repo();

    let created = repo
        .create(&NewAuthor::new("Grace", "grace@example.com"))
        .unwrap();
    assert_eq!(repo.find_by_id(created.id).unwrap(), created);
    assert_eq!(
        repo.find_by_email("grace@example.com").unwrap(),
        Some(created.clone())
    );

    let mut changed = created.clone();
    changed.name = "Grace Hopper".to_string();
    assert_eq!(repo.update(&changed).unwrap().name, "Grace Hopper");

    assert_eq!(repo.delete(created.id).unwrap().name, "Grace Hopper");
    assert!(repo.store().is_empty());
    assert_not_found(repo.delete(missing_id()).unwrap_err());
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteAuthorStore::try_new(&conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_authors_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteAuthorStore::try_new(&conn),
        Err(StoreError::MissingRequiredTable("authors"))
    ));
}
