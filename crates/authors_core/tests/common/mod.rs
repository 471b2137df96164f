#![allow(dead_code, unused_macros)]

use authors_core::db::open_db_in_memory;
use authors_core::{
    Author, AuthorStore, InMemoryAuthorStore, SqliteAuthorStore, StoreAuthorsRepository,
};
use rusqlite::Connection;

pub const BASE_CREATED_AT: i64 = 1_700_000_000_000;

/// Stores that accept fully-formed records for test setup.
pub trait Seed: AuthorStore {
    fn seed(&self, author: &Author);
}

impl Seed for SqliteAuthorStore<'_> {
    fn seed(&self, author: &Author) {
        self.import(author).unwrap();
    }
}

impl Seed for InMemoryAuthorStore {
    fn seed(&self, author: &Author) {
        self.import(author).unwrap();
    }
}

pub fn author(name: &str, email: &str, created_at: i64) -> Author {
    let mut author = Author::new(name, email);
    author.created_at = created_at;
    author
}

/// Seeds one author per name, `created_at` increasing with position.
pub fn seed_named<S: Seed>(store: &S, names: &[&str]) -> Vec<Author> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let author = author(
                name,
                &format!("author{index}@a.com"),
                BASE_CREATED_AT + index as i64,
            );
            store.seed(&author);
            author
        })
        .collect()
}

pub fn open_sqlite() -> Connection {
    open_db_in_memory().unwrap()
}

pub fn sqlite_repo(conn: &Connection) -> StoreAuthorsRepository<SqliteAuthorStore<'_>> {
    StoreAuthorsRepository::new(SqliteAuthorStore::try_new(conn).unwrap())
}

pub fn memory_repo() -> StoreAuthorsRepository<InMemoryAuthorStore> {
    StoreAuthorsRepository::new(InMemoryAuthorStore::new())
}

pub fn names(authors: &[Author]) -> Vec<&str> {
    authors.iter().map(|author| author.name.as_str()).collect()
}

/// Runs a generic check once against SQLite and once against the
/// in-memory store.
macro_rules! store_cases {
    ($($check:ident),+ $(,)?) => {
        $(
            mod $check {
                use super::*;

                #[test]
                fn sqlite() {
                    let conn = common::open_sqlite();
                    super::$check(&common::sqlite_repo(&conn));
                }

                #[test]
                fn memory() {
                    super::$check(&common::memory_repo());
                }
            }
        )+
    };
}
