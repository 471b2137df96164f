//! Record store contracts for author persistence.
//!
//! # Responsibility
//! - Define the six store operations the repository layer relies on.
//! - Provide SQLite and in-memory adapters behind one trait.
//!
//! # Invariants
//! - Text filters are case-insensitive substring matches on `name` OR
//!   `email`, independent of database collation.
//! - `find_many` orders by the requested field, then by `id` ascending.
//! - `update`/`delete` return `Ok(None)` when the id is absent instead of
//!   failing, leaving not-found semantics to the caller.

use crate::db::DbError;
use crate::model::author::{contains_case_insensitive, Author, AuthorId, NewAuthor};
use crate::search::OrderBy;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::InMemoryAuthorStore;
pub use sqlite::SqliteAuthorStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level failure. Propagated unchanged by the repository.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    UniqueViolation {
        field: &'static str,
        value: String,
    },
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UniqueViolation { field, value } => {
                write!(f, "author with {field} `{value}` already exists")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is older than required {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::InvalidData(message) => write!(f, "invalid persisted author data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Free-text filter over `name` and `email`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFilter {
    pub text: String,
}

impl TextFilter {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn matches(&self, author: &Author) -> bool {
        contains_case_insensitive(&author.name, &self.text)
            || contains_case_insensitive(&author.email, &self.text)
    }
}

/// Filtered, ordered, windowed read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindManyQuery {
    pub filter: Option<TextFilter>,
    pub order_by: OrderBy,
    pub skip: u64,
    pub take: u64,
}

/// Unique lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey<'a> {
    Id(AuthorId),
    Email(&'a str),
}

/// Backing store for authors.
pub trait AuthorStore {
    fn count(&self, filter: Option<&TextFilter>) -> StoreResult<u64>;
    fn find_many(&self, query: &FindManyQuery) -> StoreResult<Vec<Author>>;
    fn find_unique(&self, key: UniqueKey<'_>) -> StoreResult<Option<Author>>;
    /// Inserts a new author; the store assigns `id` and `created_at`.
    fn create(&self, data: &NewAuthor) -> StoreResult<Author>;
    /// Overwrites writable fields and returns the stored record.
    fn update(&self, id: AuthorId, data: &NewAuthor) -> StoreResult<Option<Author>>;
    /// Removes the author and returns the removed record.
    fn delete(&self, id: AuthorId) -> StoreResult<Option<Author>>;
}

impl<S: AuthorStore + ?Sized> AuthorStore for &S {
    fn count(&self, filter: Option<&TextFilter>) -> StoreResult<u64> {
        (**self).count(filter)
    }

    fn find_many(&self, query: &FindManyQuery) -> StoreResult<Vec<Author>> {
        (**self).find_many(query)
    }

    fn find_unique(&self, key: UniqueKey<'_>) -> StoreResult<Option<Author>> {
        (**self).find_unique(key)
    }

    fn create(&self, data: &NewAuthor) -> StoreResult<Author> {
        (**self).create(data)
    }

    fn update(&self, id: AuthorId, data: &NewAuthor) -> StoreResult<Option<Author>> {
        (**self).update(id, data)
    }

    fn delete(&self, id: AuthorId) -> StoreResult<Option<Author>> {
        (**self).delete(id)
    }
}
