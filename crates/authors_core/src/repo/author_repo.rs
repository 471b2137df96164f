//! Author repository contract and store-backed implementation.
//!
//! # Responsibility
//! - Check existence before id-based mutations.
//! - Compose filter, whitelist ordering and paging into store queries.
//!
//! # Invariants
//! - Payloads reach the store as given; constraint failures (e.g. email
//!   uniqueness) come back as `RepoError::Store`.
//! - `search` never fails because of an unknown sort field.
//! - `total` ignores paging and ordering; only the filter narrows it.

use crate::model::author::{Author, AuthorId, NewAuthor};
use crate::search::{SearchParams, SearchResult};
use crate::store::{AuthorStore, FindManyQuery, StoreError, TextFilter, UniqueKey};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Entity label used in not-found messages.
const ENTITY_NAME: &str = "Author";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for author operations.
#[derive(Debug)]
pub enum RepoError {
    NotFound(AuthorId),
    Store(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "{ENTITY_NAME} not found using id: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Use-case level contract for author persistence and search.
pub trait AuthorsRepository {
    fn create(&self, data: &NewAuthor) -> RepoResult<Author>;
    fn find_by_id(&self, id: AuthorId) -> RepoResult<Author>;
    /// Optional lookup: absence is `Ok(None)`, not an error.
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Author>>;
    /// Overwrites `name` and `email` and returns the stored record.
    fn update(&self, author: &Author) -> RepoResult<Author>;
    /// Deletes and returns the record as it was before deletion.
    fn delete(&self, id: AuthorId) -> RepoResult<Author>;
    fn search(&self, params: &SearchParams) -> RepoResult<SearchResult<Author>>;
}

/// Author repository bound to a concrete store at construction.
pub struct StoreAuthorsRepository<S: AuthorStore> {
    store: S,
}

impl<S: AuthorStore> StoreAuthorsRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetches an author that must exist.
    pub fn get(&self, id: AuthorId) -> RepoResult<Author> {
        self.store
            .find_unique(UniqueKey::Id(id))?
            .ok_or(RepoError::NotFound(id))
    }
}

impl<S: AuthorStore> AuthorsRepository for StoreAuthorsRepository<S> {
    fn create(&self, data: &NewAuthor) -> RepoResult<Author> {
        let author = self.store.create(data)?;
        debug!("event=author_create module=repo status=ok id={}", author.id);
        Ok(author)
    }

    fn find_by_id(&self, id: AuthorId) -> RepoResult<Author> {
        self.get(id)
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<Author>> {
        Ok(self.store.find_unique(UniqueKey::Email(email))?)
    }

    fn update(&self, author: &Author) -> RepoResult<Author> {
        self.get(author.id)?;
        let payload = author.to_payload();

        match self.store.update(author.id, &payload)? {
            Some(updated) => {
                debug!("event=author_update module=repo status=ok id={}", author.id);
                Ok(updated)
            }
            None => {
                warn!(
                    "event=author_update module=repo status=error error_code=vanished id={}",
                    author.id
                );
                Err(RepoError::NotFound(author.id))
            }
        }
    }

    fn delete(&self, id: AuthorId) -> RepoResult<Author> {
        let existing = self.get(id)?;

        match self.store.delete(id)? {
            Some(_) => {
                debug!("event=author_delete module=repo status=ok id={id}");
                Ok(existing)
            }
            None => {
                warn!("event=author_delete module=repo status=error error_code=vanished id={id}");
                Err(RepoError::NotFound(id))
            }
        }
    }

    fn search(&self, params: &SearchParams) -> RepoResult<SearchResult<Author>> {
        let started_at = Instant::now();
        let resolved = params.resolve();
        let filter = resolved.filter.clone().map(TextFilter::new);

        let total = self.store.count(filter.as_ref())?;
        let query = FindManyQuery {
            filter,
            order_by: resolved.order_by,
            skip: resolved.skip(),
            take: resolved.take(),
        };
        let items = self.store.find_many(&query)?;

        info!(
            "event=author_search module=repo status=ok page={} per_page={} sort={} dir={} filtered={} total={} returned={} duration_ms={}",
            resolved.page,
            resolved.per_page,
            resolved.order_by.field.as_str(),
            resolved.order_by.direction,
            query.filter.is_some(),
            total,
            items.len(),
            started_at.elapsed().as_millis()
        );

        Ok(SearchResult::new(
            items,
            total,
            resolved.page,
            resolved.per_page,
        ))
    }
}
