//! Process-local author store.
//!
//! Mirrors the SQLite adapter's semantics (matching, ordering, email
//! uniqueness) without a database, for tests and embedding.

use super::{AuthorStore, FindManyQuery, StoreError, StoreResult, TextFilter, UniqueKey};
use crate::model::author::{Author, AuthorId, NewAuthor};
use crate::search::{AuthorSortField, OrderBy, SortDirection};
use std::cmp::Ordering;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory author store guarded by a mutex.
#[derive(Debug, Default)]
pub struct InMemoryAuthorStore {
    authors: Mutex<Vec<Author>>,
}

impl InMemoryAuthorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully-formed record, keeping its `id` and `created_at`.
    pub fn import(&self, author: &Author) -> StoreResult<()> {
        let mut authors = self.lock();
        ensure_email_free(&authors, &author.email, None)?;
        authors.push(author.clone());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Author>> {
        self.authors.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AuthorStore for InMemoryAuthorStore {
    fn count(&self, filter: Option<&TextFilter>) -> StoreResult<u64> {
        let authors = self.lock();
        let total = authors
            .iter()
            .filter(|author| filter.map_or(true, |filter| filter.matches(author)))
            .count();
        Ok(total as u64)
    }

    fn find_many(&self, query: &FindManyQuery) -> StoreResult<Vec<Author>> {
        let authors = self.lock();
        let mut matched = authors
            .iter()
            .filter(|author| {
                query
                    .filter
                    .as_ref()
                    .map_or(true, |filter| filter.matches(author))
            })
            .cloned()
            .collect::<Vec<_>>();
        matched.sort_by(|left, right| compare(left, right, query.order_by));

        let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
        let take = usize::try_from(query.take).unwrap_or(usize::MAX);
        Ok(matched.into_iter().skip(skip).take(take).collect())
    }

    fn find_unique(&self, key: UniqueKey<'_>) -> StoreResult<Option<Author>> {
        let authors = self.lock();
        let found = authors.iter().find(|author| match key {
            UniqueKey::Id(id) => author.id == id,
            UniqueKey::Email(email) => author.email == email,
        });
        Ok(found.cloned())
    }

    fn create(&self, data: &NewAuthor) -> StoreResult<Author> {
        let author = Author::new(data.name.clone(), data.email.clone());
        self.import(&author)?;
        Ok(author)
    }

    fn update(&self, id: AuthorId, data: &NewAuthor) -> StoreResult<Option<Author>> {
        let mut authors = self.lock();
        ensure_email_free(&authors, &data.email, Some(id))?;
        let Some(author) = authors.iter_mut().find(|author| author.id == id) else {
            return Ok(None);
        };
        author.name = data.name.clone();
        author.email = data.email.clone();
        Ok(Some(author.clone()))
    }

    fn delete(&self, id: AuthorId) -> StoreResult<Option<Author>> {
        let mut authors = self.lock();
        let position = authors.iter().position(|author| author.id == id);
        Ok(position.map(|index| authors.remove(index)))
    }
}

fn ensure_email_free(authors: &[Author], email: &str, except: Option<AuthorId>) -> StoreResult<()> {
    let taken = authors
        .iter()
        .any(|author| author.email == email && Some(author.id) != except);
    if taken {
        return Err(StoreError::UniqueViolation {
            field: "email",
            value: email.to_string(),
        });
    }
    Ok(())
}

fn compare(left: &Author, right: &Author, order_by: OrderBy) -> Ordering {
    let by_field = match order_by.field {
        AuthorSortField::Name => left.name.cmp(&right.name),
        AuthorSortField::Email => left.email.cmp(&right.email),
        AuthorSortField::CreatedAt => left.created_at.cmp(&right.created_at),
    };
    let by_field = match order_by.direction {
        SortDirection::Asc => by_field,
        SortDirection::Desc => by_field.reverse(),
    };
    by_field.then_with(|| left.id.cmp(&right.id))
}
