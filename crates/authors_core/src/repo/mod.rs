//! Repository layer over author record stores.
//!
//! # Responsibility
//! - Provide CRUD with existence checks and paginated search.
//! - Keep store specifics behind the `AuthorStore` trait.
//!
//! # Invariants
//! - Id-based lookups that find nothing fail with `RepoError::NotFound`.
//! - Store errors are propagated unchanged inside `RepoError::Store`.

pub mod author_repo;
