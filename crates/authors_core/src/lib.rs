//! Paginated author search over pluggable record stores.
//!
//! The repository layer (`repo`) owns query composition; stores (`store`)
//! own persistence.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod store;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::author::{Author, AuthorId, NewAuthor};
pub use repo::author_repo::{AuthorsRepository, RepoError, RepoResult, StoreAuthorsRepository};
pub use search::{AuthorSortField, SearchParams, SearchResult, SortDirection};
pub use store::{
    AuthorStore, FindManyQuery, InMemoryAuthorStore, SqliteAuthorStore, StoreError, StoreResult,
    TextFilter, UniqueKey,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
