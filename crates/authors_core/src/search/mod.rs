//! Search contracts for paginated author queries.
//!
//! # Responsibility
//! - Define caller-facing search parameters and page results.
//! - Normalize raw parameters into a store-ready query.

pub mod params;

pub use params::{
    AuthorSortField, OrderBy, ResolvedSearch, SearchParams, SearchResult, SortDirection,
    DEFAULT_PAGE, DEFAULT_PER_PAGE,
};
