//! Domain model for the authors collection.
//!
//! # Invariants
//! - Every author is identified by a stable `AuthorId`.
//! - `email` is unique across the collection.

pub mod author;
