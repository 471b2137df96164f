//! SQLite-backed author store.
//!
//! # Invariants
//! - Connections must be migrated to the latest schema before use.
//! - Sort columns come from `AuthorSortField`, never from caller text.
//! - Filters go through the `contains_ci` SQL function registered at
//!   construction; SQLite `LIKE` only folds ASCII and treats `%`/`_` as
//!   wildcards.

use super::{AuthorStore, FindManyQuery, StoreError, StoreResult, TextFilter, UniqueKey};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::author::{contains_case_insensitive, Author, AuthorId, NewAuthor};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Params, Row};
use uuid::Uuid;

const AUTHOR_SELECT_SQL: &str = "SELECT id, name, email, created_at FROM authors";
const AUTHOR_RETURNING_SQL: &str = "RETURNING id, name, email, created_at";

/// SQLite-backed author store.
pub struct SqliteAuthorStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorStore<'conn> {
    /// Constructs a store from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` when the `authors` table is absent.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version < expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let has_table: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'authors');",
            [],
            |row| row.get(0),
        )?;
        if !has_table {
            return Err(StoreError::MissingRequiredTable("authors"));
        }

        conn.create_scalar_function(
            "contains_ci",
            2,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let haystack = ctx.get::<String>(0)?;
                let needle = ctx.get::<String>(1)?;
                Ok(contains_case_insensitive(&haystack, &needle))
            },
        )?;

        Ok(Self { conn })
    }

    /// Inserts a fully-formed record, keeping its `id` and `created_at`.
    ///
    /// Used by import/seed paths where identity already exists.
    pub fn import(&self, author: &Author) -> StoreResult<()> {
        self.conn
            .execute(
                "INSERT INTO authors (id, name, email, created_at) VALUES (?1, ?2, ?3, ?4);",
                params![
                    author.id.to_string(),
                    author.name,
                    author.email,
                    author.created_at
                ],
            )
            .map_err(|err| map_write_error(err, &author.email))?;
        Ok(())
    }

    fn fetch_one<P: Params>(&self, sql: &str, params: P) -> StoreResult<Option<Author>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_author_row(row)?)),
            None => Ok(None),
        }
    }
}

impl AuthorStore for SqliteAuthorStore<'_> {
    fn count(&self, filter: Option<&TextFilter>) -> StoreResult<u64> {
        let mut bind_values = Vec::new();
        let sql = format!(
            "SELECT COUNT(*) FROM authors{}",
            where_clause(filter, &mut bind_values)
        );
        let total: i64 = self
            .conn
            .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        Ok(total.max(0) as u64)
    }

    fn find_many(&self, query: &FindManyQuery) -> StoreResult<Vec<Author>> {
        let mut bind_values = Vec::new();
        let mut sql = format!(
            "{AUTHOR_SELECT_SQL}{}",
            where_clause(query.filter.as_ref(), &mut bind_values)
        );
        sql.push_str(&format!(
            " ORDER BY {} {}, id ASC LIMIT ? OFFSET ?",
            query.order_by.field.column(),
            query.order_by.direction.as_sql()
        ));
        bind_values.push(Value::Integer(clamp_to_i64(query.take)));
        bind_values.push(Value::Integer(clamp_to_i64(query.skip)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            authors.push(parse_author_row(row)?);
        }
        Ok(authors)
    }

    fn find_unique(&self, key: UniqueKey<'_>) -> StoreResult<Option<Author>> {
        match key {
            UniqueKey::Id(id) => self.fetch_one(
                &format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
            ),
            UniqueKey::Email(email) => {
                self.fetch_one(&format!("{AUTHOR_SELECT_SQL} WHERE email = ?1;"), [email])
            }
        }
    }

    fn create(&self, data: &NewAuthor) -> StoreResult<Author> {
        let author = Author::new(data.name.clone(), data.email.clone());
        self.import(&author)?;
        Ok(author)
    }

    fn update(&self, id: AuthorId, data: &NewAuthor) -> StoreResult<Option<Author>> {
        self.fetch_one(
            &format!("UPDATE authors SET name = ?1, email = ?2 WHERE id = ?3 {AUTHOR_RETURNING_SQL};"),
            params![data.name, data.email, id.to_string()],
        )
        .map_err(|err| match err {
            StoreError::Db(DbError::Sqlite(inner)) => map_write_error(inner, &data.email),
            other => other,
        })
    }

    fn delete(&self, id: AuthorId) -> StoreResult<Option<Author>> {
        self.fetch_one(
            &format!("DELETE FROM authors WHERE id = ?1 {AUTHOR_RETURNING_SQL};"),
            [id.to_string()],
        )
    }
}

fn where_clause(filter: Option<&TextFilter>, bind_values: &mut Vec<Value>) -> String {
    match filter {
        Some(filter) => {
            bind_values.push(Value::Text(filter.text.clone()));
            bind_values.push(Value::Text(filter.text.clone()));
            " WHERE (contains_ci(name, ?) OR contains_ci(email, ?))".to_string()
        }
        None => String::new(),
    }
}

fn parse_author_row(row: &Row<'_>) -> StoreResult<Author> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{id_text}` in authors.id"))
    })?;

    Ok(Author {
        id,
        name: row.get("name")?,
        email: row.get("email")?,
        created_at: row.get("created_at")?,
    })
}

fn map_write_error(err: rusqlite::Error, email: &str) -> StoreError {
    if let rusqlite::Error::SqliteFailure(failure, Some(message)) = &err {
        if failure.code == ErrorCode::ConstraintViolation && message.contains("authors.email") {
            return StoreError::UniqueViolation {
                field: "email",
                value: email.to_string(),
            };
        }
    }
    err.into()
}

fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
