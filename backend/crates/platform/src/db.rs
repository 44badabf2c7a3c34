//! Allow-listed CRUD helpers over PostgreSQL
//!
//! Table and column identifiers come only from the [`Table`] and [`Column`]
//! enums, so no caller-supplied string ever reaches the SQL text. Values are
//! always bound parameters. Every helper takes a `&mut PgConnection`: pass a
//! pooled connection (`&mut *pool.acquire().await?`) or an open transaction
//! (`&mut *tx`).
//!
//! Filters are conjunctions of equality predicates.

use std::fmt;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Arguments, FromRow, PgConnection};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Users,
    Tweets,
    Hashtags,
    TweetHashtags,
    Likes,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Tweets => "tweets",
            Table::Hashtags => "hashtags",
            Table::TweetHashtags => "tweet_hashtags",
            Table::Likes => "likes",
        }
    }

    /// Columns in declaration order (the `SELECT`/`RETURNING` list)
    pub fn columns(&self) -> &'static [Column] {
        use Column::*;
        match self {
            Table::Users => &[
                Id,
                Username,
                Email,
                FirstName,
                Password,
                IsVerified,
                Token,
                TokenExpiration,
                CreatedAt,
            ],
            Table::Tweets => &[Id, Author, Message, CreatedAt],
            Table::Hashtags => &[Id, Hashtag],
            Table::TweetHashtags => &[TweetId, HashtagId],
            Table::Likes => &[TweetId, UserId],
        }
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns().contains(&column)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    Username,
    Email,
    FirstName,
    Password,
    IsVerified,
    Token,
    TokenExpiration,
    CreatedAt,
    Author,
    Message,
    Hashtag,
    TweetId,
    HashtagId,
    UserId,
}

impl Column {
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Username => "username",
            Column::Email => "email",
            Column::FirstName => "first_name",
            Column::Password => "password",
            Column::IsVerified => "is_verified",
            Column::Token => "token",
            Column::TokenExpiration => "token_expiration",
            Column::CreatedAt => "created_at",
            Column::Author => "author",
            Column::Message => "message",
            Column::Hashtag => "hashtag",
            Column::TweetId => "tweet_id",
            Column::HashtagId => "hashtag_id",
            Column::UserId => "user_id",
        }
    }
}

/// Bindable value. `None` binds a typed SQL `NULL`.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Bool(bool),
    Text(Option<String>),
    Timestamp(Option<DateTime<Utc>>),
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(Some(v.to_string()))
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(Some(v))
    }
}

impl From<Option<String>> for SqlValue {
    fn from(v: Option<String>) -> Self {
        SqlValue::Text(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(Some(v))
    }
}

impl From<Option<DateTime<Utc>>> for SqlValue {
    fn from(v: Option<DateTime<Utc>>) -> Self {
        SqlValue::Timestamp(v)
    }
}

/// `(column, value)` pairs: equality filters or assignments
pub type Fields = [(Column, SqlValue)];

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Column `{column}` is not part of table `{table}`")]
    UnknownColumn {
        table: &'static str,
        column: &'static str,
    },

    #[error("{0} needs at least one column")]
    NoColumns(&'static str),

    #[error("Parameter binding failed: {0}")]
    Bind(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl QueryError {
    /// A referenced row is gone (or never existed)
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            QueryError::Database(sqlx::Error::Database(db)) => db.is_foreign_key_violation(),
            _ => false,
        }
    }

    /// Name of the violated constraint, if the store reported one
    pub fn constraint(&self) -> Option<&str> {
        match self {
            QueryError::Database(sqlx::Error::Database(db)) => db.constraint(),
            _ => None,
        }
    }
}

// ============================================================================
// SQL builders
// ============================================================================

fn check_columns(table: Table, fields: &Fields) -> Result<(), QueryError> {
    match fields.iter().find(|(c, _)| !table.has_column(*c)) {
        Some((column, _)) => Err(QueryError::UnknownColumn {
            table: table.as_str(),
            column: column.as_str(),
        }),
        None => Ok(()),
    }
}

fn column_list(table: Table) -> String {
    table
        .columns()
        .iter()
        .map(Column::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `a = $n AND b = $n+1 ...`, numbering from `first`
fn where_clause(filter: &Fields, first: usize) -> String {
    filter
        .iter()
        .enumerate()
        .map(|(i, (c, _))| format!("{} = ${}", c.as_str(), first + i))
        .collect::<Vec<_>>()
        .join(" AND ")
}

pub fn select_sql(table: Table, filter: &Fields) -> Result<String, QueryError> {
    check_columns(table, filter)?;
    if filter.is_empty() {
        return Err(QueryError::NoColumns("find_one"));
    }
    Ok(format!(
        "SELECT {} FROM {} WHERE {} LIMIT 1",
        column_list(table),
        table,
        where_clause(filter, 1)
    ))
}

pub fn insert_sql(table: Table, values: &Fields, on_conflict_nothing: bool) -> Result<String, QueryError> {
    check_columns(table, values)?;
    if values.is_empty() {
        return Err(QueryError::NoColumns("insert"));
    }
    let columns = values
        .iter()
        .map(|(c, _)| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=values.len())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let conflict = if on_conflict_nothing {
        " ON CONFLICT DO NOTHING"
    } else {
        ""
    };
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({}){}",
        table, columns, placeholders, conflict
    ))
}

fn returning_all(sql: String, table: Table) -> String {
    format!("{sql} RETURNING {}", column_list(table))
}

pub fn update_sql(table: Table, filter: &Fields, changes: &Fields) -> Result<String, QueryError> {
    check_columns(table, filter)?;
    check_columns(table, changes)?;
    if filter.is_empty() || changes.is_empty() {
        return Err(QueryError::NoColumns("update_one"));
    }
    let assignments = changes
        .iter()
        .enumerate()
        .map(|(i, (c, _))| format!("{} = ${}", c.as_str(), i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!(
        "UPDATE {table} SET {} WHERE ctid IN (SELECT ctid FROM {table} WHERE {} LIMIT 1) RETURNING {}",
        assignments,
        where_clause(filter, changes.len() + 1),
        column_list(table)
    ))
}

pub fn delete_sql(table: Table, filter: &Fields) -> Result<String, QueryError> {
    check_columns(table, filter)?;
    if filter.is_empty() {
        return Err(QueryError::NoColumns("delete_one"));
    }
    Ok(format!(
        "DELETE FROM {table} WHERE ctid IN (SELECT ctid FROM {table} WHERE {} LIMIT 1)",
        where_clause(filter, 1)
    ))
}

fn bind<'a>(values: impl IntoIterator<Item = &'a SqlValue>) -> Result<PgArguments, QueryError> {
    let mut args = PgArguments::default();
    for value in values {
        let added = match value {
            SqlValue::Int(v) => args.add(*v),
            SqlValue::Bool(v) => args.add(*v),
            SqlValue::Text(v) => args.add(v.clone()),
            SqlValue::Timestamp(v) => args.add(*v),
        };
        added.map_err(|e| QueryError::Bind(e.to_string()))?;
    }
    Ok(args)
}

fn logged(table: Table, op: &'static str) -> impl FnOnce(sqlx::Error) -> QueryError {
    move |err| {
        tracing::error!(table = table.as_str(), op, error = %err, "Query failed");
        QueryError::Database(err)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// First row matching every `(column, value)` in `filter`
pub async fn find_one<T>(
    conn: &mut PgConnection,
    table: Table,
    filter: &Fields,
) -> Result<Option<T>, QueryError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let sql = select_sql(table, filter)?;
    let args = bind(filter.iter().map(|(_, v)| v))?;

    sqlx::query_as_with::<_, T, _>(&sql, args)
        .fetch_optional(&mut *conn)
        .await
        .map_err(logged(table, "find_one"))
}

/// Insert one row and return it as stored (defaults and generated ids filled)
pub async fn insert_one<T>(
    conn: &mut PgConnection,
    table: Table,
    values: &Fields,
) -> Result<T, QueryError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let sql = returning_all(insert_sql(table, values, false)?, table);
    let args = bind(values.iter().map(|(_, v)| v))?;

    sqlx::query_as_with::<_, T, _>(&sql, args)
        .fetch_one(&mut *conn)
        .await
        .map_err(logged(table, "insert_one"))
}

/// Insert one row without reading it back; returns the number of rows written
pub async fn insert(conn: &mut PgConnection, table: Table, values: &Fields) -> Result<u64, QueryError> {
    let sql = insert_sql(table, values, false)?;
    let args = bind(values.iter().map(|(_, v)| v))?;

    let result = sqlx::query_with(&sql, args)
        .execute(&mut *conn)
        .await
        .map_err(logged(table, "insert"))?;

    Ok(result.rows_affected())
}

/// Apply `changes` to the first row matching `filter`; `None` if nothing matched
pub async fn update_one<T>(
    conn: &mut PgConnection,
    table: Table,
    filter: &Fields,
    changes: &Fields,
) -> Result<Option<T>, QueryError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let sql = update_sql(table, filter, changes)?;
    let args = bind(changes.iter().chain(filter.iter()).map(|(_, v)| v))?;

    sqlx::query_as_with::<_, T, _>(&sql, args)
        .fetch_optional(&mut *conn)
        .await
        .map_err(logged(table, "update_one"))
}

/// Delete the first row matching `filter`; returns whether a row went away
pub async fn delete_one(
    conn: &mut PgConnection,
    table: Table,
    filter: &Fields,
) -> Result<bool, QueryError> {
    let sql = delete_sql(table, filter)?;
    let args = bind(filter.iter().map(|(_, v)| v))?;

    let result = sqlx::query_with(&sql, args)
        .execute(&mut *conn)
        .await
        .map_err(logged(table, "delete_one"))?;

    Ok(result.rows_affected() > 0)
}

/// Row matching `key`, inserting it first if absent.
///
/// Relies on a unique constraint over `key`: a concurrent insert of the same
/// key makes ours a no-op, and the follow-up lookup sees the winner's row.
pub async fn find_or_create<T>(
    conn: &mut PgConnection,
    table: Table,
    key: &Fields,
) -> Result<T, QueryError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let sql = returning_all(insert_sql(table, key, true)?, table);
    let args = bind(key.iter().map(|(_, v)| v))?;

    let inserted = sqlx::query_as_with::<_, T, _>(&sql, args)
        .fetch_optional(&mut *conn)
        .await
        .map_err(logged(table, "find_or_create"))?;

    if let Some(row) = inserted {
        return Ok(row);
    }

    find_one(conn, table, key)
        .await?
        .ok_or(QueryError::Database(sqlx::Error::RowNotFound))
}
