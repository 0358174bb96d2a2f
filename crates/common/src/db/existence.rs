//! Existence checks for referenced rows
//!
//! Used after a collection query comes back empty to tell "nothing matched"
//! apart from "the parent resource does not exist".

use crate::errors::{AppError, Result};
use sea_orm::{ConnectionTrait, DbBackend, Statement, Value};
use std::fmt;

/// A (table, column) pair that can be looked up.
///
/// Closed so table and column names never come from caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    TopicSlug,
    ArticleId,
}

impl Reference {
    pub fn table(&self) -> &'static str {
        match self {
            Reference::TopicSlug => "topics",
            Reference::ArticleId => "articles",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Reference::TopicSlug => "slug",
            Reference::ArticleId => "article_id",
        }
    }

    fn statement(&self, value: Value) -> Statement {
        Statement::from_sql_and_values(
            DbBackend::Postgres,
            format!(
                "SELECT EXISTS (SELECT 1 FROM {} WHERE {} = $1) AS found",
                self.table(),
                self.column()
            ),
            [value],
        )
    }
}

/// Whether any row in the referenced table has `column = value`
pub async fn exists<C, V>(conn: &C, reference: Reference, value: V) -> Result<bool>
where
    C: ConnectionTrait,
    V: Into<Value>,
{
    let row = conn.query_one(reference.statement(value.into())).await?;

    match row {
        Some(row) => Ok(row.try_get::<bool>("", "found")?),
        None => Ok(false),
    }
}

/// Fail with `NotFound("<value> not found")` unless the referenced row exists
pub async fn ensure_exists<C, V>(conn: &C, reference: Reference, value: V) -> Result<()>
where
    C: ConnectionTrait,
    V: Into<Value> + fmt::Display,
{
    let message = format!("{} not found", value);

    if exists(conn, reference, value).await? {
        Ok(())
    } else {
        tracing::debug!(
            table = reference.table(),
            column = reference.column(),
            "Referenced row does not exist"
        );
        Err(AppError::not_found(message))
    }
}
