//! Article listing query construction
//!
//! Sort column and direction are parsed into closed enums before any SQL
//! text is assembled, so only allow-listed fragments reach the statement.
//! The topic filter is always a bind parameter.

use crate::errors::{AppError, Result};
use sea_orm::{DbBackend, Statement, Value};
use std::fmt;
use std::str::FromStr;

/// Columns an article listing may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    Author,
    Title,
    ArticleId,
    Topic,
    #[default]
    CreatedAt,
    Votes,
    CommentCount,
}

impl SortColumn {
    pub const ALL: [SortColumn; 7] = [
        SortColumn::Author,
        SortColumn::Title,
        SortColumn::ArticleId,
        SortColumn::Topic,
        SortColumn::CreatedAt,
        SortColumn::Votes,
        SortColumn::CommentCount,
    ];

    /// Name accepted in the `sort_by` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Author => "author",
            SortColumn::Title => "title",
            SortColumn::ArticleId => "article_id",
            SortColumn::Topic => "topic",
            SortColumn::CreatedAt => "created_at",
            SortColumn::Votes => "votes",
            SortColumn::CommentCount => "comment_count",
        }
    }

    fn as_sql(&self) -> &'static str {
        match self {
            SortColumn::Author => "a.author",
            SortColumn::Title => "a.title",
            SortColumn::ArticleId => "a.article_id",
            SortColumn::Topic => "a.topic",
            SortColumn::CreatedAt => "a.created_at",
            SortColumn::Votes => "a.votes",
            SortColumn::CommentCount => "comment_count",
        }
    }
}

impl FromStr for SortColumn {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        SortColumn::ALL
            .into_iter()
            .find(|column| column.as_str() == s)
            .ok_or(AppError::BadRequest)
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction, parsed case-insensitively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Err(AppError::BadRequest)
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Builder for the article listing statement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleListQuery {
    topic: Option<String>,
    sort_by: SortColumn,
    order: SortOrder,
}

impl ArticleListQuery {
    /// All articles, newest first
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate raw query parameters.
    ///
    /// Fails with `BadRequest` when either option is outside its allow-list,
    /// regardless of the topic. An empty topic means no filter.
    pub fn from_params(
        topic: Option<String>,
        sort_by: Option<&str>,
        order: Option<&str>,
    ) -> Result<Self> {
        let mut query = Self::new();

        if let Some(sort_by) = sort_by {
            query = query.sort_by(sort_by.parse()?);
        }
        if let Some(order) = order {
            query = query.order(order.parse()?);
        }
        if let Some(topic) = topic.filter(|t| !t.is_empty()) {
            query = query.topic(topic);
        }

        Ok(query)
    }

    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn sort_by(mut self, column: SortColumn) -> Self {
        self.sort_by = column;
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn topic_filter(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn sort_column(&self) -> SortColumn {
        self.sort_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.order
    }

    /// Assemble the parameterized statement
    pub fn build(&self) -> Statement {
        let mut sql = String::from(
            "SELECT a.article_id, a.title, a.topic, a.author, a.body, a.created_at, a.votes, \
             COUNT(c.comment_id) AS comment_count \
             FROM articles a \
             LEFT JOIN comments c ON a.article_id = c.article_id",
        );
        let mut values: Vec<Value> = Vec::new();

        if let Some(ref topic) = self.topic {
            values.push(topic.clone().into());
            sql.push_str(&format!(" WHERE a.topic = ${}", values.len()));
        }

        sql.push_str(" GROUP BY a.article_id");
        sql.push_str(&format!(" ORDER BY {} {}", self.sort_by.as_sql(), self.order.as_sql()));

        Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
    }
}

/// Single article joined with its comment count
pub(crate) fn article_by_id_statement(article_id: i32) -> Statement {
    Statement::from_sql_and_values(
        DbBackend::Postgres,
        r#"
        SELECT a.article_id, a.title, a.topic, a.author, a.body, a.created_at, a.votes,
               COUNT(c.comment_id) AS comment_count
        FROM articles a
        LEFT JOIN comments c ON a.article_id = c.article_id
        WHERE a.article_id = $1
        GROUP BY a.article_id
        "#,
        [article_id.into()],
    )
}

pub(crate) fn increment_votes_statement(article_id: i32, delta: i32) -> Statement {
    Statement::from_sql_and_values(
        DbBackend::Postgres,
        r#"
        UPDATE articles
        SET votes = votes + $1
        WHERE article_id = $2
        RETURNING *
        "#,
        [delta.into(), article_id.into()],
    )
}

pub(crate) fn delete_comment_statement(comment_id: i32) -> Statement {
    Statement::from_sql_and_values(
        DbBackend::Postgres,
        "DELETE FROM comments WHERE comment_id = $1 RETURNING *",
        [comment_id.into()],
    )
}
