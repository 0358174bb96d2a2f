//! Repository pattern for database operations
//!
//! One method per resource operation. Each statement is a single query, so
//! the database's per-statement atomicity is all the consistency needed.
//! Empty collection results are disambiguated with an existence check on
//! the parent row.

use crate::db::existence::{self, Reference};
use crate::db::models::*;
use crate::db::query::{self, ArticleListQuery};
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use crate::metrics;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, Set,
};
use std::future::Future;
use std::time::Instant;
use tracing::{debug, info};

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get the read connection
    fn read_conn(&self) -> &DatabaseConnection {
        self.pool.read()
    }

    /// Get the write connection
    fn write_conn(&self) -> &DatabaseConnection {
        self.pool.write()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // Topic & User Operations
    // ========================================================================

    /// All topics
    pub async fn list_topics(&self) -> Result<Vec<Topic>> {
        timed("list_topics", async {
            Ok(TopicEntity::find().all(self.read_conn()).await?)
        })
        .await
    }

    /// All users
    pub async fn list_users(&self) -> Result<Vec<User>> {
        timed("list_users", async {
            Ok(UserEntity::find().all(self.read_conn()).await?)
        })
        .await
    }

    // ========================================================================
    // Article Operations
    // ========================================================================

    /// Find one article with its comment count
    pub async fn find_article(&self, article_id: i32) -> Result<ArticleWithCount> {
        timed("find_article", async {
            ArticleWithCount::find_by_statement(query::article_by_id_statement(article_id))
                .one(self.read_conn())
                .await?
                .ok_or_else(|| AppError::not_found("article id not found"))
        })
        .await
    }

    /// List articles with comment counts, filtered and ordered per `query`.
    ///
    /// An empty result for a topic filter is only an error when the topic
    /// itself does not exist.
    pub async fn list_articles(&self, query: &ArticleListQuery) -> Result<Vec<ArticleWithCount>> {
        timed("list_articles", async {
            debug!(
                topic = ?query.topic_filter(),
                sort_by = %query.sort_column(),
                order = %query.sort_order(),
                "Listing articles"
            );

            let articles = ArticleWithCount::find_by_statement(query.build())
                .all(self.read_conn())
                .await?;

            if articles.is_empty() {
                if let Some(topic) = query.topic_filter() {
                    existence::ensure_exists(self.read_conn(), Reference::TopicSlug, topic).await?;
                }
            }

            Ok(articles)
        })
        .await
    }

    /// Add `inc_votes` to an article's votes and return the updated row.
    ///
    /// The raw JSON value is validated here: absent or falsy values are
    /// rejected before the update runs.
    pub async fn increment_article_votes(
        &self,
        article_id: i32,
        inc_votes: Option<&serde_json::Value>,
    ) -> Result<Article> {
        let delta = VoteDelta::parse(inc_votes)?;

        timed("increment_article_votes", async {
            let article = ArticleEntity::find()
                .from_raw_sql(query::increment_votes_statement(article_id, delta.get()))
                .one(self.write_conn())
                .await?
                .ok_or_else(|| AppError::not_found("article id not found"))?;

            info!(article_id, delta = delta.get(), votes = article.votes, "Article votes updated");
            Ok(article)
        })
        .await
    }

    // ========================================================================
    // Comment Operations
    // ========================================================================

    /// Comments for an article, newest first
    pub async fn list_comments(&self, article_id: i32) -> Result<Vec<Comment>> {
        timed("list_comments", async {
            let comments = CommentEntity::find()
                .filter(CommentColumn::ArticleId.eq(article_id))
                .order_by_desc(CommentColumn::CreatedAt)
                .all(self.read_conn())
                .await?;

            if comments.is_empty() {
                existence::ensure_exists(self.read_conn(), Reference::ArticleId, article_id).await?;
            }

            Ok(comments)
        })
        .await
    }

    /// Insert a comment on an article.
    ///
    /// Missing fields are rejected up front; unknown articles and usernames
    /// surface as foreign-key violations from the database.
    pub async fn insert_comment(&self, article_id: i32, comment: &NewComment) -> Result<Comment> {
        let (username, body) = comment.required_fields()?;

        timed("insert_comment", async {
            let inserted = CommentActiveModel {
                article_id: Set(article_id),
                author: Set(username.to_owned()),
                body: Set(body.to_owned()),
                ..Default::default()
            }
            .insert(self.write_conn())
            .await?;

            info!(comment_id = inserted.comment_id, article_id, author = %inserted.author, "Comment created");
            Ok(inserted)
        })
        .await
    }

    /// Delete a comment and return the removed row
    pub async fn delete_comment(&self, comment_id: i32) -> Result<Comment> {
        timed("delete_comment", async {
            let deleted = CommentEntity::find()
                .from_raw_sql(query::delete_comment_statement(comment_id))
                .one(self.write_conn())
                .await?
                .ok_or_else(|| AppError::not_found("comment id not found"))?;

            info!(comment_id, "Comment deleted");
            Ok(deleted)
        })
        .await
    }
}

async fn timed<T, F>(operation: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let start = Instant::now();
    let result = fut.await;
    metrics::record_query(operation, start.elapsed(), result.is_ok());
    result
}
