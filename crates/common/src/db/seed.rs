//! Schema creation and data seeding
//!
//! Drops and recreates the news tables, then bulk-inserts a dataset.
//! Articles are inserted in file order so their serial ids start at 1 and
//! match the `article_id` values comments refer to.

use crate::db::models::*;
use crate::errors::Result;
use sea_orm::{ActiveValue::NotSet, ConnectionTrait, EntityTrait, Set};
use serde::Deserialize;
use tracing::info;

const DROP_TABLES: &[&str] = &[
    "DROP TABLE IF EXISTS comments",
    "DROP TABLE IF EXISTS articles",
    "DROP TABLE IF EXISTS users",
    "DROP TABLE IF EXISTS topics",
];

const CREATE_TABLES: &[&str] = &[
    r#"
    CREATE TABLE topics (
        slug VARCHAR PRIMARY KEY,
        description VARCHAR NOT NULL
    )
    "#,
    r#"
    CREATE TABLE users (
        username VARCHAR PRIMARY KEY,
        name VARCHAR NOT NULL,
        avatar_url VARCHAR
    )
    "#,
    r#"
    CREATE TABLE articles (
        article_id SERIAL PRIMARY KEY,
        title VARCHAR NOT NULL,
        topic VARCHAR NOT NULL REFERENCES topics(slug),
        author VARCHAR NOT NULL REFERENCES users(username),
        body TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        votes INT NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE comments (
        comment_id SERIAL PRIMARY KEY,
        body TEXT NOT NULL,
        votes INT NOT NULL DEFAULT 0,
        author VARCHAR NOT NULL REFERENCES users(username),
        article_id INT NOT NULL REFERENCES articles(article_id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
];

/// Dataset loaded from a JSON seed file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub topics: Vec<SeedTopic>,
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub articles: Vec<SeedArticle>,
    #[serde(default)]
    pub comments: Vec<SeedComment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedTopic {
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedArticle {
    pub title: String,
    pub topic: String,
    pub author: String,
    pub body: String,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    #[serde(default)]
    pub votes: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedComment {
    pub article_id: i32,
    pub author: String,
    pub body: String,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    #[serde(default)]
    pub votes: i32,
}

impl SeedData {
    /// Parse a dataset from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Recreate the schema and insert `data`
pub async fn run<C: ConnectionTrait>(conn: &C, data: &SeedData) -> Result<()> {
    for sql in DROP_TABLES.iter().chain(CREATE_TABLES) {
        conn.execute_unprepared(sql).await?;
    }

    if !data.topics.is_empty() {
        TopicEntity::insert_many(data.topics.iter().map(|t| TopicActiveModel {
            slug: Set(t.slug.clone()),
            description: Set(t.description.clone()),
        }))
        .exec_without_returning(conn)
        .await?;
    }

    if !data.users.is_empty() {
        UserEntity::insert_many(data.users.iter().map(|u| UserActiveModel {
            username: Set(u.username.clone()),
            name: Set(u.name.clone()),
            avatar_url: Set(u.avatar_url.clone()),
        }))
        .exec_without_returning(conn)
        .await?;
    }

    if !data.articles.is_empty() {
        ArticleEntity::insert_many(data.articles.iter().map(|a| ArticleActiveModel {
            article_id: NotSet,
            title: Set(a.title.clone()),
            topic: Set(a.topic.clone()),
            author: Set(a.author.clone()),
            body: Set(a.body.clone()),
            created_at: Set(a.created_at),
            votes: Set(a.votes),
        }))
        .exec_without_returning(conn)
        .await?;
    }

    if !data.comments.is_empty() {
        CommentEntity::insert_many(data.comments.iter().map(|c| CommentActiveModel {
            comment_id: NotSet,
            body: Set(c.body.clone()),
            votes: Set(c.votes),
            author: Set(c.author.clone()),
            article_id: Set(c.article_id),
            created_at: Set(c.created_at),
        }))
        .exec_without_returning(conn)
        .await?;
    }

    info!(
        topics = data.topics.len(),
        users = data.users.len(),
        articles = data.articles.len(),
        comments = data.comments.len(),
        "Database seeded"
    );

    Ok(())
}
