//! End-to-end tests against a real Postgres database.
//!
//! Set `TEST_DATABASE_URL` to a disposable database to run them; each test
//! reseeds it from `data/test-data.json`. Without the variable every test
//! returns early.

mod support;

use axum::{http::StatusCode, Router};
use newsroom_api::{create_router, AppState};
use newsroom_common::{
    config::DatabaseConfig,
    db::{seed, seed::SeedData, DbPool},
};
use serde_json::{json, Value};
use tokio::sync::{Mutex, MutexGuard};

use support::*;

const TEST_DATA: &str = include_str!("../../../data/test-data.json");

/// Tests share one database, so they run one at a time
static DB_LOCK: Mutex<()> = Mutex::const_new(());

struct TestContext {
    app: Router,
    _guard: MutexGuard<'static, ()>,
}

async fn seeded() -> Option<TestContext> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return None;
    };

    let guard = DB_LOCK.lock().await;

    let db = DbPool::new(&DatabaseConfig::with_url(url))
        .await
        .expect("failed to connect to test database");
    let data = SeedData::from_json(TEST_DATA).expect("test data parses");
    seed::run(db.write(), &data).await.expect("failed to seed test database");

    let app = create_router(AppState::new(db));

    Some(TestContext { app, _guard: guard })
}

fn array(body: &Value, key: &str) -> Vec<Value> {
    body[key].as_array().unwrap_or_else(|| panic!("{} is not an array: {}", key, body)).clone()
}

// =============================================================================
// Topics & users
// =============================================================================

#[tokio::test]
async fn get_topics() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = get(&ctx.app, "/api/topics").await;

    assert_eq!(status, StatusCode::OK);
    let topics = array(&body, "topics");
    assert_eq!(topics.len(), 3);
    for topic in topics {
        assert!(topic["slug"].is_string());
        assert!(topic["description"].is_string());
    }
}

#[tokio::test]
async fn get_users() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = get(&ctx.app, "/api/users").await;

    assert_eq!(status, StatusCode::OK);
    let users = array(&body, "users");
    assert_eq!(users.len(), 4);
    for user in users {
        assert!(user["username"].is_string());
        assert!(user["name"].is_string());
        assert!(user.get("avatar_url").is_some());
    }
}

// =============================================================================
// Single article
// =============================================================================

#[tokio::test]
async fn get_article_by_id() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = get(&ctx.app, "/api/articles/1").await;

    assert_eq!(status, StatusCode::OK);
    let article = &body["article"];
    assert_eq!(article["article_id"], 1);
    assert_eq!(article["author"], "butter_bridge");
    assert_eq!(article["topic"], "mitch");
    assert_eq!(article["votes"], 100);
    assert_eq!(article["comment_count"], "11");
    assert!(article["title"].is_string());
    assert!(article["body"].is_string());
    timestamp(&article["created_at"]);
}

#[tokio::test]
async fn get_article_without_comments_counts_zero() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = get(&ctx.app, "/api/articles/2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["article"]["comment_count"], "0");
}

#[tokio::test]
async fn get_missing_article() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = get(&ctx.app, "/api/articles/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_msg(&body, "article id not found");

    let (status, body) = get(&ctx.app, "/api/articles/notANumber").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_msg(&body, "invalid input");
}

// =============================================================================
// Article listing
// =============================================================================

#[tokio::test]
async fn list_articles_defaults_to_newest_first() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = get(&ctx.app, "/api/articles").await;

    assert_eq!(status, StatusCode::OK);
    let articles = array(&body, "articles");
    assert_eq!(articles.len(), 12);
    for article in &articles {
        assert!(article["comment_count"].is_string());
    }
    for pair in articles.windows(2) {
        assert!(timestamp(&pair[0]["created_at"]) >= timestamp(&pair[1]["created_at"]));
    }
}

#[tokio::test]
async fn list_articles_filtered_by_topic() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = get(&ctx.app, "/api/articles?topic=mitch").await;

    assert_eq!(status, StatusCode::OK);
    let articles = array(&body, "articles");
    assert_eq!(articles.len(), 11);
    assert!(articles.iter().all(|a| a["topic"] == "mitch"));
}

#[tokio::test]
async fn list_articles_for_topic_without_articles_is_empty() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = get(&ctx.app, "/api/articles?topic=paper").await;

    assert_eq!(status, StatusCode::OK);
    assert!(array(&body, "articles").is_empty());
}

#[tokio::test]
async fn list_articles_with_empty_topic_is_unfiltered() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = get(&ctx.app, "/api/articles?topic=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(array(&body, "articles").len(), 12);
}

#[tokio::test]
async fn list_articles_for_unknown_topic() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = get(&ctx.app, "/api/articles?topic=dogs").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_msg(&body, "dogs not found");
}

#[tokio::test]
async fn list_articles_sorted_by_votes_ascending() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = get(&ctx.app, "/api/articles?sort_by=votes&order=ASC").await;

    assert_eq!(status, StatusCode::OK);
    let votes: Vec<i64> = array(&body, "articles")
        .iter()
        .map(|a| a["votes"].as_i64().unwrap())
        .collect();
    assert!(votes.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(votes.last(), Some(&100));
}

#[tokio::test]
async fn list_articles_sorted_by_comment_count_is_numeric() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = get(&ctx.app, "/api/articles?sort_by=comment_count").await;

    assert_eq!(status, StatusCode::OK);
    let counts: Vec<i64> = array(&body, "articles")
        .iter()
        .map(|a| a["comment_count"].as_str().unwrap().parse().unwrap())
        .collect();
    assert_eq!(counts[0], 11);
    assert!(counts.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn list_articles_rejects_unknown_sort_options() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = get(&ctx.app, "/api/articles?sort_by=body").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_msg(&body, "bad request");

    let (status, body) = get(&ctx.app, "/api/articles?topic=dogs&order=sideways").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_msg(&body, "bad request");
}

// =============================================================================
// Votes
// =============================================================================

#[tokio::test]
async fn patch_article_votes_accumulate() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = patch_json(&ctx.app, "/api/articles/1", &json!({"inc_votes": 10})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["article"]["votes"], 110);
    assert_eq!(body["article"]["article_id"], 1);

    let (_, body) = patch_json(&ctx.app, "/api/articles/1", &json!({"inc_votes": 10})).await;
    assert_eq!(body["article"]["votes"], 120);

    let (_, body) = patch_json(&ctx.app, "/api/articles/1", &json!({"inc_votes": -120})).await;
    assert_eq!(body["article"]["votes"], 0);
}

#[tokio::test]
async fn patch_article_rejects_bad_deltas() {
    let Some(ctx) = seeded().await else { return };

    for patch in [json!({"inc_votes": 0}), json!({}), json!({"inc_votes": "cat"})] {
        let (status, body) = patch_json(&ctx.app, "/api/articles/1", &patch).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_msg(&body, "invalid input");
    }

    let (_, body) = get(&ctx.app, "/api/articles/1").await;
    assert_eq!(body["article"]["votes"], 100);
}

#[tokio::test]
async fn patch_missing_article() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = patch_json(&ctx.app, "/api/articles/999", &json!({"inc_votes": 1})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_msg(&body, "article id not found");
}

// =============================================================================
// Comments
// =============================================================================

#[tokio::test]
async fn list_comments_newest_first() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = get(&ctx.app, "/api/articles/1/comments").await;

    assert_eq!(status, StatusCode::OK);
    let comments = array(&body, "comments");
    assert_eq!(comments.len(), 11);
    assert!(comments.iter().all(|c| c["article_id"] == 1));
    for pair in comments.windows(2) {
        assert!(timestamp(&pair[0]["created_at"]) >= timestamp(&pair[1]["created_at"]));
    }
}

#[tokio::test]
async fn list_comments_for_article_without_comments() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = get(&ctx.app, "/api/articles/2/comments").await;

    assert_eq!(status, StatusCode::OK);
    assert!(array(&body, "comments").is_empty());
}

#[tokio::test]
async fn list_comments_for_missing_article() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = get(&ctx.app, "/api/articles/99/comments").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_msg(&body, "99 not found");
}

#[tokio::test]
async fn post_comment() {
    let Some(ctx) = seeded().await else { return };

    let new_comment = json!({"username": "lurker", "body": "First!"});
    let (status, body) = post_json(&ctx.app, "/api/articles/2/comments", &new_comment).await;

    assert_eq!(status, StatusCode::CREATED);
    let comment = &body["comment"];
    assert_eq!(comment["author"], "lurker");
    assert_eq!(comment["body"], "First!");
    assert_eq!(comment["article_id"], 2);
    assert_eq!(comment["votes"], 0);
    assert!(comment["comment_id"].is_i64());

    let (_, body) = get(&ctx.app, "/api/articles/2").await;
    assert_eq!(body["article"]["comment_count"], "1");
}

#[tokio::test]
async fn post_comment_with_unknown_references() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = post_json(
        &ctx.app,
        "/api/articles/1/comments",
        &json!({"username": "not_a_user", "body": "hello"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_msg(&body, "username not found");

    let (status, body) = post_json(
        &ctx.app,
        "/api/articles/999/comments",
        &json!({"username": "lurker", "body": "hello"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_msg(&body, "article id not found");
}

#[tokio::test]
async fn post_comment_missing_fields() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) =
        post_json(&ctx.app, "/api/articles/1/comments", &json!({"username": "lurker"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_msg(&body, "missing comments from request");

    let (_, body) = get(&ctx.app, "/api/articles/1").await;
    assert_eq!(body["article"]["comment_count"], "11");
}

#[tokio::test]
async fn delete_comment_removes_only_that_row() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = delete(&ctx.app, "/api/comments/1").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    // Comment 1 belonged to article 9, which had two
    let (_, body) = get(&ctx.app, "/api/articles/9/comments").await;
    let remaining = array(&body, "comments");
    assert_eq!(remaining.len(), 1);
    assert_ne!(remaining[0]["comment_id"], 1);

    let (_, body) = get(&ctx.app, "/api/articles/1").await;
    assert_eq!(body["article"]["comment_count"], "11");
}

#[tokio::test]
async fn delete_missing_comment() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = delete(&ctx.app, "/api/comments/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_msg(&body, "comment id not found");

    let (status, body) = delete(&ctx.app, "/api/comments/notANumber").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_msg(&body, "invalid input");
}

#[tokio::test]
async fn readiness_reports_database_up() {
    let Some(ctx) = seeded().await else { return };

    let (status, body) = get(&ctx.app, "/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"]["status"], "up");
}
