//! Endpoint catalog and unmatched-route handling

use axum::Json;
use serde_json::{json, Value};

use newsroom_common::errors::AppError;

/// Describe every endpoint the API serves
pub async fn get_endpoints() -> Json<Value> {
    Json(json!({ "endpoints": endpoints() }))
}

/// Fallback for any route the router does not know
pub async fn unknown_route() -> AppError {
    AppError::RouteNotFound
}

fn endpoints() -> Value {
    json!({
        "GET /api": {
            "description": "serves a json representation of all the available endpoints of the api"
        },
        "GET /api/topics": {
            "description": "serves an array of all topics",
            "queries": [],
            "exampleResponse": {
                "topics": [{ "slug": "football", "description": "Footie!" }]
            }
        },
        "GET /api/users": {
            "description": "serves an array of all users",
            "queries": [],
            "exampleResponse": {
                "users": [{
                    "username": "butter_bridge",
                    "name": "jonny",
                    "avatar_url": "https://www.healthytherapies.com/wp-content/uploads/2016/06/Lime3.jpg"
                }]
            }
        },
        "GET /api/articles": {
            "description": "serves an array of all articles with their comment counts",
            "queries": ["topic", "sort_by", "order"],
            "sortBy": ["author", "title", "article_id", "topic", "created_at", "votes", "comment_count"],
            "order": ["asc", "desc"],
            "exampleResponse": {
                "articles": [{
                    "article_id": 34,
                    "title": "Seafood substitutions are increasing",
                    "topic": "cooking",
                    "author": "weegembump",
                    "body": "Text from the article..",
                    "created_at": "2020-11-22T11:13:00+00:00",
                    "votes": 0,
                    "comment_count": "6"
                }]
            }
        },
        "GET /api/articles/:article_id": {
            "description": "serves a single article with its comment count",
            "queries": [],
            "exampleResponse": {
                "article": {
                    "article_id": 1,
                    "title": "Living in the shadow of a great man",
                    "topic": "mitch",
                    "author": "butter_bridge",
                    "body": "I find this existence challenging",
                    "created_at": "2020-07-09T20:11:00+00:00",
                    "votes": 100,
                    "comment_count": "11"
                }
            }
        },
        "PATCH /api/articles/:article_id": {
            "description": "adds inc_votes to the article's votes and serves the updated article",
            "exampleRequest": { "inc_votes": 10 },
            "exampleResponse": {
                "article": {
                    "article_id": 1,
                    "title": "Living in the shadow of a great man",
                    "topic": "mitch",
                    "author": "butter_bridge",
                    "body": "I find this existence challenging",
                    "created_at": "2020-07-09T20:11:00+00:00",
                    "votes": 110
                }
            }
        },
        "GET /api/articles/:article_id/comments": {
            "description": "serves an array of comments for the article, newest first",
            "queries": [],
            "exampleResponse": {
                "comments": [{
                    "comment_id": 5,
                    "body": "I hate streaming noses",
                    "votes": 0,
                    "author": "icellusedkars",
                    "article_id": 1,
                    "created_at": "2020-11-03T21:00:00+00:00"
                }]
            }
        },
        "POST /api/articles/:article_id/comments": {
            "description": "adds a comment to the article and serves the new comment",
            "exampleRequest": { "username": "butter_bridge", "body": "This morning, I showered for nine minutes." },
            "exampleResponse": {
                "comment": {
                    "comment_id": 19,
                    "body": "This morning, I showered for nine minutes.",
                    "votes": 0,
                    "author": "butter_bridge",
                    "article_id": 1,
                    "created_at": "2024-01-01T00:00:00+00:00"
                }
            }
        },
        "DELETE /api/comments/:comment_id": {
            "description": "deletes the comment and responds with no content",
            "exampleResponse": null
        }
    })
}
