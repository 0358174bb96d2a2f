//! Comment handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use super::parse_id;
use crate::AppState;
use newsroom_common::{
    db::{
        models::{Comment, NewComment},
        Repository,
    },
    errors::{AppError, Result},
};

#[derive(Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
}

#[derive(Serialize)]
pub struct CommentResponse {
    pub comment: Comment,
}

/// Comments on an article, newest first
pub async fn get_comments(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
) -> Result<Json<CommentsResponse>> {
    let article_id = parse_id(&article_id)?;

    let repo = Repository::new(state.db.clone());
    let comments = repo.list_comments(article_id).await?;

    Ok(Json(CommentsResponse { comments }))
}

/// Post a comment on an article
pub async fn post_comment(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
    body: std::result::Result<Json<NewComment>, JsonRejection>,
) -> Result<(StatusCode, Json<CommentResponse>)> {
    let article_id = parse_id(&article_id)?;
    let Json(new_comment) = body.map_err(|_| AppError::invalid_input())?;

    let repo = Repository::new(state.db.clone());
    let comment = repo.insert_comment(article_id, &new_comment).await?;

    Ok((StatusCode::CREATED, Json(CommentResponse { comment })))
}

/// Delete a comment
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> Result<StatusCode> {
    let comment_id = parse_id(&comment_id)?;

    let repo = Repository::new(state.db.clone());
    repo.delete_comment(comment_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
