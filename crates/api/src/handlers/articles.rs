//! Article handlers

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::parse_id;
use crate::AppState;
use newsroom_common::{
    db::{
        models::{Article, ArticleWithCount},
        ArticleListQuery, Repository,
    },
    errors::{AppError, Result},
};

/// Query string accepted by the article listing
#[derive(Debug, Default, Deserialize)]
pub struct ArticlesParams {
    pub topic: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

/// Body of a vote update; the value is validated by the repository
#[derive(Debug, Default, Deserialize)]
pub struct VotePatch {
    pub inc_votes: Option<serde_json::Value>,
}

#[derive(Serialize)]
pub struct ArticleResponse<T> {
    pub article: T,
}

#[derive(Serialize)]
pub struct ArticlesResponse {
    pub articles: Vec<ArticleWithCount>,
}

/// Get one article with its comment count
pub async fn get_article(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
) -> Result<Json<ArticleResponse<ArticleWithCount>>> {
    let article_id = parse_id(&article_id)?;

    let repo = Repository::new(state.db.clone());
    let article = repo.find_article(article_id).await?;

    Ok(Json(ArticleResponse { article }))
}

/// List articles, optionally filtered by topic and ordered
pub async fn get_articles(
    State(state): State<AppState>,
    params: std::result::Result<Query<ArticlesParams>, QueryRejection>,
) -> Result<Json<ArticlesResponse>> {
    let Query(params) = params.map_err(|_| AppError::BadRequest)?;

    let query = ArticleListQuery::from_params(
        params.topic,
        params.sort_by.as_deref(),
        params.order.as_deref(),
    )?;

    let repo = Repository::new(state.db.clone());
    let articles = repo.list_articles(&query).await?;

    Ok(Json(ArticlesResponse { articles }))
}

/// Add `inc_votes` to an article's votes
pub async fn patch_article(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
    body: std::result::Result<Json<VotePatch>, JsonRejection>,
) -> Result<Json<ArticleResponse<Article>>> {
    let article_id = parse_id(&article_id)?;
    let Json(patch) = body.map_err(|_| AppError::invalid_input())?;

    let repo = Repository::new(state.db.clone());
    let article = repo
        .increment_article_votes(article_id, patch.inc_votes.as_ref())
        .await?;

    Ok(Json(ArticleResponse { article }))
}
