//! Topic handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use newsroom_common::{
    db::{models::Topic, Repository},
    errors::Result,
};

#[derive(Serialize)]
pub struct TopicsResponse {
    pub topics: Vec<Topic>,
}

/// List all topics
pub async fn get_topics(State(state): State<AppState>) -> Result<Json<TopicsResponse>> {
    let repo = Repository::new(state.db.clone());
    let topics = repo.list_topics().await?;

    Ok(Json(TopicsResponse { topics }))
}
