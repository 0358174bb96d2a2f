//! User handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use newsroom_common::{
    db::{models::User, Repository},
    errors::Result,
};

#[derive(Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

/// List all users
pub async fn get_users(State(state): State<AppState>) -> Result<Json<UsersResponse>> {
    let repo = Repository::new(state.db.clone());
    let users = repo.list_users().await?;

    Ok(Json(UsersResponse { users }))
}
