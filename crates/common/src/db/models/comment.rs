//! Comment entity

use crate::errors::{self, AppError};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub comment_id: i32,

    pub body: String,

    pub votes: i32,

    /// Username of the commenter
    pub author: String,

    pub article_id: i32,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::article::Entity",
        from = "Column::ArticleId",
        to = "super::article::Column::ArticleId",
        on_delete = "Cascade"
    )]
    Article,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::Author",
        to = "super::user::Column::Username"
    )]
    Author,
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Article.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Comment submitted by a caller; both fields are required
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewComment {
    pub username: Option<String>,
    pub body: Option<String>,
}

impl NewComment {
    /// Check both required fields are present, username first.
    ///
    /// Returns `(username, body)` ready for insertion.
    pub fn required_fields(&self) -> errors::Result<(&str, &str)> {
        let username = present(self.username.as_deref()).ok_or_else(|| AppError::InvalidInput {
            message: "missing username from request".to_string(),
        })?;
        let body = present(self.body.as_deref()).ok_or_else(|| AppError::InvalidInput {
            message: "missing comments from request".to_string(),
        })?;

        Ok((username, body))
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
