//! Article entity and its comment-count projection

use crate::errors::{self, AppError};
use sea_orm::entity::prelude::*;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub article_id: i32,

    pub title: String,

    /// Slug of the owning topic
    pub topic: String,

    /// Username of the author
    pub author: String,

    #[sea_orm(column_type = "Text")]
    pub body: String,

    pub created_at: DateTimeWithTimeZone,

    pub votes: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::topic::Entity",
        from = "Column::Topic",
        to = "super::topic::Column::Slug"
    )]
    Topic,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::Author",
        to = "super::user::Column::Username"
    )]
    Author,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::topic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Topic.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Article row joined with the number of comments referencing it.
///
/// `comment_count` is counted as an integer so ordering by it stays numeric,
/// but is serialized as a decimal string.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct ArticleWithCount {
    pub article_id: i32,
    pub title: String,
    pub topic: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTimeWithTimeZone,
    pub votes: i32,
    #[serde(serialize_with = "count_as_string")]
    pub comment_count: i64,
}

fn count_as_string<S: Serializer>(count: &i64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(count)
}

/// Amount to add to an article's votes.
///
/// Parsed from the raw `inc_votes` JSON value with falsy-check semantics:
/// absent, `null`, `false`, `0` and `""` are rejected. Strings holding an
/// integer are accepted since the database would coerce them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteDelta(i32);

impl VoteDelta {
    pub fn parse(value: Option<&serde_json::Value>) -> errors::Result<Self> {
        use serde_json::Value;

        let delta = match value {
            Some(Value::Number(n)) => match n.as_i64() {
                Some(0) => None,
                Some(i) => i32::try_from(i).ok(),
                None => n.as_f64().and_then(integral_i32),
            },
            Some(Value::String(s)) if !s.is_empty() => s.trim().parse::<i32>().ok(),
            _ => None,
        };

        delta.map(VoteDelta).ok_or_else(AppError::invalid_input)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

fn integral_i32(f: f64) -> Option<i32> {
    let in_range = f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX);
    (f != 0.0 && f.fract() == 0.0 && in_range).then_some(f as i32)
}
