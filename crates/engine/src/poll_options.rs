//! Poll options.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Vote, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub id: Uuid,
    pub poll_id: Uuid,
    pub content: String,
    /// Display order within the poll, starting at 0.
    pub position: i32,
    /// Free-form reference to whatever the option was generated from, e.g. a
    /// proposal title.
    pub recommendation: Option<String>,
    pub votes: Vec<Vote>,
}

impl PollOption {
    pub fn new(poll_id: Uuid, content: String, position: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            poll_id,
            content,
            position,
            recommendation: None,
            votes: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "poll_options")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub poll_id: String,
    pub content: String,
    pub position: i32,
    pub recommendation: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::polls::Entity",
        from = "Column::PollId",
        to = "super::polls::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Polls,
    #[sea_orm(has_many = "super::votes::Entity")]
    Votes,
}

impl Related<super::polls::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Polls.def()
    }
}

impl Related<super::votes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&PollOption> for ActiveModel {
    fn from(option: &PollOption) -> Self {
        Self {
            id: ActiveValue::Set(option.id.to_string()),
            poll_id: ActiveValue::Set(option.poll_id.to_string()),
            content: ActiveValue::Set(option.content.clone()),
            position: ActiveValue::Set(option.position),
            recommendation: ActiveValue::Set(option.recommendation.clone()),
        }
    }
}

impl TryFrom<Model> for PollOption {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "poll option")?,
            poll_id: parse_uuid(&model.poll_id, "poll")?,
            content: model.content,
            position: model.position,
            recommendation: model.recommendation,
            votes: Vec::new(),
        })
    }
}
