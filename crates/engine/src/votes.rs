//! Votes. `(option_id, participant_id)` is unique.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: Uuid,
    pub option_id: Uuid,
    pub participant_id: Uuid,
}

impl Vote {
    pub fn new(option_id: Uuid, participant_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            option_id,
            participant_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "votes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub option_id: String,
    pub participant_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::poll_options::Entity",
        from = "Column::OptionId",
        to = "super::poll_options::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Options,
}

impl Related<super::poll_options::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Options.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Vote> for ActiveModel {
    fn from(vote: &Vote) -> Self {
        Self {
            id: ActiveValue::Set(vote.id.to_string()),
            option_id: ActiveValue::Set(vote.option_id.to_string()),
            participant_id: ActiveValue::Set(vote.participant_id.to_string()),
        }
    }
}

impl TryFrom<Model> for Vote {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "vote")?,
            option_id: parse_uuid(&model.option_id, "poll option")?,
            participant_id: parse_uuid(&model.participant_id, "participant")?,
        })
    }
}
