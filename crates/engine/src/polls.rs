//! Polls.
//!
//! A [`Poll`] asks the trip roster a question with at least two
//! [`PollOption`]s. Votes are recorded per option; see [`crate::Vote`].

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, PollOption, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub question: String,
    pub is_active: bool,
    pub allow_multiple_votes: bool,
    pub options: Vec<PollOption>,
}

impl Poll {
    pub fn new(trip_id: Uuid, question: String, allow_multiple_votes: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            trip_id,
            question,
            is_active: true,
            allow_multiple_votes,
            options: Vec::new(),
        }
    }

    /// Options sorted by vote count, most voted first.
    pub fn leading_options(&self) -> Vec<&PollOption> {
        let mut options: Vec<&PollOption> = self.options.iter().collect();
        options.sort_by(|a, b| b.votes.len().cmp(&a.votes.len()));
        options
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "polls")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub trip_id: String,
    pub question: String,
    pub is_active: bool,
    pub allow_multiple_votes: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trips::Entity",
        from = "Column::TripId",
        to = "super::trips::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Trips,
    #[sea_orm(has_many = "super::poll_options::Entity")]
    Options,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl Related<super::poll_options::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Options.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Poll> for ActiveModel {
    fn from(poll: &Poll) -> Self {
        Self {
            id: ActiveValue::Set(poll.id.to_string()),
            trip_id: ActiveValue::Set(poll.trip_id.to_string()),
            question: ActiveValue::Set(poll.question.clone()),
            is_active: ActiveValue::Set(poll.is_active),
            allow_multiple_votes: ActiveValue::Set(poll.allow_multiple_votes),
        }
    }
}

impl TryFrom<Model> for Poll {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "poll")?,
            trip_id: parse_uuid(&model.trip_id, "trip")?,
            question: model.question,
            is_active: model.is_active,
            allow_multiple_votes: model.allow_multiple_votes,
            options: Vec::new(),
        })
    }
}
