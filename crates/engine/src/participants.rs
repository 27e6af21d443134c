//! Trip participants.
//!
//! A participant is identified by its id for the ledger and by
//! `(trip_id, email)` for deduplication.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub name: String,
    pub email: String,
}

impl Participant {
    pub fn new(trip_id: Uuid, name: String, email: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            trip_id,
            name,
            email,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "participants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub trip_id: String,
    pub name: String,
    pub email: String,
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
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Participant> for ActiveModel {
    fn from(participant: &Participant) -> Self {
        Self {
            id: ActiveValue::Set(participant.id.to_string()),
            trip_id: ActiveValue::Set(participant.trip_id.to_string()),
            name: ActiveValue::Set(participant.name.clone()),
            email: ActiveValue::Set(participant.email.clone()),
        }
    }
}

impl TryFrom<Model> for Participant {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "participant")?,
            trip_id: parse_uuid(&model.trip_id, "trip")?,
            name: model.name,
            email: model.email,
        })
    }
}
