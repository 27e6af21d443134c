//! Itinerary days: one per calendar date per trip.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Activity, EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub date: NaiveDate,
    pub title: Option<String>,
    pub activities: Vec<Activity>,
}

impl ItineraryDay {
    pub fn new(trip_id: Uuid, date: NaiveDate, title: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            trip_id,
            date,
            title,
            activities: Vec::new(),
        }
    }

    /// Sorts activities by start time, untimed ones last.
    pub(crate) fn sort_activities(&mut self) {
        self.activities
            .sort_by_key(|activity| (activity.start_time.is_none(), activity.start_time));
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "itinerary_days")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub trip_id: String,
    pub date: Date,
    pub title: Option<String>,
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
    #[sea_orm(has_many = "super::activities::Entity")]
    Activities,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl Related<super::activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ItineraryDay> for ActiveModel {
    fn from(day: &ItineraryDay) -> Self {
        Self {
            id: ActiveValue::Set(day.id.to_string()),
            trip_id: ActiveValue::Set(day.trip_id.to_string()),
            date: ActiveValue::Set(day.date),
            title: ActiveValue::Set(day.title.clone()),
        }
    }
}

impl TryFrom<Model> for ItineraryDay {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "itinerary day")?,
            trip_id: parse_uuid(&model.trip_id, "trip")?,
            date: model.date,
            title: model.title,
            activities: Vec::new(),
        })
    }
}
