//! Activities scheduled on an itinerary day.

use chrono::NaiveTime;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub day_id: Uuid,
    pub title: String,
    pub notes: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
}

impl Activity {
    pub fn new(day_id: Uuid, title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            day_id,
            title,
            notes: None,
            start_time: None,
            end_time: None,
            location: None,
        }
    }
}

pub(crate) fn ensure_time_order(
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
) -> ResultEngine<()> {
    if let (Some(start), Some(end)) = (start_time, end_time)
        && end < start
    {
        return Err(EngineError::InvalidInput(
            "end_time must not be before start_time".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub day_id: String,
    pub title: String,
    pub notes: Option<String>,
    pub start_time: Option<Time>,
    pub end_time: Option<Time>,
    pub location: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::itinerary_days::Entity",
        from = "Column::DayId",
        to = "super::itinerary_days::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Days,
}

impl Related<super::itinerary_days::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Days.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Activity> for ActiveModel {
    fn from(activity: &Activity) -> Self {
        Self {
            id: ActiveValue::Set(activity.id.to_string()),
            day_id: ActiveValue::Set(activity.day_id.to_string()),
            title: ActiveValue::Set(activity.title.clone()),
            notes: ActiveValue::Set(activity.notes.clone()),
            start_time: ActiveValue::Set(activity.start_time),
            end_time: ActiveValue::Set(activity.end_time),
            location: ActiveValue::Set(activity.location.clone()),
        }
    }
}

impl TryFrom<Model> for Activity {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "activity")?,
            day_id: parse_uuid(&model.day_id, "itinerary day")?,
            title: model.title,
            notes: model.notes,
            start_time: model.start_time,
            end_time: model.end_time,
            location: model.location,
        })
    }
}
