//! Trips.
//!
//! A [`Trip`] is the container every other record hangs off: its roster of
//! [`Participant`]s, the expense ledger, polls and the itinerary.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Currency, EngineError, Participant, ResultEngine,
    util::{model_currency, parse_uuid},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    #[default]
    Planning,
    Confirmed,
    InProgress,
    Completed,
    Archived,
}

impl TripStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }
}

impl TryFrom<&str> for TripStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "planning" => Ok(Self::Planning),
            "confirmed" => Ok(Self::Confirmed),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            other => Err(EngineError::InvalidInput(format!(
                "invalid trip status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub name: String,
    pub created_by: String,
    pub status: TripStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub final_destination: Option<String>,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
    pub participants: Vec<Participant>,
}

impl Trip {
    pub fn new(
        name: String,
        created_by: String,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        currency: Currency,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        ensure_date_order(start_date, end_date)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            created_by,
            status: TripStatus::Planning,
            start_date,
            end_date,
            final_destination: None,
            currency,
            created_at,
            participants: Vec::new(),
        })
    }

    /// Returns `true` if `participant_id` is on the roster.
    pub fn has_participant(&self, participant_id: Uuid) -> bool {
        self.participants.iter().any(|p| p.id == participant_id)
    }
}

pub(crate) fn ensure_date_order(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> ResultEngine<()> {
    if let (Some(start), Some(end)) = (start_date, end_date)
        && end < start
    {
        return Err(EngineError::InvalidInput(
            "end_date must not be before start_date".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub status: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub final_destination: Option<String>,
    pub currency: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::participants::Entity")]
    Participants,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Trip> for ActiveModel {
    fn from(trip: &Trip) -> Self {
        Self {
            id: ActiveValue::Set(trip.id.to_string()),
            name: ActiveValue::Set(trip.name.clone()),
            created_by: ActiveValue::Set(trip.created_by.clone()),
            status: ActiveValue::Set(trip.status.as_str().to_string()),
            start_date: ActiveValue::Set(trip.start_date),
            end_date: ActiveValue::Set(trip.end_date),
            final_destination: ActiveValue::Set(trip.final_destination.clone()),
            currency: ActiveValue::Set(trip.currency.code().to_string()),
            created_at: ActiveValue::Set(trip.created_at),
        }
    }
}

impl TryFrom<Model> for Trip {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "trip")?,
            name: model.name,
            created_by: model.created_by,
            status: TripStatus::try_from(model.status.as_str())?,
            start_date: model.start_date,
            end_date: model.end_date,
            final_destination: model.final_destination,
            currency: model_currency(&model.currency)?,
            created_at: model.created_at,
            participants: Vec::new(),
        })
    }
}
