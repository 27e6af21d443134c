//! Survey responses: one per participant, read by the compatibility scorer.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine, util::parse_uuid};

/// An inclusive range of dates a participant is available.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub participant_id: Uuid,
    pub budget: Option<MoneyCents>,
    pub vibe: Option<String>,
    pub dealbreakers: Option<String>,
    pub available_dates: Vec<DateRange>,
}

impl SurveyResponse {
    pub fn new(participant_id: Uuid) -> Self {
        Self {
            participant_id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn budget(mut self, budget: MoneyCents) -> Self {
        self.budget = Some(budget);
        self
    }

    #[must_use]
    pub fn vibe(mut self, vibe: impl Into<String>) -> Self {
        self.vibe = Some(vibe.into());
        self
    }

    /// The budget, if it is usable for scoring (strictly positive).
    pub fn usable_budget(&self) -> Option<MoneyCents> {
        self.budget.filter(|b| b.is_positive())
    }

    /// The vibe text, if non-empty. Whitespace-only text still counts: it
    /// qualifies for the vibe and pace sub-scores and matches nothing.
    pub fn vibe_text(&self) -> Option<&str> {
        self.vibe.as_deref().filter(|v| !v.is_empty())
    }

    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if let Some(budget) = self.budget
            && budget.is_negative()
        {
            return Err(EngineError::InvalidAmount(
                "budget must be >= 0".to_string(),
            ));
        }
        if let Some(range) = self.available_dates.iter().find(|r| r.end < r.start) {
            return Err(EngineError::InvalidInput(format!(
                "available date range {} .. {} is inverted",
                range.start, range.end
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "survey_responses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub participant_id: String,
    pub budget_minor: Option<i64>,
    pub vibe: Option<String>,
    pub dealbreakers: Option<String>,
    pub available_dates: Option<Json>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::participants::Entity",
        from = "Column::ParticipantId",
        to = "super::participants::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Participants,
}

impl Related<super::participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&SurveyResponse> for ActiveModel {
    type Error = EngineError;

    fn try_from(response: &SurveyResponse) -> Result<Self, Self::Error> {
        let available_dates = if response.available_dates.is_empty() {
            None
        } else {
            Some(serde_json::to_value(&response.available_dates).map_err(|err| {
                EngineError::InvalidInput(format!("invalid available dates: {err}"))
            })?)
        };
        Ok(Self {
            participant_id: ActiveValue::Set(response.participant_id.to_string()),
            budget_minor: ActiveValue::Set(response.budget.map(MoneyCents::cents)),
            vibe: ActiveValue::Set(response.vibe.clone()),
            dealbreakers: ActiveValue::Set(response.dealbreakers.clone()),
            available_dates: ActiveValue::Set(available_dates),
        })
    }
}

impl TryFrom<Model> for SurveyResponse {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let available_dates = match model.available_dates {
            Some(value) => serde_json::from_value(value).map_err(|err| {
                EngineError::InvalidInput(format!("invalid stored available dates: {err}"))
            })?,
            None => Vec::new(),
        };
        Ok(Self {
            participant_id: parse_uuid(&model.participant_id, "participant")?,
            budget: model.budget_minor.map(MoneyCents::new),
            vibe: model.vibe,
            dealbreakers: model.dealbreakers,
            available_dates,
        })
    }
}
