//! Expenses.
//!
//! An [`Expense`] is paid by one participant and split into
//! [`ExpenseSplit`]s, each one the share a participant owes. The split shares
//! always add up to the expense amount; see [`crate::validate_splits`].

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Currency, EngineError, ExpenseSplit, MoneyCents,
    util::{model_currency, parse_optional_uuid, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub description: String,
    pub amount: MoneyCents,
    pub currency: Currency,
    pub date: NaiveDate,
    pub paid_by: Uuid,
    pub activity_id: Option<Uuid>,
    pub splits: Vec<ExpenseSplit>,
}

impl Expense {
    /// Builds an expense whose splits are attached to it.
    ///
    /// `shares` are `(participant_id, owed_amount)` pairs.
    pub fn new(
        trip_id: Uuid,
        description: String,
        amount: MoneyCents,
        currency: Currency,
        date: NaiveDate,
        paid_by: Uuid,
        shares: &[(Uuid, MoneyCents)],
    ) -> Self {
        let id = Uuid::new_v4();
        let splits = shares
            .iter()
            .map(|(participant_id, owed_amount)| {
                ExpenseSplit::new(id, *participant_id, *owed_amount)
            })
            .collect();
        Self {
            id,
            trip_id,
            description,
            amount,
            currency,
            date,
            paid_by,
            activity_id: None,
            splits,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub trip_id: String,
    pub description: String,
    pub amount_minor: i64,
    pub currency: String,
    pub date: Date,
    pub paid_by_id: String,
    pub activity_id: Option<String>,
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
    #[sea_orm(has_many = "super::expense_splits::Entity")]
    Splits,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl Related<super::expense_splits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Splits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            trip_id: ActiveValue::Set(expense.trip_id.to_string()),
            description: ActiveValue::Set(expense.description.clone()),
            amount_minor: ActiveValue::Set(expense.amount.cents()),
            currency: ActiveValue::Set(expense.currency.code().to_string()),
            date: ActiveValue::Set(expense.date),
            paid_by_id: ActiveValue::Set(expense.paid_by.to_string()),
            activity_id: ActiveValue::Set(expense.activity_id.map(|id| id.to_string())),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            trip_id: parse_uuid(&model.trip_id, "trip")?,
            description: model.description,
            amount: MoneyCents::new(model.amount_minor),
            currency: model_currency(&model.currency)?,
            date: model.date,
            paid_by: parse_uuid(&model.paid_by_id, "participant")?,
            activity_id: parse_optional_uuid(model.activity_id.as_deref(), "activity")?,
            splits: Vec::new(),
        })
    }
}
