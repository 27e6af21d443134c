//! Expense splits: the share of an expense owed by one participant.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSplit {
    pub id: Uuid,
    pub expense_id: Uuid,
    pub participant_id: Uuid,
    pub owed_amount: MoneyCents,
    pub settled: bool,
}

impl ExpenseSplit {
    pub fn new(expense_id: Uuid, participant_id: Uuid, owed_amount: MoneyCents) -> Self {
        Self {
            id: Uuid::new_v4(),
            expense_id,
            participant_id,
            owed_amount,
            settled: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expense_splits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub expense_id: String,
    pub participant_id: String,
    pub owed_amount_minor: i64,
    pub is_settled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Expenses,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ExpenseSplit> for ActiveModel {
    fn from(split: &ExpenseSplit) -> Self {
        Self {
            id: ActiveValue::Set(split.id.to_string()),
            expense_id: ActiveValue::Set(split.expense_id.to_string()),
            participant_id: ActiveValue::Set(split.participant_id.to_string()),
            owed_amount_minor: ActiveValue::Set(split.owed_amount.cents()),
            is_settled: ActiveValue::Set(split.settled),
        }
    }
}

impl TryFrom<Model> for ExpenseSplit {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "split")?,
            expense_id: parse_uuid(&model.expense_id, "expense")?,
            participant_id: parse_uuid(&model.participant_id, "participant")?,
            owed_amount: MoneyCents::new(model.owed_amount_minor),
            settled: model.is_settled,
        })
    }
}
