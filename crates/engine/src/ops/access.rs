use std::collections::HashMap;

use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseSplit, Participant, ResultEngine, Trip, expense_splits,
    expenses, participants, trips,
};

use super::Engine;

impl Engine {
    pub(super) async fn require_trip(
        &self,
        db: &DatabaseTransaction,
        trip_id: Uuid,
    ) -> ResultEngine<trips::Model> {
        trips::Entity::find_by_id(trip_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("trip not exists".to_string()))
    }

    pub(super) async fn require_participant(
        &self,
        db: &DatabaseTransaction,
        participant_id: Uuid,
    ) -> ResultEngine<participants::Model> {
        participants::Entity::find_by_id(participant_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("participant not exists".to_string()))
    }

    /// Trip with its roster, ordered by name.
    pub(super) async fn load_trip(
        &self,
        db: &DatabaseTransaction,
        trip_id: Uuid,
    ) -> ResultEngine<Trip> {
        let model = self.require_trip(db, trip_id).await?;
        let mut trip = Trip::try_from(model)?;
        trip.participants = participants::Entity::find()
            .filter(participants::Column::TripId.eq(trip_id.to_string()))
            .order_by_asc(participants::Column::Name)
            .order_by_asc(participants::Column::Email)
            .all(db)
            .await?
            .into_iter()
            .map(Participant::try_from)
            .collect::<ResultEngine<_>>()?;
        Ok(trip)
    }

    /// Every expense of the trip with its splits, ordered by date.
    pub(super) async fn load_expenses(
        &self,
        db: &DatabaseTransaction,
        trip_id: Uuid,
    ) -> ResultEngine<Vec<Expense>> {
        let mut expenses = expenses::Entity::find()
            .filter(expenses::Column::TripId.eq(trip_id.to_string()))
            .order_by_asc(expenses::Column::Date)
            .order_by_asc(expenses::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        if expenses.is_empty() {
            return Ok(expenses);
        }

        let expense_ids: Vec<String> = expenses.iter().map(|e| e.id.to_string()).collect();
        let mut splits_by_expense: HashMap<Uuid, Vec<ExpenseSplit>> = HashMap::new();
        let split_models = expense_splits::Entity::find()
            .filter(expense_splits::Column::ExpenseId.is_in(expense_ids))
            .order_by_asc(expense_splits::Column::Id)
            .all(db)
            .await?;
        for model in split_models {
            let split = ExpenseSplit::try_from(model)?;
            splits_by_expense
                .entry(split.expense_id)
                .or_default()
                .push(split);
        }
        for expense in &mut expenses {
            expense.splits = splits_by_expense.remove(&expense.id).unwrap_or_default();
        }
        Ok(expenses)
    }
}
