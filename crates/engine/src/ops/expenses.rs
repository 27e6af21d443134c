use std::collections::HashSet;

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    Balance, EngineError, Expense, ExpenseCmd, ExpenseSplit, ResultEngine, Trip, activities,
    compute_trip_balances, expense_splits, expenses, itinerary_days, util::ensure_trip_currency,
    validate_splits,
};

use super::{Engine, normalize_required_text, with_tx};

/// A trip with its full expense ledger.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TripLedger {
    pub trip: Trip,
    pub expenses: Vec<Expense>,
}

/// Checks everything about an expense that needs no database access.
fn validate_expense_cmd(cmd: &ExpenseCmd) -> ResultEngine<String> {
    let description = normalize_required_text(&cmd.description, "expense description", 3, 255)?;
    if !cmd.amount.is_positive() {
        return Err(EngineError::InvalidAmount(
            "expense amount must be > 0".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for (participant_id, owed) in &cmd.splits {
        if !owed.is_positive() {
            return Err(EngineError::InvalidAmount(format!(
                "split of participant {participant_id} must be > 0"
            )));
        }
        if !seen.insert(*participant_id) {
            return Err(EngineError::InvalidInput(format!(
                "participant {participant_id} appears twice in the splits"
            )));
        }
    }
    validate_splits(cmd.amount, cmd.splits.iter().map(|(_, owed)| *owed))?;
    Ok(description)
}

impl Engine {
    async fn require_activity_in_trip(
        &self,
        db: &DatabaseTransaction,
        trip_id: Uuid,
        activity_id: Uuid,
    ) -> ResultEngine<()> {
        let day_id = activities::Entity::find_by_id(activity_id.to_string())
            .one(db)
            .await?
            .map(|activity| activity.day_id);
        let in_trip = match day_id {
            Some(day_id) => itinerary_days::Entity::find_by_id(day_id)
                .filter(itinerary_days::Column::TripId.eq(trip_id.to_string()))
                .one(db)
                .await?
                .is_some(),
            None => false,
        };
        if !in_trip {
            return Err(EngineError::KeyNotFound("activity not exists".to_string()));
        }
        Ok(())
    }

    /// Record an expense and its splits.
    ///
    /// The split sum is checked before the database is touched; everything
    /// else (trip, currency, roster, activity) inside the same DB transaction
    /// that writes the rows, so either the expense and all of its splits are
    /// stored or nothing is.
    pub async fn create_expense(&self, cmd: ExpenseCmd) -> ResultEngine<Expense> {
        let description = match validate_expense_cmd(&cmd) {
            Ok(description) => description,
            Err(err) => {
                tracing::warn!("rejected expense for trip {}: {err}", cmd.trip_id);
                return Err(err);
            }
        };

        with_tx!(self, |db_tx| {
            let trip = self.load_trip(&db_tx, cmd.trip_id).await?;
            ensure_trip_currency(trip.currency, cmd.currency)?;
            let outsider = std::iter::once(cmd.paid_by)
                .chain(cmd.splits.iter().map(|(participant_id, _)| *participant_id))
                .find(|id| !trip.has_participant(*id));
            if let Some(participant_id) = outsider {
                tracing::warn!(
                    "rejected expense for trip {}: {participant_id} is not on the roster",
                    trip.id
                );
                return Err(EngineError::UnknownParticipant(participant_id));
            }
            if let Some(activity_id) = cmd.activity_id {
                self.require_activity_in_trip(&db_tx, trip.id, activity_id)
                    .await?;
            }

            let mut expense = Expense::new(
                trip.id,
                description,
                cmd.amount,
                cmd.currency,
                cmd.date,
                cmd.paid_by,
                &cmd.splits,
            );
            expense.activity_id = cmd.activity_id;

            let expense_model: expenses::ActiveModel = (&expense).into();
            expense_model.insert(&db_tx).await?;
            for split in &expense.splits {
                let split_model: expense_splits::ActiveModel = split.into();
                split_model.insert(&db_tx).await?;
            }

            tracing::info!(
                "recorded expense {} of {} in trip {} split {} ways",
                expense.id,
                expense.amount,
                trip.id,
                expense.splits.len()
            );
            Ok(expense)
        })
    }

    /// Fetch the trip with every expense and split.
    pub async fn trip_ledger(&self, trip_id: Uuid) -> ResultEngine<TripLedger> {
        tracing::debug!("loading ledger of trip {trip_id}");
        with_tx!(self, |db_tx| {
            let trip = self.load_trip(&db_tx, trip_id).await?;
            let expenses = self.load_expenses(&db_tx, trip_id).await?;
            Ok(TripLedger { trip, expenses })
        })
    }

    /// Net balance of every roster member with ledger activity.
    pub async fn trip_balances(&self, trip_id: Uuid) -> ResultEngine<Vec<Balance>> {
        let ledger = self.trip_ledger(trip_id).await?;
        compute_trip_balances(&ledger.trip, &ledger.expenses)
    }

    /// Mark a split as settled. Balances are not affected.
    pub async fn settle_split(&self, trip_id: Uuid, split_id: Uuid) -> ResultEngine<ExpenseSplit> {
        with_tx!(self, |db_tx| {
            let split_model = expense_splits::Entity::find_by_id(split_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("split not exists".to_string()))?;
            let in_trip = expenses::Entity::find_by_id(split_model.expense_id.clone())
                .filter(expenses::Column::TripId.eq(trip_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if !in_trip {
                return Err(EngineError::KeyNotFound("split not exists".to_string()));
            }

            let mut split = ExpenseSplit::try_from(split_model)?;
            if !split.settled {
                let model = expense_splits::ActiveModel {
                    id: ActiveValue::Unchanged(split_id.to_string()),
                    is_settled: ActiveValue::Set(true),
                    ..Default::default()
                };
                model.update(&db_tx).await?;
                split.settled = true;
                tracing::info!("settled split {split_id} of trip {trip_id}");
            }
            Ok(split)
        })
    }

    /// Delete an expense and its splits.
    pub async fn delete_expense(&self, trip_id: Uuid, expense_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let exists = expenses::Entity::find_by_id(expense_id.to_string())
                .filter(expenses::Column::TripId.eq(trip_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if !exists {
                return Err(EngineError::KeyNotFound("expense not exists".to_string()));
            }

            expense_splits::Entity::delete_many()
                .filter(expense_splits::Column::ExpenseId.eq(expense_id.to_string()))
                .exec(&db_tx)
                .await?;
            expenses::Entity::delete_by_id(expense_id.to_string())
                .exec(&db_tx)
                .await?;

            tracing::info!("deleted expense {expense_id} of trip {trip_id}");
            Ok(())
        })
    }
}
