//! Ledger engine.
//!
//! Pure functions over already-fetched [`Expense`]s: split validation and net
//! balance computation. Nothing here touches the database.
//!
//! Balances are signed:
//! - positive = the participant fronted more than their share and is owed money
//! - negative = the participant owes money
//!
//! Amounts are integer cents, so accumulation is exact and the output needs no
//! rounding. Accumulation is checked; a balance outside the `i64` range is an
//! error, never a wrap.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Expense, MoneyCents, ResultEngine, Trip};

/// Net position of one participant across a trip's expenses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub participant_id: Uuid,
    pub net_balance: MoneyCents,
}

/// Checks that `owed` adds up to exactly `total`.
///
/// Must be called before anything about the expense is persisted.
///
/// ```rust
/// use engine::{EngineError, MoneyCents, validate_splits};
///
/// let total = MoneyCents::new(30_00);
/// let shares = [MoneyCents::new(10_00); 3];
/// assert!(validate_splits(total, shares).is_ok());
///
/// let err = validate_splits(total, [MoneyCents::new(10_00); 2]).unwrap_err();
/// assert!(matches!(err, EngineError::SplitMismatch { .. }));
/// ```
pub fn validate_splits<I>(total: MoneyCents, owed: I) -> ResultEngine<()>
where
    I: IntoIterator<Item = MoneyCents>,
{
    let actual = MoneyCents::checked_sum(owed)
        .ok_or_else(|| EngineError::InvalidAmount("split total overflows".to_string()))?;
    if actual != total {
        return Err(EngineError::SplitMismatch {
            expected: total,
            actual,
        });
    }
    Ok(())
}

/// Computes each participant's net balance.
///
/// Every split debits its participant by `owed_amount`; every expense credits
/// its payer with the full amount. Participants without any expense activity
/// are absent from the map. Expense order is irrelevant.
///
/// Fails with [`EngineError::InvalidAmount`] if a running balance leaves the
/// `i64` range.
///
/// Callers guarantee that every payer and split participant belongs to the
/// trip; [`compute_trip_balances`] checks it.
pub fn compute_balances(expenses: &[Expense]) -> ResultEngine<HashMap<Uuid, MoneyCents>> {
    let mut balances: HashMap<Uuid, MoneyCents> = HashMap::new();

    for expense in expenses {
        for split in &expense.splits {
            let balance = balances.entry(split.participant_id).or_default();
            *balance = balance
                .checked_sub(split.owed_amount)
                .ok_or_else(|| balance_overflow(split.participant_id))?;
        }
        let balance = balances.entry(expense.paid_by).or_default();
        *balance = balance
            .checked_add(expense.amount)
            .ok_or_else(|| balance_overflow(expense.paid_by))?;
    }

    Ok(balances)
}

fn balance_overflow(participant_id: Uuid) -> EngineError {
    EngineError::InvalidAmount(format!("balance of participant {participant_id} overflows"))
}

/// Roster-checked balances for one trip, in roster order.
///
/// Fails with [`EngineError::UnknownParticipant`] when a payer or split
/// participant is not on `trip.participants`.
pub fn compute_trip_balances(trip: &Trip, expenses: &[Expense]) -> ResultEngine<Vec<Balance>> {
    let roster: HashSet<Uuid> = trip.participants.iter().map(|p| p.id).collect();
    for expense in expenses {
        let involved =
            std::iter::once(expense.paid_by).chain(expense.splits.iter().map(|s| s.participant_id));
        for participant_id in involved {
            if !roster.contains(&participant_id) {
                return Err(EngineError::UnknownParticipant(participant_id));
            }
        }
    }

    let mut balances = compute_balances(expenses)?;
    Ok(trip
        .participants
        .iter()
        .filter_map(|p| {
            balances.remove(&p.id).map(|net_balance| Balance {
                participant_id: p.id,
                net_balance,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::{Currency, Participant};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
    }

    fn cents(v: i64) -> MoneyCents {
        MoneyCents::new(v)
    }

    fn expense(paid_by: Uuid, amount: i64, shares: &[(Uuid, i64)]) -> Expense {
        let shares: Vec<(Uuid, MoneyCents)> =
            shares.iter().map(|(id, owed)| (*id, cents(*owed))).collect();
        Expense::new(
            Uuid::new_v4(),
            "Dinner".to_string(),
            cents(amount),
            Currency::Usd,
            date(),
            paid_by,
            &shares,
        )
    }

    fn ids() -> (Uuid, Uuid, Uuid) {
        (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
    }

    fn trip_with(participants: &[Uuid]) -> Trip {
        let mut trip = Trip::new(
            "Porto".to_string(),
            "alice".to_string(),
            None,
            None,
            Currency::Usd,
            Utc::now(),
        )
        .unwrap();
        trip.participants = participants
            .iter()
            .enumerate()
            .map(|(i, id)| Participant {
                id: *id,
                trip_id: trip.id,
                name: format!("p{i}"),
                email: format!("p{i}@example.com"),
            })
            .collect();
        trip
    }

    #[test]
    fn validate_accepts_exact_sum() {
        assert!(validate_splits(cents(3000), [cents(1000), cents(1000), cents(1000)]).is_ok());
        assert!(validate_splits(cents(1), [cents(1)]).is_ok());
    }

    #[test]
    fn validate_rejects_any_perturbation() {
        let base = [cents(1000), cents(1000), cents(1000)];
        for delta in [-100, -1, 1, 7, 100] {
            let mut shares = base;
            shares[1] = cents(1000 + delta);
            assert_eq!(
                validate_splits(cents(3000), shares).unwrap_err(),
                EngineError::SplitMismatch {
                    expected: cents(3000),
                    actual: cents(3000 + delta),
                }
            );
        }
    }

    #[test]
    fn validate_rejects_empty_splits() {
        assert!(matches!(
            validate_splits(cents(500), []),
            Err(EngineError::SplitMismatch { .. })
        ));
    }

    #[test]
    fn validate_rejects_overflowing_sum() {
        assert!(matches!(
            validate_splits(cents(1), [cents(i64::MAX), cents(i64::MAX)]),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn balances_reject_accumulated_overflow() {
        let (a, b, _) = ids();
        let half = i64::MAX / 2 + 1;
        let expenses = [expense(a, half, &[(b, half)]), expense(a, half, &[(b, half)])];
        for e in &expenses {
            assert!(validate_splits(e.amount, e.splits.iter().map(|s| s.owed_amount)).is_ok());
        }

        assert!(matches!(
            compute_balances(&expenses),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            compute_trip_balances(&trip_with(&[a, b]), &expenses),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn even_three_way_split() {
        let (a, b, c) = ids();
        let balances =
            compute_balances(&[expense(a, 3000, &[(a, 1000), (b, 1000), (c, 1000)])]).unwrap();

        assert_eq!(balances[&a], cents(2000));
        assert_eq!(balances[&b], cents(-1000));
        assert_eq!(balances[&c], cents(-1000));
    }

    #[test]
    fn two_expenses_net_out() {
        let (a, b, c) = ids();
        let expenses = [
            expense(a, 900, &[(a, 300), (b, 300), (c, 300)]),
            expense(b, 600, &[(a, 300), (b, 0), (c, 300)]),
        ];
        let balances = compute_balances(&expenses).unwrap();

        assert_eq!(balances[&a], cents(300));
        assert_eq!(balances[&b], cents(300));
        assert_eq!(balances[&c], cents(-600));
    }

    #[test]
    fn inactive_participants_are_omitted() {
        let (a, b, c) = ids();
        let balances = compute_balances(&[expense(a, 500, &[(a, 250), (b, 250)])]).unwrap();
        assert!(!balances.contains_key(&c));
        assert!(compute_balances(&[]).unwrap().is_empty());
    }

    #[test]
    fn ledger_is_closed_and_order_independent() {
        let (a, b, c) = ids();
        let d = Uuid::new_v4();
        let mut expenses = vec![
            expense(a, 1001, &[(a, 333), (b, 334), (c, 334)]),
            expense(b, 12_345, &[(c, 12_345)]),
            expense(c, 1, &[(d, 1)]),
            expense(d, 9999, &[(a, 2500), (b, 2500), (c, 2500), (d, 2499)]),
            expense(a, 50, &[(a, 50)]),
        ];

        let reference = compute_balances(&expenses).unwrap();
        let total: MoneyCents = reference.values().copied().sum();
        assert_eq!(total, MoneyCents::ZERO);

        expenses.reverse();
        assert_eq!(compute_balances(&expenses).unwrap(), reference);
        for _ in 0..expenses.len() {
            expenses.rotate_left(1);
            assert_eq!(compute_balances(&expenses).unwrap(), reference);
        }
        expenses.swap(0, 3);
        assert_eq!(compute_balances(&expenses).unwrap(), reference);
    }

    #[test]
    fn many_small_expenses_do_not_drift() {
        let (a, b, c) = ids();
        let expenses: Vec<Expense> = (0..1000)
            .map(|_| expense(a, 3, &[(a, 1), (b, 1), (c, 1)]))
            .collect();
        let balances = compute_balances(&expenses).unwrap();
        assert_eq!(balances[&a], cents(2000));
        assert_eq!(balances[&b], cents(-1000));
        assert_eq!(balances[&c], cents(-1000));
    }

    #[test]
    fn trip_balances_follow_roster_order() {
        let (a, b, c) = ids();
        let trip = trip_with(&[c, b, a]);
        let balances = compute_trip_balances(
            &trip,
            &[expense(a, 3000, &[(a, 1000), (b, 1000), (c, 1000)])],
        )
        .unwrap();

        let order: Vec<Uuid> = balances.iter().map(|b| b.participant_id).collect();
        assert_eq!(order, vec![c, b, a]);
        assert_eq!(balances[2].net_balance, cents(2000));
    }

    #[test]
    fn trip_balances_reject_outsiders() {
        let (a, b, outsider) = ids();
        let trip = trip_with(&[a, b]);

        let err = compute_trip_balances(&trip, &[expense(a, 200, &[(a, 100), (outsider, 100)])])
            .unwrap_err();
        assert_eq!(err, EngineError::UnknownParticipant(outsider));

        let err =
            compute_trip_balances(&trip, &[expense(outsider, 200, &[(a, 200)])]).unwrap_err();
        assert_eq!(err, EngineError::UnknownParticipant(outsider));
    }
}
