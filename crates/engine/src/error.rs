//! The module contains the errors the engine can throw.
//!
//! Two kinds belong to the ledger core itself:
//!
//! - [`SplitMismatch`] thrown when the declared splits of an expense do not
//!   add up to its amount. Nothing is persisted when it is raised.
//! - [`UnknownParticipant`] thrown when a payer or split references somebody
//!   outside the trip roster.
//!
//! The remaining variants come from the persistence layer.
//!
//!  [`SplitMismatch`]: EngineError::SplitMismatch
//!  [`UnknownParticipant`]: EngineError::UnknownParticipant
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::MoneyCents;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Split mismatch: splits sum to {actual}, expense amount is {expected}")]
    SplitMismatch {
        expected: MoneyCents,
        actual: MoneyCents,
    },
    #[error("Participant {0} is not part of the trip")]
    UnknownParticipant(Uuid),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Currency mismatch: {0}")]
    CurrencyMismatch(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::SplitMismatch {
                    expected: a_expected,
                    actual: a_actual,
                },
                Self::SplitMismatch {
                    expected: b_expected,
                    actual: b_actual,
                },
            ) => a_expected == b_expected && a_actual == b_actual,
            (Self::UnknownParticipant(a), Self::UnknownParticipant(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::CurrencyMismatch(a), Self::CurrencyMismatch(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
