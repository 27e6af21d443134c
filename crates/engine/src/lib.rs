//! PackVote engine.
//!
//! Two pure cores, the expense [`ledger`] and the [`consensus`] scorer, plus
//! the `sea-orm` backed [`Engine`] that loads and stores the trips they work
//! on.

pub use activities::Activity;
pub use commands::{ActivityCmd, ExpenseCmd, NewTrip, TripUpdate};
pub use consensus::{
    ConsensusReport, Pace, ProposalVariant, ScoredProposal, generate_variants, rank_and_select,
    score,
};
pub use currency::Currency;
pub use error::EngineError;
pub use expense_splits::ExpenseSplit;
pub use expenses::Expense;
pub use itinerary_days::ItineraryDay;
pub use ledger::{Balance, compute_balances, compute_trip_balances, validate_splits};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, TripLedger, TripSurvey};
pub use participants::Participant;
pub use poll_options::PollOption;
pub use polls::Poll;
pub use survey_responses::{DateRange, SurveyResponse};
pub use trips::{Trip, TripStatus};
pub use votes::Vote;

mod activities;
mod commands;
pub mod consensus;
mod currency;
mod error;
mod expense_splits;
mod expenses;
mod itinerary_days;
pub mod ledger;
mod money;
mod ops;
mod participants;
mod poll_options;
mod polls;
mod survey_responses;
mod trips;
mod util;
mod votes;

type ResultEngine<T> = Result<T, EngineError>;
