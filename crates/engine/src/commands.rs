//! Command structs for engine operations.
//!
//! These types group parameters for write operations
//! (trip/expense/activity/update), keeping call sites readable and avoiding
//! long argument lists.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::{Currency, MoneyCents, TripStatus};

/// Create a trip, optionally with its initial roster.
#[derive(Clone, Debug)]
pub struct NewTrip {
    pub name: String,
    pub created_by: String,
    pub currency: Currency,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// `(name, email)` pairs.
    pub participants: Vec<(String, String)>,
    pub created_at: DateTime<Utc>,
}

impl NewTrip {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        created_by: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            created_by: created_by.into(),
            currency: Currency::default(),
            start_date: None,
            end_date: None,
            participants: Vec::new(),
            created_at,
        }
    }

    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    #[must_use]
    pub fn dates(mut self, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self.end_date = Some(end_date);
        self
    }

    #[must_use]
    pub fn participant(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.participants.push((name.into(), email.into()));
        self
    }
}

/// Patch-style trip update. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct TripUpdate {
    pub name: Option<String>,
    pub status: Option<TripStatus>,
    pub final_destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TripUpdate {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: TripStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn final_destination(mut self, destination: impl Into<String>) -> Self {
        self.final_destination = Some(destination.into());
        self
    }

    #[must_use]
    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    #[must_use]
    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.status.is_none()
            && self.final_destination.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

/// Record an expense paid by one participant and split across the roster.
#[derive(Clone, Debug)]
pub struct ExpenseCmd {
    pub trip_id: Uuid,
    pub description: String,
    pub amount: MoneyCents,
    pub currency: Currency,
    pub date: NaiveDate,
    pub paid_by: Uuid,
    pub activity_id: Option<Uuid>,
    /// `(participant_id, owed_amount)` pairs.
    pub splits: Vec<(Uuid, MoneyCents)>,
}

impl ExpenseCmd {
    #[must_use]
    pub fn new(
        trip_id: Uuid,
        description: impl Into<String>,
        amount: MoneyCents,
        date: NaiveDate,
        paid_by: Uuid,
    ) -> Self {
        Self {
            trip_id,
            description: description.into(),
            amount,
            currency: Currency::default(),
            date,
            paid_by,
            activity_id: None,
            splits: Vec::new(),
        }
    }

    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    #[must_use]
    pub fn activity_id(mut self, activity_id: Uuid) -> Self {
        self.activity_id = Some(activity_id);
        self
    }

    #[must_use]
    pub fn split(mut self, participant_id: Uuid, owed_amount: MoneyCents) -> Self {
        self.splits.push((participant_id, owed_amount));
        self
    }

    #[must_use]
    pub fn splits(mut self, splits: impl IntoIterator<Item = (Uuid, MoneyCents)>) -> Self {
        self.splits.extend(splits);
        self
    }
}

/// Schedule an activity on an itinerary day.
#[derive(Clone, Debug)]
pub struct ActivityCmd {
    pub title: String,
    pub notes: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
}

impl ActivityCmd {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            notes: None,
            start_time: None,
            end_time: None,
            location: None,
        }
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn start_time(mut self, time: NaiveTime) -> Self {
        self.start_time = Some(time);
        self
    }

    #[must_use]
    pub fn end_time(mut self, time: NaiveTime) -> Self {
        self.end_time = Some(time);
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}
