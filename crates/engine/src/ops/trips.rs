use std::collections::HashSet;

use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, NewTrip, Participant, ResultEngine, Trip, TripUpdate, participants, trips,
    trips::ensure_date_order,
};

use super::{Engine, normalize_email, normalize_optional_text, normalize_required_text, with_tx};

const TRIP_NAME: (usize, usize) = (3, 100);
const PARTICIPANT_NAME: (usize, usize) = (2, 100);

fn normalize_participant(name: &str, email: &str) -> ResultEngine<(String, String)> {
    let (min, max) = PARTICIPANT_NAME;
    let name = normalize_required_text(name, "participant name", min, max)?;
    let email = normalize_email(email)?;
    Ok((name, email))
}

impl Engine {
    /// Create a trip together with its initial roster.
    ///
    /// Repeated emails in the initial roster are kept once.
    pub async fn create_trip(&self, cmd: NewTrip) -> ResultEngine<Trip> {
        let name = normalize_required_text(&cmd.name, "trip name", TRIP_NAME.0, TRIP_NAME.1)?;
        let created_by = normalize_required_text(&cmd.created_by, "creator", 1, 255)?;
        let mut trip = Trip::new(
            name,
            created_by,
            cmd.start_date,
            cmd.end_date,
            cmd.currency,
            cmd.created_at,
        )?;

        let mut seen = HashSet::new();
        for (name, email) in &cmd.participants {
            let (name, email) = normalize_participant(name, email)?;
            if seen.insert(email.clone()) {
                trip.participants.push(Participant::new(trip.id, name, email));
            }
        }
        trip.participants
            .sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.email.cmp(&b.email)));

        let trip_model: trips::ActiveModel = (&trip).into();
        with_tx!(self, |db_tx| {
            trip_model.insert(&db_tx).await?;
            for participant in &trip.participants {
                let model: participants::ActiveModel = participant.into();
                model.insert(&db_tx).await?;
            }
            Ok::<_, EngineError>(())
        })?;

        tracing::info!(
            "created trip {} with {} participants",
            trip.id,
            trip.participants.len()
        );
        Ok(trip)
    }

    /// Return the trip with its roster ordered by name.
    pub async fn trip(&self, trip_id: Uuid) -> ResultEngine<Trip> {
        tracing::debug!("loading trip {trip_id}");
        with_tx!(self, |db_tx| self.load_trip(&db_tx, trip_id).await)
    }

    /// Apply a partial update. Dates are checked against the stored ones.
    pub async fn update_trip(&self, trip_id: Uuid, update: TripUpdate) -> ResultEngine<Trip> {
        let name = update
            .name
            .as_deref()
            .map(|name| normalize_required_text(name, "trip name", TRIP_NAME.0, TRIP_NAME.1))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let mut trip = self.load_trip(&db_tx, trip_id).await?;
            if update.is_empty() {
                return Ok(trip);
            }

            let start_date = update.start_date.or(trip.start_date);
            let end_date = update.end_date.or(trip.end_date);
            ensure_date_order(start_date, end_date)?;

            let mut model = trips::ActiveModel {
                id: ActiveValue::Unchanged(trip_id.to_string()),
                ..Default::default()
            };
            if let Some(name) = name {
                model.name = ActiveValue::Set(name.clone());
                trip.name = name;
            }
            if let Some(status) = update.status {
                model.status = ActiveValue::Set(status.as_str().to_string());
                trip.status = status;
            }
            if let Some(destination) = update.final_destination.as_deref() {
                let destination = normalize_optional_text(Some(destination));
                model.final_destination = ActiveValue::Set(destination.clone());
                trip.final_destination = destination;
            }
            if update.start_date.is_some() {
                model.start_date = ActiveValue::Set(start_date);
                trip.start_date = start_date;
            }
            if update.end_date.is_some() {
                model.end_date = ActiveValue::Set(end_date);
                trip.end_date = end_date;
            }
            model.update(&db_tx).await?;

            tracing::info!("updated trip {trip_id}");
            Ok(trip)
        })
    }

    /// Add somebody to the roster.
    ///
    /// Emails are unique per trip: adding an email already on the roster
    /// returns the existing participant unchanged.
    pub async fn add_participant(
        &self,
        trip_id: Uuid,
        name: &str,
        email: &str,
    ) -> ResultEngine<Participant> {
        let (name, email) = normalize_participant(name, email)?;

        with_tx!(self, |db_tx| {
            self.require_trip(&db_tx, trip_id).await?;

            let existing = participants::Entity::find()
                .filter(participants::Column::TripId.eq(trip_id.to_string()))
                .filter(participants::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?;
            if let Some(model) = existing {
                tracing::debug!("participant {email} already in trip {trip_id}");
                return Participant::try_from(model);
            }

            let participant = Participant::new(trip_id, name, email);
            let model: participants::ActiveModel = (&participant).into();
            model.insert(&db_tx).await?;

            tracing::info!("added participant {} to trip {trip_id}", participant.id);
            Ok(participant)
        })
    }
}
