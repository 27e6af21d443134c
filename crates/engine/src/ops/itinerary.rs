use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Activity, ActivityCmd, EngineError, ItineraryDay, ResultEngine, activities,
    activities::ensure_time_order, itinerary_days,
};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

impl Engine {
    /// Add a day to the itinerary. A trip has at most one day per date.
    pub async fn add_itinerary_day(
        &self,
        trip_id: Uuid,
        date: NaiveDate,
        title: Option<&str>,
    ) -> ResultEngine<ItineraryDay> {
        let day = ItineraryDay::new(trip_id, date, normalize_optional_text(title));

        with_tx!(self, |db_tx| {
            self.require_trip(&db_tx, trip_id).await?;
            let taken = itinerary_days::Entity::find()
                .filter(itinerary_days::Column::TripId.eq(trip_id.to_string()))
                .filter(itinerary_days::Column::Date.eq(date))
                .one(&db_tx)
                .await?
                .is_some();
            if taken {
                return Err(EngineError::ExistingKey(format!("itinerary day {date}")));
            }

            let model: itinerary_days::ActiveModel = (&day).into();
            model.insert(&db_tx).await?;

            tracing::info!("added itinerary day {date} to trip {trip_id}");
            Ok(day)
        })
    }

    /// Schedule an activity on an existing day.
    pub async fn add_activity(&self, day_id: Uuid, cmd: ActivityCmd) -> ResultEngine<Activity> {
        let title = normalize_required_text(&cmd.title, "activity title", 3, 255)?;
        ensure_time_order(cmd.start_time, cmd.end_time)?;

        let mut activity = Activity::new(day_id, title);
        activity.notes = normalize_optional_text(cmd.notes.as_deref());
        activity.location = normalize_optional_text(cmd.location.as_deref());
        activity.start_time = cmd.start_time;
        activity.end_time = cmd.end_time;

        with_tx!(self, |db_tx| {
            itinerary_days::Entity::find_by_id(day_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("itinerary day not exists".to_string()))?;

            let model: activities::ActiveModel = (&activity).into();
            model.insert(&db_tx).await?;

            tracing::info!("added activity {} to day {day_id}", activity.id);
            Ok(activity)
        })
    }

    /// Days ordered by date; activities ordered by start time, untimed last.
    pub async fn itinerary(&self, trip_id: Uuid) -> ResultEngine<Vec<ItineraryDay>> {
        tracing::debug!("loading itinerary of trip {trip_id}");
        with_tx!(self, |db_tx| {
            self.require_trip(&db_tx, trip_id).await?;
            let mut days = itinerary_days::Entity::find()
                .filter(itinerary_days::Column::TripId.eq(trip_id.to_string()))
                .order_by_asc(itinerary_days::Column::Date)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(ItineraryDay::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            let day_ids: Vec<String> = days.iter().map(|d| d.id.to_string()).collect();
            let mut by_day: HashMap<Uuid, Vec<Activity>> = HashMap::new();
            for model in activities::Entity::find()
                .filter(activities::Column::DayId.is_in(day_ids))
                .order_by_asc(activities::Column::Title)
                .all(&db_tx)
                .await?
            {
                let activity = Activity::try_from(model)?;
                by_day.entry(activity.day_id).or_default().push(activity);
            }
            for day in &mut days {
                day.activities = by_day.remove(&day.id).unwrap_or_default();
                day.sort_activities();
            }
            Ok(days)
        })
    }
}
