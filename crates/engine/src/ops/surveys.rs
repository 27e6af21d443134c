use std::collections::HashMap;

use sea_orm::{QueryFilter, TransactionTrait, prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{ResultEngine, SurveyResponse, Trip, survey_responses};

use super::{Engine, normalize_optional_text, with_tx};

/// A trip with the survey responses of its roster, in roster order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TripSurvey {
    pub trip: Trip,
    pub responses: Vec<SurveyResponse>,
}

impl Engine {
    /// Store the survey response of a participant, replacing any previous one.
    pub async fn submit_survey(
        &self,
        participant_id: Uuid,
        response: SurveyResponse,
    ) -> ResultEngine<SurveyResponse> {
        let response = SurveyResponse {
            participant_id,
            vibe: normalize_optional_text(response.vibe.as_deref()),
            dealbreakers: normalize_optional_text(response.dealbreakers.as_deref()),
            ..response
        };
        response.validate()?;
        let model = survey_responses::ActiveModel::try_from(&response)?;

        with_tx!(self, |db_tx| {
            self.require_participant(&db_tx, participant_id).await?;
            survey_responses::Entity::delete_by_id(participant_id.to_string())
                .exec(&db_tx)
                .await?;
            model.insert(&db_tx).await?;

            tracing::info!("stored survey response of participant {participant_id}");
            Ok(response)
        })
    }

    /// Fetch the trip with every survey response submitted by its roster.
    pub async fn trip_survey(&self, trip_id: Uuid) -> ResultEngine<TripSurvey> {
        tracing::debug!("loading survey of trip {trip_id}");
        with_tx!(self, |db_tx| {
            let trip = self.load_trip(&db_tx, trip_id).await?;
            let participant_ids: Vec<String> =
                trip.participants.iter().map(|p| p.id.to_string()).collect();

            let mut by_participant = HashMap::new();
            for model in survey_responses::Entity::find()
                .filter(survey_responses::Column::ParticipantId.is_in(participant_ids))
                .all(&db_tx)
                .await?
            {
                let response = SurveyResponse::try_from(model)?;
                by_participant.insert(response.participant_id, response);
            }
            let responses = trip
                .participants
                .iter()
                .filter_map(|p| by_participant.remove(&p.id))
                .collect();

            Ok(TripSurvey { trip, responses })
        })
    }
}
