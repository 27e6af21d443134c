use std::collections::HashMap;

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Poll, PollOption, ResultEngine, Vote, poll_options, polls, votes,
};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

impl Engine {
    async fn load_poll(&self, db: &DatabaseTransaction, poll_id: Uuid) -> ResultEngine<Poll> {
        let model = polls::Entity::find_by_id(poll_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("poll not exists".to_string()))?;
        let mut poll = Poll::try_from(model)?;

        poll.options = poll_options::Entity::find()
            .filter(poll_options::Column::PollId.eq(poll_id.to_string()))
            .order_by_asc(poll_options::Column::Position)
            .all(db)
            .await?
            .into_iter()
            .map(PollOption::try_from)
            .collect::<ResultEngine<_>>()?;

        let option_ids: Vec<String> = poll.options.iter().map(|o| o.id.to_string()).collect();
        let mut votes_by_option: HashMap<Uuid, Vec<Vote>> = HashMap::new();
        for model in votes::Entity::find()
            .filter(votes::Column::OptionId.is_in(option_ids))
            .order_by_asc(votes::Column::Id)
            .all(db)
            .await?
        {
            let vote = Vote::try_from(model)?;
            votes_by_option.entry(vote.option_id).or_default().push(vote);
        }
        for option in &mut poll.options {
            option.votes = votes_by_option.remove(&option.id).unwrap_or_default();
        }
        Ok(poll)
    }

    /// Open a poll for the trip roster.
    ///
    /// Blank options are ignored; at least two must remain.
    pub async fn create_poll<S: AsRef<str>>(
        &self,
        trip_id: Uuid,
        question: &str,
        options: &[S],
        allow_multiple_votes: bool,
    ) -> ResultEngine<Poll> {
        let question = normalize_required_text(question, "poll question", 5, 255)?;
        let contents: Vec<String> = options
            .iter()
            .filter_map(|option| normalize_optional_text(Some(option.as_ref())))
            .collect();
        if contents.len() < 2 {
            return Err(EngineError::InvalidInput(
                "a poll needs at least two options".to_string(),
            ));
        }

        let mut poll = Poll::new(trip_id, question, allow_multiple_votes);
        let mut position = 0;
        for content in contents {
            poll.options.push(PollOption::new(poll.id, content, position));
            position += 1;
        }

        with_tx!(self, |db_tx| {
            self.require_trip(&db_tx, trip_id).await?;
            let poll_model: polls::ActiveModel = (&poll).into();
            poll_model.insert(&db_tx).await?;
            for option in &poll.options {
                let option_model: poll_options::ActiveModel = option.into();
                option_model.insert(&db_tx).await?;
            }

            tracing::info!(
                "opened poll {} in trip {trip_id} with {} options",
                poll.id,
                poll.options.len()
            );
            Ok(poll)
        })
    }

    /// Record a participant's vote for an option.
    pub async fn cast_vote(&self, option_id: Uuid, participant_id: Uuid) -> ResultEngine<Vote> {
        with_tx!(self, |db_tx| {
            let option = poll_options::Entity::find_by_id(option_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("poll option not exists".to_string()))?;
            let poll = polls::Entity::find_by_id(option.poll_id.clone())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("poll not exists".to_string()))?;
            if !poll.is_active {
                return Err(EngineError::InvalidInput("poll is closed".to_string()));
            }
            let participant = self.require_participant(&db_tx, participant_id).await?;
            if participant.trip_id != poll.trip_id {
                return Err(EngineError::UnknownParticipant(participant_id));
            }

            let mut existing = votes::Entity::find()
                .filter(votes::Column::ParticipantId.eq(participant_id.to_string()));
            existing = if poll.allow_multiple_votes {
                existing.filter(votes::Column::OptionId.eq(option_id.to_string()))
            } else {
                let poll_option_ids: Vec<String> = poll_options::Entity::find()
                    .filter(poll_options::Column::PollId.eq(poll.id.clone()))
                    .all(&db_tx)
                    .await?
                    .into_iter()
                    .map(|o| o.id)
                    .collect();
                existing.filter(votes::Column::OptionId.is_in(poll_option_ids))
            };
            if existing.one(&db_tx).await?.is_some() {
                return Err(EngineError::ExistingKey(format!(
                    "vote of participant {participant_id}"
                )));
            }

            let vote = Vote::new(option_id, participant_id);
            let model: votes::ActiveModel = (&vote).into();
            model.insert(&db_tx).await?;

            tracing::info!("participant {participant_id} voted option {option_id}");
            Ok(vote)
        })
    }

    /// Stop accepting votes.
    pub async fn close_poll(&self, poll_id: Uuid) -> ResultEngine<Poll> {
        with_tx!(self, |db_tx| {
            let mut poll = self.load_poll(&db_tx, poll_id).await?;
            if poll.is_active {
                let model = polls::ActiveModel {
                    id: ActiveValue::Unchanged(poll_id.to_string()),
                    is_active: ActiveValue::Set(false),
                    ..Default::default()
                };
                model.update(&db_tx).await?;
                poll.is_active = false;
                tracing::info!("closed poll {poll_id}");
            }
            Ok(poll)
        })
    }

    /// Poll with its options, in creation order, and their votes.
    pub async fn poll(&self, poll_id: Uuid) -> ResultEngine<Poll> {
        tracing::debug!("loading poll {poll_id}");
        with_tx!(self, |db_tx| self.load_poll(&db_tx, poll_id).await)
    }
}
