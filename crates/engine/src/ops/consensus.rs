use uuid::Uuid;

use crate::{ConsensusReport, ResultEngine, rank_and_select};

use super::Engine;

impl Engine {
    /// Rank itinerary proposals for a trip against its survey responses.
    pub async fn consensus_proposals(&self, trip_id: Uuid) -> ResultEngine<ConsensusReport> {
        let survey = self.trip_survey(trip_id).await?;
        let report = rank_and_select(&survey.trip, &survey.responses);
        tracing::debug!(
            "ranked {} proposals for trip {trip_id} from {} responses",
            report.proposals.len(),
            survey.responses.len()
        );
        Ok(report)
    }
}
