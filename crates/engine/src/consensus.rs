//! Compatibility scorer.
//!
//! Generates a handful of itinerary proposal variants for a trip and scores
//! each one 0-100 against the group's survey responses. Three sub-scores are
//! blended:
//!
//! | sub-score | weight | needs                                               |
//! |-----------|--------|-----------------------------------------------------|
//! | budget    | 0.4    | proposal budget > 0 and a response with budget > 0  |
//! | vibe      | 0.4    | proposal vibe tokens and a response with vibe text  |
//! | pace      | 0.2    | a response with vibe text                           |
//!
//! Only sub-scores with qualifying data contribute; the weighted sum is divided
//! by the weights actually applied. With no qualifying data at all the score
//! is [`NEUTRAL_SCORE`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{MoneyCents, SurveyResponse, Trip};

pub const NEUTRAL_SCORE: f64 = 50.0;
pub const BUDGET_WEIGHT: f64 = 0.4;
pub const VIBE_WEIGHT: f64 = 0.4;
pub const PACE_WEIGHT: f64 = 0.2;

/// Average budget assumed when nobody gave a usable one.
pub const DEFAULT_AVERAGE_BUDGET: f64 = 1000.0;
/// Minimum average budget for the premium variant.
pub const PREMIUM_THRESHOLD: f64 = 1500.0;
pub const MAX_PROPOSALS: usize = 3;

const DEFAULT_DESTINATION: &str = "an exciting location";
const DEFAULT_BALANCED_VIBE: &str = "adventure culture exploration";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    Relaxed,
    #[default]
    Moderate,
    Packed,
}

impl Pace {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relaxed => "relaxed",
            Self::Moderate => "moderate",
            Self::Packed => "packed",
        }
    }

    fn ordinal(self) -> f64 {
        match self {
            Self::Relaxed => 1.0,
            Self::Moderate => 2.0,
            Self::Packed => 3.0,
        }
    }

    /// Infers the pace a respondent prefers from keywords in their vibe text.
    pub fn inferred_from(vibe: &str) -> Self {
        let vibe = vibe.to_lowercase();
        if vibe.contains("relax") || vibe.contains("chill") {
            Self::Relaxed
        } else if ["adventure", "active", "packed"]
            .iter()
            .any(|keyword| vibe.contains(keyword))
        {
            Self::Packed
        } else {
            Self::Moderate
        }
    }
}

/// A generated, not yet scored, itinerary candidate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProposalVariant {
    pub title: String,
    pub description: String,
    /// Major units; kept unrounded for scoring.
    pub estimated_budget: f64,
    pub pace: Pace,
    pub vibe: String,
    pub activities: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredProposal {
    pub title: String,
    pub description: String,
    pub score: f64,
    pub justification: String,
    pub estimated_budget: MoneyCents,
    pub pace: Pace,
    pub activities: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsensusReport {
    pub proposals: Vec<ScoredProposal>,
    pub group_size: usize,
    pub average_budget: Option<MoneyCents>,
}

fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn budget_subscore(proposal: &ProposalVariant, responses: &[SurveyResponse]) -> Option<f64> {
    let proposal_budget = proposal.estimated_budget;
    if proposal_budget <= 0.0 {
        return None;
    }
    let matches: Vec<f64> = responses
        .iter()
        .filter_map(SurveyResponse::usable_budget)
        .map(|budget| {
            let budget = budget.to_major();
            let max = budget.max(proposal_budget);
            1.0 - (budget - proposal_budget).abs() / max
        })
        .collect();
    mean(&matches).map(|m| m * 100.0)
}

fn vibe_subscore(proposal: &ProposalVariant, responses: &[SurveyResponse]) -> Option<f64> {
    let proposal_tokens = tokens(&proposal.vibe);
    if proposal_tokens.is_empty() {
        return None;
    }
    let proposal_set: HashSet<&str> = proposal_tokens.iter().map(String::as_str).collect();
    let matches: Vec<f64> = responses
        .iter()
        .filter_map(SurveyResponse::vibe_text)
        .map(|vibe| {
            let response_tokens = tokens(vibe);
            let response_set: HashSet<&str> = response_tokens.iter().map(String::as_str).collect();
            let common = proposal_set.intersection(&response_set).count();
            common as f64 / proposal_tokens.len().max(1) as f64
        })
        .collect();
    mean(&matches).map(|m| m * 100.0)
}

fn pace_subscore(proposal: &ProposalVariant, responses: &[SurveyResponse]) -> Option<f64> {
    let target = proposal.pace.ordinal();
    let matches: Vec<f64> = responses
        .iter()
        .filter_map(SurveyResponse::vibe_text)
        .map(|vibe| 1.0 - (Pace::inferred_from(vibe).ordinal() - target).abs() / 2.0)
        .collect();
    mean(&matches).map(|m| m * 100.0)
}

/// Scores `proposal` against the group, in `[0, 100]`.
pub fn score(proposal: &ProposalVariant, responses: &[SurveyResponse]) -> f64 {
    if responses.is_empty() {
        return NEUTRAL_SCORE;
    }

    let weighted = [
        (budget_subscore(proposal, responses), BUDGET_WEIGHT),
        (vibe_subscore(proposal, responses), VIBE_WEIGHT),
        (pace_subscore(proposal, responses), PACE_WEIGHT),
    ];

    let (total, applied) = weighted
        .iter()
        .filter_map(|(sub, weight)| sub.map(|s| (s * weight, *weight)))
        .fold((0.0, 0.0), |(total, applied), (s, w)| {
            (total + s, applied + w)
        });

    if applied <= 0.0 {
        return NEUTRAL_SCORE;
    }
    (total / applied).clamp(0.0, 100.0)
}

/// Mean of the usable budgets in major units, unrounded.
fn average_budget_major(responses: &[SurveyResponse]) -> Option<f64> {
    let budgets: Vec<f64> = responses
        .iter()
        .filter_map(SurveyResponse::usable_budget)
        .map(MoneyCents::to_major)
        .collect();
    mean(&budgets)
}

/// Mean of the usable budgets rounded half-up to cents.
pub fn average_budget(responses: &[SurveyResponse]) -> Option<MoneyCents> {
    let budgets: Vec<MoneyCents> = responses
        .iter()
        .filter_map(SurveyResponse::usable_budget)
        .collect();
    MoneyCents::mean_rounded(&budgets)
}

/// Generates two or three proposal variants, in a fixed order: budget,
/// balanced and, for groups averaging at least [`PREMIUM_THRESHOLD`], premium.
pub fn generate_variants(
    destination: Option<&str>,
    responses: &[SurveyResponse],
) -> Vec<ProposalVariant> {
    let avg_budget = average_budget_major(responses).unwrap_or(DEFAULT_AVERAGE_BUDGET);
    let destination = destination
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_DESTINATION);

    let combined_vibes = responses
        .iter()
        .filter_map(SurveyResponse::vibe_text)
        .collect::<Vec<_>>()
        .join(" ");

    let mut variants = vec![
        ProposalVariant {
            title: format!("Budget-Friendly {destination} Adventure"),
            description: format!(
                "A cost-effective trip to {destination} focusing on free activities, local experiences, and budget accommodations."
            ),
            estimated_budget: avg_budget * 0.7,
            pace: Pace::Relaxed,
            vibe: "budget affordable local authentic".to_string(),
            activities: vec![
                "Free walking tours and local markets".to_string(),
                "Affordable local restaurants".to_string(),
                "Self-guided exploration".to_string(),
                "Budget-friendly accommodations".to_string(),
            ],
        },
        ProposalVariant {
            title: format!("Balanced {destination} Experience"),
            description: format!(
                "A well-rounded trip to {destination} balancing popular attractions with authentic experiences."
            ),
            estimated_budget: avg_budget,
            pace: Pace::Moderate,
            vibe: if combined_vibes.is_empty() {
                DEFAULT_BALANCED_VIBE.to_string()
            } else {
                combined_vibes
            },
            activities: vec![
                "Top-rated attractions and landmarks".to_string(),
                "Mix of guided tours and free time".to_string(),
                "Variety of dining experiences".to_string(),
                "Comfortable mid-range accommodations".to_string(),
            ],
        },
    ];

    if avg_budget >= PREMIUM_THRESHOLD {
        variants.push(ProposalVariant {
            title: format!("Premium {destination} Getaway"),
            description: format!(
                "An upscale, activity-packed journey through {destination} with curated experiences and premium services."
            ),
            estimated_budget: avg_budget * 1.3,
            pace: Pace::Packed,
            vibe: "luxury adventure premium exclusive".to_string(),
            activities: vec![
                "Private guided tours".to_string(),
                "Fine dining experiences".to_string(),
                "Exclusive activities and events".to_string(),
                "Premium accommodations with amenities".to_string(),
            ],
        });
    }

    variants
}

/// Generates, scores and ranks proposals for `trip`, keeping the best
/// [`MAX_PROPOSALS`]. Ties keep generation order.
pub fn rank_and_select(trip: &Trip, responses: &[SurveyResponse]) -> ConsensusReport {
    let mut proposals: Vec<ScoredProposal> =
        generate_variants(trip.final_destination.as_deref(), responses)
            .into_iter()
            .map(|variant| {
                let score = score(&variant, responses);
                ScoredProposal {
                    justification: format!(
                        "This proposal scores {score:.1}/100 based on group budget preferences, activity interests, and preferred pace."
                    ),
                    estimated_budget: MoneyCents::from_major_rounded(variant.estimated_budget),
                    title: variant.title,
                    description: variant.description,
                    score,
                    pace: variant.pace,
                    activities: variant.activities,
                }
            })
            .collect();

    proposals.sort_by(|a, b| b.score.total_cmp(&a.score));
    proposals.truncate(MAX_PROPOSALS);

    ConsensusReport {
        proposals,
        group_size: trip.participants.len(),
        average_budget: average_budget(responses),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::{Currency, Participant};

    fn respondent() -> SurveyResponse {
        SurveyResponse::new(Uuid::new_v4())
    }

    fn dollars(v: i64) -> MoneyCents {
        MoneyCents::new(v * 100)
    }

    fn proposal(budget: f64, pace: Pace, vibe: &str) -> ProposalVariant {
        ProposalVariant {
            title: "Test".to_string(),
            description: String::new(),
            estimated_budget: budget,
            pace,
            vibe: vibe.to_string(),
            activities: Vec::new(),
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn trip(destination: Option<&str>, participants: usize) -> Trip {
        let mut trip = Trip::new(
            "Summer".to_string(),
            "alice".to_string(),
            None,
            None,
            Currency::Usd,
            Utc::now(),
        )
        .unwrap();
        trip.final_destination = destination.map(ToString::to_string);
        trip.participants = (0..participants)
            .map(|i| Participant::new(trip.id, format!("p{i}"), format!("p{i}@example.com")))
            .collect();
        trip
    }

    #[test]
    fn no_responses_is_neutral() {
        assert_eq!(score(&proposal(1000.0, Pace::Packed, "beach"), &[]), 50.0);
    }

    #[test]
    fn no_qualifying_data_is_neutral() {
        // Responses exist, but nobody gave a budget or a vibe.
        let responses = [respondent(), respondent().budget(MoneyCents::ZERO)];
        assert_eq!(score(&proposal(1000.0, Pace::Moderate, "beach"), &responses), 50.0);
    }

    #[test]
    fn budget_only_renormalizes_to_budget_weight() {
        let responses = [
            respondent().budget(dollars(1000)),
            respondent().budget(dollars(1000)),
        ];
        let p = proposal(1000.0, Pace::Packed, "beach sun");
        assert_close(budget_subscore(&p, &responses).unwrap(), 100.0);
        assert_eq!(pace_subscore(&p, &responses), None);
        assert_close(score(&p, &responses), 100.0);
    }

    #[test]
    fn budget_match_is_relative_to_larger_budget() {
        let responses = [
            respondent().budget(dollars(500)),
            respondent().budget(dollars(2000)),
        ];
        // 1 - 500/1000 = 0.5 ; 1 - 1000/2000 = 0.5
        let p = proposal(1000.0, Pace::Moderate, "");
        assert_close(score(&p, &responses), 50.0);

        let responses = [respondent().budget(dollars(800))];
        // 1 - 200/1000 = 0.8
        assert_close(score(&p, &responses), 80.0);
    }

    #[test]
    fn zero_budget_proposal_skips_budget() {
        let responses = [respondent().budget(dollars(1000)).vibe("museums")];
        let p = proposal(0.0, Pace::Moderate, "museums");
        assert_eq!(budget_subscore(&p, &responses), None);
        // vibe 100 (w 0.4) + pace 100 (w 0.2) -> 100
        assert_close(score(&p, &responses), 100.0);
    }

    #[test]
    fn blank_vibe_still_counts_for_vibe_and_pace() {
        let responses = [respondent().budget(dollars(1000)).vibe("   ")];
        let p = proposal(1000.0, Pace::Packed, "beach");
        assert_close(vibe_subscore(&p, &responses).unwrap(), 0.0);
        // blank infers moderate: 1 - 1/2 = 0.5
        assert_close(pace_subscore(&p, &responses).unwrap(), 50.0);
        // budget 100 (w 0.4) + vibe 0 (w 0.4) + pace 50 (w 0.2) -> 50
        assert_close(score(&p, &responses), 50.0);
    }

    #[test]
    fn vibe_and_pace_without_budget() {
        let responses = [respondent().vibe("Beach food nightlife")];
        // proposal tokens: beach, culture, food, art -> 2/4 = 50
        // pace: respondent moderate (2) vs packed (3) -> 1 - 1/2 = 50
        let p = proposal(0.0, Pace::Packed, "beach culture FOOD art");
        assert_close(vibe_subscore(&p, &responses).unwrap(), 50.0);
        assert_close(pace_subscore(&p, &responses).unwrap(), 50.0);
        assert_close(score(&p, &responses), 50.0);
    }

    #[test]
    fn pace_only_when_proposal_has_no_vibe() {
        let responses = [respondent().vibe("just want to chill")];
        let p = proposal(0.0, Pace::Packed, "   ");
        assert_eq!(vibe_subscore(&p, &responses), None);
        // relaxed (1) vs packed (3) -> 0
        assert_close(score(&p, &responses), 0.0);

        let p = proposal(0.0, Pace::Relaxed, "");
        assert_close(score(&p, &responses), 100.0);
    }

    #[test]
    fn all_three_subscores_blend_by_weight() {
        let responses = [
            respondent().budget(dollars(1000)).vibe("active hiking"),
            respondent().budget(dollars(500)).vibe("relax spa"),
        ];
        let p = proposal(1000.0, Pace::Moderate, "hiking spa");
        // budget: (1.0 + 0.5) / 2 = 75
        // vibe: (1/2 + 1/2) / 2 = 50
        // pace: packed(3) vs 2 -> 0.5 ; relaxed(1) vs 2 -> 0.5 -> 50
        let expected = (75.0 * 0.4 + 50.0 * 0.4 + 50.0 * 0.2) / 1.0;
        assert_close(score(&p, &responses), expected);
    }

    #[test]
    fn duplicate_proposal_tokens_count_in_denominator() {
        let responses = [respondent().vibe("beach")];
        let p = proposal(0.0, Pace::Moderate, "beach beach");
        assert_close(vibe_subscore(&p, &responses).unwrap(), 50.0);
    }

    #[test]
    fn pace_inference_keywords() {
        assert_eq!(Pace::inferred_from("Relaxing by the pool"), Pace::Relaxed);
        assert_eq!(Pace::inferred_from("CHILL vibes, some adventure"), Pace::Relaxed);
        assert_eq!(Pace::inferred_from("active days"), Pace::Packed);
        assert_eq!(Pace::inferred_from("a packed schedule"), Pace::Packed);
        assert_eq!(Pace::inferred_from("good food"), Pace::Moderate);
    }

    #[test]
    fn variant_count_depends_on_premium_threshold() {
        let below = [respondent().budget(dollars(1499))];
        assert_eq!(generate_variants(None, &below).len(), 2);

        let at = [respondent().budget(dollars(1500))];
        let variants = generate_variants(None, &at);
        assert_eq!(variants.len(), 3);
        assert_eq!(variants[2].pace, Pace::Packed);
        assert_close(variants[2].estimated_budget, 1950.0);
    }

    #[test]
    fn variants_default_budget_and_destination() {
        let variants = generate_variants(None, &[respondent().vibe("beach")]);
        assert_eq!(variants.len(), 2);
        assert_close(variants[0].estimated_budget, 700.0);
        assert_close(variants[1].estimated_budget, 1000.0);
        assert_eq!(variants[0].pace, Pace::Relaxed);
        assert_eq!(variants[1].pace, Pace::Moderate);
        assert_eq!(variants[1].title, "Balanced an exciting location Experience");
        assert_eq!(variants[1].vibe, "beach");
    }

    #[test]
    fn balanced_variant_combines_vibes() {
        let responses = [
            respondent().vibe("museums"),
            respondent(),
            respondent().vibe("street food"),
        ];
        let variants = generate_variants(Some("Tokyo"), &responses);
        assert_eq!(variants[1].vibe, "museums street food");
        assert_eq!(variants[0].title, "Budget-Friendly Tokyo Adventure");

        let variants = generate_variants(Some("Tokyo"), &[respondent()]);
        assert_eq!(variants[1].vibe, "adventure culture exploration");
    }

    #[test]
    fn ranking_sorts_descending_and_reports_group() {
        let trip = trip(Some("Lisbon"), 4);
        let responses = [
            respondent().budget(dollars(2000)).vibe("luxury adventure"),
            respondent().budget(dollars(2001)).vibe("premium dining adventure"),
        ];
        let report = rank_and_select(&trip, &responses);

        assert_eq!(report.group_size, 4);
        assert_eq!(report.average_budget, Some(MoneyCents::new(200_050)));
        assert_eq!(report.proposals.len(), 3);
        assert!(
            report
                .proposals
                .windows(2)
                .all(|w| w[0].score >= w[1].score)
        );
        for p in &report.proposals {
            assert!((0.0..=100.0).contains(&p.score));
            assert!(p.justification.contains(&format!("{:.1}/100", p.score)));
        }
    }

    #[test]
    fn ranking_ties_keep_generation_order() {
        // No responses: every proposal scores the neutral 50.
        let report = rank_and_select(&trip(None, 0), &[]);
        let titles: Vec<&str> = report.proposals.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Budget-Friendly an exciting location Adventure",
                "Balanced an exciting location Experience",
            ]
        );
        assert_eq!(report.average_budget, None);
        assert_eq!(report.proposals[0].estimated_budget, MoneyCents::new(70_000));
    }
}
