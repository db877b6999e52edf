use std::collections::HashMap;

use crate::core::{filters::is_eligible, scoring::score_compatibility};
use crate::models::{ActivitySummary, RankedCandidate, ScoringWeights, UserProfile};

/// Result of the ranking process
#[derive(Debug)]
pub struct RankResult {
    pub candidates: Vec<RankedCandidate>,
    pub total_candidates: usize,
}

/// Main ranking orchestrator - implements the candidate pipeline
///
/// # Pipeline Stages
/// 1. Role-compatibility filter (plus self-exclusion)
/// 2. Terminal-decision filter
/// 3. Mentoring-capacity filter
/// 4. Compatibility scoring, sort, truncate
#[derive(Debug, Clone)]
pub struct Ranker {
    weights: ScoringWeights,
}

impl Ranker {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    /// Candidates that survive the filter stages, in pool order
    ///
    /// Callers use this to know which activity summaries are worth fetching
    /// before running the full ranking.
    pub fn shortlist<'a>(
        &self,
        requester: &UserProfile,
        pool: &'a [UserProfile],
    ) -> Vec<&'a UserProfile> {
        pool.iter()
            .filter(|candidate| is_eligible(requester, candidate))
            .collect()
    }

    /// Rank a candidate pool for a requester
    ///
    /// Activity summaries are passed in pre-fetched; a candidate missing from
    /// the map scores the neutral github factor. Ranking never mutates any
    /// persisted state.
    ///
    /// # Arguments
    /// * `requester` - The user asking for matches
    /// * `pool` - Candidate profiles fetched from the user store
    /// * `activities` - Completed activity lookups, keyed by user id
    /// * `requester_activity` - The requester's own activity summary, if any
    /// * `limit` - Maximum number of candidates to return
    pub fn rank(
        &self,
        requester: &UserProfile,
        pool: Vec<UserProfile>,
        activities: &HashMap<String, ActivitySummary>,
        requester_activity: Option<&ActivitySummary>,
        limit: usize,
    ) -> RankResult {
        let total_candidates = pool.len();

        let mut candidates: Vec<RankedCandidate> = pool
            .into_iter()
            .filter(|candidate| is_eligible(requester, candidate))
            .map(|candidate| {
                let compatibility = score_compatibility(
                    requester,
                    &candidate,
                    requester_activity,
                    activities.get(&candidate.user_id),
                    &self.weights,
                );

                RankedCandidate {
                    user_id: candidate.user_id,
                    username: candidate.username,
                    avatar_url: candidate.avatar_url,
                    role: candidate.role,
                    skills: candidate.skills,
                    experience_level: candidate.experience_level.unwrap_or_default(),
                    match_score: compatibility.total_score,
                    compatibility,
                }
            })
            .collect();

        // Sort by score (descending), ties by candidate id (ascending) so
        // equal-score pages are reproducible
        candidates.sort_by(|a, b| {
            b.match_score
                .cmp(&a.match_score)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        candidates.truncate(limit);

        RankResult {
            candidates,
            total_candidates,
        }
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
