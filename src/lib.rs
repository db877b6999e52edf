//! Menti Match - mentor/mentee matching service for the MentiConnect platform
//!
//! This library provides the compatibility scoring and candidate ranking used
//! by the MentiConnect mentorship platform: a weighted five-factor score over
//! profile and GitHub-activity data, and a filter/score/sort pipeline over a
//! candidate pool.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{score_compatibility, RankResult, Ranker};
pub use models::{
    ActivityLevel, ActivitySummary, CompatibilityResult, Decision, ExperienceLevel, FactorScores,
    MatchesResponse, RankedCandidate, Role, ScoringWeights, UserProfile,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let weights = ScoringWeights::default();
        assert!((weights.skills - 0.30).abs() < 1e-9);
        assert_eq!(Role::Mentee.targets(), &[Role::Mentor, Role::Both]);
    }
}
