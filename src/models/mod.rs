// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ActivityLevel, ActivitySummary, CompatibilityResult, Decision, ExperienceLevel, FactorScores,
    RankedCandidate, Role, ScoringWeights, UserProfile,
};
pub use requests::MatchesQuery;
pub use responses::{DecisionResponse, ErrorResponse, HealthResponse, MatchesResponse};
