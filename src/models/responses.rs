use crate::models::domain::RankedCandidate;
use serde::{Deserialize, Serialize};

/// Response for the ranked matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub matches: Vec<RankedCandidate>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Response after recording an accept or reject decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "decisionId")]
    pub decision_id: String,
}
