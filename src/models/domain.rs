use serde::{Deserialize, Serialize};

/// Mentorship role a user offers or seeks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    Mentee,
    Mentor,
    Both,
}

impl Role {
    /// Roles a user with this role should be matched against
    pub fn targets(&self) -> &'static [Role] {
        match self {
            Role::Mentor => &[Role::Mentee, Role::Both],
            Role::Mentee => &[Role::Mentor, Role::Both],
            Role::Both => &[Role::Mentor, Role::Mentee, Role::Both],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Mentee => "mentee",
            Role::Mentor => "mentor",
            Role::Both => "both",
        }
    }
}

/// Self-reported experience level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "experience_level", rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ExperienceLevel {
    /// Ordinal used for distance-based compatibility
    pub fn ordinal(&self) -> u8 {
        match self {
            ExperienceLevel::Beginner => 1,
            ExperienceLevel::Intermediate => 2,
            ExperienceLevel::Advanced => 3,
            ExperienceLevel::Expert => 4,
        }
    }
}

impl Default for ExperienceLevel {
    fn default() -> Self {
        ExperienceLevel::Intermediate
    }
}

/// GitHub activity bucket derived from recent public contributions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Low,
    Medium,
    High,
}

impl ActivityLevel {
    pub fn ordinal(&self) -> u8 {
        match self {
            ActivityLevel::Low => 1,
            ActivityLevel::Medium => 2,
            ActivityLevel::High => 3,
        }
    }
}

/// User profile as stored by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "avatarUrl", default)]
    pub avatar_url: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub availability: Vec<String>,
    #[serde(rename = "experienceLevel", default)]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(rename = "acceptedMatches", default)]
    pub accepted_matches: Vec<String>,
    #[serde(rename = "rejectedMatches", default)]
    pub rejected_matches: Vec<String>,
    #[serde(rename = "mentoringCapacity", default)]
    pub mentoring_capacity: i32,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl UserProfile {
    /// Experience level with the missing-value default applied
    pub fn experience(&self) -> ExperienceLevel {
        self.experience_level.unwrap_or_default()
    }

    /// Whether this user already accepted or rejected the given user
    pub fn has_decided(&self, user_id: &str) -> bool {
        self.accepted_matches.iter().any(|id| id == user_id)
            || self.rejected_matches.iter().any(|id| id == user_id)
    }

    /// Whether a mentor-side user has no room for another mentee
    pub fn at_capacity(&self) -> bool {
        self.accepted_matches.len() >= self.mentoring_capacity.max(0) as usize
    }
}

/// Summary of a user's recent public GitHub activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    #[serde(rename = "activityLevel")]
    pub activity_level: ActivityLevel,
    pub languages: Vec<String>,
}

/// Raw per-factor sub-scores, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    pub skills: f64,
    pub github: f64,
    pub availability: f64,
    pub experience: f64,
    pub goals: f64,
}

/// Result of scoring one pair of profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    #[serde(rename = "totalScore")]
    pub total_score: u8,
    pub factors: FactorScores,
    pub recommendations: Vec<String>,
}

/// Candidate profile augmented with its compatibility result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub username: String,
    #[serde(rename = "avatarUrl")]
    pub avatar_url: Option<String>,
    pub role: Role,
    pub skills: Vec<String>,
    #[serde(rename = "experienceLevel")]
    pub experience_level: ExperienceLevel,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
    pub compatibility: CompatibilityResult,
}

/// Terminal decision a user records for a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "match_decision", rename_all = "lowercase")]
pub enum Decision {
    Accepted,
    Rejected,
}

/// Scoring weights
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub skills: f64,
    pub github_activity: f64,
    pub availability: f64,
    pub experience: f64,
    pub goals: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 0.30,
            github_activity: 0.25,
            availability: 0.20,
            experience: 0.15,
            goals: 0.10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_profile(role: Role) -> UserProfile {
        UserProfile {
            user_id: "u1".to_string(),
            username: "u1".to_string(),
            email: None,
            avatar_url: None,
            role,
            skills: vec![],
            availability: vec![],
            experience_level: None,
            goals: vec![],
            accepted_matches: vec![],
            rejected_matches: vec![],
            mentoring_capacity: 0,
            created_at: None,
        }
    }

    #[test]
    fn test_role_targets() {
        assert_eq!(Role::Mentee.targets(), &[Role::Mentor, Role::Both]);
        assert_eq!(Role::Mentor.targets(), &[Role::Mentee, Role::Both]);
        assert_eq!(Role::Both.targets(), &[Role::Mentor, Role::Mentee, Role::Both]);
    }

    #[test]
    fn test_experience_defaults_to_intermediate() {
        let profile = bare_profile(Role::Mentee);

        assert_eq!(profile.experience(), ExperienceLevel::Intermediate);
        assert_eq!(profile.experience().ordinal(), 2);
    }

    #[test]
    fn test_capacity_with_zero_limit() {
        let profile = bare_profile(Role::Mentor);

        assert!(profile.at_capacity());
    }

    #[test]
    fn test_has_decided_covers_both_lists() {
        let mut profile = bare_profile(Role::Mentee);
        profile.accepted_matches.push("a".to_string());
        profile.rejected_matches.push("r".to_string());

        assert!(profile.has_decided("a"));
        assert!(profile.has_decided("r"));
        assert!(!profile.has_decided("x"));
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = ScoringWeights::default();
        let sum = w.skills + w.github_activity + w.availability + w.experience + w.goals;
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
