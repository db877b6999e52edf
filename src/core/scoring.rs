use std::collections::HashSet;

use crate::models::{ActivitySummary, CompatibilityResult, FactorScores, ScoringWeights, UserProfile};

/// Compute a compatibility score (0-100) for a pair of profiles
///
/// Scoring formula:
/// score = 100 * (
///     skills_factor * 0.30 +        # Jaccard overlap of skill sets
///     github_factor * 0.25 +        # activity level + language overlap
///     availability_factor * 0.20 +  # shared time slots
///     experience_factor * 0.15 +    # ordinal level distance
///     goals_factor * 0.10           # shared goals
/// )
///
/// Activity summaries must already be fetched by the caller; a missing
/// summary scores the github factor at the neutral 0.5.
pub fn score_compatibility(
    a: &UserProfile,
    b: &UserProfile,
    activity_a: Option<&ActivitySummary>,
    activity_b: Option<&ActivitySummary>,
    weights: &ScoringWeights,
) -> CompatibilityResult {
    let factors = FactorScores {
        skills: skill_overlap(&a.skills, &b.skills),
        github: github_compatibility(activity_a, activity_b),
        availability: overlap_ratio(&a.availability, &b.availability),
        experience: experience_alignment(a.experience().ordinal(), b.experience().ordinal()),
        goals: overlap_ratio(&a.goals, &b.goals),
    };

    let weighted = factors.skills * weights.skills
        + factors.github * weights.github_activity
        + factors.availability * weights.availability
        + factors.experience * weights.experience
        + factors.goals * weights.goals;

    let total_score = (weighted * 100.0).round().clamp(0.0, 100.0) as u8;

    CompatibilityResult {
        total_score,
        recommendations: recommendations(&factors),
        factors,
    }
}

/// Skill factor (0-1): Jaccard similarity of the two skill sets
///
/// Either set empty means there is nothing to compare on, which scores 0.
#[inline]
pub fn skill_overlap(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();

    let common = set_a.intersection(&set_b).count() as f64;
    let total = set_a.union(&set_b).count() as f64;

    common / total
}

/// Overlap factor (0-1) for availability slots and goals
///
/// Missing data on either side scores the neutral 0.5: sparse profiles are
/// common and must not be penalized as hard as a true mismatch.
#[inline]
pub fn overlap_ratio(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.5;
    }

    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();

    let common = set_a.intersection(&set_b).count() as f64;
    let largest = set_a.len().max(set_b.len()) as f64;

    common / largest
}

/// Experience factor (0-1) from the ordinal distance between levels
///
/// 1.0 at equal levels, 0.5 one level apart, 0.0 at two or more.
#[inline]
pub fn experience_alignment(ordinal_a: u8, ordinal_b: u8) -> f64 {
    let d = (ordinal_a as i8 - ordinal_b as i8).abs();
    if d <= 2 {
        (2 - d) as f64 / 2.0
    } else {
        0.0
    }
}

/// GitHub factor (0-1): mean of activity-level closeness and language overlap
///
/// Either summary absent scores the neutral 0.5.
#[inline]
pub fn github_compatibility(
    activity_a: Option<&ActivitySummary>,
    activity_b: Option<&ActivitySummary>,
) -> f64 {
    let (Some(a), Some(b)) = (activity_a, activity_b) else {
        return 0.5;
    };

    let level_diff = (a.activity_level.ordinal() as i8 - b.activity_level.ordinal() as i8).abs();
    let activity_score = 1.0 - level_diff as f64 / 2.0;

    let language_score = if a.languages.is_empty() || b.languages.is_empty() {
        0.0
    } else {
        let set_a: HashSet<&str> = a.languages.iter().map(String::as_str).collect();
        let set_b: HashSet<&str> = b.languages.iter().map(String::as_str).collect();
        let common = set_a.intersection(&set_b).count() as f64;
        common / set_a.len().max(set_b.len()) as f64
    };

    (activity_score + language_score) / 2.0
}

/// Improvement hints, evaluated in fixed factor order so identical inputs
/// always produce the identical list
fn recommendations(factors: &FactorScores) -> Vec<String> {
    let mut hints = Vec::new();

    if factors.skills < 0.3 {
        hints.push("Consider learning complementary skills to improve matching".to_string());
    }
    if factors.github < 0.4 {
        hints.push("Increase GitHub activity to find more compatible matches".to_string());
    }
    if factors.availability < 0.3 {
        hints.push("Update your availability to find better time matches".to_string());
    }
    if factors.experience < 0.5 {
        hints.push("Consider adjusting your experience level for better matches".to_string());
    }

    hints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityLevel, ExperienceLevel, Role};

    fn create_test_profile(id: &str, role: Role, skills: &[&str]) -> UserProfile {
        UserProfile {
            user_id: id.to_string(),
            username: format!("user_{}", id),
            email: None,
            avatar_url: None,
            role,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            availability: vec![],
            experience_level: Some(ExperienceLevel::Intermediate),
            goals: vec![],
            accepted_matches: vec![],
            rejected_matches: vec![],
            mentoring_capacity: 5,
            created_at: None,
        }
    }

    #[test]
    fn test_skill_overlap_jaccard() {
        let a = vec!["X".to_string(), "Y".to_string()];
        let b = vec!["X".to_string(), "Z".to_string()];

        let factor = skill_overlap(&a, &b);
        assert!((factor - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_skill_overlap_disjoint_is_zero() {
        let a = vec!["Rust".to_string()];
        let b = vec!["Go".to_string()];

        assert_eq!(skill_overlap(&a, &b), 0.0);
    }

    #[test]
    fn test_skill_overlap_empty_is_zero() {
        let a: Vec<String> = vec![];
        let b = vec!["Rust".to_string()];

        assert_eq!(skill_overlap(&a, &b), 0.0);
        assert_eq!(skill_overlap(&b, &a), 0.0);
    }

    #[test]
    fn test_overlap_ratio_neutral_when_empty() {
        let empty: Vec<String> = vec![];
        let slots = vec!["Mon".to_string()];

        assert_eq!(overlap_ratio(&empty, &slots), 0.5);
        assert_eq!(overlap_ratio(&slots, &empty), 0.5);
    }

    #[test]
    fn test_overlap_ratio_uses_largest_set() {
        let a = vec!["Mon".to_string(), "Wed".to_string()];
        let b = vec![
            "Mon".to_string(),
            "Tue".to_string(),
            "Wed".to_string(),
            "Fri".to_string(),
        ];

        assert_eq!(overlap_ratio(&a, &b), 0.5);
    }

    #[test]
    fn test_experience_alignment_decay() {
        // equal levels
        assert_eq!(experience_alignment(2, 2), 1.0);
        // one apart
        assert_eq!(experience_alignment(1, 2), 0.5);
        // two apart
        assert_eq!(experience_alignment(1, 3), 0.0);
        // beginner vs expert
        assert_eq!(experience_alignment(1, 4), 0.0);
    }

    #[test]
    fn test_github_neutral_when_absent() {
        let summary = ActivitySummary {
            activity_level: ActivityLevel::High,
            languages: vec!["Rust".to_string()],
        };

        assert_eq!(github_compatibility(None, None), 0.5);
        assert_eq!(github_compatibility(Some(&summary), None), 0.5);
        assert_eq!(github_compatibility(None, Some(&summary)), 0.5);
    }

    #[test]
    fn test_github_blends_level_and_languages() {
        let a = ActivitySummary {
            activity_level: ActivityLevel::High,
            languages: vec!["Rust".to_string(), "Go".to_string()],
        };
        let b = ActivitySummary {
            activity_level: ActivityLevel::Medium,
            languages: vec!["Rust".to_string(), "Python".to_string()],
        };

        // activity: 1 - 1/2 = 0.5, languages: 1/2 -> (0.5 + 0.5) / 2
        let factor = github_compatibility(Some(&a), Some(&b));
        assert!((factor - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_score_stays_in_range() {
        let a = create_test_profile("1", Role::Mentee, &["React", "Node"]);
        let b = create_test_profile("2", Role::Mentor, &["React", "Python"]);
        let weights = ScoringWeights::default();

        let result = score_compatibility(&a, &b, None, None, &weights);
        assert!(result.total_score <= 100);
    }

    #[test]
    fn test_recommendations_order_is_fixed() {
        let factors = FactorScores {
            skills: 0.0,
            github: 0.0,
            availability: 0.0,
            experience: 0.0,
            goals: 0.0,
        };

        let hints = recommendations(&factors);
        assert_eq!(hints.len(), 4);
        assert!(hints[0].contains("complementary skills"));
        assert!(hints[1].contains("GitHub activity"));
        assert!(hints[2].contains("availability"));
        assert!(hints[3].contains("experience level"));
    }

    #[test]
    fn test_neutral_github_fires_no_activity_hint() {
        let a = create_test_profile("1", Role::Mentee, &["React"]);
        let b = create_test_profile("2", Role::Mentor, &["React"]);
        let weights = ScoringWeights::default();

        let result = score_compatibility(&a, &b, None, None, &weights);

        // github factor is the neutral 0.5, above the 0.4 hint threshold
        assert!(result
            .recommendations
            .iter()
            .all(|hint| !hint.contains("GitHub")));
    }
}
