use crate::models::{Role, UserProfile};

/// Check if a candidate's role is one the requester should be offered
///
/// This is Stage 1 of the ranking pipeline. Also excludes the requester's
/// own profile.
#[inline]
pub fn matches_target_role(requester: &UserProfile, candidate: &UserProfile) -> bool {
    if candidate.user_id == requester.user_id {
        return false;
    }

    requester.role.targets().contains(&candidate.role)
}

/// Check that the requester has not already decided on this candidate
///
/// Stage 2: accept and reject are both terminal, so decided pairs are never
/// re-surfaced.
#[inline]
pub fn is_undecided(requester: &UserProfile, candidate: &UserProfile) -> bool {
    !requester.has_decided(&candidate.user_id)
}

/// Check that a mentor-side candidate still has mentoring capacity
///
/// Stage 3. A candidate serves as the mentor side when its role is `mentor`,
/// or `both` offered to a non-mentor requester; pure mentees are never
/// capacity-limited.
#[inline]
pub fn has_mentoring_room(requester: &UserProfile, candidate: &UserProfile) -> bool {
    let mentor_side = candidate.role == Role::Mentor
        || (candidate.role == Role::Both && requester.role != Role::Mentor);

    if mentor_side {
        !candidate.at_capacity()
    } else {
        true
    }
}

/// Full eligibility check: role, prior decisions, capacity
#[inline]
pub fn is_eligible(requester: &UserProfile, candidate: &UserProfile) -> bool {
    matches_target_role(requester, candidate)
        && is_undecided(requester, candidate)
        && has_mentoring_room(requester, candidate)
}
