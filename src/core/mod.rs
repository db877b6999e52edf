// Core algorithm exports
pub mod filters;
pub mod ranker;
pub mod scoring;

pub use filters::{has_mentoring_room, is_eligible, is_undecided, matches_target_role};
pub use ranker::{RankResult, Ranker};
pub use scoring::{
    experience_alignment, github_compatibility, overlap_ratio, score_compatibility, skill_overlap,
};
