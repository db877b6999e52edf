use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query parameters for the ranked matches listing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchesQuery {
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    pub limit: u16,
}

impl Default for MatchesQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

fn default_limit() -> u16 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_defaults_when_missing() {
        let query: MatchesQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 20);
    }

    #[test]
    fn test_limit_out_of_range_fails_validation() {
        let query = MatchesQuery { limit: 0 };
        assert!(query.validate().is_err());

        let query = MatchesQuery { limit: 101 };
        assert!(query.validate().is_err());
    }
}
