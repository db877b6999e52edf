use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::{ActivityLevel, ActivitySummary};

/// Errors that can occur when talking to the GitHub API
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Rate limited by the GitHub API")]
    RateLimited,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Recent PR counts at or above this mark classify as high activity
const HIGH_ACTIVITY_PRS: u64 = 10;
/// Recent PR counts at or above this mark classify as medium activity
const MEDIUM_ACTIVITY_PRS: u64 = 3;
/// Recently-pushed repositories sampled for language signals
const REPO_SAMPLE_SIZE: u8 = 10;

/// GitHub API client
///
/// Derives a per-user activity summary from public data:
/// - recent public pull requests (activity level)
/// - recently pushed repositories (language list)
pub struct GithubClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl GithubClient {
    /// Create a new GitHub client
    ///
    /// `token` is optional; without it the client uses the much smaller
    /// unauthenticated rate limit.
    pub fn new(base_url: String, token: Option<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("menti-match/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            token,
            client,
        }
    }

    /// Fetch and summarize a user's recent public activity
    pub async fn fetch_activity(&self, username: &str) -> Result<ActivitySummary, GithubError> {
        let pr_count = self.recent_pr_count(username).await?;
        let languages = self.recent_languages(username).await?;

        Ok(ActivitySummary {
            activity_level: classify_activity(pr_count),
            languages,
        })
    }

    /// Activity lookup that never fails: any error degrades to "no data"
    ///
    /// Ranking must proceed on lookup failure, so the error is logged here
    /// and the caller sees an absent summary.
    pub async fn try_fetch(&self, username: &str) -> Option<ActivitySummary> {
        match self.fetch_activity(username).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::warn!("GitHub activity lookup failed for {}: {}", username, e);
                None
            }
        }
    }

    /// Count recent public PRs authored by the user
    async fn recent_pr_count(&self, username: &str) -> Result<u64, GithubError> {
        let search = format!("is:pr author:{} is:public", username);
        let url = format!(
            "{}/search/issues?q={}&per_page=1",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&search)
        );

        tracing::debug!("Fetching PR count from: {}", url);

        let response = self.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::FORBIDDEN {
            return Err(GithubError::RateLimited);
        }
        if !response.status().is_success() {
            return Err(GithubError::ApiError(format!(
                "Failed to search PRs: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        json.get("total_count")
            .and_then(|t| t.as_u64())
            .ok_or_else(|| GithubError::InvalidResponse("Missing total_count".into()))
    }

    /// Primary languages of the user's recently pushed repositories,
    /// most recent first, deduplicated
    async fn recent_languages(&self, username: &str) -> Result<Vec<String>, GithubError> {
        let url = format!(
            "{}/users/{}/repos?sort=pushed&per_page={}",
            self.base_url.trim_end_matches('/'),
            username,
            REPO_SAMPLE_SIZE
        );

        let response = self.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::FORBIDDEN {
            return Err(GithubError::RateLimited);
        }
        if !response.status().is_success() {
            return Err(GithubError::ApiError(format!(
                "Failed to list repos: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        let repos = json
            .as_array()
            .ok_or_else(|| GithubError::InvalidResponse("Expected repository array".into()))?;

        let mut languages = Vec::new();
        for repo in repos {
            if let Some(language) = repo.get("language").and_then(|l| l.as_str()) {
                if !languages.iter().any(|known| known == language) {
                    languages.push(language.to_string());
                }
            }
        }

        Ok(languages)
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github.v3+json");

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        request
    }
}

/// Bucket a recent PR count into an activity level
fn classify_activity(pr_count: u64) -> ActivityLevel {
    if pr_count >= HIGH_ACTIVITY_PRS {
        ActivityLevel::High
    } else if pr_count >= MEDIUM_ACTIVITY_PRS {
        ActivityLevel::Medium
    } else {
        ActivityLevel::Low
    }
}
