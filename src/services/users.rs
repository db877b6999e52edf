use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::core::filters::has_mentoring_room;
use crate::models::{Decision, Role, UserProfile};

/// Errors that can occur when interacting with the user store
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// PostgreSQL-backed user repository
///
/// Owns profile reads for the ranking pipeline and the decision writes for
/// accept/reject. Ranking itself never writes through this store.
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    /// Create a new user store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, UserStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new user store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, UserStoreError> {
        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Fetch a single profile by user id
    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<UserProfile>, UserStoreError> {
        let query = format!(
            "SELECT {} FROM users WHERE user_id = $1",
            PROFILE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(profile_from_row))
    }

    /// Fetch the candidate pool for a requester
    ///
    /// Only the role filter and self-exclusion run in SQL; decision and
    /// capacity filtering belong to the ranking pipeline. Results are ordered
    /// by user id so a capped pool is deterministic.
    pub async fn find_candidates(
        &self,
        roles: &[Role],
        excluding: &str,
        pool_cap: i64,
    ) -> Result<Vec<UserProfile>, UserStoreError> {
        let role_names: Vec<String> = roles.iter().map(|r| r.as_str().to_string()).collect();

        let query = format!(
            r#"
            SELECT {}
            FROM users
            WHERE role = ANY($1::user_role[])
              AND user_id <> $2
            ORDER BY user_id
            LIMIT $3
            "#,
            PROFILE_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(&role_names)
            .bind(excluding)
            .bind(pool_cap)
            .fetch_all(&self.pool)
            .await?;

        let profiles: Vec<UserProfile> = rows.iter().map(profile_from_row).collect();

        tracing::debug!(
            "Fetched {} candidates for roles {:?} (excluding {})",
            profiles.len(),
            role_names,
            excluding
        );

        Ok(profiles)
    }

    /// Record a terminal accept/reject decision
    ///
    /// Acceptance adds each user to the other's accepted list (mutual);
    /// rejection adds the candidate to the requester's rejected list only.
    /// Returns the decision record id.
    pub async fn record_decision(
        &self,
        requester_id: &str,
        candidate_id: &str,
        decision: Decision,
    ) -> Result<String, UserStoreError> {
        if requester_id == candidate_id {
            return Err(UserStoreError::InvalidInput(
                "cannot record a decision about yourself".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let requester = fetch_profile(&mut tx, requester_id)
            .await?
            .ok_or_else(|| UserStoreError::NotFound(format!("user {}", requester_id)))?;
        let candidate = fetch_profile(&mut tx, candidate_id)
            .await?
            .ok_or_else(|| UserStoreError::NotFound(format!("user {}", candidate_id)))?;

        if requester.has_decided(candidate_id) {
            return Err(UserStoreError::InvalidInput(format!(
                "decision for {} already recorded",
                candidate_id
            )));
        }

        match decision {
            Decision::Accepted => {
                if !has_mentoring_room(&requester, &candidate) {
                    return Err(UserStoreError::InvalidInput(
                        "this mentor has reached their capacity limit".to_string(),
                    ));
                }

                let append_accept = r#"
                    UPDATE users
                    SET accepted_matches = array_append(accepted_matches, $2)
                    WHERE user_id = $1
                      AND NOT (accepted_matches @> ARRAY[$2])
                "#;

                sqlx::query(append_accept)
                    .bind(requester_id)
                    .bind(candidate_id)
                    .execute(&mut *tx)
                    .await?;
                sqlx::query(append_accept)
                    .bind(candidate_id)
                    .bind(requester_id)
                    .execute(&mut *tx)
                    .await?;
            }
            Decision::Rejected => {
                sqlx::query(
                    r#"
                    UPDATE users
                    SET rejected_matches = array_append(rejected_matches, $2)
                    WHERE user_id = $1
                      AND NOT (rejected_matches @> ARRAY[$2])
                    "#,
                )
                .bind(requester_id)
                .bind(candidate_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        let decision_id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO match_decisions (id, user_id, target_user_id, decision, decided_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (user_id, target_user_id)
            DO UPDATE SET
                decision = EXCLUDED.decision,
                decided_at = EXCLUDED.decided_at
            "#,
        )
        .bind(&decision_id)
        .bind(requester_id)
        .bind(candidate_id)
        .bind(decision)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            "Recorded decision: {} -> {} ({:?})",
            requester_id,
            candidate_id,
            decision
        );

        Ok(decision_id)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, UserStoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

const PROFILE_COLUMNS: &str = "user_id, username, email, avatar_url, role, skills, availability, \
     experience_level, goals, accepted_matches, rejected_matches, mentoring_capacity, created_at";

async fn fetch_profile(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: &str,
) -> Result<Option<UserProfile>, UserStoreError> {
    let query = format!("SELECT {} FROM users WHERE user_id = $1", PROFILE_COLUMNS);

    let row = sqlx::query(&query)
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?;

    Ok(row.as_ref().map(profile_from_row))
}

fn profile_from_row(row: &PgRow) -> UserProfile {
    UserProfile {
        user_id: row.get("user_id"),
        username: row.get("username"),
        email: row.get("email"),
        avatar_url: row.get("avatar_url"),
        role: row.get("role"),
        skills: row.get("skills"),
        availability: row.get("availability"),
        experience_level: row.get("experience_level"),
        goals: row.get("goals"),
        accepted_matches: row.get("accepted_matches"),
        rejected_matches: row.get("rejected_matches"),
        mentoring_capacity: row.get("mentoring_capacity"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_decision_rejected_without_db() {
        // record_decision validates the self-referential case before touching
        // the pool, so the error formatting is testable directly
        let err = UserStoreError::InvalidInput("cannot record a decision about yourself".into());
        assert!(err.to_string().contains("yourself"));
    }

    #[test]
    fn test_profile_columns_cover_the_model() {
        for column in [
            "user_id",
            "role",
            "skills",
            "availability",
            "experience_level",
            "goals",
            "accepted_matches",
            "rejected_matches",
            "mentoring_capacity",
        ] {
            assert!(PROFILE_COLUMNS.contains(column), "missing column {}", column);
        }
    }
}
