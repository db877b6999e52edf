use actix_web::{web, HttpRequest, HttpResponse, Responder};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use validator::Validate;

use crate::core::Ranker;
use crate::models::{
    ActivitySummary, Decision, DecisionResponse, ErrorResponse, HealthResponse, MatchesQuery,
    MatchesResponse,
};
use crate::services::{
    ActivityCache, AuthError, GithubClient, TokenVerifier, UserStore, UserStoreError,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub github: Arc<GithubClient>,
    pub cache: Arc<ActivityCache>,
    pub verifier: Arc<TokenVerifier>,
    pub ranker: Ranker,
    pub max_limit: u16,
    pub pool_cap: i64,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches", web::get().to(get_matches))
        .route("/matches/accept/{id}", web::post().to(accept_match))
        .route("/matches/reject/{id}", web::post().to(reject_match));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.users.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Ranked matches endpoint
///
/// GET /api/v1/matches?limit=20
///
/// The requester is taken from the bearer token. Candidates are fetched by
/// target role, filtered, scored against cached-or-fetched GitHub activity,
/// and returned best-first.
async fn get_matches(
    state: web::Data<AppState>,
    query: web::Query<MatchesQuery>,
    http_req: HttpRequest,
) -> impl Responder {
    let user_id = match state.verifier.user_id_from_request(&http_req) {
        Ok(id) => id,
        Err(e) => return unauthorized(e),
    };

    if let Err(errors) = query.validate() {
        tracing::info!("Validation failed for matches query: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let limit = query.limit.min(state.max_limit) as usize;

    tracing::info!("Finding matches for user: {}, limit: {}", user_id, limit);

    let requester = match state.users.find_by_id(&user_id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "User not found".to_string(),
                message: format!("No profile for user {}", user_id),
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch user profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let pool = match state
        .users
        .find_candidates(requester.role.targets(), &user_id, state.pool_cap)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to fetch candidates for {}: {}", user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch candidates".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    tracing::debug!("Found {} candidates for {}", pool.len(), user_id);

    // Only fetch activity for profiles that can actually be ranked
    let mut lookups: Vec<(String, String)> = state
        .ranker
        .shortlist(&requester, &pool)
        .iter()
        .map(|candidate| (candidate.user_id.clone(), candidate.username.clone()))
        .collect();
    lookups.push((requester.user_id.clone(), requester.username.clone()));

    let activities = lookup_activities(&state, lookups).await;

    let requester_activity = activities.get(&requester.user_id).cloned();
    let result = state.ranker.rank(
        &requester,
        pool,
        &activities,
        requester_activity.as_ref(),
        limit,
    );

    tracing::info!(
        "Returning {} matches for user {} (from {} candidates)",
        result.candidates.len(),
        user_id,
        result.total_candidates
    );

    HttpResponse::Ok().json(MatchesResponse {
        matches: result.candidates,
        total_candidates: result.total_candidates,
    })
}

/// Accept a match
///
/// POST /api/v1/matches/accept/{id}
async fn accept_match(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> impl Responder {
    record_decision(&state, path.into_inner(), &http_req, Decision::Accepted).await
}

/// Reject a match
///
/// POST /api/v1/matches/reject/{id}
async fn reject_match(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> impl Responder {
    record_decision(&state, path.into_inner(), &http_req, Decision::Rejected).await
}

async fn record_decision(
    state: &web::Data<AppState>,
    candidate_id: String,
    http_req: &HttpRequest,
    decision: Decision,
) -> HttpResponse {
    let user_id = match state.verifier.user_id_from_request(http_req) {
        Ok(id) => id,
        Err(e) => return unauthorized(e),
    };

    if candidate_id.is_empty() || candidate_id == user_id {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid match id".to_string(),
            message: "Match id must refer to another user".to_string(),
            status_code: 400,
        });
    }

    match state
        .users
        .record_decision(&user_id, &candidate_id, decision)
        .await
    {
        Ok(decision_id) => {
            let message = match decision {
                Decision::Accepted => "Match accepted successfully!",
                Decision::Rejected => "Match rejected successfully",
            };

            tracing::info!(
                "Recorded decision: {} -> {} ({:?})",
                user_id,
                candidate_id,
                decision
            );

            HttpResponse::Ok().json(DecisionResponse {
                success: true,
                message: message.to_string(),
                decision_id,
            })
        }
        Err(UserStoreError::NotFound(what)) => HttpResponse::NotFound().json(ErrorResponse {
            error: "User not found".to_string(),
            message: what,
            status_code: 404,
        }),
        Err(UserStoreError::InvalidInput(why)) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid decision".to_string(),
            message: why,
            status_code: 400,
        }),
        Err(e) => {
            tracing::error!(
                "Failed to record decision {} -> {}: {}",
                user_id,
                candidate_id,
                e
            );
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to record decision".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Fan out activity lookups across the candidate pool
///
/// Each lookup goes through the cache first and falls back to a live GitHub
/// fetch. Lookups are independent, so failures and timeouts simply leave that
/// user absent from the returned map; ranking then scores the neutral github
/// factor for them.
async fn lookup_activities(
    state: &web::Data<AppState>,
    users: Vec<(String, String)>,
) -> HashMap<String, ActivitySummary> {
    let mut join_set = JoinSet::new();

    for (user_id, username) in users {
        let github = Arc::clone(&state.github);
        let cache = Arc::clone(&state.cache);

        join_set.spawn(async move {
            if let Some(summary) = cache.get(&user_id).await {
                return (user_id, Some(summary));
            }

            match github.try_fetch(&username).await {
                Some(summary) => {
                    cache.put(&user_id, &summary).await;
                    (user_id, Some(summary))
                }
                None => (user_id, None),
            }
        });
    }

    let mut activities = HashMap::new();
    while let Some(joined) = join_set.join_next().await {
        if let Ok((user_id, Some(summary))) = joined {
            activities.insert(user_id, summary);
        }
    }

    activities
}

fn unauthorized(err: AuthError) -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse {
        error: "Unauthorized".to_string(),
        message: err.to_string(),
        status_code: 401,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }
}
