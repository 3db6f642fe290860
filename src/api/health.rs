// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::time::Duration;

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{PrincipalKind, TokenClaims};
use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Whether the record store can be read.
    pub store: String,
    /// Whether tokens can be signed and verified with the configured secret.
    pub tokens: String,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// How long a probe waits for a read lock before reporting the store stuck.
const STORE_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

async fn check_store(state: &AppState, timeout: Duration) -> String {
    match tokio::time::timeout(timeout, state.store.read()).await {
        Ok(store) => {
            tracing::debug!(
                venues = store.venues.len(),
                staff = store.staff.len(),
                "Store readable"
            );
            "ok".to_string()
        }
        Err(_) => {
            tracing::warn!(?timeout, "Store lock not acquired in time");
            "unavailable".to_string()
        }
    }
}

/// Sign a throwaway token and verify it again.
fn check_tokens(state: &AppState) -> String {
    let now = Utc::now().timestamp();
    let probe = TokenClaims {
        id: Uuid::nil(),
        kind: PrincipalKind::Owner,
        role: None,
        permissions: None,
        venues: None,
        owner: None,
        iat: now,
        exp: now + 60,
    };
    match state
        .tokens
        .sign(&probe)
        .and_then(|token| state.tokens.verify(&token))
    {
        Ok(_) => "ok".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Token round trip failed");
            "unavailable".to_string()
        }
    }
}

/// Health check endpoint handler.
///
/// Returns 200 if all checks pass, 503 if any check fails.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse),
        (status = 503, description = "Service is unhealthy", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    report(&state, STORE_PROBE_TIMEOUT).await
}

async fn report(state: &AppState, store_timeout: Duration) -> (StatusCode, Json<ReadyResponse>) {
    let store = check_store(state, store_timeout).await;
    let tokens = check_tokens(state);
    let all_ok = store == "ok" && tokens == "ok";

    let response = ReadyResponse {
        status: if all_ok { "ok" } else { "degraded" }.to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            store,
            tokens,
        },
    };

    let status = if all_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe handler.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Service is not ready", body = ReadyResponse)
    )
)]
pub async fn readiness(state: State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    health(state).await
}
