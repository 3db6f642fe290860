// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Owner account endpoints: register, login and the current principal.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::listing::{body, validated, Body};
use crate::auth::{
    password::{hash_password, verify_password},
    Auth, AuthError, PermissionSet, Principal, PrincipalKind, UserRole,
};
use crate::error::{ApiError, ErrorBody};
use crate::models::{ApiResponse, LoginRequest, RegisterRequest, TokenResponse, User};
use crate::policy::PolicyError;
use crate::state::AppState;

/// Response for GET /v1/auth/me
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub kind: PrincipalKind,
    pub id: Uuid,
    /// `user`/`admin` for owners, the staff role otherwise
    pub role: String,
    pub permissions: PermissionSet,
    /// Employing owner (staff only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Uuid>,
    /// Venue allowlist (staff only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venues: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl MeResponse {
    /// Describe an authenticated principal. Returns `None` for anonymous
    /// callers.
    fn from_principal(principal: &Principal) -> Option<Self> {
        let permissions = principal.permissions();
        match principal {
            Principal::Anonymous => None,
            Principal::Owner { user_id, role } => Some(Self {
                kind: PrincipalKind::Owner,
                id: *user_id,
                role: role.to_string(),
                permissions,
                owner: None,
                venues: None,
                name: None,
                email: None,
            }),
            Principal::Staff {
                staff_id,
                owner_id,
                role,
                venues,
                ..
            } => Some(Self {
                kind: PrincipalKind::Staff,
                id: *staff_id,
                role: role.to_string(),
                permissions,
                owner: Some(*owner_id),
                venues: Some(venues.clone()),
                name: None,
                email: None,
            }),
        }
    }
}

fn token_response(state: &AppState, user: &User) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.tokens.issue_owner_token(user)?;
    Ok(Json(TokenResponse {
        success: true,
        token,
    }))
}

/// Register an owner account.
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered", body = TokenResponse),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Body<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let request = body(payload)?;
    validated(request.validate())?;
    let password_hash = hash_password(&request.password)?;

    let mut store = state.store.write().await;
    if store.user_by_email(&request.email).is_some() {
        return Err(PolicyError::Conflict("Email already registered".to_string()).into());
    }
    let user = store.users.insert(User::new(
        request.name.trim(),
        request.email,
        password_hash,
        UserRole::User,
    ));

    tracing::info!(user_id = %user.id, "Owner account registered");
    token_response(&state, &user)
}

/// Log in to an owner account.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Body<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let request = body(payload)?;

    let (user_id, password_hash) = {
        let store = state.store.read().await;
        let user = store
            .user_by_email(&request.email)
            .ok_or(AuthError::InvalidCredentials)?;
        (user.id, user.password_hash.clone())
    };
    if !verify_password(&request.password, &password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    let mut store = state.store.write().await;
    store.touch_user_login(user_id);
    let user = store
        .users
        .get(user_id)
        .ok_or(AuthError::InvalidCredentials)?;
    token_response(&state, user)
}

/// Get the current principal and its permission set.
#[utoipa::path(
    get,
    path = "/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current principal", body = ApiResponse<MeResponse>),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    Auth(principal): Auth,
) -> Result<Json<ApiResponse<MeResponse>>, ApiError> {
    let mut response =
        MeResponse::from_principal(&principal).ok_or(AuthError::MissingAuthHeader)?;

    let store = state.store.read().await;
    let account = match &principal {
        Principal::Owner { user_id, .. } => store
            .users
            .get(*user_id)
            .map(|user| (user.name.clone(), user.email.clone())),
        Principal::Staff { staff_id, .. } => store
            .staff
            .get(*staff_id)
            .map(|staff| (staff.name.clone(), staff.email.clone())),
        Principal::Anonymous => None,
    };
    if let Some((name, email)) = account {
        response.name = Some(name);
        response.email = Some(email);
    }

    Ok(Json(ApiResponse::ok(response)))
}
