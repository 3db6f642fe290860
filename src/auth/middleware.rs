// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Runs once per request, resolves the bearer token to a [`Principal`] and
//! stores the outcome in the request extensions. Nothing is rejected here:
//! the [`Auth`](super::Auth) and [`OptionalAuth`](super::OptionalAuth)
//! extractors decide whether a failure matters for the route.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .layer(axum::middleware::from_fn_with_state(state.clone(), authenticate));
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use super::claims::{Principal, PrincipalKind};
use super::AuthError;
use crate::state::AppState;

/// Outcome of token resolution, stored in request extensions.
#[derive(Debug, Clone)]
pub struct Authentication(pub Result<Principal, AuthError>);

/// Authentication middleware function.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let outcome = resolve_principal(&state, request.headers()).await;
    request.extensions_mut().insert(Authentication(outcome));
    next.run(request).await
}

/// Resolve request headers to a principal.
///
/// No header means [`Principal::Anonymous`]. Owner tokens are re-checked
/// against the user record; staff tokens only against the staff record's
/// active flag, the permission snapshot comes from the token.
pub async fn resolve_principal(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Principal, AuthError> {
    let Some(token) = bearer_token(headers)? else {
        return Ok(Principal::Anonymous);
    };

    let claims = state.tokens.verify(token).inspect_err(|e| match e {
        AuthError::TokenExpired => tracing::debug!("Rejected expired token"),
        _ => tracing::debug!("Rejected invalid token"),
    })?;

    let store = state.store.read().await;
    match claims.kind {
        PrincipalKind::Owner => {
            let user = store.users.get(claims.id).ok_or(AuthError::UserNotFound)?;
            Ok(Principal::Owner {
                user_id: user.id,
                role: user.role,
            })
        }
        PrincipalKind::Staff => {
            let staff = store.staff.get(claims.id).ok_or(AuthError::UserNotFound)?;
            if !staff.is_active {
                tracing::warn!(staff_id = %staff.id, "Inactive staff account presented a token");
                return Err(AuthError::StaffInactive);
            }
            Principal::staff_from_claims(&claims).ok_or(AuthError::InvalidToken)
        }
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;
    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidAuthHeader)?;
    Ok(Some(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::{StaffRole, UserRole};
    use crate::models::{Staff, User};
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_parsing() {
        assert_eq!(bearer_token(&HeaderMap::new()), Ok(None));
        assert_eq!(bearer_token(&headers("Bearer abc")), Ok(Some("abc")));
        assert_eq!(
            bearer_token(&headers("Basic abc")),
            Err(AuthError::InvalidAuthHeader)
        );
        assert_eq!(
            bearer_token(&headers("Bearer ")),
            Err(AuthError::InvalidAuthHeader)
        );
    }

    #[tokio::test]
    async fn no_header_is_anonymous() {
        let state = AppState::default();
        let principal = resolve_principal(&state, &HeaderMap::new()).await;
        assert_eq!(principal, Ok(Principal::Anonymous));
    }

    #[tokio::test]
    async fn owner_token_resolves_current_role() {
        let state = AppState::default();
        let user = User::new("Ada", "ada@example.com", "h", UserRole::User);
        let token = state.tokens.issue_owner_token(&user).unwrap();
        let user_id = user.id;
        state.store.write().await.users.insert(user);

        // Promotion after issuance is visible immediately.
        state.store.write().await.users.get_mut(user_id).unwrap().role = UserRole::Admin;

        let principal = resolve_principal(&state, &headers(&format!("Bearer {token}"))).await;
        assert_eq!(
            principal,
            Ok(Principal::Owner {
                user_id,
                role: UserRole::Admin
            })
        );
    }

    #[tokio::test]
    async fn deleted_owner_is_user_not_found() {
        let state = AppState::default();
        let user = User::new("Ada", "ada@example.com", "h", UserRole::User);
        let token = state.tokens.issue_owner_token(&user).unwrap();

        let principal = resolve_principal(&state, &headers(&format!("Bearer {token}"))).await;
        assert_eq!(principal, Err(AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn staff_snapshot_and_inactive_flag() {
        let state = AppState::default();
        let staff = Staff::new(
            uuid::Uuid::new_v4(),
            "Bo",
            "bo@example.com",
            "h",
            StaffRole::BookingAgent,
            vec![],
        );
        let token = state.tokens.issue_staff_token(&staff).unwrap();
        let staff_id = staff.id;
        state.store.write().await.staff.insert(staff);

        // Role changes after issuance do not alter the token's snapshot.
        state
            .store
            .write()
            .await
            .staff
            .get_mut(staff_id)
            .unwrap()
            .set_role(StaffRole::Admin);

        let auth = headers(&format!("Bearer {token}"));
        let principal = resolve_principal(&state, &auth).await.unwrap();
        assert_eq!(principal.permissions(), StaffRole::BookingAgent.permissions());

        state.store.write().await.staff.get_mut(staff_id).unwrap().is_active = false;
        assert_eq!(
            resolve_principal(&state, &auth).await,
            Err(AuthError::StaffInactive)
        );
    }

    #[tokio::test]
    async fn bad_token_is_invalid() {
        let state = AppState::default();
        let principal = resolve_principal(&state, &headers("Bearer nope")).await;
        assert_eq!(principal, Err(AuthError::InvalidToken));
    }
}
