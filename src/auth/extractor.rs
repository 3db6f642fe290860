// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the request principal.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal is never Principal::Anonymous here
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::middleware::{resolve_principal, Authentication};
use super::{AuthError, Principal};
use crate::state::AppState;

/// Outcome computed by the middleware, or computed here if the middleware
/// did not run for this route.
async fn authentication(parts: &Parts, state: &AppState) -> Result<Principal, AuthError> {
    match parts.extensions.get::<Authentication>() {
        Some(Authentication(outcome)) => outcome.clone(),
        None => resolve_principal(state, &parts.headers).await,
    }
}

/// Extractor for authenticated principals (owner or staff).
pub struct Auth(pub Principal);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match authentication(parts, state).await? {
            Principal::Anonymous => Err(AuthError::MissingAuthHeader),
            principal => Ok(Auth(principal)),
        }
    }
}

/// Optional authentication extractor.
///
/// Any authentication failure degrades to [`Principal::Anonymous`].
pub struct OptionalAuth(pub Principal);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(
            authentication(parts, state).await.unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::UserRole;
    use crate::models::User;
    use axum::http::Request;

    fn parts(auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = auth {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let state = AppState::default();
        let mut parts = parts(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_succeeds_with_token() {
        let state = AppState::default();
        let user = User::new("Ada", "ada@example.com", "h", UserRole::User);
        let token = state.tokens.issue_owner_token(&user).unwrap();
        let user_id = user.id;
        state.store.write().await.users.insert(user);

        let mut parts = parts(Some(&format!("Bearer {token}")));
        let Auth(principal) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(principal.id(), Some(user_id));
    }

    #[tokio::test]
    async fn auth_extractor_prefers_extensions() {
        let state = AppState::default();
        let mut parts = parts(None);
        let principal = Principal::Owner {
            user_id: uuid::Uuid::new_v4(),
            role: UserRole::Admin,
        };
        parts
            .extensions
            .insert(Authentication(Ok(principal.clone())));

        let Auth(found) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(found, principal);
    }

    #[tokio::test]
    async fn middleware_failure_is_surfaced() {
        let state = AppState::default();
        let mut parts = parts(None);
        parts
            .extensions
            .insert(Authentication(Err(AuthError::TokenExpired)));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn optional_auth_degrades_to_anonymous() {
        let state = AppState::default();
        let mut parts = parts(Some("Bearer garbage"));

        let OptionalAuth(principal) = OptionalAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(principal, Principal::Anonymous);
    }
}
