// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance and verification (HS256, shared secret).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::{PrincipalKind, TokenClaims};
use super::AuthError;
use crate::models::{Staff, User};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Signs and verifies bearer tokens with the configured secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service.
    ///
    /// # Arguments
    /// - `secret`: shared HMAC secret
    /// - `ttl_secs`: lifetime of issued tokens
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Decode and validate a bearer token.
    ///
    /// Read-only: nothing is looked up or written.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }

    /// Issue a token for an owner account.
    pub fn issue_owner_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = TokenClaims {
            id: user.id,
            kind: PrincipalKind::Owner,
            role: Some(user.role.to_string()),
            permissions: None,
            venues: None,
            owner: None,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        self.sign(&claims)
    }

    /// Issue a token for a staff member, embedding the role, permission
    /// snapshot and venue allowlist.
    pub fn issue_staff_token(&self, staff: &Staff) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = TokenClaims {
            id: staff.id,
            kind: PrincipalKind::Staff,
            role: Some(staff.role.to_string()),
            permissions: Some(staff.permissions),
            venues: Some(staff.venues.clone()),
            owner: Some(staff.owner),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims.
    pub fn sign(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::InternalError(format!("Failed to sign token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::{StaffRole, UserRole};
    use uuid::Uuid;

    fn sample_user() -> User {
        User::new("Ada", "ada@example.com", "hash", UserRole::User)
    }

    #[test]
    fn owner_token_round_trips() {
        let service = TokenService::new("test-secret", 3600);
        let user = sample_user();
        let token = service.issue_owner_token(&user).unwrap();

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.kind, PrincipalKind::Owner);
        assert_eq!(claims.role.as_deref(), Some("user"));
    }

    #[test]
    fn staff_token_embeds_snapshot() {
        let service = TokenService::new("test-secret", 3600);
        let venue = Uuid::new_v4();
        let staff = Staff::new(
            Uuid::new_v4(),
            "Bo",
            "bo@example.com",
            "hash",
            StaffRole::MenuManager,
            vec![venue],
        );
        let token = service.issue_staff_token(&staff).unwrap();

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.kind, PrincipalKind::Staff);
        assert_eq!(claims.permissions, Some(StaffRole::MenuManager.permissions()));
        assert_eq!(claims.venues, Some(vec![venue]));
        assert_eq!(claims.owner, Some(staff.owner));
    }

    #[test]
    fn wrong_secret_is_invalid_token() {
        let issuer = TokenService::new("one-secret", 3600);
        let verifier = TokenService::new("another-secret", 3600);
        let token = issuer.issue_owner_token(&sample_user()).unwrap();

        assert_eq!(verifier.verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn expired_token_is_token_expired() {
        let service = TokenService::new("test-secret", 3600);
        let claims = TokenClaims {
            id: Uuid::new_v4(),
            kind: PrincipalKind::Owner,
            role: None,
            permissions: None,
            venues: None,
            owner: None,
            iat: 1_600_000_000,
            exp: 1_600_000_100,
        };
        let token = service.sign(&claims).unwrap();

        assert_eq!(service.verify(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn garbage_is_invalid_token() {
        let service = TokenService::new("test-secret", 3600);
        assert_eq!(service.verify("not.a.jwt"), Err(AuthError::InvalidToken));
        assert_eq!(service.verify(""), Err(AuthError::InvalidToken));
    }

    #[test]
    fn unsigned_token_is_rejected() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

        let service = TokenService::new("test-secret", 3600);
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(format!(
            r#"{{"id":"{}","iat":1609459200,"exp":9999999999}}"#,
            Uuid::new_v4()
        ));
        let token = format!("{header}.{claims}.");

        assert_eq!(service.verify(&token), Err(AuthError::InvalidToken));
    }
}
