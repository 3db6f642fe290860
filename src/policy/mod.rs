// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Request Policy
//!
//! Decisions taken after authentication and before data is touched:
//!
//! - [`ownership`]: capability checks and the ownership guard
//! - [`filter`]: list query strings to typed filters
//! - [`pagination`]: page arithmetic

pub mod filter;
pub mod ownership;
pub mod pagination;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::roles::Capability;
use crate::error::ApiError;

pub use filter::{translate, ListQuery, QueryFilter, ScopeRule, Translation};
pub use ownership::{
    authorize, parse_id, require, Decision, DenyReason, OwnedResource, OwnershipCheck,
    VenueChild, ViaVenue,
};
pub use pagination::{paginate, PageLinks, PageRequest, Pagination};

/// Policy failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("Invalid id '{0}'")]
    InvalidId(String),

    #[error("{resource} not found with id of {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Not authorized to access this {}", .resource.to_lowercase())]
    NotOwner { resource: &'static str },

    #[error("Not authorized for venue {venue}")]
    VenueNotGranted { venue: Uuid },

    #[error("Not authorized to access this route")]
    Unauthenticated,

    #[error("Missing permission: {0}")]
    PermissionDenied(Capability),

    #[error("{0}")]
    InvalidQuery(String),

    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("{0}")]
    Conflict(String),
}

pub type PolicyResult<T> = Result<T, PolicyError>;

impl PolicyError {
    pub fn error_code(&self) -> &'static str {
        match self {
            PolicyError::InvalidId(_) => "invalid_id",
            PolicyError::NotFound { .. } => "resource_not_found",
            PolicyError::NotOwner { .. } => "not_owner",
            PolicyError::VenueNotGranted { .. } => "venue_not_granted",
            PolicyError::Unauthenticated => "unauthenticated",
            PolicyError::PermissionDenied(_) => "permission_denied",
            PolicyError::InvalidQuery(_) => "invalid_query",
            PolicyError::Validation(_) => "validation_error",
            PolicyError::Conflict(_) => "conflict",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PolicyError::InvalidId(_)
            | PolicyError::InvalidQuery(_)
            | PolicyError::Validation(_) => StatusCode::BAD_REQUEST,
            PolicyError::NotFound { .. } => StatusCode::NOT_FOUND,
            PolicyError::NotOwner { .. }
            | PolicyError::VenueNotGranted { .. }
            | PolicyError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            PolicyError::Unauthenticated => StatusCode::UNAUTHORIZED,
            PolicyError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl From<PolicyError> for ApiError {
    fn from(err: PolicyError) -> Self {
        ApiError::new(err.status_code(), err.to_string()).with_code(err.error_code())
    }
}

impl IntoResponse for PolicyError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_canonical_order() {
        assert_eq!(
            PolicyError::InvalidId("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PolicyError::NotFound {
                resource: "Venue",
                id: "1".into()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PolicyError::NotOwner { resource: "Venue" }.status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn messages() {
        let err = PolicyError::NotOwner { resource: "Venue" };
        assert_eq!(err.to_string(), "Not authorized to access this venue");

        let err = PolicyError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "a, b");

        let err = PolicyError::PermissionDenied(Capability::ManageStaff);
        assert_eq!(err.to_string(), "Missing permission: canManageStaff");
    }

    #[test]
    fn converts_to_api_error_with_code() {
        let api: ApiError = PolicyError::PermissionDenied(Capability::ManageMenu).into();
        assert_eq!(api.status, StatusCode::FORBIDDEN);
        assert_eq!(api.code, Some("permission_denied"));
    }
}
