// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the request principal.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::roles::{PermissionSet, StaffRole, UserRole};

/// Which kind of account a token was issued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    #[default]
    Owner,
    Staff,
}

/// Claims carried by our bearer tokens.
///
/// Staff tokens embed the role, permission snapshot and venue allowlist at
/// issuance time so the permission check does not need the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Account id (user id or staff id)
    pub id: Uuid,

    /// Account kind; tokens without it are owner tokens
    #[serde(default)]
    pub kind: PrincipalKind,

    /// Role string (`user`/`admin` for owners, staff role otherwise)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Staff permission snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionSet>,

    /// Staff venue allowlist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venues: Option<Vec<Uuid>>,

    /// Employing owner (staff tokens only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Uuid>,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,
}

/// The identity associated with a request.
///
/// Created per request from a verified token and dropped when the response
/// is written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Principal {
    #[default]
    Anonymous,
    Owner {
        user_id: Uuid,
        role: UserRole,
    },
    Staff {
        staff_id: Uuid,
        owner_id: Uuid,
        role: StaffRole,
        permissions: PermissionSet,
        venues: Vec<Uuid>,
    },
}

impl Principal {
    /// Build the principal described by a staff token.
    ///
    /// A token without an employing owner cannot act for anyone and is
    /// rejected by the caller.
    pub fn staff_from_claims(claims: &TokenClaims) -> Option<Self> {
        let owner_id = claims.owner?;
        let role = StaffRole::parse_or_default(claims.role.as_deref());
        Some(Principal::Staff {
            staff_id: claims.id,
            owner_id,
            role,
            permissions: claims.permissions.unwrap_or_else(|| role.permissions()),
            venues: claims.venues.clone().unwrap_or_default(),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Principal::Anonymous)
    }

    /// Platform admins bypass ownership checks.
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Principal::Owner {
                role: UserRole::Admin,
                ..
            }
        )
    }

    /// The principal's own account id.
    pub fn id(&self) -> Option<Uuid> {
        match self {
            Principal::Anonymous => None,
            Principal::Owner { user_id, .. } => Some(*user_id),
            Principal::Staff { staff_id, .. } => Some(*staff_id),
        }
    }

    /// The owner this principal acts for: itself for owners, the employer for
    /// staff.
    pub fn acting_owner_id(&self) -> Option<Uuid> {
        match self {
            Principal::Anonymous => None,
            Principal::Owner { user_id, .. } => Some(*user_id),
            Principal::Staff { owner_id, .. } => Some(*owner_id),
        }
    }

    /// Effective permission set.
    ///
    /// Owners hold every permission; staff hold the set cached on their
    /// record; anonymous callers hold none.
    pub fn permissions(&self) -> PermissionSet {
        match self {
            Principal::Anonymous => PermissionSet::none(),
            Principal::Owner { .. } => PermissionSet::all(),
            Principal::Staff { permissions, .. } => *permissions,
        }
    }

    /// Whether the principal may act within a venue.
    pub fn can_access_venue(&self, venue_id: Uuid) -> bool {
        match self {
            Principal::Anonymous => false,
            Principal::Owner { .. } => true,
            Principal::Staff { venues, .. } => venues.contains(&venue_id),
        }
    }

    /// Short label for logs.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Principal::Anonymous => "anonymous",
            Principal::Owner { .. } => "owner",
            Principal::Staff { .. } => "staff",
        }
    }
}
