// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for resource-scoped routes.
//!
//! Every fetch-then-mutate path goes through [`OwnershipCheck`], which
//! applies the canonical order: not found before not owner.

use uuid::Uuid;

use super::{PolicyError, PolicyResult};
use crate::auth::roles::Capability;
use crate::auth::Principal;
use crate::models::Venue;

/// A resource with an owning account.
pub trait OwnedResource {
    /// Resource name used in messages and logs.
    const RESOURCE: &'static str;

    /// The owning account's id.
    fn owner_id(&self) -> Uuid;

    /// The venue the resource lives in, if any.
    ///
    /// Staff may only touch venue-scoped resources in granted venues.
    fn venue_scope(&self) -> Option<Uuid> {
        None
    }
}

impl<T: OwnedResource + ?Sized> OwnedResource for &T {
    const RESOURCE: &'static str = T::RESOURCE;

    fn owner_id(&self) -> Uuid {
        (**self).owner_id()
    }

    fn venue_scope(&self) -> Option<Uuid> {
        (**self).venue_scope()
    }
}

impl<T: OwnedResource + ?Sized> OwnedResource for &mut T {
    const RESOURCE: &'static str = T::RESOURCE;

    fn owner_id(&self) -> Uuid {
        (**self).owner_id()
    }

    fn venue_scope(&self) -> Option<Uuid> {
        (**self).venue_scope()
    }
}

/// A resource owned through its venue.
pub trait VenueChild {
    const RESOURCE: &'static str;

    fn venue_id(&self) -> Uuid;
}

/// A venue child joined with its parent venue.
#[derive(Debug, Clone, Copy)]
pub struct ViaVenue<'a, T> {
    pub item: &'a T,
    pub venue: &'a Venue,
}

impl<T: VenueChild> OwnedResource for ViaVenue<'_, T> {
    const RESOURCE: &'static str = T::RESOURCE;

    fn owner_id(&self) -> Uuid {
        self.venue.owner
    }

    fn venue_scope(&self) -> Option<Uuid> {
        Some(self.venue.id)
    }
}

/// Why access was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotOwner,
    VenueNotGranted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// Decide whether a principal may act on a resource.
///
/// Admins always pass. Owners must own the resource. Staff must work for
/// the owner and, for venue-scoped resources, hold the venue in their
/// allowlist.
pub fn authorize<R: OwnedResource + ?Sized>(principal: &Principal, resource: &R) -> Decision {
    if principal.is_admin() {
        return Decision::Allow;
    }

    match principal {
        Principal::Anonymous => Decision::Deny(DenyReason::NotOwner),
        Principal::Owner { user_id, .. } => {
            if *user_id == resource.owner_id() {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::NotOwner)
            }
        }
        Principal::Staff {
            owner_id, venues, ..
        } => {
            if *owner_id != resource.owner_id() {
                return Decision::Deny(DenyReason::NotOwner);
            }
            match resource.venue_scope() {
                Some(venue) if !venues.contains(&venue) => {
                    Decision::Deny(DenyReason::VenueNotGranted)
                }
                _ => Decision::Allow,
            }
        }
    }
}

/// Parse a path id. Runs before any lookup.
pub fn parse_id(raw: &str) -> PolicyResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| PolicyError::InvalidId(raw.to_string()))
}

/// Require a capability from the principal's resolved permission set.
pub fn require(principal: &Principal, capability: Capability) -> PolicyResult<()> {
    if !principal.is_authenticated() {
        return Err(PolicyError::Unauthenticated);
    }
    if principal.permissions().allows(capability) {
        Ok(())
    } else {
        tracing::info!(
            principal = principal.kind_label(),
            id = ?principal.id(),
            capability = %capability,
            "Permission denied"
        );
        Err(PolicyError::PermissionDenied(capability))
    }
}

/// Ownership verification on a lookup result.
pub trait OwnershipCheck<T> {
    /// Hand back the resource if it exists and the principal may act on it.
    fn authorized_for(self, principal: &Principal, id: Uuid) -> PolicyResult<T>;
}

impl<T: OwnedResource> OwnershipCheck<T> for Option<T> {
    fn authorized_for(self, principal: &Principal, id: Uuid) -> PolicyResult<T> {
        let resource = self.ok_or_else(|| PolicyError::NotFound {
            resource: T::RESOURCE,
            id: id.to_string(),
        })?;

        match authorize(principal, &resource) {
            Decision::Allow => Ok(resource),
            Decision::Deny(reason) => {
                tracing::info!(
                    resource = T::RESOURCE,
                    %id,
                    principal = principal.kind_label(),
                    principal_id = ?principal.id(),
                    ?reason,
                    "Ownership check denied"
                );
                Err(match reason {
                    DenyReason::NotOwner => PolicyError::NotOwner {
                        resource: T::RESOURCE,
                    },
                    DenyReason::VenueNotGranted => PolicyError::VenueNotGranted {
                        venue: resource.venue_scope().unwrap_or(id),
                    },
                })
            }
        }
    }
}
