// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Staff management and staff login.
//!
//! Staff records belong to an owner account. Listing is always confined to
//! the acting owner's staff, except for platform admins.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use super::listing::{body, list, query_pairs, validated, Body, ListResponse, Listing, QueryPairs};
use crate::auth::{
    password::{hash_password, verify_password},
    Auth, AuthError, Capability, Principal, StaffRole,
};
use crate::error::{ApiError, ErrorBody};
use crate::models::{
    ApiResponse, CreateStaffRequest, LoginRequest, Staff, TokenResponse, UpdateStaffRequest,
};
use crate::policy::pagination::DEFAULT_PAGE_SIZE;
use crate::policy::{parse_id, require, OwnershipCheck, PolicyError, PolicyResult, ScopeRule};
use crate::state::AppState;
use crate::store::InMemoryStore;

/// Check a venue allowlist before it is stored on a staff record.
///
/// Every venue must belong to `owner`, and a staff caller can only hand out
/// venues it holds itself.
fn check_venues(
    store: &InMemoryStore,
    principal: &Principal,
    owner: Uuid,
    venues: &[Uuid],
) -> Result<(), ApiError> {
    let foreign = store.foreign_venues(owner, venues);
    if !foreign.is_empty() {
        let errors: Vec<String> = foreign
            .iter()
            .map(|id| format!("Venue {id} does not belong to this account"))
            .collect();
        return Err(ApiError::validation(&errors));
    }
    if let Some(venue) = venues.iter().find(|id| !principal.can_access_venue(**id)) {
        return Err(PolicyError::VenueNotGranted { venue: *venue }.into());
    }
    Ok(())
}

fn staff_not_found(id: Uuid) -> PolicyError {
    PolicyError::NotFound {
        resource: "Staff",
        id: id.to_string(),
    }
}

/// Owner the caller manages staff for.
fn managing_owner(principal: &Principal) -> PolicyResult<Uuid> {
    principal
        .acting_owner_id()
        .ok_or(PolicyError::Unauthenticated)
}

/// List the caller's staff.
#[utoipa::path(
    get,
    path = "/v1/staff",
    tag = "Staff",
    responses(
        (status = 200, description = "Staff members", body = ApiResponse<Vec<Staff>>),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 403, description = "Missing permission", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_staff(
    State(state): State<AppState>,
    Auth(principal): Auth,
    query: QueryPairs,
) -> Result<ListResponse, ApiError> {
    require(&principal, Capability::ManageStaff)?;
    let raw = query_pairs(query)?;
    let owner = if principal.is_admin() {
        None
    } else {
        Some(managing_owner(&principal)?)
    };
    list::<Staff>(
        &state,
        &principal,
        &raw,
        Listing {
            scope: ScopeRule::ImplicitOwner,
            default_limit: DEFAULT_PAGE_SIZE,
            venue: None,
            owner,
        },
    )
    .await
}

/// Add a staff member to the caller's account.
#[utoipa::path(
    post,
    path = "/v1/staff",
    tag = "Staff",
    request_body = CreateStaffRequest,
    responses(
        (status = 201, description = "Staff member created", body = ApiResponse<Staff>),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 403, description = "Missing permission", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_staff(
    State(state): State<AppState>,
    Auth(principal): Auth,
    payload: Body<CreateStaffRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Staff>>), ApiError> {
    require(&principal, Capability::ManageStaff)?;
    let request = body(payload)?;
    validated(request.validate())?;
    let owner = managing_owner(&principal)?;
    let role = StaffRole::parse_or_default(request.role.as_deref());
    let password_hash = hash_password(&request.password)?;

    let mut store = state.store.write().await;
    if store.staff_by_email(&request.email).is_some() {
        return Err(PolicyError::Conflict("Email already registered".to_string()).into());
    }
    check_venues(&store, &principal, owner, &request.venues)?;
    let staff = store.staff.insert(Staff::new(
        owner,
        request.name.trim(),
        request.email,
        password_hash,
        role,
        request.venues,
    ));

    tracing::info!(staff_id = %staff.id, %owner, %role, "Staff member created");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(staff))))
}

#[utoipa::path(
    get,
    path = "/v1/staff/{id}",
    tag = "Staff",
    params(("id" = String, Path, description = "Staff id")),
    responses(
        (status = 200, description = "Staff member", body = ApiResponse<Staff>),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_staff(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Staff>>, ApiError> {
    require(&principal, Capability::ManageStaff)?;
    let id = parse_id(&id)?;
    let store = state.store.read().await;
    let staff = store.staff.get(id).authorized_for(&principal, id)?.clone();
    Ok(Json(ApiResponse::ok(staff)))
}

/// Update a staff member. A role change recomputes the permission set.
#[utoipa::path(
    put,
    path = "/v1/staff/{id}",
    tag = "Staff",
    params(("id" = String, Path, description = "Staff id")),
    request_body = UpdateStaffRequest,
    responses(
        (status = 200, description = "Staff member updated", body = ApiResponse<Staff>),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_staff(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<String>,
    payload: Body<UpdateStaffRequest>,
) -> Result<Json<ApiResponse<Staff>>, ApiError> {
    require(&principal, Capability::ManageStaff)?;
    let id = parse_id(&id)?;

    let mut store = state.store.write().await;
    let owner = store.staff.get(id).authorized_for(&principal, id)?.owner;
    let request = body(payload)?;
    validated(request.validate())?;
    if let Some(venues) = &request.venues {
        check_venues(&store, &principal, owner, venues)?;
    }
    let staff = store.staff.get_mut(id).ok_or_else(|| staff_not_found(id))?;
    let previous_role = staff.role;
    request.apply(staff);
    if staff.role != previous_role {
        tracing::info!(
            staff_id = %id,
            from = %previous_role,
            to = %staff.role,
            "Staff role changed"
        );
    }

    Ok(Json(ApiResponse::ok(staff.clone())))
}

#[utoipa::path(
    delete,
    path = "/v1/staff/{id}",
    tag = "Staff",
    params(("id" = String, Path, description = "Staff id")),
    responses(
        (status = 200, description = "Staff member deleted"),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_staff(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    require(&principal, Capability::ManageStaff)?;
    let id = parse_id(&id)?;

    let mut store = state.store.write().await;
    store.staff.get(id).authorized_for(&principal, id)?;
    store.staff.remove(id);

    tracing::info!(staff_id = %id, "Staff member deleted");
    Ok(Json(ApiResponse::ok(json!({}))))
}

/// Staff login.
///
/// The issued token carries the role, permission set and venue allowlist
/// as they are at this moment.
#[utoipa::path(
    post,
    path = "/v1/staff/login",
    tag = "Staff",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 401, description = "Invalid credentials or inactive account", body = ErrorBody)
    )
)]
pub async fn staff_login(
    State(state): State<AppState>,
    payload: Body<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let request = body(payload)?;

    let (staff_id, password_hash, is_active) = {
        let store = state.store.read().await;
        let staff = store
            .staff_by_email(&request.email)
            .ok_or(AuthError::InvalidCredentials)?;
        (staff.id, staff.password_hash.clone(), staff.is_active)
    };
    if !verify_password(&request.password, &password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }
    if !is_active {
        tracing::warn!(%staff_id, "Inactive staff login refused");
        return Err(AuthError::StaffInactive.into());
    }

    let mut store = state.store.write().await;
    store.touch_staff_login(staff_id);
    let staff = store
        .staff
        .get(staff_id)
        .ok_or(AuthError::InvalidCredentials)?;
    let token = state.tokens.issue_staff_token(staff)?;

    Ok(Json(TokenResponse {
        success: true,
        token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserRole;
    use crate::models::Venue;

    fn owner() -> Principal {
        Principal::Owner {
            user_id: Uuid::new_v4(),
            role: UserRole::User,
        }
    }

    fn venue_for(owner: Uuid) -> Venue {
        crate::models::CreateVenueRequest {
            name: "Hall".into(),
            description: String::new(),
            category: "hall".into(),
            city: "Lagos".into(),
            address: String::new(),
            capacity: 100,
            price_per_head: Some(10.0),
        }
        .into_venue(owner)
    }

    #[test]
    fn foreign_venues_fail_validation() {
        let principal = owner();
        let owner_id = principal.acting_owner_id().unwrap();
        let mut store = InMemoryStore::new();
        let mine = store.venues.insert(venue_for(owner_id));
        let theirs = store.venues.insert(venue_for(Uuid::new_v4()));

        assert!(check_venues(&store, &principal, owner_id, &[mine.id]).is_ok());
        let err = check_venues(&store, &principal, owner_id, &[mine.id, theirs.id]).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn staff_cannot_grant_venues_they_lack() {
        let owner_id = Uuid::new_v4();
        let mut store = InMemoryStore::new();
        let granted = store.venues.insert(venue_for(owner_id));
        let other = store.venues.insert(venue_for(owner_id));
        let manager = Principal::Staff {
            staff_id: Uuid::new_v4(),
            owner_id,
            role: StaffRole::Manager,
            permissions: StaffRole::Manager.permissions(),
            venues: vec![granted.id],
        };

        assert!(check_venues(&store, &manager, owner_id, &[granted.id]).is_ok());
        let err = check_venues(&store, &manager, owner_id, &[other.id]).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn staff_manage_for_their_employer() {
        let owner_id = Uuid::new_v4();
        let manager = Principal::Staff {
            staff_id: Uuid::new_v4(),
            owner_id,
            role: StaffRole::Manager,
            permissions: StaffRole::Manager.permissions(),
            venues: vec![],
        };
        assert_eq!(managing_owner(&manager).unwrap(), owner_id);
        assert!(managing_owner(&Principal::Anonymous).is_err());
    }
}
