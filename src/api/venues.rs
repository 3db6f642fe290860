// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Venue endpoints.
//!
//! Reads are public. The listing is scoped to the caller's own venues when
//! a token is presented and no `owner`/`venue` filter is given.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use super::listing::{body, list, query_pairs, validated, Body, ListResponse, Listing, QueryPairs};
use crate::auth::{Auth, Capability, OptionalAuth};
use crate::error::{ApiError, ErrorBody};
use crate::models::{ApiResponse, CreateVenueRequest, UpdateVenueRequest, Venue};
use crate::policy::pagination::VENUE_PAGE_SIZE;
use crate::policy::{parse_id, require, OwnershipCheck, PolicyError, ScopeRule};
use crate::state::AppState;

/// List venues.
#[utoipa::path(
    get,
    path = "/v1/venues",
    tag = "Venues",
    params(
        ("select" = Option<String>, Query, description = "Comma-separated fields to return"),
        (
            "sort" = Option<String>,
            Query,
            description = "Comma-separated sort keys, `-` for descending"
        ),
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("limit" = Option<u64>, Query, description = "Page size (default 25)")
    ),
    responses(
        (status = 200, description = "Venues", body = ApiResponse<Vec<Venue>>),
        (status = 400, description = "Malformed query", body = ErrorBody)
    )
)]
pub async fn list_venues(
    State(state): State<AppState>,
    OptionalAuth(principal): OptionalAuth,
    query: QueryPairs,
) -> Result<ListResponse, ApiError> {
    let raw = query_pairs(query)?;
    list::<Venue>(
        &state,
        &principal,
        &raw,
        Listing {
            scope: ScopeRule::ImplicitOwner,
            default_limit: VENUE_PAGE_SIZE,
            venue: None,
            owner: None,
        },
    )
    .await
}

/// Get a single venue.
#[utoipa::path(
    get,
    path = "/v1/venues/{id}",
    tag = "Venues",
    params(("id" = String, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Venue", body = ApiResponse<Venue>),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_venue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Venue>>, ApiError> {
    let id = parse_id(&id)?;
    let store = state.store.read().await;
    let venue = store.venues.get(id).cloned().ok_or(PolicyError::NotFound {
        resource: "Venue",
        id: id.to_string(),
    })?;
    Ok(Json(ApiResponse::ok(venue)))
}

/// Create a venue owned by the caller (or the caller's employer).
#[utoipa::path(
    post,
    path = "/v1/venues",
    tag = "Venues",
    request_body = CreateVenueRequest,
    responses(
        (status = 201, description = "Venue created", body = ApiResponse<Venue>),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 403, description = "Missing permission", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_venue(
    State(state): State<AppState>,
    Auth(principal): Auth,
    payload: Body<CreateVenueRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Venue>>), ApiError> {
    require(&principal, Capability::ManageVenues)?;
    let request = body(payload)?;
    validated(request.validate())?;

    let owner = principal
        .acting_owner_id()
        .ok_or(PolicyError::Unauthenticated)?;
    let venue = state
        .store
        .write()
        .await
        .venues
        .insert(request.into_venue(owner));

    tracing::info!(venue_id = %venue.id, %owner, "Venue created");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(venue))))
}

/// Update a venue.
#[utoipa::path(
    put,
    path = "/v1/venues/{id}",
    tag = "Venues",
    params(("id" = String, Path, description = "Venue id")),
    request_body = UpdateVenueRequest,
    responses(
        (status = 200, description = "Venue updated", body = ApiResponse<Venue>),
        (status = 400, description = "Invalid id or body", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_venue(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<String>,
    payload: Body<UpdateVenueRequest>,
) -> Result<Json<ApiResponse<Venue>>, ApiError> {
    require(&principal, Capability::ManageVenues)?;
    let id = parse_id(&id)?;

    let mut store = state.store.write().await;
    let venue = store.venues.get_mut(id).authorized_for(&principal, id)?;
    let request = body(payload)?;
    validated(request.validate())?;
    request.apply(venue);

    Ok(Json(ApiResponse::ok(venue.clone())))
}

/// Delete a venue with its menus, packages, offers and reviews.
#[utoipa::path(
    delete,
    path = "/v1/venues/{id}",
    tag = "Venues",
    params(("id" = String, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Venue deleted"),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_venue(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    require(&principal, Capability::ManageVenues)?;
    let id = parse_id(&id)?;

    let mut store = state.store.write().await;
    store.venues.get(id).authorized_for(&principal, id)?;
    store.delete_venue(id);

    tracing::info!(venue_id = %id, "Venue deleted");
    Ok(Json(ApiResponse::ok(json!({}))))
}
