// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Package endpoints. Packages are owned through their venue.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use super::listing::{body, list, query_pairs, validated, Body, ListResponse, Listing, QueryPairs};
use crate::auth::{Auth, Capability, Principal};
use crate::error::{ApiError, ErrorBody};
use crate::models::{ApiResponse, Package, PackageRequest};
use crate::policy::pagination::DEFAULT_PAGE_SIZE;
use crate::policy::{parse_id, require, OwnershipCheck, PolicyError, ScopeRule};
use crate::state::AppState;

fn not_found(resource: &'static str, id: Uuid) -> PolicyError {
    PolicyError::NotFound {
        resource,
        id: id.to_string(),
    }
}

#[utoipa::path(
    get,
    path = "/v1/venues/{venue_id}/packages",
    tag = "Packages",
    params(("venue_id" = String, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Packages", body = ApiResponse<Vec<Package>>),
        (status = 404, description = "Venue not found", body = ErrorBody)
    )
)]
pub async fn list_packages(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
    query: QueryPairs,
) -> Result<ListResponse, ApiError> {
    let venue_id = parse_id(&venue_id)?;
    let raw = query_pairs(query)?;
    if state.store.read().await.venues.get(venue_id).is_none() {
        return Err(not_found("Venue", venue_id).into());
    }
    list::<Package>(
        &state,
        &Principal::Anonymous,
        &raw,
        Listing {
            scope: ScopeRule::Explicit,
            default_limit: DEFAULT_PAGE_SIZE,
            venue: Some(venue_id),
            owner: None,
        },
    )
    .await
}

#[utoipa::path(
    post,
    path = "/v1/venues/{venue_id}/packages",
    tag = "Packages",
    params(("venue_id" = String, Path, description = "Venue id")),
    request_body = PackageRequest,
    responses(
        (status = 201, description = "Package created", body = ApiResponse<Package>),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 403, description = "Not allowed for this venue", body = ErrorBody),
        (status = 404, description = "Venue not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_package(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(venue_id): Path<String>,
    payload: Body<PackageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Package>>), ApiError> {
    require(&principal, Capability::ManagePackages)?;
    let venue_id = parse_id(&venue_id)?;

    let mut store = state.store.write().await;
    store.venues.get(venue_id).authorized_for(&principal, venue_id)?;
    let request = body(payload)?;
    validated(request.validate())?;
    let package = store.packages.insert(request.into_package(venue_id));

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(package))))
}

#[utoipa::path(
    get,
    path = "/v1/packages/{id}",
    tag = "Packages",
    params(("id" = String, Path, description = "Package id")),
    responses(
        (status = 200, description = "Package", body = ApiResponse<Package>),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_package(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Package>>, ApiError> {
    let id = parse_id(&id)?;
    let store = state.store.read().await;
    let package = store
        .packages
        .get(id)
        .cloned()
        .ok_or_else(|| not_found("Package", id))?;
    Ok(Json(ApiResponse::ok(package)))
}

#[utoipa::path(
    put,
    path = "/v1/packages/{id}",
    tag = "Packages",
    params(("id" = String, Path, description = "Package id")),
    request_body = PackageRequest,
    responses(
        (status = 200, description = "Package updated", body = ApiResponse<Package>),
        (status = 403, description = "Not allowed for this venue", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_package(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<String>,
    payload: Body<PackageRequest>,
) -> Result<Json<ApiResponse<Package>>, ApiError> {
    require(&principal, Capability::ManagePackages)?;
    let id = parse_id(&id)?;

    let mut store = state.store.write().await;
    store
        .via_venue(store.packages.get(id))
        .authorized_for(&principal, id)?;
    let request = body(payload)?;
    validated(request.validate())?;
    let package = store
        .packages
        .get_mut(id)
        .ok_or_else(|| not_found("Package", id))?;
    request.apply(package);

    Ok(Json(ApiResponse::ok(package.clone())))
}

#[utoipa::path(
    delete,
    path = "/v1/packages/{id}",
    tag = "Packages",
    params(("id" = String, Path, description = "Package id")),
    responses(
        (status = 200, description = "Package deleted"),
        (status = 403, description = "Not allowed for this venue", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_package(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    require(&principal, Capability::ManagePackages)?;
    let id = parse_id(&id)?;

    let mut store = state.store.write().await;
    store
        .via_venue(store.packages.get(id))
        .authorized_for(&principal, id)?;
    store.packages.remove(id);

    Ok(Json(ApiResponse::ok(json!({}))))
}
