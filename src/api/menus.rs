// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Menu endpoints. Menus are owned through their venue.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use super::listing::{body, list, query_pairs, validated, Body, ListResponse, Listing, QueryPairs};
use crate::auth::{Auth, Capability, Principal};
use crate::error::{ApiError, ErrorBody};
use crate::models::{ApiResponse, Menu, MenuRequest};
use crate::policy::pagination::DEFAULT_PAGE_SIZE;
use crate::policy::{parse_id, require, OwnershipCheck, PolicyError, ScopeRule};
use crate::state::AppState;

fn menu_not_found(id: uuid::Uuid) -> PolicyError {
    PolicyError::NotFound {
        resource: "Menu",
        id: id.to_string(),
    }
}

/// List a venue's menus.
#[utoipa::path(
    get,
    path = "/v1/venues/{venue_id}/menus",
    tag = "Menus",
    params(("venue_id" = String, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Menus", body = ApiResponse<Vec<Menu>>),
        (status = 404, description = "Venue not found", body = ErrorBody)
    )
)]
pub async fn list_menus(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
    query: QueryPairs,
) -> Result<ListResponse, ApiError> {
    let venue_id = parse_id(&venue_id)?;
    let raw = query_pairs(query)?;
    if state.store.read().await.venues.get(venue_id).is_none() {
        return Err(PolicyError::NotFound {
            resource: "Venue",
            id: venue_id.to_string(),
        }
        .into());
    }
    list::<Menu>(
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

/// Add a menu to a venue.
#[utoipa::path(
    post,
    path = "/v1/venues/{venue_id}/menus",
    tag = "Menus",
    params(("venue_id" = String, Path, description = "Venue id")),
    request_body = MenuRequest,
    responses(
        (status = 201, description = "Menu created", body = ApiResponse<Menu>),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 403, description = "Not allowed for this venue", body = ErrorBody),
        (status = 404, description = "Venue not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_menu(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(venue_id): Path<String>,
    payload: Body<MenuRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Menu>>), ApiError> {
    require(&principal, Capability::ManageMenu)?;
    let venue_id = parse_id(&venue_id)?;

    let mut store = state.store.write().await;
    store.venues.get(venue_id).authorized_for(&principal, venue_id)?;
    let request = body(payload)?;
    validated(request.validate())?;
    let menu = store.menus.insert(request.into_menu(venue_id));

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(menu))))
}

#[utoipa::path(
    get,
    path = "/v1/menus/{id}",
    tag = "Menus",
    params(("id" = String, Path, description = "Menu id")),
    responses(
        (status = 200, description = "Menu", body = ApiResponse<Menu>),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Menu>>, ApiError> {
    let id = parse_id(&id)?;
    let store = state.store.read().await;
    let menu = store.menus.get(id).cloned().ok_or_else(|| menu_not_found(id))?;
    Ok(Json(ApiResponse::ok(menu)))
}

/// Replace a menu's name and items.
#[utoipa::path(
    put,
    path = "/v1/menus/{id}",
    tag = "Menus",
    params(("id" = String, Path, description = "Menu id")),
    request_body = MenuRequest,
    responses(
        (status = 200, description = "Menu updated", body = ApiResponse<Menu>),
        (status = 403, description = "Not allowed for this venue", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_menu(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<String>,
    payload: Body<MenuRequest>,
) -> Result<Json<ApiResponse<Menu>>, ApiError> {
    require(&principal, Capability::ManageMenu)?;
    let id = parse_id(&id)?;

    let mut store = state.store.write().await;
    store
        .via_venue(store.menus.get(id))
        .authorized_for(&principal, id)?;
    let request = body(payload)?;
    validated(request.validate())?;
    let menu = store.menus.get_mut(id).ok_or_else(|| menu_not_found(id))?;
    request.apply(menu);

    Ok(Json(ApiResponse::ok(menu.clone())))
}

#[utoipa::path(
    delete,
    path = "/v1/menus/{id}",
    tag = "Menus",
    params(("id" = String, Path, description = "Menu id")),
    responses(
        (status = 200, description = "Menu deleted"),
        (status = 403, description = "Not allowed for this venue", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_menu(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    require(&principal, Capability::ManageMenu)?;
    let id = parse_id(&id)?;

    let mut store = state.store.write().await;
    store
        .via_venue(store.menus.get(id))
        .authorized_for(&principal, id)?;
    store.menus.remove(id);

    Ok(Json(ApiResponse::ok(json!({}))))
}
