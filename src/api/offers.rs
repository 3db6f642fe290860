// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Offer endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use super::listing::{body, list, query_pairs, validated, Body, ListResponse, Listing, QueryPairs};
use crate::auth::{Auth, Capability, OptionalAuth};
use crate::error::{ApiError, ErrorBody};
use crate::models::{ApiResponse, CreateOfferRequest, Offer, UpdateOfferRequest};
use crate::policy::pagination::DEFAULT_PAGE_SIZE;
use crate::policy::{parse_id, require, OwnershipCheck, PolicyError, ScopeRule};
use crate::state::AppState;

/// List offers.
#[utoipa::path(
    get,
    path = "/v1/offers",
    tag = "Offers",
    responses(
        (status = 200, description = "Offers", body = ApiResponse<Vec<Offer>>),
        (status = 400, description = "Malformed query", body = ErrorBody)
    )
)]
pub async fn list_offers(
    State(state): State<AppState>,
    OptionalAuth(principal): OptionalAuth,
    query: QueryPairs,
) -> Result<ListResponse, ApiError> {
    let raw = query_pairs(query)?;
    list::<Offer>(
        &state,
        &principal,
        &raw,
        Listing {
            scope: ScopeRule::ImplicitOwner,
            default_limit: DEFAULT_PAGE_SIZE,
            venue: None,
            owner: None,
        },
    )
    .await
}

#[utoipa::path(
    get,
    path = "/v1/offers/{id}",
    tag = "Offers",
    params(("id" = String, Path, description = "Offer id")),
    responses(
        (status = 200, description = "Offer", body = ApiResponse<Offer>),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_offer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Offer>>, ApiError> {
    let id = parse_id(&id)?;
    let store = state.store.read().await;
    let offer = store.offers.get(id).cloned().ok_or(PolicyError::NotFound {
        resource: "Offer",
        id: id.to_string(),
    })?;
    Ok(Json(ApiResponse::ok(offer)))
}

/// Create an offer on a venue the caller controls.
///
/// The offer is owned by the venue's owner.
#[utoipa::path(
    post,
    path = "/v1/offers",
    tag = "Offers",
    request_body = CreateOfferRequest,
    responses(
        (status = 201, description = "Offer created", body = ApiResponse<Offer>),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 403, description = "Not allowed for this venue", body = ErrorBody),
        (status = 404, description = "Venue not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_offer(
    State(state): State<AppState>,
    Auth(principal): Auth,
    payload: Body<CreateOfferRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Offer>>), ApiError> {
    require(&principal, Capability::ManageOffers)?;
    let request = body(payload)?;
    validated(request.validate())?;

    let venue_id = request
        .venue
        .ok_or_else(|| PolicyError::Validation(vec!["Please add a venue".to_string()]))?;

    let mut store = state.store.write().await;
    let owner = store
        .venues
        .get(venue_id)
        .authorized_for(&principal, venue_id)?
        .owner;
    let offer = store.offers.insert(request.into_offer(owner, venue_id));

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(offer))))
}

#[utoipa::path(
    put,
    path = "/v1/offers/{id}",
    tag = "Offers",
    params(("id" = String, Path, description = "Offer id")),
    request_body = UpdateOfferRequest,
    responses(
        (status = 200, description = "Offer updated", body = ApiResponse<Offer>),
        (status = 400, description = "Invalid id or body", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_offer(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<String>,
    payload: Body<UpdateOfferRequest>,
) -> Result<Json<ApiResponse<Offer>>, ApiError> {
    require(&principal, Capability::ManageOffers)?;
    let id = parse_id(&id)?;

    let mut store = state.store.write().await;
    let offer = store.offers.get_mut(id).authorized_for(&principal, id)?;
    let request = body(payload)?;
    validated(request.validate())?;
    request.apply(offer);

    Ok(Json(ApiResponse::ok(offer.clone())))
}

#[utoipa::path(
    delete,
    path = "/v1/offers/{id}",
    tag = "Offers",
    params(("id" = String, Path, description = "Offer id")),
    responses(
        (status = 200, description = "Offer deleted"),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_offer(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    require(&principal, Capability::ManageOffers)?;
    let id = parse_id(&id)?;

    let mut store = state.store.write().await;
    store.offers.get(id).authorized_for(&principal, id)?;
    store.offers.remove(id);

    Ok(Json(ApiResponse::ok(json!({}))))
}
