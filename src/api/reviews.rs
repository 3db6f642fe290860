// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Review endpoints.
//!
//! Reviews belong to the account that wrote them. Staff accounts do not
//! review; a user may review a venue once.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use super::listing::{body, list, query_pairs, validated, Body, ListResponse, Listing, QueryPairs};
use crate::auth::{Auth, Principal};
use crate::error::{ApiError, ErrorBody};
use crate::models::{ApiResponse, Review, ReviewRequest};
use crate::policy::pagination::DEFAULT_PAGE_SIZE;
use crate::policy::{parse_id, OwnershipCheck, PolicyError, ScopeRule};
use crate::state::AppState;

fn not_found(resource: &'static str, id: Uuid) -> PolicyError {
    PolicyError::NotFound {
        resource,
        id: id.to_string(),
    }
}

/// The reviewing account, or 403 for staff.
fn reviewer(principal: &Principal) -> Result<Uuid, ApiError> {
    match principal {
        Principal::Owner { user_id, .. } => Ok(*user_id),
        _ => Err(ApiError::forbidden("Only user accounts can write reviews")
            .with_code("reviewer_required")),
    }
}

#[utoipa::path(
    get,
    path = "/v1/venues/{venue_id}/reviews",
    tag = "Reviews",
    params(("venue_id" = String, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Reviews", body = ApiResponse<Vec<Review>>),
        (status = 404, description = "Venue not found", body = ErrorBody)
    )
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
    query: QueryPairs,
) -> Result<ListResponse, ApiError> {
    let venue_id = parse_id(&venue_id)?;
    let raw = query_pairs(query)?;
    if state.store.read().await.venues.get(venue_id).is_none() {
        return Err(not_found("Venue", venue_id).into());
    }
    list::<Review>(
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
    path = "/v1/venues/{venue_id}/reviews",
    tag = "Reviews",
    params(("venue_id" = String, Path, description = "Venue id")),
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ApiResponse<Review>),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 403, description = "Staff cannot review", body = ErrorBody),
        (status = 404, description = "Venue not found", body = ErrorBody),
        (status = 409, description = "Already reviewed", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_review(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(venue_id): Path<String>,
    payload: Body<ReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Review>>), ApiError> {
    let reviewer = reviewer(&principal)?;
    let venue_id = parse_id(&venue_id)?;
    let request = body(payload)?;
    validated(request.validate())?;

    let mut store = state.store.write().await;
    if store.venues.get(venue_id).is_none() {
        return Err(not_found("Venue", venue_id).into());
    }
    if store.has_reviewed(reviewer, venue_id) {
        return Err(
            PolicyError::Conflict("You have already reviewed this venue".to_string()).into(),
        );
    }
    let review = store.reviews.insert(request.into_review(reviewer, venue_id));

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(review))))
}

#[utoipa::path(
    get,
    path = "/v1/reviews/{id}",
    tag = "Reviews",
    params(("id" = String, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review", body = ApiResponse<Review>),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Review>>, ApiError> {
    let id = parse_id(&id)?;
    let store = state.store.read().await;
    let review = store
        .reviews
        .get(id)
        .cloned()
        .ok_or_else(|| not_found("Review", id))?;
    Ok(Json(ApiResponse::ok(review)))
}

#[utoipa::path(
    put,
    path = "/v1/reviews/{id}",
    tag = "Reviews",
    params(("id" = String, Path, description = "Review id")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ApiResponse<Review>),
        (status = 403, description = "Not the reviewer", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_review(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<String>,
    payload: Body<ReviewRequest>,
) -> Result<Json<ApiResponse<Review>>, ApiError> {
    reviewer(&principal)?;
    let id = parse_id(&id)?;

    let mut store = state.store.write().await;
    let review = store.reviews.get_mut(id).authorized_for(&principal, id)?;
    let request = body(payload)?;
    validated(request.validate())?;
    request.apply(review);

    Ok(Json(ApiResponse::ok(review.clone())))
}

#[utoipa::path(
    delete,
    path = "/v1/reviews/{id}",
    tag = "Reviews",
    params(("id" = String, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 403, description = "Not the reviewer", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_review(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    reviewer(&principal)?;
    let id = parse_id(&id)?;

    let mut store = state.store.write().await;
    store.reviews.get(id).authorized_for(&principal, id)?;
    store.reviews.remove(id);

    Ok(Json(ApiResponse::ok(json!({}))))
}
