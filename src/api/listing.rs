// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared plumbing for handlers: body and query rejections mapped to the
//! canonical error envelope, and the generic list endpoint.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query,
    },
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::ApiError;
use crate::models::ApiResponse;
use crate::policy::{translate, ListQuery, ScopeRule, Translation};
use crate::state::AppState;
use crate::store::Stored;

/// Raw query pairs, in request order.
pub type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

/// A JSON request body whose rejection is handled by the handler.
pub type Body<T> = Result<Json<T>, JsonRejection>;

pub type ListResponse = Json<ApiResponse<Vec<Value>>>;

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Every body rejection is a 400. A well-formed body with a field of the
/// wrong type is a validation error; anything else is `invalid_body`.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                let text = err.body_text();
                let detail = text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(&text);
                ApiError::validation(&[detail.to_string()])
            }
            other => ApiError::bad_request(other.body_text()).with_code("invalid_body"),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text()).with_code("invalid_query")
    }
}

pub fn body<T>(payload: Body<T>) -> Result<T, ApiError> {
    payload.map(|Json(inner)| inner).map_err(ApiError::from)
}

pub fn query_pairs(query: QueryPairs) -> Result<Vec<(String, String)>, ApiError> {
    query.map(|Query(pairs)| pairs).map_err(ApiError::from)
}

/// Turn field-level validation errors into a 400.
pub fn validated(errors: Vec<String>) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(&errors))
    }
}

/// How a collection is listed.
#[derive(Debug, Clone, Copy)]
pub struct Listing {
    pub scope: ScopeRule,
    pub default_limit: u64,
    /// Restrict to one venue's records.
    pub venue: Option<Uuid>,
    /// Restrict to one owner's records, whatever the query says.
    pub owner: Option<Uuid>,
}

/// Translate, filter and page a collection.
pub async fn list<T: Stored>(
    state: &AppState,
    principal: &Principal,
    raw: &[(String, String)],
    listing: Listing,
) -> Result<ListResponse, ApiError> {
    let query = match translate(raw, principal, listing.scope)? {
        Translation::EmptyResult => return Ok(Json(ApiResponse::empty())),
        Translation::Query(query) => query,
    };
    let mut filter = query.filter.clone();
    if let Some(venue) = listing.venue {
        filter = filter.with_equals("venue", venue.to_string());
    }
    if let Some(owner) = listing.owner {
        filter = filter.with_equals("owner", owner.to_string());
    }
    let query = ListQuery { filter, ..query };
    let page = query.page_request(listing.default_limit, state.page_limit_max);

    let store = state.store.read().await;
    let result = T::collection(&store).find_page(&query, page)?;
    Ok(Json(ApiResponse::page(result.data, result.links)))
}
