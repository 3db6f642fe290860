// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::any::Any;

use axum::{
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{authenticate, PermissionSet},
    error::{ApiError, ErrorBody},
    models::{
        CreateOfferRequest, CreateStaffRequest, CreateVenueRequest, LoginRequest, Menu, MenuItem,
        MenuRequest, Offer, Package, PackageRequest, RegisterRequest, Review, ReviewRequest,
        Staff, TokenResponse, UpdateOfferRequest, UpdateStaffRequest, UpdateVenueRequest, User,
        Venue,
    },
    policy::{pagination::PageCursor, PageLinks},
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod listing;
pub mod menus;
pub mod offers;
pub mod packages;
pub mod reviews;
pub mod staff;
pub mod venues;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route(
            "/venues",
            get(venues::list_venues).post(venues::create_venue),
        )
        .route(
            "/venues/{id}",
            get(venues::get_venue)
                .put(venues::update_venue)
                .delete(venues::delete_venue),
        )
        .route(
            "/venues/{venue_id}/menus",
            get(menus::list_menus).post(menus::create_menu),
        )
        .route(
            "/venues/{venue_id}/packages",
            get(packages::list_packages).post(packages::create_package),
        )
        .route(
            "/venues/{venue_id}/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/offers",
            get(offers::list_offers).post(offers::create_offer),
        )
        .route(
            "/offers/{id}",
            get(offers::get_offer)
                .put(offers::update_offer)
                .delete(offers::delete_offer),
        )
        .route(
            "/menus/{id}",
            get(menus::get_menu)
                .put(menus::update_menu)
                .delete(menus::delete_menu),
        )
        .route(
            "/packages/{id}",
            get(packages::get_package)
                .put(packages::update_package)
                .delete(packages::delete_package),
        )
        .route(
            "/reviews/{id}",
            get(reviews::get_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .route("/staff/login", post(staff::staff_login))
        .route("/staff", get(staff::list_staff).post(staff::create_staff))
        .route(
            "/staff/{id}",
            get(staff::get_staff)
                .put(staff::update_staff)
                .delete(staff::delete_staff),
        )
        .layer(from_fn_with_state(state.clone(), authenticate))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Panics become the canonical 500 body.
fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::internal("handler panicked").into_response()
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        auth::me,
        venues::list_venues,
        venues::get_venue,
        venues::create_venue,
        venues::update_venue,
        venues::delete_venue,
        offers::list_offers,
        offers::get_offer,
        offers::create_offer,
        offers::update_offer,
        offers::delete_offer,
        menus::list_menus,
        menus::create_menu,
        menus::get_menu,
        menus::update_menu,
        menus::delete_menu,
        packages::list_packages,
        packages::create_package,
        packages::get_package,
        packages::update_package,
        packages::delete_package,
        reviews::list_reviews,
        reviews::create_review,
        reviews::get_review,
        reviews::update_review,
        reviews::delete_review,
        staff::staff_login,
        staff::list_staff,
        staff::create_staff,
        staff::get_staff,
        staff::update_staff,
        staff::delete_staff,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            User,
            Venue,
            Offer,
            Menu,
            MenuItem,
            Package,
            Review,
            Staff,
            PermissionSet,
            PageLinks,
            PageCursor,
            ErrorBody,
            TokenResponse,
            auth::MeResponse,
            RegisterRequest,
            LoginRequest,
            CreateVenueRequest,
            UpdateVenueRequest,
            CreateOfferRequest,
            UpdateOfferRequest,
            MenuRequest,
            PackageRequest,
            ReviewRequest,
            CreateStaffRequest,
            UpdateStaffRequest,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Owner registration and login"),
        (name = "Venues", description = "Venue management"),
        (name = "Offers", description = "Venue offers"),
        (name = "Menus", description = "Venue menus"),
        (name = "Packages", description = "Venue packages"),
        (name = "Reviews", description = "Venue reviews"),
        (name = "Staff", description = "Staff accounts acting for an owner"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
