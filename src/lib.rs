// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Venue Booking API - Authorization & Query Policy Server
//!
//! REST backend for venue discovery and booking, with owner and staff
//! accounts acting on venues, offers, menus, packages and reviews.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer tokens, principals and the staff permission table
//! - `policy` - Ownership guard, query filter translation and pagination
//! - `store` - In-memory record collections

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod state;
pub mod store;
