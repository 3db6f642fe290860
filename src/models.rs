// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Domain records, request payloads and the success envelope. Records
//! serialize with camelCase field names and a Mongo-style `_id`, which is the
//! shape the mobile client consumes.
//!
//! ## Ownership
//!
//! - **Venue, Offer, Review, Staff**: carry an `owner` directly
//! - **Menu, Package**: reach their owner through their `venue`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::roles::{PermissionSet, StaffRole, UserRole};
use crate::policy::pagination::PageLinks;
use crate::policy::{OwnedResource, VenueChild};

// =============================================================================
// Envelope
// =============================================================================

/// Success envelope: `{success, count?, pagination?, data}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageLinks>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Single-record response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            count: None,
            pagination: None,
            data,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// List response with a page of records.
    pub fn page(data: Vec<T>, pagination: PageLinks) -> Self {
        Self {
            success: true,
            count: Some(data.len()),
            pagination: Some(pagination),
            data,
        }
    }

    /// The empty result returned when a list cannot apply to the caller.
    pub fn empty() -> Self {
        Self {
            success: true,
            count: Some(0),
            pagination: None,
            data: Vec::new(),
        }
    }
}

// =============================================================================
// Owner accounts
// =============================================================================

/// A venue-owning account.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(skip)]
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: normalize_email(&email.into()),
            role,
            password_hash: password_hash.into(),
            last_login: None,
            created_at: Utc::now(),
        }
    }
}

/// Request to register an owner account.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require_text(&mut errors, &self.name, "Please add a name");
        if !looks_like_email(&self.email) {
            errors.push("Please add a valid email".to_string());
        }
        if self.password.len() < crate::auth::password::MIN_PASSWORD_LEN {
            errors.push(format!(
                "Password must be at least {} characters",
                crate::auth::password::MIN_PASSWORD_LEN
            ));
        }
        errors
    }
}

/// Login request shared by owners and staff.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response carrying a freshly issued token.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

// =============================================================================
// Venues
// =============================================================================

/// A bookable venue.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub owner: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub city: String,
    pub address: String,
    pub capacity: u32,
    pub price_per_head: f64,
    pub created_at: DateTime<Utc>,
}

impl OwnedResource for Venue {
    const RESOURCE: &'static str = "Venue";

    fn owner_id(&self) -> Uuid {
        self.owner
    }

    fn venue_scope(&self) -> Option<Uuid> {
        Some(self.id)
    }
}

/// Request to create a venue.
///
/// Missing fields deserialize to empty values and are reported by
/// [`CreateVenueRequest::validate`].
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateVenueRequest {
    pub name: String,
    pub description: String,
    pub category: String,
    pub city: String,
    pub address: String,
    pub capacity: u32,
    pub price_per_head: Option<f64>,
}

impl CreateVenueRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require_text(&mut errors, &self.name, "Please add a name");
        require_text(&mut errors, &self.category, "Please add a category");
        require_text(&mut errors, &self.city, "Please add a city");
        if self.capacity == 0 {
            errors.push("Capacity must be at least 1".to_string());
        }
        match self.price_per_head {
            Some(price) => require_non_negative(&mut errors, price, "Price per head"),
            None => errors.push("Please add a price per head".to_string()),
        }
        errors
    }

    pub fn into_venue(self, owner: Uuid) -> Venue {
        Venue {
            id: Uuid::new_v4(),
            owner,
            name: self.name.trim().to_string(),
            description: self.description,
            category: self.category,
            city: self.city,
            address: self.address,
            capacity: self.capacity,
            price_per_head: self.price_per_head.unwrap_or_default(),
            created_at: Utc::now(),
        }
    }
}

/// Partial update of a venue.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVenueRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub capacity: Option<u32>,
    pub price_per_head: Option<f64>,
}

impl UpdateVenueRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            require_text(&mut errors, name, "Please add a name");
        }
        if self.capacity == Some(0) {
            errors.push("Capacity must be at least 1".to_string());
        }
        if let Some(price) = self.price_per_head {
            require_non_negative(&mut errors, price, "Price per head");
        }
        errors
    }

    pub fn apply(self, venue: &mut Venue) {
        if let Some(name) = self.name {
            venue.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            venue.description = description;
        }
        if let Some(category) = self.category {
            venue.category = category;
        }
        if let Some(city) = self.city {
            venue.city = city;
        }
        if let Some(address) = self.address {
            venue.address = address;
        }
        if let Some(capacity) = self.capacity {
            venue.capacity = capacity;
        }
        if let Some(price) = self.price_per_head {
            venue.price_per_head = price;
        }
    }
}

// =============================================================================
// Offers
// =============================================================================

/// A promotional offer attached to a venue.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub owner: Uuid,
    pub venue: Uuid,
    pub title: String,
    pub description: String,
    /// Discount in percent.
    pub discount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl OwnedResource for Offer {
    const RESOURCE: &'static str = "Offer";

    fn owner_id(&self) -> Uuid {
        self.owner
    }

    fn venue_scope(&self) -> Option<Uuid> {
        Some(self.venue)
    }
}

/// Request to create an offer.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateOfferRequest {
    pub venue: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub discount: Option<f64>,
    pub valid_until: Option<DateTime<Utc>>,
}

impl CreateOfferRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.venue.is_none() {
            errors.push("Please add a venue".to_string());
        }
        require_text(&mut errors, &self.title, "Please add a title");
        match self.discount {
            Some(discount) => require_discount(&mut errors, discount),
            None => errors.push("Please add a discount".to_string()),
        }
        errors
    }

    pub fn into_offer(self, owner: Uuid, venue: Uuid) -> Offer {
        Offer {
            id: Uuid::new_v4(),
            owner,
            venue,
            title: self.title.trim().to_string(),
            description: self.description,
            discount: self.discount.unwrap_or_default(),
            valid_until: self.valid_until,
            created_at: Utc::now(),
        }
    }
}

/// Partial update of an offer. The venue cannot be changed.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOfferRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub discount: Option<f64>,
    pub valid_until: Option<DateTime<Utc>>,
}

impl UpdateOfferRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if let Some(title) = &self.title {
            require_text(&mut errors, title, "Please add a title");
        }
        if let Some(discount) = self.discount {
            require_discount(&mut errors, discount);
        }
        errors
    }

    pub fn apply(self, offer: &mut Offer) {
        if let Some(title) = self.title {
            offer.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            offer.description = description;
        }
        if let Some(discount) = self.discount {
            offer.discount = discount;
        }
        if self.valid_until.is_some() {
            offer.valid_until = self.valid_until;
        }
    }
}

// =============================================================================
// Menus
// =============================================================================

/// A dish or drink on a menu.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct MenuItem {
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A venue menu.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub venue: Uuid,
    pub name: String,
    pub items: Vec<MenuItem>,
    pub created_at: DateTime<Utc>,
}

impl VenueChild for Menu {
    const RESOURCE: &'static str = "Menu";

    fn venue_id(&self) -> Uuid {
        self.venue
    }
}

/// Request to create or replace a menu.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct MenuRequest {
    pub name: String,
    pub items: Vec<MenuItem>,
}

impl MenuRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require_text(&mut errors, &self.name, "Please add a menu name");
        for item in &self.items {
            if item.name.trim().is_empty() {
                errors.push("Every menu item needs a name".to_string());
            }
            require_non_negative(&mut errors, item.price, "Menu item price");
        }
        errors
    }

    pub fn into_menu(self, venue: Uuid) -> Menu {
        Menu {
            id: Uuid::new_v4(),
            venue,
            name: self.name.trim().to_string(),
            items: self.items,
            created_at: Utc::now(),
        }
    }

    pub fn apply(self, menu: &mut Menu) {
        menu.name = self.name.trim().to_string();
        menu.items = self.items;
    }
}

// =============================================================================
// Packages
// =============================================================================

/// A priced event package offered by a venue.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub venue: Uuid,
    pub name: String,
    pub price: f64,
    pub guests: u32,
    pub inclusions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl VenueChild for Package {
    const RESOURCE: &'static str = "Package";

    fn venue_id(&self) -> Uuid {
        self.venue
    }
}

/// Request to create or replace a package.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct PackageRequest {
    pub name: String,
    pub price: Option<f64>,
    pub guests: u32,
    pub inclusions: Vec<String>,
}

impl PackageRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require_text(&mut errors, &self.name, "Please add a package name");
        match self.price {
            Some(price) => require_non_negative(&mut errors, price, "Package price"),
            None => errors.push("Please add a package price".to_string()),
        }
        if self.guests == 0 {
            errors.push("Guests must be at least 1".to_string());
        }
        errors
    }

    pub fn into_package(self, venue: Uuid) -> Package {
        Package {
            id: Uuid::new_v4(),
            venue,
            name: self.name.trim().to_string(),
            price: self.price.unwrap_or_default(),
            guests: self.guests,
            inclusions: self.inclusions,
            created_at: Utc::now(),
        }
    }

    pub fn apply(self, package: &mut Package) {
        package.name = self.name.trim().to_string();
        package.price = self.price.unwrap_or_default();
        package.guests = self.guests;
        package.inclusions = self.inclusions;
    }
}

// =============================================================================
// Reviews
// =============================================================================

/// A review left on a venue. The reviewer is the owner of the review.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub owner: Uuid,
    pub venue: Uuid,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl OwnedResource for Review {
    const RESOURCE: &'static str = "Review";

    fn owner_id(&self) -> Uuid {
        self.owner
    }
}

/// Request to create or replace a review. A missing rating reads as 0.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ReviewRequest {
    pub rating: u8,
    pub comment: String,
}

impl ReviewRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(1..=5).contains(&self.rating) {
            errors.push("Rating must be between 1 and 5".to_string());
        }
        if self.comment.len() > 500 {
            errors.push("Comment can not be more than 500 characters".to_string());
        }
        errors
    }

    pub fn into_review(self, owner: Uuid, venue: Uuid) -> Review {
        Review {
            id: Uuid::new_v4(),
            owner,
            venue,
            rating: self.rating,
            comment: self.comment,
            created_at: Utc::now(),
        }
    }

    pub fn apply(self, review: &mut Review) {
        review.rating = self.rating;
        review.comment = self.comment;
    }
}

// =============================================================================
// Staff
// =============================================================================

/// A staff member acting on behalf of an owner within granted venues.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub owner: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub role: StaffRole,
    /// Resolved from `role`; refreshed only when the role changes.
    pub permissions: PermissionSet,
    pub venues: Vec<Uuid>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Staff {
    pub fn new(
        owner: Uuid,
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: StaffRole,
        venues: Vec<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            name: name.into(),
            email: normalize_email(&email.into()),
            password_hash: password_hash.into(),
            role,
            permissions: role.permissions(),
            venues,
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
        }
    }

    /// Change the role, recomputing the cached permission set.
    ///
    /// Returns whether anything changed.
    pub fn set_role(&mut self, role: StaffRole) -> bool {
        if self.role == role {
            return false;
        }
        self.role = role;
        self.permissions = role.permissions();
        true
    }
}

impl OwnedResource for Staff {
    const RESOURCE: &'static str = "Staff";

    fn owner_id(&self) -> Uuid {
        self.owner
    }
}

/// Request to create a staff member.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateStaffRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Unknown or missing roles become `host`.
    pub role: Option<String>,
    pub venues: Vec<Uuid>,
}

impl CreateStaffRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require_text(&mut errors, &self.name, "Please add a name");
        if !looks_like_email(&self.email) {
            errors.push("Please add a valid email".to_string());
        }
        if self.password.len() < crate::auth::password::MIN_PASSWORD_LEN {
            errors.push(format!(
                "Password must be at least {} characters",
                crate::auth::password::MIN_PASSWORD_LEN
            ));
        }
        errors
    }
}

/// Partial update of a staff member.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStaffRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub venues: Option<Vec<Uuid>>,
    pub is_active: Option<bool>,
}

impl UpdateStaffRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            require_text(&mut errors, name, "Please add a name");
        }
        errors
    }

    pub fn apply(self, staff: &mut Staff) {
        if let Some(name) = self.name {
            staff.name = name.trim().to_string();
        }
        if let Some(role) = self.role {
            staff.set_role(StaffRole::parse_or_default(Some(&role)));
        }
        if let Some(venues) = self.venues {
            staff.venues = venues;
        }
        if let Some(is_active) = self.is_active {
            staff.is_active = is_active;
        }
    }
}

// =============================================================================
// Validation helpers
// =============================================================================

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

fn require_text(errors: &mut Vec<String>, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(message.to_string());
    }
}

fn require_non_negative(errors: &mut Vec<String>, value: f64, field: &str) {
    if !value.is_finite() || value < 0.0 {
        errors.push(format!("{field} must be a non-negative number"));
    }
}

fn require_discount(errors: &mut Vec<String>, discount: f64) {
    if !discount.is_finite() || !(0.0..=100.0).contains(&discount) {
        errors.push("Discount must be between 0 and 100".to_string());
    }
}
