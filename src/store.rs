// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory document store.
//!
//! Each collection keeps typed records in insertion order. List queries
//! serialize records to JSON documents and evaluate the translated
//! [`QueryFilter`] against them, the way a document database would.
//!
//! The store itself does no locking; callers hold the `RwLock` in
//! [`AppState`](crate::state::AppState) across guard and mutation.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::roles::UserRole;
use crate::error::ApiError;
use crate::models::{Menu, Offer, Package, Review, Staff, User, Venue};
use crate::policy::{ListQuery, PageLinks, PageRequest, QueryFilter, VenueChild, ViaVenue};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::internal(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A stored record.
pub trait Record: Serialize + Clone {
    fn id(&self) -> Uuid;
}

macro_rules! impl_record {
    ($($ty:ty),* $(,)?) => {
        $(impl Record for $ty {
            fn id(&self) -> Uuid {
                self.id
            }
        })*
    };
}

impl_record!(User, Venue, Offer, Menu, Package, Review, Staff);

/// Records that live in one collection of [`InMemoryStore`].
pub trait Stored: Record {
    fn collection(store: &InMemoryStore) -> &Collection<Self>;
}

macro_rules! impl_stored {
    ($($ty:ty => $field:ident),* $(,)?) => {
        $(impl Stored for $ty {
            fn collection(store: &InMemoryStore) -> &Collection<Self> {
                &store.$field
            }
        })*
    };
}

impl_stored!(
    Venue => venues,
    Offer => offers,
    Menu => menus,
    Package => packages,
    Review => reviews,
    Staff => staff,
);

/// One page of a listing.
#[derive(Debug, Clone)]
pub struct Page {
    pub data: Vec<Value>,
    pub links: PageLinks,
}

/// A collection of records of one kind.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> Collection<T> {
    pub fn insert(&mut self, item: T) -> T {
        self.items.push(item.clone());
        item
    }

    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }

    fn matching(&self, filter: &QueryFilter) -> StoreResult<Vec<Value>> {
        let mut documents = Vec::new();
        for item in &self.items {
            let document = serde_json::to_value(item)?;
            if filter.matches(&document) {
                documents.push(document);
            }
        }
        Ok(documents)
    }

    /// Number of records matching a filter.
    pub fn count(&self, filter: &QueryFilter) -> StoreResult<u64> {
        Ok(self.matching(filter)?.len() as u64)
    }

    /// Run a list query: filter, sort, page, then project.
    pub fn find_page(&self, query: &ListQuery, page: PageRequest) -> StoreResult<Page> {
        let mut documents = self.matching(&query.filter)?;
        let pagination = page.paginate(documents.len() as u64);
        query.sort_documents(&mut documents);

        let skip = usize::try_from(pagination.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit).unwrap_or(usize::MAX);
        let data = documents
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|document| query.project(document))
            .collect();

        Ok(Page {
            data,
            links: pagination.links,
        })
    }
}

/// All collections of the service.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    pub users: Collection<User>,
    pub venues: Collection<Venue>,
    pub offers: Collection<Offer>,
    pub menus: Collection<Menu>,
    pub packages: Collection<Package>,
    pub reviews: Collection<Review>,
    pub staff: Collection<Staff>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        let email = crate::models::normalize_email(email);
        self.users.iter().find(|user| user.email == email)
    }

    pub fn staff_by_email(&self, email: &str) -> Option<&Staff> {
        let email = crate::models::normalize_email(email);
        self.staff.iter().find(|staff| staff.email == email)
    }

    /// Record a successful owner login.
    pub fn touch_user_login(&mut self, id: Uuid) {
        if let Some(user) = self.users.get_mut(id) {
            user.last_login = Some(Utc::now());
        }
    }

    /// Record a successful staff login.
    pub fn touch_staff_login(&mut self, id: Uuid) {
        if let Some(staff) = self.staff.get_mut(id) {
            staff.last_login = Some(Utc::now());
        }
    }

    /// Join a venue child with its parent venue.
    ///
    /// A child whose venue has disappeared is treated as missing.
    pub fn via_venue<'a, T: VenueChild>(&'a self, item: Option<&'a T>) -> Option<ViaVenue<'a, T>> {
        let item = item?;
        let venue = self.venues.get(item.venue_id())?;
        Some(ViaVenue { item, venue })
    }

    pub fn has_reviewed(&self, reviewer: Uuid, venue: Uuid) -> bool {
        self.reviews
            .iter()
            .any(|review| review.owner == reviewer && review.venue == venue)
    }

    /// Venue ids in `venues` that do not belong to `owner`.
    pub fn foreign_venues(&self, owner: Uuid, venues: &[Uuid]) -> Vec<Uuid> {
        venues
            .iter()
            .copied()
            .filter(|id| self.venues.get(*id).map(|v| v.owner) != Some(owner))
            .collect()
    }

    /// Create the admin account unless the email is already registered.
    ///
    /// Returns whether an account was created.
    pub fn ensure_admin(&mut self, name: &str, email: &str, password_hash: String) -> bool {
        if self.user_by_email(email).is_some() {
            return false;
        }
        self.users
            .insert(User::new(name, email, password_hash, UserRole::Admin));
        true
    }

    /// Delete a venue together with everything hanging off it, and drop it
    /// from staff allowlists.
    pub fn delete_venue(&mut self, id: Uuid) -> Option<Venue> {
        let venue = self.venues.remove(id)?;
        self.menus.retain(|menu| menu.venue != id);
        self.packages.retain(|package| package.venue != id);
        self.offers.retain(|offer| offer.venue != id);
        self.reviews.retain(|review| review.venue != id);
        for staff in self.staff.items.iter_mut() {
            staff.venues.retain(|venue| *venue != id);
        }
        Some(venue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::StaffRole;
    use crate::auth::Principal;
    use crate::models::{CreateVenueRequest, MenuRequest, ReviewRequest};
    use crate::policy::{translate, ScopeRule, Translation};

    fn venue_request(name: &str, city: &str, capacity: u32, price: f64) -> CreateVenueRequest {
        CreateVenueRequest {
            name: name.into(),
            description: String::new(),
            category: "banquet".into(),
            city: city.into(),
            address: String::new(),
            capacity,
            price_per_head: Some(price),
        }
    }

    fn list_query(raw: &[(&str, &str)]) -> ListQuery {
        let raw: Vec<(String, String)> = raw
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        match translate(&raw, &Principal::Anonymous, ScopeRule::Explicit).unwrap() {
            Translation::Query(query) => query,
            Translation::EmptyResult => panic!("expected query"),
        }
    }

    fn seeded() -> (InMemoryStore, Uuid) {
        let mut store = InMemoryStore::new();
        let owner = Uuid::new_v4();
        store.venues.insert(venue_request("A", "Lahore", 50, 10.0).into_venue(owner));
        store.venues.insert(venue_request("B", "Lahore", 150, 25.0).into_venue(owner));
        store.venues.insert(venue_request("C", "Karachi", 300, 40.0).into_venue(owner));
        (store, owner)
    }

    #[test]
    fn filter_sort_page_and_project() {
        let (store, _) = seeded();
        let query = list_query(&[
            ("city", "Lahore"),
            ("sort", "-capacity"),
            ("select", "name"),
            ("limit", "1"),
        ]);
        let page = store
            .venues
            .find_page(&query, query.page_request(25, 100))
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0]["name"], "B");
        assert!(page.data[0].get("city").is_none());
        assert!(page.links.next.is_some());
        assert!(page.links.prev.is_none());
    }

    #[test]
    fn comparison_filter_counts() {
        let (store, _) = seeded();
        let query = list_query(&[("pricePerHead[gte]", "25")]);
        assert_eq!(store.venues.count(&query.filter).unwrap(), 2);

        let query = list_query(&[("capacity[lt]", "100"), ("city", "Lahore")]);
        assert_eq!(store.venues.count(&query.filter).unwrap(), 1);
    }

    #[test]
    fn owner_filter_matches_uuid_strings() {
        let (store, owner) = seeded();
        let filter = QueryFilter::new().with_equals("owner", owner.to_string());
        assert_eq!(store.venues.count(&filter).unwrap(), 3);

        let filter = QueryFilter::new().with_equals("owner", Uuid::new_v4().to_string());
        assert_eq!(store.venues.count(&filter).unwrap(), 0);
    }

    #[test]
    fn venue_delete_cascades() {
        let (mut store, owner) = seeded();
        let venue = store.venues.iter().next().unwrap().id;
        let menu = store.menus.insert(
            MenuRequest {
                name: "Dinner".into(),
                items: vec![],
            }
            .into_menu(venue),
        );
        store.reviews.insert(
            ReviewRequest {
                rating: 4,
                comment: String::new(),
            }
            .into_review(Uuid::new_v4(), venue),
        );
        store.staff.insert(Staff::new(
            owner,
            "Bo",
            "bo@x.io",
            "h",
            StaffRole::Host,
            vec![venue],
        ));

        assert!(store.delete_venue(venue).is_some());
        assert!(store.menus.get(menu.id).is_none());
        assert!(store.reviews.is_empty());
        assert!(store.staff.iter().all(|s| s.venues.is_empty()));
        assert_eq!(store.venues.len(), 2);
    }

    #[test]
    fn orphaned_child_is_missing() {
        let mut store = InMemoryStore::new();
        let menu = store.menus.insert(
            MenuRequest {
                name: "Lunch".into(),
                items: vec![],
            }
            .into_menu(Uuid::new_v4()),
        );
        assert!(store.via_venue(store.menus.get(menu.id)).is_none());
    }

    #[test]
    fn email_lookup_and_login_touch() {
        let mut store = InMemoryStore::new();
        let user = store
            .users
            .insert(User::new("Ada", "ada@example.com", "h", UserRole::User));
        assert!(store.user_by_email(" ADA@example.com").is_some());

        store.touch_user_login(user.id);
        assert!(store.users.get(user.id).unwrap().last_login.is_some());
    }

    #[test]
    fn admin_seed_is_idempotent() {
        let mut store = InMemoryStore::new();
        assert!(store.ensure_admin("Admin", "root@example.com", "h".into()));
        assert!(!store.ensure_admin("Admin", "ROOT@example.com", "h2".into()));
        assert_eq!(store.users.len(), 1);
        assert_eq!(store.users.iter().next().unwrap().role, UserRole::Admin);
    }

    #[test]
    fn foreign_venue_detection() {
        let (store, owner) = seeded();
        let own = store.venues.iter().next().unwrap().id;
        let stranger = Uuid::new_v4();
        assert_eq!(store.foreign_venues(owner, &[own, stranger]), vec![stranger]);
    }
}
