// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account roles, staff roles and the staff permission matrix.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role of an owner account.
///
/// - `User` - Owns venues and the resources hanging off them
/// - `Admin` - Platform administrator, bypasses ownership checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Normal venue owner
    User,
    /// Platform administrator
    Admin,
}

impl UserRole {
    /// Parse role from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<UserRole> {
        match s.to_lowercase().as_str() {
            "user" => Some(UserRole::User),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

impl Default for UserRole {
    /// Default role is User (least privilege for owner accounts).
    fn default() -> Self {
        UserRole::User
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::User => write!(f, "user"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

/// Role of a staff member acting on behalf of an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Admin,
    Manager,
    Host,
    BookingAgent,
    MenuManager,
}

impl StaffRole {
    /// Parse role from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<StaffRole> {
        match s.to_lowercase().as_str() {
            "admin" => Some(StaffRole::Admin),
            "manager" => Some(StaffRole::Manager),
            "host" => Some(StaffRole::Host),
            "booking_agent" => Some(StaffRole::BookingAgent),
            "menu_manager" => Some(StaffRole::MenuManager),
            _ => None,
        }
    }

    /// Parse an optional role string, falling back to `Host` for unknown or
    /// missing values.
    pub fn parse_or_default(s: Option<&str>) -> StaffRole {
        s.and_then(StaffRole::from_str).unwrap_or_default()
    }

    /// The fixed permission set granted to this role.
    pub fn permissions(&self) -> PermissionSet {
        PermissionSet::for_role(*self)
    }
}

impl Default for StaffRole {
    /// Default role is Host (only accepts reservations).
    fn default() -> Self {
        StaffRole::Host
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StaffRole::Admin => write!(f, "admin"),
            StaffRole::Manager => write!(f, "manager"),
            StaffRole::Host => write!(f, "host"),
            StaffRole::BookingAgent => write!(f, "booking_agent"),
            StaffRole::MenuManager => write!(f, "menu_manager"),
        }
    }
}

/// A single capability that can be checked against a [`PermissionSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ManageVenues,
    ManageStaff,
    ManageBookings,
    ManageMenu,
    ManageOffers,
    ManagePackages,
    ViewReports,
    AcceptReservations,
}

impl Capability {
    /// Flag name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ManageVenues => "canManageVenues",
            Capability::ManageStaff => "canManageStaff",
            Capability::ManageBookings => "canManageBookings",
            Capability::ManageMenu => "canManageMenu",
            Capability::ManageOffers => "canManageOffers",
            Capability::ManagePackages => "canManagePackages",
            Capability::ViewReports => "canViewReports",
            Capability::AcceptReservations => "canAcceptReservations",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-shape record of boolean capability flags.
///
/// Staff records persist the set resolved from their role; it is refreshed
/// only when the role changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSet {
    pub can_manage_venues: bool,
    pub can_manage_staff: bool,
    pub can_manage_bookings: bool,
    pub can_manage_menu: bool,
    pub can_manage_offers: bool,
    pub can_manage_packages: bool,
    pub can_view_reports: bool,
    pub can_accept_reservations: bool,
}

impl PermissionSet {
    /// Every capability granted (owners and staff admins).
    pub const fn all() -> Self {
        Self {
            can_manage_venues: true,
            can_manage_staff: true,
            can_manage_bookings: true,
            can_manage_menu: true,
            can_manage_offers: true,
            can_manage_packages: true,
            can_view_reports: true,
            can_accept_reservations: true,
        }
    }

    /// No capability granted (anonymous callers).
    pub const fn none() -> Self {
        Self {
            can_manage_venues: false,
            can_manage_staff: false,
            can_manage_bookings: false,
            can_manage_menu: false,
            can_manage_offers: false,
            can_manage_packages: false,
            can_view_reports: false,
            can_accept_reservations: false,
        }
    }

    /// Role → permission table.
    pub const fn for_role(role: StaffRole) -> Self {
        match role {
            StaffRole::Admin => Self::all(),
            StaffRole::Manager => Self {
                can_manage_staff: false,
                ..Self::all()
            },
            StaffRole::BookingAgent => Self {
                can_manage_bookings: true,
                can_accept_reservations: true,
                ..Self::none()
            },
            StaffRole::MenuManager => Self {
                can_manage_menu: true,
                can_manage_offers: true,
                can_manage_packages: true,
                ..Self::none()
            },
            StaffRole::Host => Self {
                can_accept_reservations: true,
                ..Self::none()
            },
        }
    }

    /// Check whether the set grants a capability.
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::ManageVenues => self.can_manage_venues,
            Capability::ManageStaff => self.can_manage_staff,
            Capability::ManageBookings => self.can_manage_bookings,
            Capability::ManageMenu => self.can_manage_menu,
            Capability::ManageOffers => self.can_manage_offers,
            Capability::ManagePackages => self.can_manage_packages,
            Capability::ViewReports => self.can_view_reports,
            Capability::AcceptReservations => self.can_accept_reservations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Column order: venues, staff, bookings, menu, offers, packages, reports, reservations
    fn flags(set: PermissionSet) -> [bool; 8] {
        [
            set.can_manage_venues,
            set.can_manage_staff,
            set.can_manage_bookings,
            set.can_manage_menu,
            set.can_manage_offers,
            set.can_manage_packages,
            set.can_view_reports,
            set.can_accept_reservations,
        ]
    }

    #[test]
    fn role_table_matches_exactly() {
        const T: bool = true;
        const F: bool = false;
        let table = [
            (StaffRole::Admin, [T, T, T, T, T, T, T, T]),
            (StaffRole::Manager, [T, F, T, T, T, T, T, T]),
            (StaffRole::BookingAgent, [F, F, T, F, F, F, F, T]),
            (StaffRole::MenuManager, [F, F, F, T, T, T, F, F]),
            (StaffRole::Host, [F, F, F, F, F, F, F, T]),
        ];

        for (role, expected) in table {
            assert_eq!(flags(role.permissions()), expected, "role {role}");
        }
    }

    #[test]
    fn unknown_or_missing_role_falls_back_to_host() {
        assert_eq!(StaffRole::parse_or_default(Some("janitor")), StaffRole::Host);
        assert_eq!(StaffRole::parse_or_default(None), StaffRole::Host);
        assert_eq!(
            StaffRole::parse_or_default(Some("MENU_MANAGER")),
            StaffRole::MenuManager
        );
    }

    #[test]
    fn allows_reads_matching_flag() {
        let set = StaffRole::MenuManager.permissions();
        assert!(set.allows(Capability::ManageMenu));
        assert!(!set.allows(Capability::ManageStaff));
        assert!(PermissionSet::all().allows(Capability::ViewReports));
        assert!(!PermissionSet::none().allows(Capability::AcceptReservations));
    }

    #[test]
    fn permission_set_serializes_camel_case() {
        let json = serde_json::to_value(StaffRole::Host.permissions()).unwrap();
        assert_eq!(json["canAcceptReservations"], true);
        assert_eq!(json["canManageStaff"], false);
    }

    #[test]
    fn staff_role_round_trips_snake_case() {
        let json = serde_json::to_string(&StaffRole::BookingAgent).unwrap();
        assert_eq!(json, r#""booking_agent""#);
        assert_eq!(UserRole::from_str("ADMIN"), Some(UserRole::Admin));
        assert_eq!(UserRole::default(), UserRole::User);
    }
}
