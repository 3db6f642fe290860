// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication for owner and staff accounts.
//!
//! ## Auth Flow
//!
//! 1. Client logs in (`/v1/auth/login` or `/v1/staff/login`) and receives an
//!    HS256 token
//! 2. Client sends `Authorization: Bearer <token>`
//! 3. Server:
//!    - Verifies signature and expiry
//!    - Re-checks the account (owner exists, staff still active)
//!    - Builds the request [`Principal`]
//!
//! ## Security
//!
//! - Staff tokens carry a permission snapshot taken at login
//! - Passwords are stored as Argon2id hashes
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod token;

pub use claims::{Principal, PrincipalKind, TokenClaims};
pub use error::AuthError;
pub use extractor::{Auth, OptionalAuth};
pub use middleware::authenticate;
pub use roles::{Capability, PermissionSet, StaffRole, UserRole};
pub use token::TokenService;
