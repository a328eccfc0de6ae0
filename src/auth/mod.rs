// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Authentication
//!
//! Verification of Authik session tokens.
//!
//! ## Flow
//!
//! 1. The browser sends the `authik_session_token` cookie
//! 2. The client:
//!    - Fetches the Authik JWKS from `/jwks` (cached for an hour)
//!    - Verifies the token signature with the key named by its `kid`
//!    - Checks `exp`, `iat` and `nbf`
//!    - Extracts:
//!      - `sub` → `user_id`
//!      - `sid` → `session_id`
//!
//! ## Failures
//!
//! - Expired tokens → [`Error::SessionTokenExpired`](crate::Error::SessionTokenExpired)
//! - Any other rejection → [`Error::SessionTokenInvalid`](crate::Error::SessionTokenInvalid)
//! - JWKS fetch problems are returned as API or transport errors and are never
//!   reported as an invalid token

pub mod cache;
pub mod claims;
pub mod error;
pub mod extractor;
pub mod jwks;
pub mod middleware;
pub mod verifier;

pub use cache::{CacheEntry, KeySetCache};
pub use claims::{SessionClaims, SessionToken};
pub use error::ValidationFailure;
pub use extractor::{session_cookie, OptionalSession, Session, SESSION_COOKIE_NAME};
pub use jwks::{KeySet, KeySetFetcher};
pub use middleware::require_session;
pub use verifier::TokenVerifier;
