// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authik - Server-side Session Verification
//!
//! This crate verifies Authik session tokens on the server and looks up
//! Authik users through the backend API.
//!
//! ## Modules
//!
//! - `auth` - JWKS caching, token verification, session cookie extraction
//! - `client` - The [`Client`] tying verification and API calls together
//! - `config` - Client configuration (code or environment)
//! - `error` - Public error taxonomy
//! - `models` - User and email records
//! - `transport` - HTTP transport to the Authik API
//!
//! ## Example
//!
//! ```rust,ignore
//! let client = authik::Client::new("authik_sk_...")?;
//! let session = client.verify_session_token(&token).await?;
//! let user = client.get_user(&session.user_id).await?;
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use auth::{require_session, OptionalSession, Session, SessionToken, SESSION_COOKIE_NAME};
pub use client::Client;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, Error, TransportError};
pub use models::{Email, EmailStatus, User};
