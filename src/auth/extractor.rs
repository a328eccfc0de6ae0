// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session cookie lookup and the Axum extractor for verified sessions.
//!
//! Use the `Session` extractor in handlers to require a signed-in user:
//!
//! ```rust,ignore
//! async fn me(Session(session): Session) -> impl IntoResponse {
//!     // session is SessionToken
//! }
//! ```
//!
//! The router state must provide an [`authik::Client`](crate::Client) through
//! `FromRef`.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::COOKIE, request::Parts, HeaderMap},
};
use cookie::Cookie;

use super::SessionToken;
use crate::client::Client;
use crate::error::Error;

/// Cookie carrying the Authik session token.
pub const SESSION_COOKIE_NAME: &str = "authik_session_token";

/// Find the value of cookie `name` in the request headers.
///
/// Every `Cookie` header is considered; surrounding double quotes are
/// stripped and empty values are treated as absent.
pub fn session_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value_trimmed().to_string())
        .filter(|value| !value.is_empty())
}

/// Extractor for verified sessions.
///
/// Reads the `authik_session_token` cookie and verifies it with the client in
/// the router state. Rejections render as JSON with a 401 status for session
/// failures and 502 when the Authik API could not be reached.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/me", get(me))
///     .with_state(authik::Client::new(secret)?);
/// ```
pub struct Session(pub SessionToken);

impl<S> FromRequestParts<S> for Session
where
    Client: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Middleware further up may already have verified this request
        if let Some(session) = parts.extensions.get::<SessionToken>().cloned() {
            return Ok(Session(session));
        }

        let client = Client::from_ref(state);
        let session = client
            .verify_session_token_cookie(&parts.headers, SESSION_COOKIE_NAME)
            .await?;

        parts.extensions.insert(session.clone());
        Ok(Session(session))
    }
}

/// Optional session extractor.
///
/// Yields `None` when the request carries no valid session instead of
/// rejecting it.
pub struct OptionalSession(pub Option<SessionToken>);

impl<S> FromRequestParts<S> for OptionalSession
where
    Client: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Session::from_request_parts(parts, state).await {
            Ok(Session(session)) => Ok(OptionalSession(Some(session))),
            Err(_) => Ok(OptionalSession(None)),
        }
    }
}
