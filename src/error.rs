// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Public error types.
//!
//! Every fallible client operation returns [`Error`]. Session validation
//! failures are normalized into three variants so callers can branch on the
//! variant alone; backend and transport failures are passed through.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Boxed cause attached to [`Error::SessionTokenInvalid`] for diagnostics.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Authik client error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The inbound request carried no session cookie.
    #[error("authik: provided request did not have a session token in its cookies")]
    SessionTokenMissing,

    /// The token is well-formed and correctly signed but its `exp` has passed.
    #[error("authik: session token has expired")]
    SessionTokenExpired,

    /// Any other validation failure (structure, signature, time claims,
    /// missing session claims).
    #[error("authik: session token is invalid: {reason}")]
    SessionTokenInvalid {
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The backend answered with a non-2xx status and a structured error body.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The backend could not be reached, or its response could not be decoded.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl Error {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Error::SessionTokenInvalid {
            reason: reason.into(),
            source: None,
        }
    }

    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::SessionTokenMissing => "session_token_missing",
            Error::SessionTokenExpired => "session_token_expired",
            Error::SessionTokenInvalid { .. } => "session_token_invalid",
            Error::Api(_) => "remote_api_error",
            Error::Transport(_) => "transport_error",
        }
    }

    /// HTTP status to answer an inbound request with when this error
    /// rejects it.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::SessionTokenMissing
            | Error::SessionTokenExpired
            | Error::SessionTokenInvalid { .. } => StatusCode::UNAUTHORIZED,
            Error::Api(_) | Error::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Whether the caller should ask the user to sign in again.
    pub fn is_session_error(&self) -> bool {
        self.status_code() == StatusCode::UNAUTHORIZED
    }
}

/// Structured error returned by the Authik backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("authik: API error on {resource} ({error_type}/{code}): {message}")]
pub struct ApiError {
    pub resource: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub code: String,
    pub message: String,
}

/// Failure to reach the backend or to decode what it sent back.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection, TLS, timeout or body read failure.
    #[error("authik: HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A response body was not the JSON document we expected.
    #[error("authik: failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// I/O failure in a custom transport.
    #[error("authik: transport I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Whether the request timed out before a response arrived.
    pub fn is_timeout(&self) -> bool {
        match self {
            TransportError::Http(e) => e.is_timeout(),
            TransportError::Io(e) => e.kind() == std::io::ErrorKind::TimedOut,
            TransportError::Decode(_) => false,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    error_code: &'static str,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if !self.is_session_error() {
            tracing::warn!(error = %self, "Rejecting request: upstream failure");
        }
        let body = Json(ErrorBody {
            error: self.to_string(),
            error_code: self.error_code(),
        });
        (status, body).into_response()
    }
}
