// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token validation failures.

use crate::error::{BoxError, Error};

/// Why a session token was rejected.
///
/// Expiry is kept apart from every other failure: callers typically answer an
/// expired session with a re-login prompt, while an invalid one points at
/// tampering or a protocol mismatch.
#[derive(Debug, thiserror::Error)]
pub enum ValidationFailure {
    /// Correctly signed, but `exp` has passed
    #[error("token has expired")]
    Expired,

    /// Malformed, wrongly signed, outside its validity window, or missing a
    /// required claim
    #[error("{reason}")]
    Invalid {
        reason: String,
        #[source]
        source: Option<jsonwebtoken::errors::Error>,
    },
}

impl ValidationFailure {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ValidationFailure::Invalid {
            reason: reason.into(),
            source: None,
        }
    }

    pub(crate) fn invalid_from(reason: impl Into<String>, source: jsonwebtoken::errors::Error) -> Self {
        ValidationFailure::Invalid {
            reason: reason.into(),
            source: Some(source),
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, ValidationFailure::Expired)
    }
}

impl From<ValidationFailure> for Error {
    fn from(failure: ValidationFailure) -> Self {
        match failure {
            ValidationFailure::Expired => Error::SessionTokenExpired,
            ValidationFailure::Invalid { reason, source } => Error::SessionTokenInvalid {
                reason,
                source: source.map(|e| Box::new(e) as BoxError),
            },
        }
    }
}
