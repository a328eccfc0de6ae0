// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token claims and the verified session representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried by an Authik session token.
///
/// Every field is optional at the serde level so that a missing claim is
/// reported as a validation failure naming the claim, rather than a generic
/// decode error. A claim of the wrong JSON type still fails to decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    #[serde(default)]
    pub sub: Option<String>,

    /// Session ID
    #[serde(default)]
    pub sid: Option<String>,

    /// Issued at timestamp
    #[serde(default, deserialize_with = "numeric_date::deserialize")]
    pub iat: Option<i64>,

    /// Expiration timestamp
    #[serde(default, deserialize_with = "numeric_date::deserialize")]
    pub exp: Option<i64>,

    /// Not before timestamp
    #[serde(default, deserialize_with = "numeric_date::deserialize")]
    pub nbf: Option<i64>,
}

/// RFC 7519 NumericDate: seconds since the epoch, possibly fractional.
/// Fractions are floored to whole seconds.
mod numeric_date {
    use serde::{de::Error as _, Deserialize, Deserializer};
    use serde_json::Number;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(number) = Option::<Number>::deserialize(deserializer)? else {
            return Ok(None);
        };
        if let Some(secs) = number.as_i64() {
            return Ok(Some(secs));
        }
        match number.as_f64() {
            Some(secs) if secs.is_finite() && secs >= i64::MIN as f64 && secs < i64::MAX as f64 => {
                Ok(Some(secs.floor() as i64))
            }
            _ => Err(D::Error::custom(format!("NumericDate out of range: {number}"))),
        }
    }
}

/// A verified session.
///
/// Only produced by a successful verification; holding one is proof that the
/// token was correctly signed and within its validity window at the time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionToken {
    /// Authik user ID (`sub` claim)
    pub user_id: String,

    /// Authik session ID (`sid` claim)
    pub session_id: String,

    pub issued_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,

    /// The compact token as received
    #[serde(skip)]
    pub raw_value: String,
}
