// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token verification against a key set.
//!
//! Verification runs in a fixed order and stops at the first failure:
//!
//! 1. decode the header; select the key named by `kid`
//! 2. verify the signature with the algorithm pinned by that key
//! 3. check `exp` (reported as expired), then `iat` and `nbf`
//! 4. require `sub` and `sid` and build the [`SessionToken`]

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use super::claims::{SessionClaims, SessionToken};
use super::error::ValidationFailure;
use super::jwks::{jwk_to_decoding_key, KeySet};

/// Verifies compact session tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenVerifier {
    leeway: Duration,
}

impl TokenVerifier {
    /// Verifier with no clock skew tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow this much clock skew when checking time claims.
    pub fn with_leeway(leeway: Duration) -> Self {
        Self { leeway }
    }

    pub fn verify(&self, token: &str, key_set: &KeySet) -> Result<SessionToken, ValidationFailure> {
        self.verify_at(token, key_set, Utc::now())
    }

    /// Verify as of `now`.
    pub fn verify_at(
        &self,
        token: &str,
        key_set: &KeySet,
        now: DateTime<Utc>,
    ) -> Result<SessionToken, ValidationFailure> {
        let header = decode_header(token)
            .map_err(|e| ValidationFailure::invalid_from("token is malformed", e))?;

        let kid = header
            .kid
            .as_deref()
            .ok_or_else(|| ValidationFailure::invalid("token header has no key ID"))?;
        let jwk = key_set
            .find(kid)
            .ok_or_else(|| ValidationFailure::invalid(format!("no key in JWKS matches kid '{kid}'")))?;
        let (decoding_key, algorithm) =
            jwk_to_decoding_key(jwk).map_err(ValidationFailure::invalid)?;

        let claims = decode::<SessionClaims>(token, &decoding_key, &signature_only(algorithm))
            .map_err(map_decode_error)?
            .claims;

        let (issued_at, expires_at) = self.check_time_claims(&claims, now)?;
        session_token(claims, issued_at, expires_at, token)
    }

    /// Check `exp`, `iat` and `nbf`, in that order. Returns `(iat, exp)`.
    fn check_time_claims(
        &self,
        claims: &SessionClaims,
        now: DateTime<Utc>,
    ) -> Result<(i64, i64), ValidationFailure> {
        let leeway = i64::try_from(self.leeway.as_secs()).unwrap_or(i64::MAX);
        let now = now.timestamp();

        let exp = claims
            .exp
            .ok_or_else(|| ValidationFailure::invalid("session token does not contain exp claim"))?;
        if now >= exp.saturating_add(leeway) {
            return Err(ValidationFailure::Expired);
        }

        let iat = claims
            .iat
            .ok_or_else(|| ValidationFailure::invalid("session token does not contain iat claim"))?;
        if iat > now.saturating_add(leeway) {
            return Err(ValidationFailure::invalid("token was issued in the future"));
        }

        if let Some(nbf) = claims.nbf {
            if now < nbf.saturating_sub(leeway) {
                return Err(ValidationFailure::invalid("token is not valid yet"));
            }
        }

        Ok((iat, exp))
    }
}

/// Signature and algorithm checks only; time claims are checked separately
/// so expiry can be reported on its own.
fn signature_only(algorithm: Algorithm) -> Validation {
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation.leeway = 0;
    validation
}

fn map_decode_error(e: jsonwebtoken::errors::Error) -> ValidationFailure {
    let reason = match e.kind() {
        ErrorKind::ExpiredSignature => return ValidationFailure::Expired,
        ErrorKind::InvalidSignature => "token signature is invalid",
        ErrorKind::InvalidAlgorithm => "token algorithm does not match its key",
        ErrorKind::ImmatureSignature => "token is not valid yet",
        ErrorKind::Json(_) => "token claims are malformed",
        _ => "token could not be verified",
    };
    ValidationFailure::invalid_from(reason, e)
}

fn session_token(
    claims: SessionClaims,
    iat: i64,
    exp: i64,
    raw: &str,
) -> Result<SessionToken, ValidationFailure> {
    let session_id = claims.sid.ok_or_else(|| {
        ValidationFailure::invalid("session token does not contain session ID claim")
    })?;
    let user_id = claims
        .sub
        .ok_or_else(|| ValidationFailure::invalid("session token does not contain subject claim"))?;

    let issued_at = DateTime::from_timestamp(iat, 0)
        .ok_or_else(|| ValidationFailure::invalid("iat claim is out of range"))?;
    let expires_at = DateTime::from_timestamp(exp, 0)
        .ok_or_else(|| ValidationFailure::invalid("exp claim is out of range"))?;

    Ok(SessionToken {
        user_id,
        session_id,
        issued_at,
        expires_at,
        raw_value: raw.to_string(),
    })
}
