// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and key selection.
//!
//! ## Security
//!
//! - Keys are fetched from the authenticated `/jwks` endpoint only
//! - A key pins its own algorithm; the token header cannot pick another one
//! - Fetch failures are returned as-is and never fall back to old keys

use std::sync::Arc;

use axum::http::Method;
use jsonwebtoken::jwk::{AlgorithmParameters, EllipticCurve, Jwk, JwkSet, KeyAlgorithm};
use jsonwebtoken::{Algorithm, DecodingKey};
use tracing::{debug, warn};

use crate::error::Error;
use crate::transport::Transport;

/// API path of the provider's key set.
pub const JWKS_PATH: &str = "/jwks";

/// Immutable set of public verification keys.
#[derive(Debug, Clone)]
pub struct KeySet {
    jwks: JwkSet,
}

impl KeySet {
    /// Look up a key by its `kid`.
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.jwks
            .keys
            .iter()
            .find(|k| k.common.key_id.as_deref() == Some(kid))
    }

    pub fn len(&self) -> usize {
        self.jwks.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jwks.keys.is_empty()
    }

    /// Identifiers of every key in the set, in document order.
    pub fn key_ids(&self) -> impl Iterator<Item = &str> {
        self.jwks
            .keys
            .iter()
            .filter_map(|k| k.common.key_id.as_deref())
    }
}

impl From<JwkSet> for KeySet {
    fn from(jwks: JwkSet) -> Self {
        Self { jwks }
    }
}

/// Retrieves the current key set from the backend.
#[derive(Clone)]
pub struct KeySetFetcher {
    transport: Arc<dyn Transport>,
}

impl KeySetFetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetch and decode the key set.
    ///
    /// Non-2xx answers surface as [`Error::Api`]; network and decode failures
    /// as [`Error::Transport`].
    pub async fn fetch(&self) -> Result<KeySet, Error> {
        let response = self
            .transport
            .request(Method::GET, JWKS_PATH, None)
            .await
            .inspect_err(|e| warn!(error = %e, "JWKS fetch failed"))?;

        let jwks: JwkSet = response
            .decode()
            .inspect_err(|e| warn!(error = %e, "JWKS response rejected"))?;

        let key_set = KeySet::from(jwks);
        if key_set.is_empty() {
            warn!("Fetched JWKS contains no keys");
        } else {
            debug!(keys = key_set.len(), "Fetched JWKS");
        }
        Ok(key_set)
    }
}

/// Convert a JWK to a decoding key and the one algorithm it may verify.
pub(crate) fn jwk_to_decoding_key(jwk: &Jwk) -> Result<(DecodingKey, Algorithm), String> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => {
            let key = DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
                .map_err(|e| format!("failed to create RSA key: {e}"))?;

            let alg = match jwk.common.key_algorithm {
                None | Some(KeyAlgorithm::RS256) => Algorithm::RS256,
                Some(KeyAlgorithm::RS384) => Algorithm::RS384,
                Some(KeyAlgorithm::RS512) => Algorithm::RS512,
                Some(KeyAlgorithm::PS256) => Algorithm::PS256,
                Some(KeyAlgorithm::PS384) => Algorithm::PS384,
                Some(KeyAlgorithm::PS512) => Algorithm::PS512,
                Some(other) => return Err(format!("RSA key declares unsupported alg {other:?}")),
            };

            Ok((key, alg))
        }
        AlgorithmParameters::EllipticCurve(ec) => {
            let key = DecodingKey::from_ec_components(&ec.x, &ec.y)
                .map_err(|e| format!("failed to create EC key: {e}"))?;

            let alg = match (&ec.curve, jwk.common.key_algorithm) {
                (EllipticCurve::P256, None | Some(KeyAlgorithm::ES256)) => Algorithm::ES256,
                (EllipticCurve::P384, None | Some(KeyAlgorithm::ES384)) => Algorithm::ES384,
                (curve, alg) => {
                    return Err(format!("unsupported EC key: curve {curve:?}, alg {alg:?}"))
                }
            };

            Ok((key, alg))
        }
        AlgorithmParameters::OctetKeyPair(okp) => {
            if okp.curve != EllipticCurve::Ed25519 {
                return Err(format!("unsupported OKP curve {:?}", okp.curve));
            }
            let key = DecodingKey::from_ed_components(&okp.x)
                .map_err(|e| format!("failed to create EdDSA key: {e}"))?;
            Ok((key, Algorithm::EdDSA))
        }
        _ => Err("unsupported key type in JWKS".to_string()),
    }
}
