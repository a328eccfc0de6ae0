// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared test fixtures: signing keys, JWKS documents and signed tokens.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use ring::rand::SystemRandom;
use ring::signature::{EcdsaKeyPair, KeyPair, ECDSA_P256_SHA256_FIXED_SIGNING};
use serde_json::{json, Map, Value};

use crate::auth::KeySet;

pub const SECRET_KEY: &str = "authik_sk_test_0123456789";

/// P-256 signing key generated fresh for each test.
pub struct TestKey {
    pub kid: String,
    encoding_key: EncodingKey,
    x: String,
    y: String,
}

impl TestKey {
    pub fn generate(kid: &str) -> Self {
        let rng = SystemRandom::new();
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, &rng)
            .expect("generate P-256 key");
        let pair = EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, pkcs8.as_ref(), &rng)
            .expect("parse P-256 key");

        // Uncompressed SEC1 point: 0x04 || x || y
        let point = pair.public_key().as_ref();
        assert_eq!(point.len(), 65);

        Self {
            kid: kid.to_string(),
            encoding_key: EncodingKey::from_ec_der(pkcs8.as_ref()),
            x: URL_SAFE_NO_PAD.encode(&point[1..33]),
            y: URL_SAFE_NO_PAD.encode(&point[33..65]),
        }
    }

    pub fn jwk(&self) -> Value {
        json!({
            "kty": "EC",
            "crv": "P-256",
            "alg": "ES256",
            "use": "sig",
            "kid": self.kid,
            "x": self.x,
            "y": self.y,
        })
    }

    /// JWKS response body listing `keys`.
    pub fn jwks_body(keys: &[&TestKey]) -> String {
        json!({ "keys": keys.iter().map(|k| k.jwk()).collect::<Vec<_>>() }).to_string()
    }

    pub fn key_set(keys: &[&TestKey]) -> KeySet {
        let jwks: JwkSet = serde_json::from_str(&Self::jwks_body(keys)).expect("valid JWKS");
        KeySet::from(jwks)
    }

    /// Sign arbitrary claims with this key's `kid` in the header.
    pub fn sign(&self, claims: &Value) -> String {
        let mut header = Header::new(Algorithm::ES256);
        header.kid = Some(self.kid.clone());
        encode(&header, claims, &self.encoding_key).expect("sign token")
    }

    /// Sign without a `kid` header.
    pub fn sign_without_kid(&self, claims: &Value) -> String {
        let header = Header::new(Algorithm::ES256);
        encode(&header, claims, &self.encoding_key).expect("sign token")
    }
}

/// Claim set builder for session tokens.
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Valid session claims around `now`: issued a minute ago, expiring in an hour.
    pub fn session(now: DateTime<Utc>) -> Self {
        let mut map = Map::new();
        map.insert("sub".into(), json!("user_123"));
        map.insert("sid".into(), json!("sess_abc"));
        map.insert("iat".into(), json!((now - TimeDelta::minutes(1)).timestamp()));
        map.insert("exp".into(), json!((now + TimeDelta::hours(1)).timestamp()));
        Self(map)
    }

    pub fn set(mut self, name: &str, value: Value) -> Self {
        self.0.insert(name.to_string(), value);
        self
    }

    pub fn remove(mut self, name: &str) -> Self {
        self.0.remove(name);
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.0)
    }
}

/// Replace the signature segment of a compact token with another valid-looking one.
pub fn tamper_signature(token: &str) -> String {
    let (signed, signature) = token.rsplit_once('.').expect("compact token");
    let mut bytes = URL_SAFE_NO_PAD.decode(signature).expect("base64 signature");
    bytes[0] ^= 0x01;
    format!("{signed}.{}", URL_SAFE_NO_PAD.encode(bytes))
}
