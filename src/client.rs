// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The Authik client: session verification and user lookup.

use std::sync::Arc;

use axum::http::{HeaderMap, Method, Request};
use chrono::Utc;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tracing::{debug, warn};

use crate::auth::cache::KeySetCache;
use crate::auth::extractor::{session_cookie, SESSION_COOKIE_NAME};
use crate::auth::jwks::{KeySet, KeySetFetcher};
use crate::auth::verifier::TokenVerifier;
use crate::auth::SessionToken;
use crate::config::{ClientConfig, ConfigError};
use crate::error::Error;
use crate::models::User;
use crate::transport::{HttpTransport, Transport};

/// Characters escaped in a single URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Authik API client.
///
/// Cloning is cheap; clones share the transport and the key set cache.
/// Independently constructed clients never share cache state.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    fetcher: KeySetFetcher,
    key_sets: Arc<KeySetCache>,
    verifier: TokenVerifier,
}

impl Client {
    /// Client for the production API.
    ///
    /// Fails if `secret_key` is not an `authik_sk_` key.
    pub fn new(secret_key: impl Into<String>) -> Result<Self, ConfigError> {
        Self::with_config(ClientConfig::new(secret_key)?)
    }

    /// Client configured from `AUTHIK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::with_config(ClientConfig::from_env()?)
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Client that sends every API request through `transport`.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            fetcher: KeySetFetcher::new(Arc::clone(&transport)),
            transport,
            key_sets: Arc::new(KeySetCache::new(config.jwks_cache_ttl)),
            verifier: TokenVerifier::with_leeway(config.leeway),
        }
    }

    /// Verify a compact session token.
    ///
    /// Fetches the JWKS first if the cached copy is missing or expired. Fetch
    /// failures are returned unchanged and leave the cache empty.
    pub async fn verify_session_token(&self, token: &str) -> Result<SessionToken, Error> {
        let key_set = self.current_key_set().await?;

        match self.verifier.verify(token, &key_set) {
            Ok(session) => {
                debug!(
                    user_id = %session.user_id,
                    session_id = %session.session_id,
                    "Session token verified"
                );
                Ok(session)
            }
            Err(failure) if failure.is_expired() => {
                debug!("Session token expired");
                Err(failure.into())
            }
            Err(failure) => {
                warn!(reason = %failure, "Session token rejected");
                Err(failure.into())
            }
        }
    }

    /// Verify the session cookie of an HTTP request.
    pub async fn verify_session_token_request<B>(
        &self,
        request: &Request<B>,
    ) -> Result<SessionToken, Error> {
        self.verify_session_token_cookie(request.headers(), SESSION_COOKIE_NAME)
            .await
    }

    /// Verify the token stored in cookie `cookie_name`.
    ///
    /// A missing cookie fails with [`Error::SessionTokenMissing`] before any
    /// network access.
    pub async fn verify_session_token_cookie(
        &self,
        headers: &HeaderMap,
        cookie_name: &str,
    ) -> Result<SessionToken, Error> {
        let token = session_cookie(headers, cookie_name).ok_or(Error::SessionTokenMissing)?;
        self.verify_session_token(&token).await
    }

    /// Fetch a user by ID.
    pub async fn get_user(&self, id: &str) -> Result<User, Error> {
        let path = format!("/users/{}", utf8_percent_encode(id, PATH_SEGMENT));
        let response = self.transport.request(Method::GET, &path, None).await?;
        response.decode()
    }

    /// Fetch the JWKS now and replace the cached copy.
    pub async fn refresh_key_set(&self) -> Result<(), Error> {
        let key_set = self.fetcher.fetch().await?;
        self.key_sets.replace(key_set, Utc::now()).await;
        Ok(())
    }

    /// Forget the cached JWKS; the next verification refetches it.
    pub async fn clear_key_set_cache(&self) {
        self.key_sets.invalidate().await;
    }

    /// Whether a usable JWKS is currently cached.
    pub async fn is_key_set_cached(&self) -> bool {
        self.key_sets
            .get_or_stale()
            .await
            .usable_at(Utc::now())
            .is_some()
    }

    async fn current_key_set(&self) -> Result<Arc<KeySet>, Error> {
        let now = Utc::now();
        if let Some(key_set) = self.key_sets.get_or_stale().await.usable_at(now) {
            debug!(keys = key_set.len(), "Using cached JWKS");
            return Ok(key_set);
        }

        let key_set = self.fetcher.fetch().await?;
        Ok(self.key_sets.replace(key_set, now).await)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("key_sets", &self.key_sets)
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}
