// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Time-bounded cache for the provider's key set.
//!
//! The cache holds at most one key set. An entry is only usable while a key
//! set is present and the current time is strictly before its expiry; a
//! successful fetch replaces the whole entry and failed fetches leave it
//! untouched.
//!
//! The lock is only held to read or swap the entry. Concurrent callers that
//! all observe a stale entry may each fetch; the last replacement wins, which
//! is harmless because every fetch returns the provider's current keys.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;

use super::jwks::KeySet;

/// Snapshot of the cache state.
#[derive(Debug, Clone, Default)]
pub struct CacheEntry {
    key_set: Option<Arc<KeySet>>,
    expires_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    /// Entry holding nothing; always stale.
    pub fn empty() -> Self {
        Self::default()
    }

    fn new(key_set: Arc<KeySet>, expires_at: DateTime<Utc>) -> Self {
        Self {
            key_set: Some(key_set),
            expires_at: Some(expires_at),
        }
    }

    /// The key set, if this entry may still be trusted at `now`.
    pub fn usable_at(&self, now: DateTime<Utc>) -> Option<Arc<KeySet>> {
        match (&self.key_set, self.expires_at) {
            (Some(key_set), Some(expires_at)) if now < expires_at => Some(Arc::clone(key_set)),
            _ => None,
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.key_set.as_ref().and(self.expires_at)
    }
}

/// Single-slot key set cache owned by a client instance.
#[derive(Debug)]
pub struct KeySetCache {
    entry: RwLock<CacheEntry>,
    ttl: Duration,
}

impl KeySetCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(CacheEntry::empty()),
            ttl,
        }
    }

    /// Current entry, fresh or not. Check it with [`CacheEntry::usable_at`].
    pub async fn get_or_stale(&self) -> CacheEntry {
        self.entry.read().await.clone()
    }

    /// Install a freshly fetched key set, valid until `now + ttl`.
    pub async fn replace(&self, key_set: KeySet, now: DateTime<Utc>) -> Arc<KeySet> {
        let key_set = Arc::new(key_set);
        let expires_at = expiry_after(now, self.ttl);
        *self.entry.write().await = CacheEntry::new(Arc::clone(&key_set), expires_at);
        key_set
    }

    /// Drop the cached key set so the next lookup refetches.
    pub async fn invalidate(&self) {
        *self.entry.write().await = CacheEntry::empty();
    }
}

fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
