//! Logout revocation set.
//!
//! Tokens presented to `/auth/logout` stay rejected until they expire. The set
//! lives in process memory: it is lost on restart and not shared between
//! instances. Entries are keyed by the SHA-256 digest of the token and are
//! dropped once the token's own expiry has passed.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Default)]
pub struct RevokedTokens {
    // token digest -> token expiry (unix seconds)
    entries: Arc<DashMap<String, i64>>,
}

impl RevokedTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke `token` until `expires_at`.
    pub fn revoke(&self, token: &str, expires_at: i64) {
        self.prune(Utc::now().timestamp());
        self.entries.insert(digest(token), expires_at);
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.entries.contains_key(&digest(token))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn prune(&self, now: i64) {
        self.entries.retain(|_, expires_at| *expires_at > now);
    }
}

fn digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
