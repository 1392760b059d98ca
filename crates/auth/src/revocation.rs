//! In-memory revocation list for tokens invalidated before their expiry.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

use crate::Clock;

/// Revoked tokens keyed by their raw string, with the time of revocation.
///
/// All mutation (insert and prune) happens under the exclusive lock; lookups
/// take the shared lock. A write is visible to every reader as soon as
/// [`RevocationStore::revoke`] returns.
///
/// Entries older than `retention` are swept lazily: `revoke` prunes inline,
/// under the same lock as the insert, at most once per `sweep_interval`.
pub struct RevocationStore {
    inner: RwLock<Entries>,
    retention: Duration,
    sweep_interval: Duration,
    clock: Arc<dyn Clock>,
}

struct Entries {
    revoked: HashMap<String, DateTime<Utc>>,
    last_sweep: DateTime<Utc>,
}

impl RevocationStore {
    pub fn new(retention: Duration, sweep_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        let last_sweep = clock.now();
        Self {
            inner: RwLock::new(Entries {
                revoked: HashMap::new(),
                last_sweep,
            }),
            retention,
            sweep_interval,
            clock,
        }
    }

    /// Mark `token` as revoked. Returns `false` if it already was; the
    /// original revocation time is kept in that case.
    pub fn revoke(&self, token: &str) -> bool {
        let now = self.clock.now();
        let mut guard = self.inner.write();
        let entries = &mut *guard;

        let inserted = if entries.revoked.contains_key(token) {
            false
        } else {
            entries.revoked.insert(token.to_owned(), now);
            true
        };

        if now - entries.last_sweep >= self.sweep_interval {
            let removed = sweep(&mut entries.revoked, now, self.retention);
            entries.last_sweep = now;
            if removed > 0 {
                tracing::debug!(removed, remaining = entries.revoked.len(), "pruned revocation list");
            }
        }

        inserted
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.inner.read().revoked.contains_key(token)
    }

    /// Remove entries older than the retention window. Returns how many were removed.
    ///
    /// Never required for correctness: a token revoked longer ago than the
    /// retention window fails its expiry check anyway.
    pub fn prune(&self) -> usize {
        let now = self.clock.now();
        let mut guard = self.inner.write();
        let entries = &mut *guard;
        let removed = sweep(&mut entries.revoked, now, self.retention);
        entries.last_sweep = now;
        removed
    }

    pub fn len(&self) -> usize {
        self.inner.read().revoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sweep(revoked: &mut HashMap<String, DateTime<Utc>>, now: DateTime<Utc>, retention: Duration) -> usize {
    let before = revoked.len();
    revoked.retain(|_, revoked_at| now - *revoked_at <= retention);
    before - revoked.len()
}
