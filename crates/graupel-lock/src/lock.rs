use core::fmt;
use std::time::Duration;

use rand::{Rng, rng};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{KvStore, Result};

/// Proof of one successful acquisition.
///
/// A fresh random token is generated for every acquisition and stored as
/// the lock's value; release only succeeds when the caller presents the
/// exact token it was handed. A stale token (the caller's TTL expired
/// and someone else acquired the key) can therefore never release the
/// current holder's lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockToken(String);

impl LockToken {
    fn generate() -> Self {
        let raw: u128 = rng().random();
        Self(format!("{raw:032x}"))
    }

    /// The token's stored string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mutual exclusion across processes, built on a shared key-value
/// store.
///
/// Exclusion is guaranteed by the store's atomic set-if-absent: exactly
/// one of any number of concurrent acquirers of a key succeeds. Each
/// handle owns its store client; there is no ambient global connection.
///
/// There is no queueing or fairness between competing callers and no
/// automatic renewal of a held lock; a caller that loses the race
/// decides its own retry and backoff policy, and a holder that crashes
/// is recovered solely by the key's TTL expiry.
pub struct DistributedLock<S> {
    store: S,
    acquire_gate: Mutex<()>,
}

impl<S> DistributedLock<S>
where
    S: KvStore,
{
    /// Wraps a store client in a lock handle.
    pub fn new(store: S) -> Self {
        Self {
            store,
            acquire_gate: Mutex::new(()),
        }
    }

    /// Attempts to acquire the lock at `key` for at most `ttl`.
    ///
    /// Returns `Ok(Some(token))` when this caller created the key; the
    /// token must be kept and presented to [`unlock`](Self::unlock).
    /// Returns `Ok(None)` when the key is already held. The store
    /// auto-expires the key after `ttl`, which bounds how long a crashed
    /// holder can block others.
    ///
    /// Concurrent calls through the same handle serialize locally before
    /// touching the store; this only avoids redundant round trips racing
    /// each other — distributed exclusion comes from the store's atomic
    /// set-if-absent, not from this gate.
    ///
    /// # Errors
    ///
    /// Store failures surface as [`LockError`](crate::LockError) rather
    /// than a `false` outcome, so contention and infrastructure failure
    /// remain distinguishable.
    pub async fn lock(&self, key: &str, ttl: Duration) -> Result<Option<LockToken>> {
        let _gate = self.acquire_gate.lock().await;

        // Fast path: a held key loses the race without the write round
        // trip. Correctness does not depend on this read; set_nx below
        // resolves conflicts atomically either way.
        if let Some(holder) = self.store.get(key).await? {
            if !holder.is_empty() {
                debug!(key, "lock already held");
                return Ok(None);
            }
        }

        let token = LockToken::generate();
        if self.store.set_nx(key, token.as_str(), ttl).await? {
            debug!(key, "lock acquired");
            Ok(Some(token))
        } else {
            debug!(key, "lost acquisition race");
            Ok(None)
        }
    }

    /// Releases the lock at `key`, if and only if it still holds
    /// `token`.
    ///
    /// Returns `true` when the caller's own key was deleted. Returns
    /// `false` when the key is absent (already expired) or holds a
    /// different acquisition's token; in the latter case the current
    /// holder's key is left intact.
    ///
    /// # Errors
    ///
    /// Store failures surface as [`LockError`](crate::LockError).
    pub async fn unlock(&self, key: &str, token: &LockToken) -> Result<bool> {
        let released = self.store.compare_and_delete(key, token.as_str()).await?;
        if released {
            debug!(key, "lock released");
        } else {
            warn!(key, "unlock token did not match current holder");
        }
        Ok(released)
    }

    /// Returns a reference to the underlying store client.
    pub fn store(&self) -> &S {
        &self.store
    }
}
