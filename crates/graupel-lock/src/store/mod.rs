mod redis;

pub use self::redis::*;

use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// The minimal shared-store surface the lock protocol consumes.
///
/// The two write operations must be atomic on the store side; that
/// atomicity is what the lock's mutual-exclusion guarantee rests on.
/// Implementations are expected to auto-expire keys written by
/// [`set_nx`](KvStore::set_nx) once their TTL elapses.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Reads the value stored at `key`, or `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Atomically creates `key` with `value` and the given TTL, only if
    /// the key does not already exist. Returns `true` iff the key was
    /// newly created.
    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> Result<bool>;

    /// Atomically deletes `key` only if its current value equals
    /// `expected`. Returns `true` iff a key was deleted.
    async fn compare_and_delete(&self, key: &str, expected: &str) -> Result<bool>;
}

#[async_trait]
impl<S> KvStore for Arc<S>
where
    S: KvStore + ?Sized,
{
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        (**self).set_nx(key, value, ttl).await
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> Result<bool> {
        (**self).compare_and_delete(key, expected).await
    }
}
