use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use serde::Deserialize;
use std::time::Duration;

use crate::{KvStore, Result};

/// Atomic release script: delete the key only when it still holds the
/// caller's token. Evaluated server-side so the compare and the delete
/// cannot interleave with a competing acquisition.
const RELEASE_SCRIPT: &str =
    "if redis.call('get', KEYS[1]) == ARGV[1] then return redis.call('del', KEYS[1]) else return 0 end";

/// Connection configuration for [`RedisStore`].
///
/// Deserializable so deployments can load it from their config files.
/// Topology concerns (pooling, cluster, sentinel) are the store
/// client's own business and not configured here.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL, e.g. `redis://127.0.0.1/`.
    pub url: String,
    /// Namespace prepended to every key (`namespace:key`), isolating
    /// this deployment's keys from other users of the same store.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String {
    "graupel".to_owned()
}

fn wrap_key(namespace: &str, key: &str) -> String {
    format!("{namespace}:{key}")
}

/// A [`KvStore`] over a Redis connection.
///
/// Cheap to clone; clones share the underlying multiplexed connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    namespace: String,
}

impl RedisStore {
    /// Connects to the Redis instance described by `config`.
    ///
    /// # Errors
    ///
    /// Returns the underlying store error if the URL is malformed or the
    /// initial connection fails.
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let conn = client.get_connection_manager().await?;
        Ok(Self::with_connection(conn, config.namespace.clone()))
    }

    /// Wraps an already-established connection.
    pub fn with_connection(conn: ConnectionManager, namespace: impl Into<String>) -> Self {
        Self {
            conn,
            namespace: namespace.into(),
        }
    }

    fn key(&self, key: &str) -> String {
        wrap_key(&self.namespace, key)
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(self.key(key)).await?;
        Ok(value)
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.conn.clone();
        // PX rejects 0; a zero TTL still has to produce a valid command.
        let ttl_ms = ttl.as_millis().max(1) as u64;
        let created: Option<String> = redis::cmd("SET")
            .arg(self.key(key))
            .arg(value)
            .arg("NX")
            .arg("PX")
            .arg(ttl_ms)
            .query_async(&mut conn)
            .await?;
        Ok(created.is_some())
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let deleted: i64 = redis::Script::new(RELEASE_SCRIPT)
            .key(self.key(key))
            .arg(expected)
            .invoke_async(&mut conn)
            .await?;
        Ok(deleted == 1)
    }
}
