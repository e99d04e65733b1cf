//! Distributed mutual exclusion over a shared key-value store.
//!
//! The lock protocol is deliberately thin: acquisition is an atomic
//! set-if-absent of a caller-unique token under a TTL, and release is an
//! atomic compare-and-delete that only removes the key when the stored
//! token matches the caller's. Mutual exclusion across processes comes
//! entirely from the store's atomicity; if a holder crashes, the TTL is
//! the sole recovery mechanism.
//!
//! The store is abstracted behind [`KvStore`]; [`RedisStore`] is the
//! production implementation.
//!
//! # Example
//!
//! ```no_run
//! use graupel_lock::{DistributedLock, RedisConfig, RedisStore};
//! use std::time::Duration;
//!
//! # async fn example() -> graupel_lock::Result<()> {
//! let store = RedisStore::connect(&RedisConfig {
//!     url: "redis://127.0.0.1/".into(),
//!     namespace: "orders".into(),
//! })
//! .await?;
//! let lock = DistributedLock::new(store);
//!
//! if let Some(token) = lock.lock("invoice-42", Duration::from_secs(30)).await? {
//!     // Critical section: only one holder at a time across the fleet.
//!     let released = lock.unlock("invoice-42", &token).await?;
//!     assert!(released);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod lock;
mod store;

pub use crate::error::*;
pub use crate::lock::*;
pub use crate::store::*;
