/// A result type defaulting to [`LockError`].
pub type Result<T, E = LockError> = core::result::Result<T, E>;

/// All possible errors that `graupel-lock` can produce.
///
/// Store failures are surfaced as errors rather than collapsed into a
/// `false` lock outcome, so callers can tell contention apart from
/// infrastructure failure and choose a retry or fail-fast policy.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LockError {
    /// The shared key-value store reported an error (connectivity,
    /// timeout, protocol).
    #[error("key-value store error: {0}")]
    Store(#[from] redis::RedisError),
}
