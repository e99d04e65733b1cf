use std::sync::{MutexGuard, PoisonError};
use std::time::Duration;

/// A result type defaulting to [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All possible errors that `graupel` can produce.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The configured worker id does not fit the ID layout's worker field.
    ///
    /// This is a fatal configuration error: starting a worker with an
    /// out-of-range id would alias another worker and break fleet-wide
    /// uniqueness.
    #[error("worker id {worker_id} out of range (max {max})")]
    WorkerIdOutOfRange { worker_id: u64, max: u64 },

    /// The operation failed because another thread panicked while holding
    /// the generator's state lock.
    #[error("generator state lock poisoned")]
    LockPoisoned,

    /// The time source failed to advance within the blocking-wait bound.
    ///
    /// Reported instead of spinning forever when the clock is frozen or
    /// stuck behind the last issued timestamp.
    #[error("clock did not advance within {waited:?}")]
    ClockStalled { waited: Duration },
}

// Convert all poisoned lock errors to a simplified `LockPoisoned`
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
