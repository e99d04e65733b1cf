use std::time::{Duration, Instant};

use crate::{Error, IdStatus, PackedId, Result, TimeSource};

/// Upper bound on how long [`IdGenerator::next_id`] will wait for the
/// time source to advance before reporting [`Error::ClockStalled`].
///
/// Sequence exhaustion resolves within a millisecond on a healthy clock;
/// a wait that reaches this bound means the clock is frozen or stuck far
/// behind the last issued timestamp.
pub const MAX_CLOCK_STALL: Duration = Duration::from_secs(1);

/// A minimal interface for allocating packed IDs.
pub trait IdGenerator<ID, T>
where
    ID: PackedId,
    T: TimeSource,
{
    /// Attempts to generate the next available ID without blocking.
    ///
    /// Returns [`IdStatus::Ready`] with a new, time-ordered, unique ID if
    /// generation succeeds. If the generator is temporarily exhausted
    /// (the sequence is full and the time has not advanced) or the time
    /// source is behind the last issued timestamp, it returns
    /// [`IdStatus::Pending`] with the number of milliseconds to wait.
    ///
    /// # Errors
    ///
    /// May return an error if the underlying implementation uses a lock
    /// and it is poisoned.
    fn try_poll_id(&self) -> Result<IdStatus<ID>>;

    /// Generates the next available ID, waiting for the clock when the
    /// generator reports [`IdStatus::Pending`].
    ///
    /// The wait is bounded by [`MAX_CLOCK_STALL`], measured on the host's
    /// monotonic clock: a time source that fails to advance within the
    /// bound produces [`Error::ClockStalled`] instead of blocking
    /// indefinitely.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockStalled`] if the time source did not advance
    ///   within [`MAX_CLOCK_STALL`].
    /// - [`Error::LockPoisoned`] if the underlying implementation uses a
    ///   lock and it is poisoned.
    fn next_id(&self) -> Result<ID> {
        let start = Instant::now();
        loop {
            match self.try_poll_id()? {
                IdStatus::Ready { id } => break Ok(id),
                IdStatus::Pending { yield_for } => {
                    let waited = start.elapsed();
                    if waited >= MAX_CLOCK_STALL {
                        break Err(Error::ClockStalled { waited });
                    }
                    let wait = Duration::from_millis(yield_for).min(MAX_CLOCK_STALL - waited);
                    if wait.is_zero() {
                        std::thread::yield_now();
                    } else {
                        std::thread::sleep(wait);
                    }
                }
            }
        }
    }
}
