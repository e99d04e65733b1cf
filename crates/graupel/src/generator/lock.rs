use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, IdGenerator, IdStatus, PackedId, Result, TimeSource};

/// A mutex-guarded ID generator suitable for multi-threaded
/// environments.
///
/// The allocator state (last issued timestamp and sequence, packed into
/// one ID value) lives behind an [`Arc<Mutex<_>>`]: every allocation on
/// the same instance serializes through that single exclusive critical
/// section, which is what makes the per-instance monotonicity guarantee
/// hold under concurrency. Clones share the same state.
///
/// ## See also
/// - [`BasicIdGenerator`] for single-threaded use
///
/// [`BasicIdGenerator`]: crate::BasicIdGenerator
pub struct LockIdGenerator<ID, T>
where
    ID: PackedId,
    T: TimeSource,
{
    state: Arc<Mutex<ID>>,
    time: T,
}

impl<ID, T> Clone for LockIdGenerator<ID, T>
where
    ID: PackedId,
    T: TimeSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            time: self.time.clone(),
        }
    }
}

impl<ID, T> std::fmt::Debug for LockIdGenerator<ID, T>
where
    ID: PackedId,
    T: TimeSource + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockIdGenerator")
            .field("state", &self.state)
            .field("time", &self.time)
            .finish()
    }
}

impl<ID, T> LockIdGenerator<ID, T>
where
    ID: PackedId,
    T: TimeSource,
{
    /// Creates a new generator for the given worker identity.
    ///
    /// The worker id is encoded into every produced ID and must be unique
    /// among all concurrently running generator instances for fleet-wide
    /// uniqueness to hold. Only the local range check is enforced here;
    /// cross-instance uniqueness is an operational responsibility.
    ///
    /// # Errors
    ///
    /// [`Error::WorkerIdOutOfRange`] if `worker_id` does not fit the
    /// layout's worker field. Treat this as fatal: the process must not
    /// start.
    ///
    /// # Example
    /// ```
    /// use graupel::{GraupelId, IdGenerator, LockIdGenerator, MonotonicClock};
    ///
    /// let generator: LockIdGenerator<GraupelId, _> =
    ///     LockIdGenerator::new(0, MonotonicClock::default()).unwrap();
    ///
    /// let id = generator.next_id().unwrap();
    /// assert_eq!(id.worker(), 0);
    /// ```
    pub fn new(worker_id: u64, time: T) -> Result<Self> {
        if worker_id > ID::max_worker() {
            return Err(Error::WorkerIdOutOfRange {
                worker_id,
                max: ID::max_worker(),
            });
        }
        Ok(Self::from_components(0, worker_id, 0, time))
    }

    /// Creates a new generator whose worker identity is derived from the
    /// host process id, reduced modulo the worker-field range.
    ///
    /// Convenient for fleets where one ID-generating process runs per
    /// host; note that distinct pids can still collide after reduction.
    pub fn for_pid(time: T) -> Self {
        let worker_id = u64::from(std::process::id()) % (ID::max_worker() + 1);
        Self::from_components(0, worker_id, 0, time)
    }

    /// Creates a generator from explicit component values.
    ///
    /// Primarily useful for restoring state from persistent storage or
    /// for driving the generator to a specific state in tests. Prefer
    /// [`Self::new`] in typical use; this constructor performs no range
    /// validation.
    pub fn from_components(timestamp: u64, worker_id: u64, sequence: u64, time: T) -> Self {
        let id = ID::from_components(timestamp, worker_id, sequence);
        Self {
            state: Arc::new(Mutex::new(id)),
            time,
        }
    }

    /// Attempts to generate the next available ID without blocking.
    ///
    /// See [`IdGenerator::try_poll_id`] for the contract.
    ///
    /// # Errors
    ///
    /// [`Error::LockPoisoned`] if another thread panicked while holding
    /// the state lock.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<IdStatus<ID>> {
        let now = self.time.current_millis();
        let mut id = self.state.lock()?;
        let current_ts = id.timestamp();

        match now.cmp(&current_ts) {
            Ordering::Equal => {
                if id.has_sequence_room() {
                    *id = id.increment_sequence();
                    Ok(IdStatus::Ready { id: *id })
                } else {
                    Ok(IdStatus::Pending { yield_for: 1 })
                }
            }
            Ordering::Greater => {
                *id = id.rollover_to_timestamp(now);
                Ok(IdStatus::Ready { id: *id })
            }
            Ordering::Less => Ok(Self::cold_clock_behind(now, current_ts)),
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, current_ts: u64) -> IdStatus<ID> {
        IdStatus::Pending {
            yield_for: current_ts - now,
        }
    }
}

impl<ID, T> IdGenerator<ID, T> for LockIdGenerator<ID, T>
where
    ID: PackedId,
    T: TimeSource,
{
    fn try_poll_id(&self) -> Result<IdStatus<ID>> {
        self.try_poll_id()
    }
}
