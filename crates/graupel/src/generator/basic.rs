use core::cell::Cell;
use core::cmp::Ordering;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, IdGenerator, IdStatus, PackedId, Result, TimeSource};

/// A non-concurrent ID generator suitable for single-threaded
/// environments.
///
/// This generator is lightweight and fast, but **not thread-safe**: the
/// allocator state lives in a [`Cell`], so the type is not `Sync`. Use
/// one instance per thread, or reach for [`LockIdGenerator`] when the
/// instance must be shared.
///
/// [`LockIdGenerator`]: crate::LockIdGenerator
pub struct BasicIdGenerator<ID, T>
where
    ID: PackedId,
    T: TimeSource,
{
    state: Cell<ID>,
    time: T,
}

impl<ID, T> BasicIdGenerator<ID, T>
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
            state: Cell::new(id),
            time,
        }
    }

    /// Attempts to generate the next available ID without blocking.
    ///
    /// See [`IdGenerator::try_poll_id`] for the contract. This generator
    /// never returns an error; the `Result` keeps the signature uniform
    /// across generators.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<IdStatus<ID>> {
        let now = self.time.current_millis();
        let state = self.state.get();
        let current_ts = state.timestamp();

        match now.cmp(&current_ts) {
            Ordering::Equal => {
                if state.has_sequence_room() {
                    let updated = state.increment_sequence();
                    self.state.set(updated);
                    Ok(IdStatus::Ready { id: updated })
                } else {
                    Ok(IdStatus::Pending { yield_for: 1 })
                }
            }
            Ordering::Greater => {
                let updated = state.rollover_to_timestamp(now);
                self.state.set(updated);
                Ok(IdStatus::Ready { id: updated })
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

impl<ID, T> IdGenerator<ID, T> for BasicIdGenerator<ID, T>
where
    ID: PackedId,
    T: TimeSource,
{
    fn try_poll_id(&self) -> Result<IdStatus<ID>> {
        self.try_poll_id()
    }
}
