use crate::PackedId;

/// The outcome of one non-blocking allocation poll.
///
/// - [`IdStatus::Ready`] carries a newly generated ID.
/// - [`IdStatus::Pending`] means the generator is throttled: either the
///   sequence for the current millisecond is exhausted, or the time
///   source is behind the last issued timestamp (backward clock jump).
///   `yield_for` is the number of milliseconds to wait before polling
///   again.
///
/// This allows non-blocking generation loops and clean backoff
/// strategies; the blocking facade in
/// [`IdGenerator::next_id`](crate::IdGenerator::next_id) is built on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStatus<ID: PackedId> {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: ID,
    },
    /// No ID could be generated for the current tick.
    Pending {
        /// Milliseconds until generation can resume.
        yield_for: u64,
    },
}
