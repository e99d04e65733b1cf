use core::fmt;
use core::hash::Hash;

/// Trait for packed 64-bit identifiers laid out as
/// `reserved | timestamp | datacenter | worker | sequence`.
///
/// This abstracts the bit layout away from the generators: any type
/// declared with [`define_packed_id!`] implements it, so a deployment can
/// swap field widths without touching allocation logic.
///
/// The backing scalar is fixed to `u64`; callers receive and store plain
/// integers.
///
/// [`define_packed_id!`]: crate::define_packed_id
pub trait PackedId:
    Copy + Clone + fmt::Display + fmt::Debug + PartialOrd + Ord + PartialEq + Eq + Hash
{
    /// Constructs an ID from its timestamp, worker, and sequence fields.
    ///
    /// The datacenter field is always zero; its width is reserved by the
    /// layout declaration.
    fn from_components(timestamp: u64, worker: u64, sequence: u64) -> Self;

    /// Returns the timestamp field: milliseconds elapsed since the epoch
    /// the ID was generated against.
    fn timestamp(&self) -> u64;

    /// Returns the datacenter field (zero in the canonical layout).
    fn datacenter(&self) -> u64;

    /// Returns the worker field.
    fn worker(&self) -> u64;

    /// Returns the sequence field.
    fn sequence(&self) -> u64;

    /// Maximum representable timestamp value.
    fn max_timestamp() -> u64;

    /// Maximum representable datacenter value.
    fn max_datacenter() -> u64;

    /// Maximum representable worker value.
    fn max_worker() -> u64;

    /// Maximum representable sequence value.
    fn max_sequence() -> u64;

    /// Converts this ID into its raw `u64` representation.
    fn to_raw(&self) -> u64;

    /// Converts a raw `u64` into this type.
    fn from_raw(raw: u64) -> Self;

    /// Whether another ID can be issued in the current millisecond.
    fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// Returns the ID with the sequence advanced by one.
    fn increment_sequence(&self) -> Self {
        Self::from_components(self.timestamp(), self.worker(), self.sequence() + 1)
    }

    /// Returns the ID rolled over to a new millisecond with the sequence
    /// reset to zero.
    fn rollover_to_timestamp(&self, timestamp: u64) -> Self {
        Self::from_components(timestamp, self.worker(), 0)
    }
}
