//! Macro-based declaration of packed 64-bit ID layouts.
//!
//! A layout partitions a `u64` from MSB to LSB into a reserved sign field,
//! a timestamp, an optional datacenter field, a worker field, and a
//! sequence field. Field widths are compile-time constants; all 64 bits
//! must be accounted for or the declaration fails to compile.

/// Declares a [`PackedId`]-compatible type with a custom bit layout.
///
/// ## Bit layout
///
/// The ID is packed from **MSB to LSB**:
///
/// ```text
///  Bit Index:  high bits                                      low bits
///              +----------+-----------+------------+--------+----------+
///  Field:      | reserved | timestamp | datacenter | worker | sequence |
///              +----------+-----------+------------+--------+----------+
///              |<------------- MSB ---- 64 bits ---- LSB ------------->|
/// ```
///
/// The reserved field keeps the sign bit of the equivalent `i64` clear.
/// A field may be declared with width zero; its accessor then always
/// returns zero and the width stays visible in the declaration.
///
/// ## Example
///
/// ```
/// use graupel::define_packed_id;
///
/// define_packed_id!(
///     CompactId,
///     reserved: 1,
///     timestamp: 43,
///     datacenter: 0,
///     worker: 10,
///     sequence: 10
/// );
///
/// let id = CompactId::from_parts(1_000, 0, 42, 3);
/// assert_eq!(id.timestamp(), 1_000);
/// assert_eq!(id.worker(), 42);
/// ```
///
/// [`PackedId`]: crate::PackedId
#[macro_export]
macro_rules! define_packed_id {
    (
        $(#[$meta:meta])*
        $name:ident,
        reserved: $reserved_bits:expr,
        timestamp: $timestamp_bits:expr,
        datacenter: $datacenter_bits:expr,
        worker: $worker_bits:expr,
        sequence: $sequence_bits:expr
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name {
            id: u64,
        }

        const _: () = {
            // Compile-time check: the fields _must_ cover the backing
            // integer exactly. This is to avoid aliasing surprises.
            assert!(
                $reserved_bits + $timestamp_bits + $datacenter_bits + $worker_bits + $sequence_bits
                    == u64::BITS as u64,
                "packed ID layout must account for all 64 bits"
            );
        };

        impl $name {
            pub const RESERVED_BITS: u64 = $reserved_bits;
            pub const TIMESTAMP_BITS: u64 = $timestamp_bits;
            pub const DATACENTER_BITS: u64 = $datacenter_bits;
            pub const WORKER_BITS: u64 = $worker_bits;
            pub const SEQUENCE_BITS: u64 = $sequence_bits;

            pub const SEQUENCE_SHIFT: u64 = 0;
            pub const WORKER_SHIFT: u64 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;
            pub const DATACENTER_SHIFT: u64 = Self::WORKER_SHIFT + Self::WORKER_BITS;
            pub const TIMESTAMP_SHIFT: u64 = Self::DATACENTER_SHIFT + Self::DATACENTER_BITS;
            pub const RESERVED_SHIFT: u64 = Self::TIMESTAMP_SHIFT + Self::TIMESTAMP_BITS;

            pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;
            pub const DATACENTER_MASK: u64 = (1 << Self::DATACENTER_BITS) - 1;
            pub const WORKER_MASK: u64 = (1 << Self::WORKER_BITS) - 1;
            pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

            /// Packs the fields into an ID, masking each to its declared
            /// width.
            pub const fn from_parts(
                timestamp: u64,
                datacenter: u64,
                worker: u64,
                sequence: u64,
            ) -> Self {
                let t = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
                let d = (datacenter & Self::DATACENTER_MASK) << Self::DATACENTER_SHIFT;
                let w = (worker & Self::WORKER_MASK) << Self::WORKER_SHIFT;
                let s = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
                Self { id: t | d | w | s }
            }

            /// Extracts the timestamp from the packed ID.
            pub const fn timestamp(&self) -> u64 {
                (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
            }

            /// Extracts the datacenter from the packed ID.
            pub const fn datacenter(&self) -> u64 {
                (self.id >> Self::DATACENTER_SHIFT) & Self::DATACENTER_MASK
            }

            /// Extracts the worker from the packed ID.
            pub const fn worker(&self) -> u64 {
                (self.id >> Self::WORKER_SHIFT) & Self::WORKER_MASK
            }

            /// Extracts the sequence from the packed ID.
            pub const fn sequence(&self) -> u64 {
                (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
            }

            /// Returns the maximum representable timestamp value.
            pub const fn max_timestamp() -> u64 {
                Self::TIMESTAMP_MASK
            }

            /// Returns the maximum representable datacenter value.
            pub const fn max_datacenter() -> u64 {
                Self::DATACENTER_MASK
            }

            /// Returns the maximum representable worker value.
            pub const fn max_worker() -> u64 {
                Self::WORKER_MASK
            }

            /// Returns the maximum representable sequence value.
            pub const fn max_sequence() -> u64 {
                Self::SEQUENCE_MASK
            }
        }

        impl $crate::PackedId for $name {
            fn from_components(timestamp: u64, worker: u64, sequence: u64) -> Self {
                debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
                debug_assert!(worker <= Self::WORKER_MASK, "worker overflow");
                debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
                Self::from_parts(timestamp, 0, worker, sequence)
            }

            fn timestamp(&self) -> u64 {
                self.timestamp()
            }

            fn datacenter(&self) -> u64 {
                self.datacenter()
            }

            fn worker(&self) -> u64 {
                self.worker()
            }

            fn sequence(&self) -> u64 {
                self.sequence()
            }

            fn max_timestamp() -> u64 {
                Self::TIMESTAMP_MASK
            }

            fn max_datacenter() -> u64 {
                Self::DATACENTER_MASK
            }

            fn max_worker() -> u64 {
                Self::WORKER_MASK
            }

            fn max_sequence() -> u64 {
                Self::SEQUENCE_MASK
            }

            fn to_raw(&self) -> u64 {
                self.id
            }

            fn from_raw(raw: u64) -> Self {
                Self { id: raw }
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.id
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self { id: raw }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.id)
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("id", &format_args!("{} (0x{:x})", self.id, self.id))
                    .field("timestamp", &self.timestamp())
                    .field("datacenter", &self.datacenter())
                    .field("worker", &self.worker())
                    .field("sequence", &self.sequence())
                    .finish()
            }
        }
    };
}

define_packed_id!(
    /// The canonical 64-bit allocator layout.
    ///
    /// - 1 reserved bit (keeps the `i64` sign clear)
    /// - 41 bits timestamp (ms since [`DEFAULT_EPOCH`], ~69 years of range)
    /// - 0 bits datacenter (reserved width, see layout docs)
    /// - 14 bits worker (16384 concurrent workers)
    /// - 8 bits sequence (256 IDs per worker per millisecond)
    ///
    /// ```text
    ///  Bit Index:  63 62        22 21        8 7          0
    ///              +--+------------+-----------+------------+
    ///  Field:      |r | timestamp  |  worker   |  sequence  |
    ///              +--+------------+-----------+------------+
    ///              |<--- MSB ------ 64 bits ------- LSB --->|
    /// ```
    ///
    /// [`DEFAULT_EPOCH`]: crate::DEFAULT_EPOCH
    GraupelId,
    reserved: 1,
    timestamp: 41,
    datacenter: 0,
    worker: 14,
    sequence: 8
);
