//! Monotonic, collision-free 64-bit ID allocation for fleets of
//! uncoordinated worker processes.
//!
//! Each worker packs (milliseconds since a fixed epoch, worker identity,
//! intra-millisecond sequence) into a single `u64`. IDs from one generator
//! are strictly increasing; IDs across the fleet are unique as long as
//! every concurrently running worker carries a distinct worker id.
//!
//! # Example
//!
//! ```
//! use graupel::{GraupelId, IdGenerator, LockIdGenerator, MonotonicClock};
//!
//! let generator: LockIdGenerator<GraupelId, _> =
//!     LockIdGenerator::new(7, MonotonicClock::default()).unwrap();
//!
//! let id = generator.next_id().unwrap();
//! assert_eq!(id.worker(), 7);
//! ```

mod error;
mod generator;
mod id;
#[cfg(feature = "serde")]
mod serde;
mod status;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::status::*;
pub use crate::time::*;
