//! Serde support for the packed ID types.
//!
//! IDs serialize as their raw `u64` representation so they interoperate
//! with stores and wire formats that traffic in plain integers.

use crate::{GraupelId, PackedId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl Serialize for GraupelId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.to_raw())
    }
}

impl<'de> Deserialize<'de> for GraupelId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Self::from_raw)
    }
}
