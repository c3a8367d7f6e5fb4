//! Arena handles for layout entities.
//!
//! Rooms are identified by a monotonically assigned integer handle rather
//! than by their geometry, so graph references stay valid if a room is
//! resized. Handles are never reused within a run.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around a `u32` arena index with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident, $prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
        )]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub u32);

        impl $name {
            /// Wrap a raw arena index.
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Return the raw arena index.
            pub const fn index(self) -> u32 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(index: u32) -> Self {
                Self(index)
            }
        }
    };
}

define_id! {
    /// Stable handle for a room in the committed layout.
    RoomId, "room"
}
