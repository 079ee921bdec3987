//! Page and block identifiers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a page.
/// Uses UUID v4, so ids stay distinct even when a whole month bundle is
/// created in a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageId(Uuid);

/// Unique identifier for a block, stable for the block's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(Uuid);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            /// Create a new random id
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an id from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }

            /// Parse an id from its string representation
            pub fn from_string(s: &str) -> Option<Self> {
                Uuid::parse_str(s).ok().map(Self)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

impl_id!(PageId);
impl_id!(BlockId);
