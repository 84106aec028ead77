//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Profiles, chat messages and witness requests each get their own ID type
//! so the compiler rejects accidental mixing. All IDs use UUID v7
//! (time-ordered), which keeps chat logs and request lists naturally sorted.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a user profile (the local user or a peer).
    ProfileId
}

define_id! {
    /// Unique identifier for a chat message in a room log.
    MessageId
}

define_id! {
    /// Unique identifier for a pending witness confirmation request.
    WitnessRequestId
}

define_id! {
    /// Unique identifier for a single verification attempt.
    AttemptId
}

define_id! {
    /// Unique identifier for a mini-game round in progress.
    GameRoundId
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_values() {
        let a = ProfileId::new();
        let b = ProfileId::new();
        assert_ne!(a, b);
        assert_ne!(a.into_inner(), Uuid::nil());
    }

    #[test]
    fn ids_are_time_ordered() {
        let first = MessageId::new();
        let second = MessageId::new();
        assert!(first <= second);
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = WitnessRequestId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }

    #[test]
    fn id_serializes_as_bare_uuid() {
        let id = ProfileId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.into_inner()));
    }
}
