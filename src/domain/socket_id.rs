//! Type-safe socket identifier.
//!
//! [`SocketId`] is a newtype wrapper around the string id a transport
//! assigns to a connected peer. The gateway generates UUID v4 ids, but any
//! stable string is accepted so other transports can bring their own.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a connected socket.
///
/// Stable for the lifetime of the peer. Used as the member key inside each
/// room of [`super::RoomRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SocketId(String);

impl SocketId {
    /// Creates a new random `SocketId` (UUID v4, hyphenated).
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wraps an existing id string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the id is the empty string.
    ///
    /// Empty ids cannot address a member and are rejected on join/leave.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SocketId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for SocketId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<uuid::Uuid> for SocketId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid.to_string())
    }
}

impl AsRef<str> for SocketId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_unique_ids() {
        let a = SocketId::generate();
        let b = SocketId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn generated_id_is_uuid_format() {
        let id = SocketId::generate();
        assert_eq!(id.as_str().len(), 36);
        assert!(id.as_str().parse::<uuid::Uuid>().is_ok());
    }

    #[test]
    fn display_matches_inner_string() {
        let id = SocketId::new("peer-1");
        assert_eq!(format!("{id}"), "peer-1");
    }

    #[test]
    fn empty_id_is_detected() {
        assert!(SocketId::new("").is_empty());
        assert!(!SocketId::new("x").is_empty());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = SocketId::new("abc");
        let Ok(json) = serde_json::to_string(&id) else {
            panic!("serialization failed");
        };
        assert_eq!(json, "\"abc\"");
    }
}
