//! Opaque record identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use uuid::{NoContext, Timestamp, Uuid};

const ID_LEN: usize = 12;

/// Returned when a string is not a well-formed [`ObjectId`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid object id '{0}'")]
pub struct InvalidObjectId(pub String);

/// 12-byte store identifier, written as 24 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; ID_LEN]);

impl ObjectId {
    /// Generate a new time-ordered identifier.
    ///
    /// The first six bytes carry the millisecond timestamp of a UUIDv7, the
    /// remaining six come from its random tail.
    pub fn generate() -> Self {
        let uuid = Uuid::new_v7(Timestamp::now(NoContext));
        let bytes = uuid.as_bytes();
        let mut id = [0u8; ID_LEN];
        id[..6].copy_from_slice(&bytes[..6]);
        id[6..].copy_from_slice(&bytes[10..]);
        Self(id)
    }

    /// Parse the hex form of an identifier.
    pub fn parse(value: &str) -> Result<Self, InvalidObjectId> {
        let invalid = || InvalidObjectId(value.to_string());
        if value.len() != ID_LEN * 2 {
            return Err(invalid());
        }
        let mut id = [0u8; ID_LEN];
        hex::decode_to_slice(value, &mut id).map_err(|_| invalid())?;
        Ok(Self(id))
    }

    /// Whether `value` parses as an identifier.
    pub fn is_valid(value: &str) -> bool {
        Self::parse(value).is_ok()
    }

    pub const fn bytes(&self) -> [u8; ID_LEN] {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for ObjectId {
    type Err = InvalidObjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}
