//! Identity value types for content types and fields.
//!
//! Content-type ids are hierarchical byte sequences: a derived type's id
//! starts with its parent's id, so ancestry is a prefix comparison over the
//! raw bytes rather than a string operation. In descriptor files ids are
//! written as hex, e.g. `0x0100A3F2`.

use crate::error::{Error, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Hierarchical content-type identifier.
///
/// The byte sequence encodes inheritance: `child.is_descendant_of(&parent)`
/// holds exactly when the child's bytes start with the parent's bytes and the
/// ids differ. Ids are non-empty by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentTypeId(Vec<u8>);

impl ContentTypeId {
    /// Create an id from raw bytes. Fails on an empty sequence.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::InvalidId {
                value: String::new(),
                message: "id must contain at least one byte".to_string(),
            });
        }
        Ok(Self(bytes))
    }

    /// Parse an id from its hex text form, with or without a `0x` prefix.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if hex.is_empty() {
            return Err(Error::InvalidId {
                value: value.to_string(),
                message: "id must contain at least one byte".to_string(),
            });
        }
        if hex.len() % 2 != 0 {
            return Err(Error::InvalidId {
                value: value.to_string(),
                message: "hex form must have an even number of digits".to_string(),
            });
        }

        let mut bytes = Vec::with_capacity(hex.len() / 2);
        for chunk in hex.as_bytes().chunks(2) {
            let pair = std::str::from_utf8(chunk).map_err(|_| Error::InvalidId {
                value: value.to_string(),
                message: "id contains non-ASCII characters".to_string(),
            })?;
            let byte = u8::from_str_radix(pair, 16).map_err(|_| Error::InvalidId {
                value: value.to_string(),
                message: format!("'{}' is not a hex digit pair", pair),
            })?;
            bytes.push(byte);
        }
        Ok(Self(bytes))
    }

    /// The raw byte sequence of the id.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether this id descends from `ancestor` in the inheritance hierarchy.
    ///
    /// An id is never its own descendant.
    pub fn is_descendant_of(&self, ancestor: &ContentTypeId) -> bool {
        self.0.len() > ancestor.0.len() && self.0.starts_with(&ancestor.0)
    }

    /// Build a child id from this id: parent bytes, a `0x00` separator, and
    /// the given suffix bytes.
    pub fn derive(&self, suffix: &[u8]) -> ContentTypeId {
        let mut bytes = Vec::with_capacity(self.0.len() + 1 + suffix.len());
        bytes.extend_from_slice(&self.0);
        bytes.push(0x00);
        bytes.extend_from_slice(suffix);
        ContentTypeId(bytes)
    }
}

impl fmt::Display for ContentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for ContentTypeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ContentTypeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ContentTypeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        ContentTypeId::parse(&value).map_err(D::Error::custom)
    }
}

/// Opaque stable field identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FieldId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
