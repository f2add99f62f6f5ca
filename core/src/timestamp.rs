//! RFC 3339 timestamps that serialize back exactly as they were received.
//!
//! The API's timestamps carry whatever offset and precision the server chose
//! (`2021-01-01T05:00:00+05:00`, `2021-01-01T00:00:00.000Z`). A
//! [`Timestamp`] keeps that text next to the parsed value, so an entity read
//! from a response writes the same string back out.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ApiError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp {
    raw: String,
    value: DateTime<FixedOffset>,
}

impl Timestamp {
    /// Parse an RFC 3339 string, keeping it verbatim.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let value = DateTime::parse_from_rfc3339(&raw)
            .map_err(|e| ApiError::DeserializationError(format!("invalid timestamp {raw:?}: {e}")))?;
        Ok(Self { raw, value })
    }

    /// The text as received, or as formatted when built from a `DateTime`.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The instant with the offset it was written in.
    pub fn to_datetime(&self) -> DateTime<FixedOffset> {
        self.value
    }

    pub fn to_utc(&self) -> DateTime<Utc> {
        self.value.with_timezone(&Utc)
    }

    /// Same instant, regardless of how either side was written.
    pub fn same_instant(&self, other: &Timestamp) -> bool {
        self.value == other.value
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self {
            raw: value.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            value: value.into(),
        }
    }
}

impl FromStr for Timestamp {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(raw).map_err(de::Error::custom)
    }
}
