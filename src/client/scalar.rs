//! Types standing in for the `Time`, `Map`, `Upload` and `Any` scalars
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Values that are left out of serialized input when unset
pub trait Absent {
    fn is_absent(&self) -> bool;
}

impl<T> Absent for Option<T> {
    fn is_absent(&self) -> bool {
        self.is_none()
    }
}

/// RFC 3339 timestamp; `null` when unset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Time(pub Option<DateTime<Utc>>);

impl From<DateTime<Utc>> for Time {
    fn from(time: DateTime<Utc>) -> Self {
        Time(Some(time))
    }
}

impl Absent for Time {
    fn is_absent(&self) -> bool {
        self.0.is_none()
    }
}

/// Free-form JSON object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Map(pub serde_json::Map<String, serde_json::Value>);

impl Absent for Map {
    fn is_absent(&self) -> bool {
        self.0.is_empty()
    }
}

/// Any JSON value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Any(pub serde_json::Value);

impl Absent for Any {
    fn is_absent(&self) -> bool {
        self.0.is_null()
    }
}

/// File sent alongside an operation as a multipart request part.
///
/// Inside the variables an upload always serializes as `null`; the
/// [`Transport`](super::Transport) finds the file through
/// [`Request::uploads`](super::Request::uploads).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Upload {
    pub filename: String,
    pub mime_type: String,
    pub body: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Upload {
            filename: filename.into(),
            mime_type: mime_type.into(),
            body: body.into(),
        }
    }
}

impl Absent for Upload {
    fn is_absent(&self) -> bool {
        self.filename.is_empty() && self.body.is_empty()
    }
}

impl Serialize for Upload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_unit()
    }
}

impl<'de> Deserialize<'de> for Upload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde::de::IgnoredAny::deserialize(deserializer)?;
        Ok(Upload::default())
    }
}
