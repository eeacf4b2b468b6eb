//! JSON documents carried by `stats` and `exception` frames.

use std::collections::BTreeMap;

use s3select_proto::{Frame, FrameType};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Query statistics: a flat mapping of stat name to a signed integer count.
///
/// ```json
/// { "BytesScanned": 100, "BytesProcessed": 100, "BytesReturned": 12 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stats(BTreeMap<String, i64>);

impl Stats {
    /// Returns the value of the named stat.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.0.get(name).copied()
    }

    /// Bytes read from the object.
    pub fn bytes_scanned(&self) -> Option<i64> {
        self.get("BytesScanned")
    }

    /// Bytes processed after decompression.
    pub fn bytes_processed(&self) -> Option<i64> {
        self.get("BytesProcessed")
    }

    /// Bytes of records returned.
    pub fn bytes_returned(&self) -> Option<i64> {
        self.get("BytesReturned")
    }

    /// Iterates over all stats in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of stats in the document.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the document carries no stats.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, i64>> for Stats {
    fn from(map: BTreeMap<String, i64>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, i64)> for Stats {
    fn from_iter<I: IntoIterator<Item = (K, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Record-level exceptions reported during a query.
///
/// ```json
/// {
///   "Exceptions": [{ "Code": "<name>", "Offset": "<record offset>", "Message": "<text>" }],
///   "Counts": [{ "Total": 1, "<name>": 1 }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exceptions {
    /// Individual exceptions.
    #[serde(rename = "Exceptions", default)]
    pub exceptions: Vec<RecordException>,
    /// Named tallies, usually including a `Total` entry.
    #[serde(rename = "Counts", default)]
    pub counts: Vec<BTreeMap<String, i64>>,
}

impl Exceptions {
    /// Sum of every `Total` tally in [`Exceptions::counts`].
    pub fn total(&self) -> i64 {
        self.counts
            .iter()
            .filter_map(|c| c.get("Total"))
            .sum()
    }
}

/// A single record-level exception.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordException {
    /// Exception name.
    pub code: String,
    /// Offset of the offending record.
    pub offset: String,
    /// Human-readable description.
    pub message: String,
}

/// Parses a frame's data as a UTF-8 JSON document.
pub(crate) fn parse<T: DeserializeOwned>(frame: &Frame) -> Result<T> {
    let frame_type: FrameType = frame.frame_type();
    let text = std::str::from_utf8(frame.data())
        .map_err(|source| Error::Utf8 { frame_type, source })?;
    serde_json::from_str(text).map_err(|source| Error::Document { frame_type, source })
}
