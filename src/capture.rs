//! Loading packet captures and selecting records by packet name.
//!
//! A capture is a JSON document holding either a single record or an array of
//! records shaped like
//!
//! ```json
//! { "timestamp": "2024-05-01T12:00:00", "data": { "name": "MSG_SENDQUEST", "fields": { "QuestID": { "value": 7 } } } }
//! ```

use crate::error::{CaptureError, Result};
use crate::extract::{Extracted, Packet, extract_record};
use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// An in-memory capture: the top-level records in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Capture {
    records: Vec<Value>,
}

impl Capture {
    /// Wrap a parsed capture document. A non-array top-level value is treated
    /// as a one-element array.
    pub fn from_value(v: Value) -> Result<Self> {
        let records = match v {
            Value::Array(arr) => arr,
            Value::Null => {
                return Err(CaptureError::MalformedCapture(
                    "top-level value is null".into(),
                ));
            }
            other => vec![other],
        };
        Ok(Capture { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = CaptureRecord<'_>> {
        self.records.iter().map(CaptureRecord::new)
    }

    /// Records whose `data.name` equals `packet_name` exactly.
    pub fn records_named<'a>(
        &'a self,
        packet_name: &'a str,
    ) -> impl Iterator<Item = CaptureRecord<'a>> + 'a {
        self.records()
            .filter(move |r| r.packet_name() == Some(packet_name))
    }

    /// Extract every record named `packet_name` into `T`, keeping the per-field
    /// conversion failures of each record.
    pub fn extract_named<T: Packet>(&self, packet_name: &str) -> Vec<Extracted<T>> {
        self.records_named(packet_name)
            .map(|r| extract_record::<T>(&r))
            .collect()
    }
}

/// Read-only view over one capture record.
#[derive(Debug, Clone, Copy)]
pub struct CaptureRecord<'a> {
    node: &'a Value,
}

impl<'a> CaptureRecord<'a> {
    pub fn new(node: &'a Value) -> Self {
        CaptureRecord { node }
    }

    pub fn packet_name(&self) -> Option<&'a str> {
        self.node.get("data")?.get("name")?.as_str()
    }

    pub fn fields(&self) -> Option<&'a Map<String, Value>> {
        self.node.get("data")?.get("fields")?.as_object()
    }

    /// The payload of field `name`. A tagged field node yields its `value`
    /// member, a bare scalar is its own payload. `null` counts as absent.
    pub fn field(&self, name: &str) -> Option<&'a Value> {
        let node = self.fields()?.get(name)?;
        let payload = match node {
            Value::Object(tagged) => tagged.get("value")?,
            other => other,
        };
        if payload.is_null() { None } else { Some(payload) }
    }

    /// The record's own top-level timestamp, if present and parseable.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.node
            .get("timestamp")
            .and_then(|v| v.as_str())
            .and_then(parse_timestamp)
    }
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

pub fn read_capture_from_reader<R: Read>(r: R) -> Result<Capture> {
    let v: Value = serde_json::from_reader(r)?;
    Capture::from_value(v)
}

pub fn read_capture_from_file(path: &Path) -> Result<Capture> {
    let f = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CaptureError::NotFound(path.to_path_buf()),
        _ => CaptureError::Io(e),
    })?;
    read_capture_from_reader(BufReader::new(f))
}

/// Load `path` and extract every record named `packet_name` into `T`, in
/// capture order.
pub fn extract_packets<T: Packet>(path: &Path, packet_name: &str) -> Result<Vec<T>> {
    let capture = read_capture_from_file(path)?;
    Ok(capture
        .extract_named::<T>(packet_name)
        .into_iter()
        .map(|e| e.value)
        .collect())
}
