#![allow(dead_code)]

use quest_capture_tools::JsonBlobCodec;
use quest_capture_tools::codec::{GoalCompilation, GoalDescriptor};
use serde_json::{Map, Value, json};
use std::io::Write;
use tempfile::NamedTempFile;

/// One capture record with every field wrapped as `{"value": ...}`.
pub fn record(name: &str, fields: Value) -> Value {
    let mut tagged = Map::new();
    if let Value::Object(map) = fields {
        for (k, v) in map {
            tagged.insert(k, json!({ "value": v, "type": "auto" }));
        }
    }
    json!({
        "timestamp": "2024-05-01T12:00:00",
        "data": { "name": name, "fields": tagged }
    })
}

pub fn goal(name_id: u32, title: &str, goal_type: u8, total: u32) -> GoalDescriptor {
    GoalDescriptor {
        goal_name_id: name_id,
        goal_title: title.to_string(),
        goal_location: "WizardCity/WC_Ravenwood".to_string(),
        goal_type,
        goal_total: total,
        ..Default::default()
    }
}

/// Hex text of a compiled goal list, spaced the way capture tools print it.
pub fn goal_blob(goals: Vec<GoalDescriptor>) -> String {
    let hex = JsonBlobCodec
        .encode_hex(&GoalCompilation { goals })
        .expect("encode goals");
    spaced(&hex)
}

pub fn tag_blob(tags: &[&str]) -> String {
    JsonBlobCodec
        .encode_hex(&json!({ "client_tags": tags }))
        .expect("encode tags")
}

fn spaced(hex: &str) -> String {
    hex.as_bytes()
        .chunks(2)
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn write_capture(doc: &Value) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("temp file");
    f.write_all(doc.to_string().as_bytes()).expect("write capture");
    f
}
