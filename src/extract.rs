//! Declarative field extraction.
//!
//! Every typed packet declares a static table of [`FieldRule`]s: which source
//! field to read, how to read it, and where to store it. [`extract_record`]
//! walks that table against one [`CaptureRecord`]. Missing fields leave the
//! destination at its zero value; payloads that cannot be coerced do the same
//! and are reported back as [`FieldError`]s.

use crate::capture::CaptureRecord;
use crate::error::FieldError;
use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::debug;

/// Accessor for one destination field of `T`.
pub type Slot<T, V> = fn(&mut T) -> &mut V;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMethod {
    Text,
    Hex,
    Identifier,
    SmallUnsigned,
    Unsigned,
    Signed,
    /// Coerce to whatever type the destination declares.
    Inferred,
    /// Taken from the record's top-level timestamp, not from its fields.
    Timestamp,
}

/// Destination for [`ExtractMethod::Inferred`], keyed by the declared type.
pub enum Inferred<T> {
    String(Slot<T, String>),
    I32(Slot<T, i32>),
    I64(Slot<T, i64>),
    U64(Slot<T, u64>),
    Bool(Slot<T, bool>),
    F64(Slot<T, f64>),
}

pub enum Target<T> {
    Text(Slot<T, String>),
    /// Hex blobs stay as their raw string here; decoding is the builder's job.
    Hex(Slot<T, String>),
    Identifier(Slot<T, u64>),
    SmallUnsigned(Slot<T, u8>),
    Unsigned(Slot<T, u32>),
    Signed(Slot<T, i32>),
    Inferred(Inferred<T>),
    /// The only target that reads the record's top-level `timestamp`; every
    /// other target reads `data.fields`, whatever its source name.
    Timestamp(Slot<T, Option<NaiveDateTime>>),
}

impl<T> Target<T> {
    pub fn method(&self) -> ExtractMethod {
        match self {
            Target::Text(_) => ExtractMethod::Text,
            Target::Hex(_) => ExtractMethod::Hex,
            Target::Identifier(_) => ExtractMethod::Identifier,
            Target::SmallUnsigned(_) => ExtractMethod::SmallUnsigned,
            Target::Unsigned(_) => ExtractMethod::Unsigned,
            Target::Signed(_) => ExtractMethod::Signed,
            Target::Inferred(_) => ExtractMethod::Inferred,
            Target::Timestamp(_) => ExtractMethod::Timestamp,
        }
    }
}

/// One row of a packet's rule table.
pub struct FieldRule<T> {
    /// Destination field name, for diagnostics.
    pub field: &'static str,
    /// Name of the field inside the capture record's `data.fields`.
    pub source: &'static str,
    pub target: Target<T>,
}

impl<T> FieldRule<T> {
    pub const fn new(field: &'static str, source: &'static str, target: Target<T>) -> Self {
        FieldRule {
            field,
            source,
            target,
        }
    }

    pub fn method(&self) -> ExtractMethod {
        self.target.method()
    }
}

/// A typed record that can be extracted from capture records named
/// [`Packet::NAME`].
pub trait Packet: Default + 'static {
    const NAME: &'static str;

    fn rules() -> &'static [FieldRule<Self>];
}

/// An extracted record together with the fields that fell back to zero
/// because their payload could not be converted.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted<T> {
    pub value: T,
    pub failures: Vec<FieldError>,
}

pub fn extract_record<T: Packet>(record: &CaptureRecord<'_>) -> Extracted<T> {
    extract_with_rules(record, T::rules())
}

pub fn extract_with_rules<T: Default>(
    record: &CaptureRecord<'_>,
    rules: &[FieldRule<T>],
) -> Extracted<T> {
    let mut value = T::default();
    let mut failures = Vec::new();

    for rule in rules {
        if let Target::Timestamp(slot) = &rule.target {
            *slot(&mut value) = record.timestamp();
            continue;
        }

        let raw = record.field(rule.source);
        if !assign(&rule.target, &mut value, raw) {
            let raw = raw.cloned().unwrap_or(Value::Null);
            debug!(
                packet = record.packet_name().unwrap_or_default(),
                field = rule.field,
                source = rule.source,
                %raw,
                "field conversion failed, using zero value"
            );
            failures.push(FieldError {
                source_field: rule.source,
                method: rule.method(),
                raw,
            });
        }
    }

    Extracted { value, failures }
}

/// Store `raw` into the slot named by `target`. Absent payloads store the zero
/// value and succeed, unconvertible ones store the zero value and fail.
fn assign<T>(target: &Target<T>, dst: &mut T, raw: Option<&Value>) -> bool {
    match target {
        Target::Text(s) | Target::Hex(s) => put(*s, dst, raw, as_text),
        Target::Identifier(s) => put(*s, dst, raw, as_u64),
        Target::SmallUnsigned(s) => put(*s, dst, raw, |v| {
            as_u64(v).and_then(|n| u8::try_from(n).ok())
        }),
        Target::Unsigned(s) => put(*s, dst, raw, |v| {
            as_u64(v).and_then(|n| u32::try_from(n).ok())
        }),
        Target::Signed(s) => put(*s, dst, raw, |v| {
            as_i64(v).and_then(|n| i32::try_from(n).ok())
        }),
        Target::Inferred(inf) => match inf {
            Inferred::String(s) => put(*s, dst, raw, coerce_string),
            Inferred::I32(s) => put(*s, dst, raw, |v| {
                coerce_i64(v).and_then(|n| i32::try_from(n).ok())
            }),
            Inferred::I64(s) => put(*s, dst, raw, coerce_i64),
            Inferred::U64(s) => put(*s, dst, raw, |v| {
                as_u64(v).or_else(|| coerce_i64(v).and_then(|n| u64::try_from(n).ok()))
            }),
            Inferred::Bool(s) => put(*s, dst, raw, coerce_bool),
            Inferred::F64(s) => put(*s, dst, raw, coerce_f64),
        },
        Target::Timestamp(_) => true,
    }
}

fn put<T, V: Default>(
    slot: Slot<T, V>,
    dst: &mut T,
    raw: Option<&Value>,
    conv: fn(&Value) -> Option<V>,
) -> bool {
    let (v, ok) = match raw {
        None => (V::default(), true),
        Some(r) => match conv(r) {
            Some(v) => (v, true),
            None => (V::default(), false),
        },
    };
    *slot(dst) = v;
    ok
}

fn as_text(v: &Value) -> Option<String> {
    v.as_str().map(|s| s.to_string())
}

fn as_u64(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

fn as_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn coerce_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn coerce_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn coerce_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|x| x != 0.0),
        Value::String(s) => match s.trim() {
            "0" => Some(false),
            "1" => Some(true),
            t if t.eq_ignore_ascii_case("true") => Some(true),
            t if t.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}
