//! The boundary to the binary object codec used for embedded blobs.
//!
//! Capture fields such as `GoalData` or `ClientTags` hold hex text whose bytes
//! are a separately encoded object. This crate only defines the shapes it
//! needs out of those objects; turning bytes into them is delegated to a
//! [`BlobCodec`].

use crate::error::BlobDecodeError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Decodes the bytes of an embedded blob into a typed object.
pub trait BlobCodec {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, BlobDecodeError>;
}

impl<C: BlobCodec> BlobCodec for &C {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, BlobDecodeError> {
        (**self).decode(bytes)
    }
}

/// The goal list compiled into a quest offer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalCompilation {
    pub goals: Vec<GoalDescriptor>,
}

/// One not-yet-typed goal entry of a [`GoalCompilation`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalDescriptor {
    pub goal_name_id: u32,
    pub goal_title: String,
    pub goal_location: String,
    pub goal_destination_zone: String,
    pub goal_image1: String,
    pub goal_image2: String,
    pub goal_type: u8,
    pub goal_total: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientTagList {
    pub client_tags: Vec<String>,
}

/// Turn hex text into bytes. Whitespace anywhere in the text is ignored,
/// since capture tools often print blobs as space separated byte pairs.
pub fn decode_hex_blob(text: &str) -> Result<Vec<u8>, BlobDecodeError> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(BlobDecodeError::Empty);
    }
    Ok(hex::decode(compact)?)
}

/// Hex-decode `text` and hand the bytes to `codec`.
pub fn decode_blob<T: DeserializeOwned, C: BlobCodec>(
    codec: &C,
    text: &str,
) -> Result<T, BlobDecodeError> {
    let bytes = decode_hex_blob(text)?;
    codec.decode(&bytes)
}

/// A codec for blobs whose bytes are UTF-8 JSON. Useful for hand-built
/// captures and for tools that re-export decoded objects as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBlobCodec;

impl JsonBlobCodec {
    /// Encode `value` the way [`JsonBlobCodec`] expects to read it back, as
    /// upper-case hex text.
    pub fn encode_hex<T: Serialize>(&self, value: &T) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(value)?;
        Ok(hex::encode_upper(bytes))
    }
}

impl BlobCodec for JsonBlobCodec {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, BlobDecodeError> {
        serde_json::from_slice(bytes).map_err(|e| BlobDecodeError::Rejected(e.to_string()))
    }
}
