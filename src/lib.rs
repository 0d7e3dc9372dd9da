//! quest_capture_tools — rebuild quest templates from recorded packet captures
//!
//! A capture is a JSON dump of a network session. This crate reads the quest
//! related messages out of it (`MSG_QUESTOFFER`, `MSG_SENDQUEST`,
//! `MSG_SENDGOAL`) through declarative per-packet field tables, decodes the
//! goal lists embedded as hex blobs in quest offers, and stitches everything
//! into [`Quest`]s with their ordered [`Goal`]s.
//!
//! Basic example (no-run):
//!
//! ```rust,no_run
//! use quest_capture_tools::{JsonBlobCodec, QuestBuilder};
//! use std::path::Path;
//!
//! let output = QuestBuilder::new(JsonBlobCodec)
//!     .build_from_file(Path::new("capture.json"))
//!     .expect("load capture");
//! println!("{}", output.summary());
//! ```

pub mod builder;
pub mod capture;
pub mod codec;
pub mod error;
pub mod extract;
pub mod model;
pub mod packets;

pub use crate::builder::{
    BuildIssue, BuildOptions, BuildOutput, QuestBuilder, build_quests_from_capture,
};
pub use crate::capture::{
    Capture, CaptureRecord, extract_packets, read_capture_from_file, read_capture_from_reader,
};
pub use crate::codec::{BlobCodec, JsonBlobCodec};
pub use crate::error::*;
pub use crate::model::*;
pub use crate::packets::{MSG_QUESTOFFER, MSG_SENDGOAL, MSG_SENDQUEST};
