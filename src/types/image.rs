//! Image upload types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Metadata registered for a stored image blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Laptop the image belongs to.
    pub laptop_id: String,
    /// Type tag / file extension as sent by the client (e.g. `".jpg"`).
    pub image_type: String,
    /// Where the bytes were written.
    pub path: PathBuf,
}

/// One inbound message of an upload stream.
///
/// The first message must be [`UploadMessage::Info`]; every later one is a
/// [`UploadMessage::Chunk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadMessage {
    Info {
        laptop_id: String,
        image_type: String,
    },
    Chunk(Vec<u8>),
}

impl UploadMessage {
    pub fn info(laptop_id: impl Into<String>, image_type: impl Into<String>) -> Self {
        UploadMessage::Info {
            laptop_id: laptop_id.into(),
            image_type: image_type.into(),
        }
    }
}

/// Result of a completed upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Generated image id.
    pub id: String,
    /// Total bytes received.
    pub size: u32,
}
