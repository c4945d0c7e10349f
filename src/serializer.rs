//! Dump and load catalog records as JSON or protobuf binary files.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{PcbookError, Result};

/// Serialize `value` to a compact JSON string.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Write `value` as pretty-printed JSON to `path`.
pub fn write_json_file<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let data = serde_json::to_vec_pretty(value)?;
    fs::write(path, data).map_err(|e| {
        PcbookError::Internal(format!("cannot write JSON to file {}: {e}", path.display()))
    })
}

/// Read a JSON value from `path`.
pub fn read_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| {
        PcbookError::Internal(format!("cannot read JSON from file {}: {e}", path.display()))
    })?;
    Ok(serde_json::from_slice(&data)?)
}

/// Write a laptop in protobuf wire format to `path`.
#[cfg(any(feature = "server", feature = "client"))]
pub fn write_binary_file(laptop: &crate::Laptop, path: impl AsRef<Path>) -> Result<()> {
    use prost::Message;

    let path = path.as_ref();
    let message = crate::server::proto::Laptop::from(laptop.clone());
    fs::write(path, message.encode_to_vec()).map_err(|e| {
        PcbookError::Internal(format!(
            "cannot write binary data to file {}: {e}",
            path.display()
        ))
    })
}

/// Read a laptop in protobuf wire format from `path`.
#[cfg(any(feature = "server", feature = "client"))]
pub fn read_binary_file(path: impl AsRef<Path>) -> Result<crate::Laptop> {
    use prost::Message;

    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| {
        PcbookError::Internal(format!(
            "cannot read binary data from file {}: {e}",
            path.display()
        ))
    })?;
    let message = crate::server::proto::Laptop::decode(data.as_slice())?;
    Ok(message.into())
}
