//! gRPC server and shared proto types.
//!
//! This module provides:
//! - Generated protobuf types (`proto`) used by both server and client
//! - Type conversions between native and proto types (`convert`)
//! - The gRPC service implementation (`service`, server-only)
//! - Configuration types (`config`, server-only)

#[cfg(feature = "server")]
pub mod config;
pub mod convert;
#[cfg(feature = "server")]
pub mod service;

/// Re-exported generated proto types.
#[allow(clippy::all, missing_docs)]
pub mod proto {
    tonic::include_proto!("pcbook.v1");

    /// Encoded file descriptor set for the server reflection service.
    pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("pcbook_descriptor");
}

#[cfg(feature = "server")]
pub use service::LaptopServer;
