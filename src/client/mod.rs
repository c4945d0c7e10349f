//! Client library for connecting to pcbookd.
//!
//! Provides [`LaptopClient`], a typed wrapper over the generated gRPC client
//! that speaks in native catalog types.

mod laptop_client;

pub use laptop_client::{LaptopClient, UPLOAD_CHUNK_SIZE};
