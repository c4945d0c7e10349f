//! pcbook - laptop catalog service over gRPC
//!
//! This crate stores laptop records and serves them through four RPCs, one
//! per gRPC call shape:
//!
//! - `CreateLaptop` (unary): store a record, assigning an id when missing
//! - `SearchLaptop` (server streaming): stream every record matching a [`Filter`]
//! - `UploadImage` (client streaming): receive an image in chunks and persist it
//! - `RateLaptop` (bidirectional): score laptops and stream back running averages
//!
//! The handlers live in [`LaptopCatalog`] and are transport independent; the
//! `server` feature adapts them to tonic and the `client` feature provides a
//! typed [`LaptopClient`](client::LaptopClient).
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pcbook::store::{DiskImageStore, InMemoryLaptopStore, InMemoryRatingStore};
//! use pcbook::{CallContext, Filter, LaptopCatalog, sample};
//!
//! fn main() -> pcbook::Result<()> {
//!     let catalog = LaptopCatalog::new(
//!         Arc::new(InMemoryLaptopStore::new()),
//!         Arc::new(DiskImageStore::open("img")?),
//!         Arc::new(InMemoryRatingStore::new()),
//!     );
//!
//!     let ctx = CallContext::new();
//!     let id = catalog.create_laptop(&ctx, sample::new_laptop())?;
//!     println!("created {id}");
//!
//!     catalog.search_laptop(&ctx, &Filter::new().max_price_usd(3000.0), &mut |laptop| {
//!         println!("{} {} ${}", laptop.brand, laptop.name, laptop.price_usd);
//!         Ok(())
//!     })
//! }
//! ```

pub mod catalog;
pub mod context;
pub mod error;
pub mod sample;
pub mod serializer;
pub mod store;
pub mod telemetry;
pub mod types;
pub mod version;

#[cfg(feature = "client")]
pub mod client;
#[cfg(any(feature = "server", feature = "client"))]
pub mod server;

// Re-export main types at crate root
pub use catalog::{LaptopCatalog, MAX_IMAGE_SIZE};
pub use context::CallContext;
pub use error::{ErrorCode, PcbookError, Result};
pub use version::{PKG_VERSION, version_string};

// Re-export all types
pub use types::{
    Cpu, Filter, Gpu, ImageInfo, Keyboard, KeyboardLayout, Laptop, Memory, MemoryUnit, Panel,
    RateRequest, RateResponse, Rating, Resolution, Screen, Storage, StorageDriver, UploadMessage,
    UploadResponse, Weight,
};
