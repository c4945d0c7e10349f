//! Backing stores for the catalog service.
//!
//! Three independent stores, each owning its data behind its own lock:
//!
//! - [`LaptopStore`]: laptop records, copy-in/copy-out.
//! - [`ImageStore`]: uploaded image blobs plus an in-memory metadata index.
//! - [`RatingStore`]: per-laptop `(count, sum)` rating aggregates.
//!
//! The traits are the seams [`LaptopCatalog`](crate::LaptopCatalog) is
//! built on; the in-memory/disk implementations are what `pcbookd` wires up.

mod image;
mod laptop;
mod rating;

pub use image::{DiskImageStore, ImageStore};
pub use laptop::{InMemoryLaptopStore, LaptopStore};
pub use rating::{InMemoryRatingStore, RatingStore};
