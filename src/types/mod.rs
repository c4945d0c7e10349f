//! Public types for the pcbook API.

mod filter;
mod image;
mod laptop;
mod rating;

pub use filter::Filter;
pub use image::{ImageInfo, UploadMessage, UploadResponse};
pub use laptop::{
    Cpu, Gpu, Keyboard, KeyboardLayout, Laptop, Memory, MemoryUnit, Panel, Resolution, Screen,
    Storage, StorageDriver, Weight,
};
pub use rating::{RateRequest, RateResponse, Rating};
