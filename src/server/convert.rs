//! Conversions between pcbook native types and protobuf types.
//!
//! Both directions live here so the server adapter and the client share one
//! mapping. A sub-message missing on the wire converts to the native
//! default.

use std::time::SystemTime;

use crate::PcbookError;
use crate::error::ErrorCode;
use crate::types::{
    Cpu, Filter, Gpu, Keyboard, KeyboardLayout, Laptop, Memory, MemoryUnit, Panel, RateRequest,
    RateResponse, Resolution, Screen, Storage, StorageDriver, UploadMessage, UploadResponse,
    Weight,
};

use super::proto;

// =============================================================================
// Proto → Native
// =============================================================================

impl From<proto::Memory> for Memory {
    fn from(p: proto::Memory) -> Self {
        let unit = match p.unit() {
            proto::memory::Unit::Unknown => MemoryUnit::Unknown,
            proto::memory::Unit::Bit => MemoryUnit::Bit,
            proto::memory::Unit::Byte => MemoryUnit::Byte,
            proto::memory::Unit::Kilobyte => MemoryUnit::Kilobyte,
            proto::memory::Unit::Megabyte => MemoryUnit::Megabyte,
            proto::memory::Unit::Gigabyte => MemoryUnit::Gigabyte,
            proto::memory::Unit::Terabyte => MemoryUnit::Terabyte,
        };
        Memory {
            value: p.value,
            unit,
        }
    }
}

impl From<proto::Cpu> for Cpu {
    fn from(p: proto::Cpu) -> Self {
        Cpu {
            brand: p.brand,
            name: p.name,
            number_cores: p.number_cores,
            number_threads: p.number_threads,
            min_ghz: p.min_ghz,
            max_ghz: p.max_ghz,
        }
    }
}

impl From<proto::Gpu> for Gpu {
    fn from(p: proto::Gpu) -> Self {
        Gpu {
            brand: p.brand,
            name: p.name,
            min_ghz: p.min_ghz,
            max_ghz: p.max_ghz,
            memory: p.memory.map(Into::into).unwrap_or_default(),
        }
    }
}

impl From<proto::Storage> for Storage {
    fn from(p: proto::Storage) -> Self {
        let driver = match p.driver() {
            proto::storage::Driver::Unknown => StorageDriver::Unknown,
            proto::storage::Driver::Hdd => StorageDriver::Hdd,
            proto::storage::Driver::Ssd => StorageDriver::Ssd,
        };
        Storage {
            driver,
            memory: p.memory.map(Into::into).unwrap_or_default(),
        }
    }
}

impl From<proto::Screen> for Screen {
    fn from(p: proto::Screen) -> Self {
        let panel = match p.panel() {
            proto::screen::Panel::Unknown => Panel::Unknown,
            proto::screen::Panel::Ips => Panel::Ips,
            proto::screen::Panel::Oled => Panel::Oled,
        };
        Screen {
            size_inch: p.size_inch,
            resolution: p
                .resolution
                .map(|r| Resolution {
                    width: r.width,
                    height: r.height,
                })
                .unwrap_or_default(),
            panel,
            multitouch: p.multitouch,
        }
    }
}

impl From<proto::Keyboard> for Keyboard {
    fn from(p: proto::Keyboard) -> Self {
        let layout = match p.layout() {
            proto::keyboard::Layout::Unknown => KeyboardLayout::Unknown,
            proto::keyboard::Layout::Qwerty => KeyboardLayout::Qwerty,
            proto::keyboard::Layout::Qwertz => KeyboardLayout::Qwertz,
            proto::keyboard::Layout::Azerty => KeyboardLayout::Azerty,
        };
        Keyboard {
            layout,
            backlit: p.backlit,
        }
    }
}

impl From<proto::Laptop> for Laptop {
    fn from(p: proto::Laptop) -> Self {
        let weight = p.weight.map(|w| match w {
            proto::laptop::Weight::WeightKg(kg) => Weight::Kg(kg),
            proto::laptop::Weight::WeightLb(lb) => Weight::Lb(lb),
        });
        let updated_at = p
            .updated_at
            .and_then(|ts| SystemTime::try_from(ts).ok())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        Laptop {
            id: p.id,
            brand: p.brand,
            name: p.name,
            cpu: p.cpu.map(Into::into).unwrap_or_default(),
            ram: p.ram.map(Into::into).unwrap_or_default(),
            gpus: p.gpus.into_iter().map(Into::into).collect(),
            storages: p.storages.into_iter().map(Into::into).collect(),
            screen: p.screen.map(Into::into).unwrap_or_default(),
            keyboard: p.keyboard.map(Into::into).unwrap_or_default(),
            weight,
            price_usd: p.price_usd,
            release_year: p.release_year,
            updated_at,
        }
    }
}

impl From<proto::Filter> for Filter {
    fn from(p: proto::Filter) -> Self {
        Filter {
            max_price_usd: p.max_price_usd,
            min_cpu_cores: p.min_cpu_cores,
            min_cpu_ghz: p.min_cpu_ghz,
            min_ram: p.min_ram.map(Into::into),
        }
    }
}

impl TryFrom<proto::UploadImageRequest> for UploadMessage {
    type Error = PcbookError;

    fn try_from(p: proto::UploadImageRequest) -> Result<Self, Self::Error> {
        match p.data {
            Some(proto::upload_image_request::Data::Info(info)) => Ok(UploadMessage::Info {
                laptop_id: info.laptop_id,
                image_type: info.image_type,
            }),
            Some(proto::upload_image_request::Data::ChunkData(chunk)) => {
                Ok(UploadMessage::Chunk(chunk))
            }
            None => Err(PcbookError::Unknown(
                "upload message carries no data".to_string(),
            )),
        }
    }
}

impl From<proto::UploadImageResponse> for UploadResponse {
    fn from(p: proto::UploadImageResponse) -> Self {
        UploadResponse {
            id: p.id,
            size: p.size,
        }
    }
}

impl From<proto::RateLaptopRequest> for RateRequest {
    fn from(p: proto::RateLaptopRequest) -> Self {
        RateRequest {
            laptop_id: p.laptop_id,
            score: p.score,
        }
    }
}

impl From<proto::RateLaptopResponse> for RateResponse {
    fn from(p: proto::RateLaptopResponse) -> Self {
        RateResponse {
            laptop_id: p.laptop_id,
            rated_count: p.rated_count,
            average_score: p.average_score,
        }
    }
}

// =============================================================================
// Native → Proto
// =============================================================================

impl From<Memory> for proto::Memory {
    fn from(m: Memory) -> Self {
        let unit = match m.unit {
            MemoryUnit::Unknown => proto::memory::Unit::Unknown,
            MemoryUnit::Bit => proto::memory::Unit::Bit,
            MemoryUnit::Byte => proto::memory::Unit::Byte,
            MemoryUnit::Kilobyte => proto::memory::Unit::Kilobyte,
            MemoryUnit::Megabyte => proto::memory::Unit::Megabyte,
            MemoryUnit::Gigabyte => proto::memory::Unit::Gigabyte,
            MemoryUnit::Terabyte => proto::memory::Unit::Terabyte,
        };
        proto::Memory {
            value: m.value,
            unit: unit as i32,
        }
    }
}

impl From<Cpu> for proto::Cpu {
    fn from(c: Cpu) -> Self {
        proto::Cpu {
            brand: c.brand,
            name: c.name,
            number_cores: c.number_cores,
            number_threads: c.number_threads,
            min_ghz: c.min_ghz,
            max_ghz: c.max_ghz,
        }
    }
}

impl From<Gpu> for proto::Gpu {
    fn from(g: Gpu) -> Self {
        proto::Gpu {
            brand: g.brand,
            name: g.name,
            min_ghz: g.min_ghz,
            max_ghz: g.max_ghz,
            memory: Some(g.memory.into()),
        }
    }
}

impl From<Storage> for proto::Storage {
    fn from(s: Storage) -> Self {
        let driver = match s.driver {
            StorageDriver::Unknown => proto::storage::Driver::Unknown,
            StorageDriver::Hdd => proto::storage::Driver::Hdd,
            StorageDriver::Ssd => proto::storage::Driver::Ssd,
        };
        proto::Storage {
            driver: driver as i32,
            memory: Some(s.memory.into()),
        }
    }
}

impl From<Screen> for proto::Screen {
    fn from(s: Screen) -> Self {
        let panel = match s.panel {
            Panel::Unknown => proto::screen::Panel::Unknown,
            Panel::Ips => proto::screen::Panel::Ips,
            Panel::Oled => proto::screen::Panel::Oled,
        };
        proto::Screen {
            size_inch: s.size_inch,
            resolution: Some(proto::screen::Resolution {
                width: s.resolution.width,
                height: s.resolution.height,
            }),
            panel: panel as i32,
            multitouch: s.multitouch,
        }
    }
}

impl From<Keyboard> for proto::Keyboard {
    fn from(k: Keyboard) -> Self {
        let layout = match k.layout {
            KeyboardLayout::Unknown => proto::keyboard::Layout::Unknown,
            KeyboardLayout::Qwerty => proto::keyboard::Layout::Qwerty,
            KeyboardLayout::Qwertz => proto::keyboard::Layout::Qwertz,
            KeyboardLayout::Azerty => proto::keyboard::Layout::Azerty,
        };
        proto::Keyboard {
            layout: layout as i32,
            backlit: k.backlit,
        }
    }
}

impl From<Laptop> for proto::Laptop {
    fn from(l: Laptop) -> Self {
        let weight = l.weight.map(|w| match w {
            Weight::Kg(kg) => proto::laptop::Weight::WeightKg(kg),
            Weight::Lb(lb) => proto::laptop::Weight::WeightLb(lb),
        });

        proto::Laptop {
            id: l.id,
            brand: l.brand,
            name: l.name,
            cpu: Some(l.cpu.into()),
            ram: Some(l.ram.into()),
            gpus: l.gpus.into_iter().map(Into::into).collect(),
            storages: l.storages.into_iter().map(Into::into).collect(),
            screen: Some(l.screen.into()),
            keyboard: Some(l.keyboard.into()),
            weight,
            price_usd: l.price_usd,
            release_year: l.release_year,
            updated_at: Some(l.updated_at.into()),
        }
    }
}

impl From<Filter> for proto::Filter {
    fn from(f: Filter) -> Self {
        proto::Filter {
            max_price_usd: f.max_price_usd,
            min_cpu_cores: f.min_cpu_cores,
            min_cpu_ghz: f.min_cpu_ghz,
            min_ram: f.min_ram.map(Into::into),
        }
    }
}

impl From<UploadMessage> for proto::UploadImageRequest {
    fn from(m: UploadMessage) -> Self {
        let data = match m {
            UploadMessage::Info {
                laptop_id,
                image_type,
            } => proto::upload_image_request::Data::Info(proto::ImageInfo {
                laptop_id,
                image_type,
            }),
            UploadMessage::Chunk(chunk) => proto::upload_image_request::Data::ChunkData(chunk),
        };
        proto::UploadImageRequest { data: Some(data) }
    }
}

impl From<UploadResponse> for proto::UploadImageResponse {
    fn from(r: UploadResponse) -> Self {
        proto::UploadImageResponse {
            id: r.id,
            size: r.size,
        }
    }
}

impl From<RateRequest> for proto::RateLaptopRequest {
    fn from(r: RateRequest) -> Self {
        proto::RateLaptopRequest {
            laptop_id: r.laptop_id,
            score: r.score,
        }
    }
}

impl From<RateResponse> for proto::RateLaptopResponse {
    fn from(r: RateResponse) -> Self {
        proto::RateLaptopResponse {
            laptop_id: r.laptop_id,
            rated_count: r.rated_count,
            average_score: r.average_score,
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

impl From<PcbookError> for tonic::Status {
    fn from(err: PcbookError) -> Self {
        let code = match err.code() {
            ErrorCode::InvalidArgument => tonic::Code::InvalidArgument,
            ErrorCode::AlreadyExists => tonic::Code::AlreadyExists,
            ErrorCode::NotFound => tonic::Code::NotFound,
            ErrorCode::Canceled => tonic::Code::Cancelled,
            ErrorCode::DeadlineExceeded => tonic::Code::DeadlineExceeded,
            ErrorCode::Internal => tonic::Code::Internal,
            ErrorCode::Unknown => tonic::Code::Unknown,
        };
        let message = match err {
            PcbookError::InvalidArgument(msg)
            | PcbookError::AlreadyExists(msg)
            | PcbookError::NotFound(msg)
            | PcbookError::Internal(msg)
            | PcbookError::Unknown(msg) => msg,
            other => other.to_string(),
        };
        tonic::Status::new(code, message)
    }
}

impl From<tonic::Status> for PcbookError {
    fn from(status: tonic::Status) -> Self {
        let message = status.message().to_string();
        match status.code() {
            tonic::Code::InvalidArgument => PcbookError::InvalidArgument(message),
            tonic::Code::AlreadyExists => PcbookError::AlreadyExists(message),
            tonic::Code::NotFound => PcbookError::NotFound(message),
            tonic::Code::Cancelled => PcbookError::Canceled,
            tonic::Code::DeadlineExceeded => PcbookError::DeadlineExceeded,
            tonic::Code::Internal => PcbookError::Internal(message),
            _ => PcbookError::Unknown(message),
        }
    }
}
