//! Laptop record and its hardware sub-structures.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Unit for a [`Memory`] quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryUnit {
    #[default]
    Unknown,
    Bit,
    Byte,
    Kilobyte,
    Megabyte,
    Gigabyte,
    Terabyte,
}

impl MemoryUnit {
    /// Number of bits in one unit. `Unknown` counts as zero.
    pub fn bits(self) -> u64 {
        match self {
            MemoryUnit::Unknown => 0,
            MemoryUnit::Bit => 1,
            MemoryUnit::Byte => 8,
            MemoryUnit::Kilobyte => 8 << 10,
            MemoryUnit::Megabyte => 8 << 20,
            MemoryUnit::Gigabyte => 8 << 30,
            MemoryUnit::Terabyte => 8 << 40,
        }
    }
}

/// A memory or storage capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Memory {
    pub value: u64,
    pub unit: MemoryUnit,
}

impl Memory {
    pub fn new(value: u64, unit: MemoryUnit) -> Self {
        Self { value, unit }
    }

    pub fn gigabytes(value: u64) -> Self {
        Self::new(value, MemoryUnit::Gigabyte)
    }

    pub fn megabytes(value: u64) -> Self {
        Self::new(value, MemoryUnit::Megabyte)
    }

    pub fn terabytes(value: u64) -> Self {
        Self::new(value, MemoryUnit::Terabyte)
    }

    /// Normalized size in bits, saturating at `u64::MAX`.
    pub fn to_bits(&self) -> u64 {
        self.value.saturating_mul(self.unit.bits())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cpu {
    pub brand: String,
    pub name: String,
    pub number_cores: u32,
    pub number_threads: u32,
    pub min_ghz: f64,
    pub max_ghz: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gpu {
    pub brand: String,
    pub name: String,
    pub min_ghz: f64,
    pub max_ghz: f64,
    pub memory: Memory,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageDriver {
    #[default]
    Unknown,
    Hdd,
    Ssd,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storage {
    pub driver: StorageDriver,
    pub memory: Memory,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Panel {
    #[default]
    Unknown,
    Ips,
    Oled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub size_inch: f32,
    pub resolution: Resolution,
    pub panel: Panel,
    pub multitouch: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyboardLayout {
    #[default]
    Unknown,
    Qwerty,
    Qwertz,
    Azerty,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    pub layout: KeyboardLayout,
    pub backlit: bool,
}

/// Laptop weight, in whichever unit the record was created with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weight {
    Kg(f64),
    Lb(f64),
}

/// A catalog record.
///
/// Records are plain owned values: `clone()` is a full deep copy, which is
/// what the stores hand out so that no caller ever aliases stored state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Laptop {
    /// UUID string; empty means "let the server assign one".
    pub id: String,
    pub brand: String,
    pub name: String,
    pub cpu: Cpu,
    pub ram: Memory,
    pub gpus: Vec<Gpu>,
    pub storages: Vec<Storage>,
    pub screen: Screen,
    pub keyboard: Keyboard,
    pub weight: Option<Weight>,
    pub price_usd: f64,
    pub release_year: u32,
    pub updated_at: SystemTime,
}

impl Default for Laptop {
    fn default() -> Self {
        Self {
            id: String::new(),
            brand: String::new(),
            name: String::new(),
            cpu: Cpu::default(),
            ram: Memory::default(),
            gpus: Vec::new(),
            storages: Vec::new(),
            screen: Screen::default(),
            keyboard: Keyboard::default(),
            weight: None,
            price_usd: 0.0,
            release_year: 0,
            updated_at: SystemTime::UNIX_EPOCH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_units_normalize_to_bits() {
        assert_eq!(Memory::new(1, MemoryUnit::Byte).to_bits(), 8);
        assert_eq!(Memory::new(1, MemoryUnit::Kilobyte).to_bits(), 8 * 1024);
        assert_eq!(Memory::gigabytes(8).to_bits(), 8 * 8 * 1024 * 1024 * 1024);
        assert_eq!(Memory::megabytes(4096).to_bits(), Memory::gigabytes(4).to_bits());
    }

    #[test]
    fn unknown_unit_is_zero() {
        assert_eq!(Memory::new(64, MemoryUnit::Unknown).to_bits(), 0);
    }

    #[test]
    fn overflow_saturates() {
        assert_eq!(Memory::new(u64::MAX, MemoryUnit::Terabyte).to_bits(), u64::MAX);
    }
}
