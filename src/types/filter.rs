//! Search predicate over laptop records.

use serde::{Deserialize, Serialize};

use super::{Laptop, Memory};

/// Search filter. Zero or unset fields impose no constraint.
///
/// ```rust
/// # use pcbook::{Filter, Memory};
/// let filter = Filter::new()
///     .max_price_usd(2000.0)
///     .min_cpu_cores(4)
///     .min_cpu_ghz(2.2)
///     .min_ram(Memory::gigabytes(8));
/// assert!(filter.min_ram.is_some());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub max_price_usd: f64,
    pub min_cpu_cores: u32,
    pub min_cpu_ghz: f64,
    pub min_ram: Option<Memory>,
}

impl Filter {
    /// An empty filter that matches every record.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_price_usd(mut self, price: f64) -> Self {
        self.max_price_usd = price;
        self
    }

    pub fn min_cpu_cores(mut self, cores: u32) -> Self {
        self.min_cpu_cores = cores;
        self
    }

    pub fn min_cpu_ghz(mut self, ghz: f64) -> Self {
        self.min_cpu_ghz = ghz;
        self
    }

    pub fn min_ram(mut self, ram: Memory) -> Self {
        self.min_ram = Some(ram);
        self
    }

    /// Whether `laptop` satisfies every constraint this filter sets.
    pub fn matches(&self, laptop: &Laptop) -> bool {
        if self.max_price_usd > 0.0 && laptop.price_usd > self.max_price_usd {
            return false;
        }
        if self.min_cpu_cores > 0 && laptop.cpu.number_cores < self.min_cpu_cores {
            return false;
        }
        if self.min_cpu_ghz > 0.0 && laptop.cpu.min_ghz < self.min_cpu_ghz {
            return false;
        }
        if let Some(min_ram) = self.min_ram {
            if laptop.ram.to_bits() < min_ram.to_bits() {
                return false;
            }
        }
        true
    }
}
