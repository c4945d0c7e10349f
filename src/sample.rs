//! Random sample laptops, for seeding a server and for tests.

use std::time::SystemTime;

use rand::Rng;
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::types::{
    Cpu, Gpu, Keyboard, KeyboardLayout, Laptop, Memory, Panel, Resolution, Screen, Storage,
    StorageDriver, Weight,
};

/// A random keyboard.
pub fn new_keyboard() -> Keyboard {
    let mut rng = rand::thread_rng();
    let layout = match rng.gen_range(0..3) {
        1 => KeyboardLayout::Qwerty,
        2 => KeyboardLayout::Qwertz,
        _ => KeyboardLayout::Azerty,
    };
    Keyboard {
        layout,
        backlit: rng.gen_bool(0.5),
    }
}

/// A random CPU with 2–8 cores and a 2.0–3.5 GHz base clock.
pub fn new_cpu() -> Cpu {
    let mut rng = rand::thread_rng();
    let brand = pick(&["Intel", "AMD"]);
    let name = if brand == "Intel" {
        pick(&["Xeon E-2286M", "Core i9-9980HK", "Core i7-9750H", "Core i5-9400F"])
    } else {
        pick(&["Ryzen 7 PRO 2700U", "Ryzen 5 PRO 3500U", "Ryzen 3 PRO 3200GE"])
    };
    let number_cores = rng.gen_range(2..=8);
    let number_threads = rng.gen_range(number_cores..=12);
    let min_ghz = rng.gen_range(2.0..3.5);
    let max_ghz = rng.gen_range(min_ghz..5.0);

    Cpu {
        brand: brand.to_string(),
        name: name.to_string(),
        number_cores,
        number_threads,
        min_ghz,
        max_ghz,
    }
}

/// A random GPU with 2–6 GB of memory.
pub fn new_gpu() -> Gpu {
    let mut rng = rand::thread_rng();
    let brand = pick(&["NVIDIA", "AMD"]);
    let name = if brand == "NVIDIA" {
        pick(&["RTX 2060", "RTX 2070", "GTX 1660-Ti", "GTX 1070"])
    } else {
        pick(&["RX 590", "RX 580", "RX 5700-XT", "RX Vega-56"])
    };
    let min_ghz = rng.gen_range(1.0..1.5);
    let max_ghz = rng.gen_range(min_ghz..2.0);

    Gpu {
        brand: brand.to_string(),
        name: name.to_string(),
        min_ghz,
        max_ghz,
        memory: Memory::gigabytes(rng.gen_range(2..=6)),
    }
}

/// 4–64 GB of RAM.
pub fn new_ram() -> Memory {
    Memory::gigabytes(rand::thread_rng().gen_range(4..=64))
}

/// A 128–1024 GB SSD.
pub fn new_ssd() -> Storage {
    Storage {
        driver: StorageDriver::Ssd,
        memory: Memory::gigabytes(rand::thread_rng().gen_range(128..=1024)),
    }
}

/// A 1–6 TB HDD.
pub fn new_hdd() -> Storage {
    Storage {
        driver: StorageDriver::Hdd,
        memory: Memory::terabytes(rand::thread_rng().gen_range(1..=6)),
    }
}

/// A random 13–17 inch 16:9 screen.
pub fn new_screen() -> Screen {
    let mut rng = rand::thread_rng();
    let height = rng.gen_range(1080..=4320);
    Screen {
        size_inch: rng.gen_range(13.0..17.0),
        resolution: Resolution {
            width: height * 16 / 9,
            height,
        },
        panel: if rng.gen_bool(0.5) {
            Panel::Ips
        } else {
            Panel::Oled
        },
        multitouch: rng.gen_bool(0.5),
    }
}

/// A random laptop with a fresh UUID id.
pub fn new_laptop() -> Laptop {
    let mut rng = rand::thread_rng();
    let brand = pick(&["Apple", "Dell", "Lenovo"]);
    let name = match brand {
        "Apple" => pick(&["Macbook Air", "Macbook Pro"]),
        "Dell" => pick(&["Latitude", "Vostro", "XPS", "Alienware"]),
        _ => pick(&["Thinkpad X1", "Thinkpad P1", "Thinkpad P53"]),
    };

    Laptop {
        id: Uuid::new_v4().to_string(),
        brand: brand.to_string(),
        name: name.to_string(),
        cpu: new_cpu(),
        ram: new_ram(),
        gpus: vec![new_gpu()],
        storages: vec![new_ssd(), new_hdd()],
        screen: new_screen(),
        keyboard: new_keyboard(),
        weight: Some(Weight::Kg(rng.gen_range(1.0..3.0))),
        price_usd: rng.gen_range(1500.0..3500.0),
        release_year: rng.gen_range(2015..=2020),
        updated_at: SystemTime::now(),
    }
}

/// A random score in `1..=10`.
pub fn random_score() -> f64 {
    f64::from(rand::thread_rng().gen_range(1..=10))
}

fn pick(options: &[&'static str]) -> &'static str {
    options
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
}
