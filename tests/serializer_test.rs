//! Tests for JSON and protobuf file dumps.

use pcbook::{Laptop, PcbookError, Weight, sample, serializer};

fn cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// A sample laptop whose floats have short decimal forms.
fn tidy_laptop() -> Laptop {
    let mut laptop = sample::new_laptop();
    laptop.price_usd = cents(laptop.price_usd);
    laptop.cpu.min_ghz = cents(laptop.cpu.min_ghz);
    laptop.cpu.max_ghz = cents(laptop.cpu.max_ghz);
    for gpu in &mut laptop.gpus {
        gpu.min_ghz = cents(gpu.min_ghz);
        gpu.max_ghz = cents(gpu.max_ghz);
    }
    laptop.screen.size_inch = 15.6;
    laptop.weight = Some(Weight::Kg(1.25));
    laptop
}

#[test]
fn json_file_preserves_laptop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("laptop.json");
    let laptop = tidy_laptop();

    serializer::write_json_file(&laptop, &path).unwrap();
    let read: Laptop = serializer::read_json_file(&path).unwrap();
    assert_eq!(read, laptop);
}

#[test]
fn json_uses_field_names() {
    let laptop = sample::new_laptop();
    let json = serializer::to_json(&laptop).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["id"], laptop.id);
    assert_eq!(value["brand"], laptop.brand);
    assert!(value["cpu"]["number_cores"].is_u64());
    assert!(value["weight"]["kg"].is_f64());
}

#[test]
fn reading_missing_json_file_is_internal() {
    let dir = tempfile::tempdir().unwrap();
    let err = serializer::read_json_file::<Laptop>(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, PcbookError::Internal(_)));
}

#[test]
fn reading_malformed_json_is_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{\"id\":").unwrap();

    let err = serializer::read_json_file::<Laptop>(&path).unwrap_err();
    assert!(matches!(err, PcbookError::Json(_)));
}

#[cfg(any(feature = "server", feature = "client"))]
mod binary {
    use std::time::{Duration, UNIX_EPOCH};

    use pcbook::{PcbookError, sample, serializer};

    #[test]
    fn binary_file_preserves_laptop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("laptop.bin");
        let mut laptop = sample::new_laptop();
        // Whole seconds plus nanos survive the Timestamp encoding exactly.
        laptop.updated_at = UNIX_EPOCH + Duration::new(1_600_000_000, 123_456_789);

        serializer::write_binary_file(&laptop, &path).unwrap();
        let read = serializer::read_binary_file(&path).unwrap();
        assert_eq!(read, laptop);
    }

    #[test]
    fn binary_is_smaller_than_json() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("laptop.bin");
        let json = dir.path().join("laptop.json");
        let laptop = sample::new_laptop();

        serializer::write_binary_file(&laptop, &bin).unwrap();
        serializer::write_json_file(&laptop, &json).unwrap();
        let bin_len = std::fs::metadata(&bin).unwrap().len();
        let json_len = std::fs::metadata(&json).unwrap().len();
        assert!(bin_len < json_len, "{bin_len} >= {json_len}");
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.bin");
        std::fs::write(&path, [0xff, 0xff, 0xff]).unwrap();

        let err = serializer::read_binary_file(&path).unwrap_err();
        assert!(matches!(err, PcbookError::Decode(_)));
    }
}
