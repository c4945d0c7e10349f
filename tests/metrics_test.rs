//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;

use futures_util::stream;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use pcbook::store::{DiskImageStore, InMemoryLaptopStore, InMemoryRatingStore, LaptopStore};
use pcbook::{CallContext, LaptopCatalog, RateRequest, UploadMessage, sample, telemetry};

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a name and, if given, a `status` label.
fn counter_total(snapshot: &SnapshotVec, name: &str, status: Option<&str>) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .filter(|(key, _, _, _)| match status {
            Some(status) => key
                .key()
                .labels()
                .any(|label| label.key() == "status" && label.value() == status),
            None => true,
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

fn catalog(image_dir: &std::path::Path) -> (LaptopCatalog, Arc<InMemoryLaptopStore>) {
    let laptops = Arc::new(InMemoryLaptopStore::new());
    let catalog = LaptopCatalog::new(
        laptops.clone(),
        Arc::new(DiskImageStore::open(image_dir).unwrap()),
        Arc::new(InMemoryRatingStore::new()),
    );
    (catalog, laptops)
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn successful_create_records_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let (catalog, _) = catalog(dir.path());
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        catalog.create_laptop(&CallContext::new(), sample::new_laptop())
    });
    assert!(result.is_ok());

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL, Some("ok")), 1);
    assert!(
        has_histogram(&snapshot, telemetry::REQUEST_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
}

#[test]
fn failed_create_records_error_status() {
    let dir = tempfile::tempdir().unwrap();
    let (catalog, _) = catalog(dir.path());
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let mut laptop = sample::new_laptop();
    laptop.id = "not-a-uuid".to_string();
    let result = metrics::with_local_recorder(&recorder, || {
        catalog.create_laptop(&CallContext::new(), laptop)
    });
    assert!(result.is_err());

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_total(&snapshot, telemetry::REQUESTS_TOTAL, Some("invalid_argument")),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL, Some("ok")), 0);
}

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn upload_records_image_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let (catalog, laptops) = catalog(dir.path());
    let laptop = sample::new_laptop();
    laptops.save(&laptop).unwrap();

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let messages = stream::iter(vec![
                    Ok(UploadMessage::info(laptop.id.clone(), ".jpg")),
                    Ok(UploadMessage::Chunk(vec![0; 300])),
                    Ok(UploadMessage::Chunk(vec![0; 200])),
                ]);
                catalog.upload_image(&CallContext::new(), messages).await
            })
        })
    });
    assert!(result.is_ok());

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::IMAGE_BYTES_TOTAL, None), 500);
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL, Some("ok")), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn rating_records_accepted_scores() {
    let dir = tempfile::tempdir().unwrap();
    let (catalog, laptops) = catalog(dir.path());
    let laptop = sample::new_laptop();
    laptops.save(&laptop).unwrap();

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let requests = stream::iter(vec![
                    Ok(RateRequest::new(laptop.id.clone(), "8")),
                    Ok(RateRequest::new(laptop.id.clone(), "6")),
                    Ok(RateRequest::new("missing", "6")),
                ]);
                catalog
                    .rate_laptop(&CallContext::new(), requests, |_| {
                        std::future::ready(Ok(()))
                    })
                    .await
            })
        })
    });
    assert!(result.is_err());

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::RATINGS_TOTAL, None), 2);
    assert_eq!(
        counter_total(&snapshot, telemetry::REQUESTS_TOTAL, Some("not_found")),
        1
    );
}

#[test]
fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let dir = tempfile::tempdir().unwrap();
    let (catalog, _) = catalog(dir.path());
    catalog
        .create_laptop(&CallContext::new(), sample::new_laptop())
        .unwrap();
}
