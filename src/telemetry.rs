//! Telemetry metric name constants.
//!
//! Centralised metric names for catalog operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `pcbook_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `method`: RPC handler (e.g. "create_laptop", "rate_laptop")
//! - `status`: outcome: "ok" or an error code label ("not_found", ...)

/// Total handler invocations.
///
/// Labels: `method`, `status`.
pub const REQUESTS_TOTAL: &str = "pcbook_requests_total";

/// Handler duration in seconds, measured until the call completes.
///
/// Labels: `method`.
pub const REQUEST_DURATION_SECONDS: &str = "pcbook_request_duration_seconds";

/// Total image bytes persisted by completed uploads.
pub const IMAGE_BYTES_TOTAL: &str = "pcbook_image_bytes_total";

/// Total scores accepted by `rate_laptop`.
pub const RATINGS_TOTAL: &str = "pcbook_ratings_total";
