//! The four laptop catalog handlers, independent of the RPC transport.
//!
//! Each handler takes an explicit [`CallContext`] and talks to the stores
//! through their traits. Streaming handlers consume any
//! `Stream<Item = Result<_>>` of inbound messages, so the gRPC adapter in
//! [`crate::server::service`] and the tests drive the exact same code.
//!
//! # Error logging
//!
//! Every error a handler returns is logged once, here, where it is raised.
//! Callers map errors to their transport without logging them again.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use futures_util::{Stream, StreamExt};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::context::CallContext;
use crate::error::ErrorCode;
use crate::store::{ImageStore, LaptopStore, RatingStore};
use crate::telemetry;
use crate::types::{Filter, Laptop, RateRequest, RateResponse, UploadMessage, UploadResponse};
use crate::{PcbookError, Result};

/// Largest accepted image, in bytes. An upload of exactly this size is
/// accepted.
pub const MAX_IMAGE_SIZE: usize = 1 << 20;

/// Laptop catalog service: record creation, search, image upload and rating.
pub struct LaptopCatalog {
    laptops: Arc<dyn LaptopStore>,
    images: Arc<dyn ImageStore>,
    ratings: Arc<dyn RatingStore>,
}

/// Upload stream progress.
enum UploadState {
    AwaitingInfo,
    AwaitingChunkOrEnd {
        laptop_id: String,
        image_type: String,
        data: Vec<u8>,
    },
}

impl LaptopCatalog {
    pub fn new(
        laptops: Arc<dyn LaptopStore>,
        images: Arc<dyn ImageStore>,
        ratings: Arc<dyn RatingStore>,
    ) -> Self {
        Self {
            laptops,
            images,
            ratings,
        }
    }

    /// Store a new laptop and return its id.
    ///
    /// A non-empty id must be a UUID; an empty one is replaced by a fresh
    /// UUID. The context is checked once, before the save: a cancellation
    /// that lands during the save does not undo it.
    #[instrument(skip_all, fields(method = "create_laptop", laptop_id = %laptop.id))]
    pub fn create_laptop(&self, ctx: &CallContext, mut laptop: Laptop) -> Result<String> {
        let start = Instant::now();
        let result = self.create_laptop_inner(ctx, &mut laptop);
        record_request("create_laptop", start, &result);
        result
    }

    fn create_laptop_inner(&self, ctx: &CallContext, laptop: &mut Laptop) -> Result<String> {
        info!("received create-laptop request");

        if laptop.id.is_empty() {
            laptop.id = Uuid::new_v4().to_string();
        } else if let Err(e) = Uuid::parse_str(&laptop.id) {
            return Err(log_error(PcbookError::InvalidArgument(format!(
                "laptop ID is not a valid UUID: {e}"
            ))));
        }

        ctx.check().map_err(log_error)?;

        self.laptops.save(laptop).map_err(|e| {
            log_error(match e {
                PcbookError::AlreadyExists(msg) => PcbookError::AlreadyExists(msg),
                other => {
                    PcbookError::Internal(format!("cannot save laptop to the store: {other}"))
                }
            })
        })?;

        info!(laptop_id = %laptop.id, "saved laptop");
        Ok(laptop.id.clone())
    }

    /// Call `found` with every stored laptop that matches `filter`.
    ///
    /// `found` may block (e.g. on a bounded channel); no store lock is held
    /// while it runs. Cancellation stops the scan with its own error code,
    /// any other failure (store or `found`) becomes
    /// [`PcbookError::Internal`].
    #[instrument(skip_all, fields(method = "search_laptop"))]
    pub fn search_laptop(
        &self,
        ctx: &CallContext,
        filter: &Filter,
        found: &mut dyn FnMut(Laptop) -> Result<()>,
    ) -> Result<()> {
        let start = Instant::now();
        info!(?filter, "received search-laptop request");

        let mut sent = 0usize;
        let result = self
            .laptops
            .search(ctx, filter, &mut |laptop| {
                let id = laptop.id.clone();
                found(laptop)?;
                sent += 1;
                debug!(laptop_id = %id, "sent laptop");
                Ok(())
            })
            .map_err(|e| {
                log_error(if e.is_cancellation() {
                    e
                } else {
                    PcbookError::Internal(format!("unexpected error: {e}"))
                })
            });

        if result.is_ok() {
            info!(sent, "search finished");
        }
        record_request("search_laptop", start, &result);
        result
    }

    /// Receive an image as an info message followed by byte chunks, and
    /// store it once the stream ends.
    ///
    /// Nothing is written if the stream fails or the image exceeds
    /// [`MAX_IMAGE_SIZE`].
    #[instrument(skip_all, fields(method = "upload_image"))]
    pub async fn upload_image<S>(&self, ctx: &CallContext, messages: S) -> Result<UploadResponse>
    where
        S: Stream<Item = Result<UploadMessage>> + Unpin,
    {
        let start = Instant::now();
        let result = self.upload_image_inner(ctx, messages).await;
        record_request("upload_image", start, &result);
        result
    }

    async fn upload_image_inner<S>(
        &self,
        ctx: &CallContext,
        mut messages: S,
    ) -> Result<UploadResponse>
    where
        S: Stream<Item = Result<UploadMessage>> + Unpin,
    {
        let mut state = UploadState::AwaitingInfo;

        let (laptop_id, image_type, data) = loop {
            ctx.check().map_err(log_error)?;
            let next = ctx.guard(messages.next()).await.map_err(log_error)?;

            state = match (state, next) {
                (_, Some(Err(e))) => {
                    return Err(log_error(PcbookError::Unknown(format!(
                        "cannot receive upload message: {e}"
                    ))));
                }
                (UploadState::AwaitingInfo, None) => {
                    return Err(log_error(PcbookError::Unknown(
                        "cannot receive image info: stream ended".to_string(),
                    )));
                }
                (UploadState::AwaitingInfo, Some(Ok(UploadMessage::Chunk(_)))) => {
                    return Err(log_error(PcbookError::Unknown(
                        "first upload message must carry image info".to_string(),
                    )));
                }
                (
                    UploadState::AwaitingInfo,
                    Some(Ok(UploadMessage::Info {
                        laptop_id,
                        image_type,
                    })),
                ) => {
                    info!(%laptop_id, %image_type, "received upload-image request");
                    self.check_upload_target(&laptop_id, &image_type)?;
                    UploadState::AwaitingChunkOrEnd {
                        laptop_id,
                        image_type,
                        data: Vec::new(),
                    }
                }
                (UploadState::AwaitingChunkOrEnd { .. }, Some(Ok(UploadMessage::Info { .. }))) => {
                    return Err(log_error(PcbookError::Unknown(
                        "unexpected image info after the first message".to_string(),
                    )));
                }
                (
                    UploadState::AwaitingChunkOrEnd {
                        laptop_id,
                        image_type,
                        mut data,
                    },
                    Some(Ok(UploadMessage::Chunk(chunk))),
                ) => {
                    let size = data.len() + chunk.len();
                    debug!(chunk = chunk.len(), size, "received chunk");
                    if size > MAX_IMAGE_SIZE {
                        return Err(log_error(PcbookError::InvalidArgument(format!(
                            "image is too large: {size} > {MAX_IMAGE_SIZE}"
                        ))));
                    }
                    data.extend_from_slice(&chunk);
                    UploadState::AwaitingChunkOrEnd {
                        laptop_id,
                        image_type,
                        data,
                    }
                }
                (
                    UploadState::AwaitingChunkOrEnd {
                        laptop_id,
                        image_type,
                        data,
                    },
                    None,
                ) => break (laptop_id, image_type, data),
            };
        };

        let size = data.len();
        let id = self
            .images
            .save(&laptop_id, &image_type, data)
            .await
            .map_err(|e| {
                log_error(PcbookError::Internal(format!(
                    "cannot save image to the store: {e}"
                )))
            })?;

        metrics::counter!(telemetry::IMAGE_BYTES_TOTAL).increment(size as u64);
        info!(image_id = %id, size, "saved image");
        Ok(UploadResponse {
            id,
            // Bounded by MAX_IMAGE_SIZE.
            size: size as u32,
        })
    }

    fn check_upload_target(&self, laptop_id: &str, image_type: &str) -> Result<()> {
        if image_type.contains(['/', '\\']) {
            return Err(log_error(PcbookError::InvalidArgument(format!(
                "image type {image_type:?} must be a plain extension"
            ))));
        }
        match self.laptops.find(laptop_id) {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(log_error(PcbookError::InvalidArgument(format!(
                "laptop {laptop_id} doesn't exist"
            )))),
            Err(e) => Err(log_error(PcbookError::Internal(format!(
                "cannot find laptop: {e}"
            )))),
        }
    }

    /// Rate laptops one message at a time.
    ///
    /// Each accepted score is answered through `respond` before the next
    /// request is read, so responses follow request order. A clean end of
    /// the request stream ends the call successfully.
    #[instrument(skip_all, fields(method = "rate_laptop"))]
    pub async fn rate_laptop<S, F, Fut>(
        &self,
        ctx: &CallContext,
        requests: S,
        respond: F,
    ) -> Result<()>
    where
        S: Stream<Item = Result<RateRequest>> + Unpin,
        F: FnMut(RateResponse) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let start = Instant::now();
        let result = self.rate_laptop_inner(ctx, requests, respond).await;
        record_request("rate_laptop", start, &result);
        result
    }

    async fn rate_laptop_inner<S, F, Fut>(
        &self,
        ctx: &CallContext,
        mut requests: S,
        mut respond: F,
    ) -> Result<()>
    where
        S: Stream<Item = Result<RateRequest>> + Unpin,
        F: FnMut(RateResponse) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        loop {
            ctx.check().map_err(log_error)?;

            let request = match ctx.guard(requests.next()).await.map_err(log_error)? {
                None => {
                    debug!("no more data");
                    return Ok(());
                }
                Some(Err(e)) => {
                    return Err(log_error(PcbookError::Unknown(format!(
                        "cannot receive stream request: {e}"
                    ))));
                }
                Some(Ok(request)) => request,
            };

            let score = parse_score(&request.score).map_err(log_error)?;
            let laptop_id = request.laptop_id;
            info!(%laptop_id, score, "received rate-laptop request");

            match self.laptops.find(&laptop_id) {
                Ok(Some(_)) => {}
                Ok(None) => {
                    return Err(log_error(PcbookError::NotFound(format!(
                        "laptop {laptop_id} is not found"
                    ))));
                }
                Err(e) => {
                    return Err(log_error(PcbookError::Internal(format!(
                        "cannot find laptop: {e}"
                    ))));
                }
            }

            let rating = self.ratings.add(&laptop_id, score).map_err(|e| {
                log_error(PcbookError::Internal(format!(
                    "cannot add rating to the store: {e}"
                )))
            })?;
            metrics::counter!(telemetry::RATINGS_TOTAL).increment(1);

            let response = RateResponse {
                laptop_id,
                rated_count: rating.count,
                average_score: rating.average(),
            };
            respond(response).await.map_err(|e| {
                log_error(PcbookError::Unknown(format!(
                    "cannot send stream response: {e}"
                )))
            })?;
        }
    }
}

/// Parse a textual score. Non-numeric and non-finite values are rejected.
fn parse_score(raw: &str) -> Result<f64> {
    let score = raw
        .parse::<f64>()
        .map_err(|e| PcbookError::Unknown(format!("cannot parse score {raw:?}: {e}")))?;
    // NaN or infinity would poison the running average for good.
    if !score.is_finite() {
        return Err(PcbookError::InvalidArgument(format!(
            "score {raw:?} is not a finite number"
        )));
    }
    Ok(score)
}

/// Log an error at the point it is raised. Caller faults and cancellations
/// are warnings; server faults are errors.
fn log_error(err: PcbookError) -> PcbookError {
    match err.code() {
        ErrorCode::Internal => error!(code = %err.code(), error = %err, "request failed"),
        _ => warn!(code = %err.code(), error = %err, "request failed"),
    }
    err
}

/// Record request outcome metrics (counter + histogram).
fn record_request<T>(method: &'static str, start: Instant, result: &Result<T>) {
    let status = match result {
        Ok(_) => "ok",
        Err(e) => e.code().as_str(),
    };
    metrics::counter!(telemetry::REQUESTS_TOTAL,
        "method" => method,
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
        "method" => method,
    )
    .record(start.elapsed().as_secs_f64());
}
