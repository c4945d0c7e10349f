//! gRPC service implementation.
//!
//! [`LaptopServer`] adapts [`LaptopCatalog`] to the generated
//! `LaptopService` trait: it converts proto messages, builds a
//! [`CallContext`] per call, and maps [`PcbookError`] to [`Status`].
//! Handler errors are already logged by the catalog and are not logged again.
//!
//! # Streaming responses
//!
//! Server-streaming and bidirectional calls run their handler on a spawned
//! task feeding a bounded channel. When the client drops the response
//! stream, the call's context is cancelled so the handler stops at its next
//! check instead of running to completion.

use std::pin::Pin;
use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::{CancellationToken, DropGuard};
use tonic::{Request, Response, Status, Streaming};
use tracing::{debug, warn};

use crate::context::{CallContext, GRPC_TIMEOUT_HEADER, parse_grpc_timeout};
use crate::types::{Filter, Laptop, RateRequest, RateResponse, UploadMessage};
use crate::{LaptopCatalog, PcbookError};

use super::proto;
use super::proto::laptop_service_server::LaptopService;

/// Default number of responses buffered between a streaming handler and
/// the transport.
pub const DEFAULT_STREAM_BUFFER: usize = 64;

type ResponseStream<T> = Pin<Box<dyn Stream<Item = Result<T, Status>> + Send>>;

/// gRPC service that wraps a [`LaptopCatalog`].
pub struct LaptopServer {
    catalog: Arc<LaptopCatalog>,
    stream_buffer: usize,
}

impl LaptopServer {
    /// Create a new service wrapping the given catalog.
    pub fn new(catalog: Arc<LaptopCatalog>) -> Self {
        Self {
            catalog,
            stream_buffer: DEFAULT_STREAM_BUFFER,
        }
    }

    /// Override the response buffer size for streaming calls (minimum 1).
    pub fn with_stream_buffer(mut self, size: usize) -> Self {
        self.stream_buffer = size.max(1);
        self
    }
}

/// Build the call context from request metadata.
fn call_context<T>(request: &Request<T>) -> CallContext {
    let ctx = CallContext::new();
    let timeout = request
        .metadata()
        .get(GRPC_TIMEOUT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_grpc_timeout);
    match timeout {
        Some(timeout) => ctx.with_timeout(timeout),
        None => ctx,
    }
}

/// Cancel `ctx` if the client drops the receiving end of `tx`.
///
/// The watcher exits when the returned guard is dropped, so the worker must
/// hold it for as long as it produces responses.
fn cancel_on_disconnect<T: Send + 'static>(ctx: &CallContext, tx: &mpsc::Sender<T>) -> DropGuard {
    let done = CancellationToken::new();
    let stop = done.clone();
    let ctx = ctx.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = tx.closed() => {
                debug!("client dropped the response stream");
                ctx.cancel();
            }
            _ = stop.cancelled() => {}
        }
    });
    done.drop_guard()
}

fn stream_closed() -> PcbookError {
    PcbookError::Unknown("response stream closed by client".to_string())
}

#[tonic::async_trait]
impl LaptopService for LaptopServer {
    type SearchLaptopStream = ResponseStream<proto::SearchLaptopResponse>;
    type RateLaptopStream = ResponseStream<proto::RateLaptopResponse>;

    async fn create_laptop(
        &self,
        request: Request<proto::CreateLaptopRequest>,
    ) -> Result<Response<proto::CreateLaptopResponse>, Status> {
        let ctx = call_context(&request);
        let Some(laptop) = request.into_inner().laptop else {
            warn!(method = "create_laptop", "request carries no laptop");
            return Err(Status::invalid_argument("request carries no laptop"));
        };

        let id = self.catalog.create_laptop(&ctx, Laptop::from(laptop))?;
        Ok(Response::new(proto::CreateLaptopResponse { id }))
    }

    async fn search_laptop(
        &self,
        request: Request<proto::SearchLaptopRequest>,
    ) -> Result<Response<Self::SearchLaptopStream>, Status> {
        let ctx = call_context(&request);
        let filter: Filter = request
            .into_inner()
            .filter
            .map(Into::into)
            .unwrap_or_default();

        let (tx, rx) =
            mpsc::channel::<Result<proto::SearchLaptopResponse, Status>>(self.stream_buffer);
        let watcher = cancel_on_disconnect(&ctx, &tx);
        let catalog = Arc::clone(&self.catalog);

        // The store scan is synchronous; block on the channel off the runtime.
        tokio::task::spawn_blocking(move || {
            let _watcher = watcher;
            let result = catalog.search_laptop(&ctx, &filter, &mut |laptop| {
                let response = proto::SearchLaptopResponse {
                    laptop: Some(laptop.into()),
                };
                tx.blocking_send(Ok(response)).map_err(|_| stream_closed())
            });
            if let Err(e) = result {
                let _ = tx.blocking_send(Err(e.into()));
            }
        });

        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }

    async fn upload_image(
        &self,
        request: Request<Streaming<proto::UploadImageRequest>>,
    ) -> Result<Response<proto::UploadImageResponse>, Status> {
        let ctx = call_context(&request);
        let messages = request.into_inner().map(|item| {
            item.map_err(PcbookError::from)
                .and_then(UploadMessage::try_from)
        });

        let response = self.catalog.upload_image(&ctx, messages).await?;
        Ok(Response::new(response.into()))
    }

    async fn rate_laptop(
        &self,
        request: Request<Streaming<proto::RateLaptopRequest>>,
    ) -> Result<Response<Self::RateLaptopStream>, Status> {
        let ctx = call_context(&request);
        let requests = request
            .into_inner()
            .map(|item| item.map(RateRequest::from).map_err(PcbookError::from));

        let (tx, rx) =
            mpsc::channel::<Result<proto::RateLaptopResponse, Status>>(self.stream_buffer);
        let watcher = cancel_on_disconnect(&ctx, &tx);
        let catalog = Arc::clone(&self.catalog);

        tokio::spawn(async move {
            let _watcher = watcher;
            let responses = tx.clone();
            let respond = move |response: RateResponse| {
                let responses = responses.clone();
                async move {
                    responses
                        .send(Ok(response.into()))
                        .await
                        .map_err(|_| stream_closed())
                }
            };
            if let Err(e) = catalog.rate_laptop(&ctx, requests, respond).await {
                let _ = tx.send(Err(e.into())).await;
            }
        });

        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }
}
