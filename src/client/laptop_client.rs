//! [`LaptopClient`]: native-typed access to a remote pcbookd over gRPC.
//!
//! All proto and native type conversions live in [`crate::server::convert`].

use std::path::Path;
use std::pin::Pin;
use std::time::Duration;

use futures_util::{Stream, StreamExt};
use tonic::Request;
use tonic::transport::Channel;
use tracing::{debug, info};

use crate::server::proto;
use crate::server::proto::laptop_service_client::LaptopServiceClient;
use crate::types::{Filter, Laptop, RateRequest, RateResponse, UploadMessage, UploadResponse};
use crate::{PcbookError, Result};

/// Bytes carried by each chunk message of an upload.
pub const UPLOAD_CHUNK_SIZE: usize = 1024;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the laptop catalog service.
///
/// Every call carries a deadline (5 seconds unless changed with
/// [`LaptopClient::with_timeout`]), sent to the server as `grpc-timeout`.
#[derive(Clone)]
pub struct LaptopClient {
    inner: LaptopServiceClient<Channel>,
    timeout: Duration,
}

impl LaptopClient {
    /// Connect to a pcbookd server at the given address.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = LaptopClient::connect("http://127.0.0.1:9000").await?;
    /// ```
    pub async fn connect(addr: impl Into<String>) -> Result<Self> {
        let addr = addr.into();
        let inner = LaptopServiceClient::connect(addr.clone())
            .await
            .map_err(|e| PcbookError::Unknown(format!("failed to connect to {addr}: {e}")))?;
        Ok(Self {
            inner,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Use a different per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn request<T>(&self, message: T) -> Request<T> {
        let mut request = Request::new(message);
        request.set_timeout(self.timeout);
        request
    }

    /// Store a laptop and return its id (server-assigned if `laptop.id` is empty).
    pub async fn create_laptop(&self, laptop: Laptop) -> Result<String> {
        let request = self.request(proto::CreateLaptopRequest {
            laptop: Some(laptop.into()),
        });
        let response = self.inner.clone().create_laptop(request).await?;
        let id = response.into_inner().id;
        info!(%id, "created laptop");
        Ok(id)
    }

    /// Stream every stored laptop matching `filter`.
    pub async fn search_laptop(
        &self,
        filter: Filter,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<Laptop>> + Send>>> {
        let request = self.request(proto::SearchLaptopRequest {
            filter: Some(filter.into()),
        });
        let response = self.inner.clone().search_laptop(request).await?;
        let stream = response.into_inner().map(|item| {
            let item = item.map_err(PcbookError::from)?;
            item.laptop
                .map(Laptop::from)
                .ok_or_else(|| PcbookError::Unknown("search response carries no laptop".into()))
        });
        Ok(Box::pin(stream))
    }

    /// Upload `data` as an image of `laptop_id`, split into
    /// [`UPLOAD_CHUNK_SIZE`] chunks after the leading info message.
    pub async fn upload_image_bytes(
        &self,
        laptop_id: impl Into<String>,
        image_type: impl Into<String>,
        data: &[u8],
    ) -> Result<UploadResponse> {
        let mut messages = vec![proto::UploadImageRequest::from(UploadMessage::info(
            laptop_id, image_type,
        ))];
        messages.extend(
            data.chunks(UPLOAD_CHUNK_SIZE)
                .map(|chunk| UploadMessage::Chunk(chunk.to_vec()).into()),
        );
        debug!(chunks = messages.len() - 1, bytes = data.len(), "uploading image");

        let request = self.request(tokio_stream::iter(messages));
        let response = self.inner.clone().upload_image(request).await?;
        let response = UploadResponse::from(response.into_inner());
        info!(id = %response.id, size = response.size, "image uploaded");
        Ok(response)
    }

    /// Upload the file at `path`; its extension (with the dot) is the image type.
    pub async fn upload_image(
        &self,
        laptop_id: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<UploadResponse> {
        let path = path.as_ref();
        let image_type = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let data = tokio::fs::read(path).await.map_err(|e| {
            PcbookError::InvalidArgument(format!("cannot open image file {}: {e}", path.display()))
        })?;
        self.upload_image_bytes(laptop_id, image_type, &data).await
    }

    /// Send every rating in order and collect one response per request.
    pub async fn rate_laptop(&self, requests: Vec<RateRequest>) -> Result<Vec<RateResponse>> {
        let expected = requests.len();
        let outbound: Vec<proto::RateLaptopRequest> =
            requests.into_iter().map(Into::into).collect();
        let request = self.request(tokio_stream::iter(outbound));

        let mut inbound = self.inner.clone().rate_laptop(request).await?.into_inner();
        let mut responses = Vec::with_capacity(expected);
        while let Some(response) = inbound.message().await? {
            let response = RateResponse::from(response);
            debug!(
                laptop_id = %response.laptop_id,
                rated_count = response.rated_count,
                average_score = response.average_score,
                "received rating"
            );
            responses.push(response);
        }
        Ok(responses)
    }
}
