//! Integration tests for gRPC service mode.
//!
//! Starts an in-process pcbookd server and connects with a [`LaptopClient`],
//! validating the full round-trip through proto conversions.

#![cfg(all(feature = "server", feature = "client"))]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tonic::transport::{Endpoint, Server};
use tonic_reflection::pb::v1::ServerReflectionRequest;
use tonic_reflection::pb::v1::server_reflection_client::ServerReflectionClient;
use tonic_reflection::pb::v1::server_reflection_request::MessageRequest;
use tonic_reflection::pb::v1::server_reflection_response::MessageResponse;

use pcbook::client::LaptopClient;
use pcbook::server::LaptopServer;
use pcbook::server::proto;
use pcbook::server::proto::laptop_service_client::LaptopServiceClient;
use pcbook::server::proto::laptop_service_server::LaptopServiceServer;
use pcbook::store::{DiskImageStore, InMemoryLaptopStore, InMemoryRatingStore};
use pcbook::{Filter, LaptopCatalog, MAX_IMAGE_SIZE, Memory, PcbookError, RateRequest, sample};

/// Find an available port for testing.
async fn find_available_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start a test server on a random port and return the address string plus
/// the directory uploaded images land in.
async fn start_test_server() -> (String, TempDir) {
    let addr = find_available_port().await;
    let addr_str = format!("http://{addr}");
    let image_dir = tempfile::tempdir().unwrap();

    let catalog = LaptopCatalog::new(
        Arc::new(InMemoryLaptopStore::new()),
        Arc::new(DiskImageStore::open(image_dir.path()).unwrap()),
        Arc::new(InMemoryRatingStore::new()),
    );
    let server = LaptopServiceServer::new(LaptopServer::new(Arc::new(catalog)));
    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(proto::FILE_DESCRIPTOR_SET)
        .build_v1()
        .unwrap();

    tokio::spawn(async move {
        Server::builder()
            .add_service(server)
            .add_service(reflection)
            .serve(addr)
            .await
            .unwrap();
    });

    // Give the server a moment to bind.
    tokio::time::sleep(Duration::from_millis(100)).await;

    (addr_str, image_dir)
}

#[tokio::test]
async fn test_client_connect() {
    let (addr, _dir) = start_test_server().await;
    let client = LaptopClient::connect(&addr).await;
    assert!(client.is_ok(), "failed to connect: {:?}", client.err());
}

#[tokio::test]
async fn test_reflection_lists_laptop_service() {
    let (addr, _dir) = start_test_server().await;
    let channel = Endpoint::from_shared(addr).unwrap().connect().await.unwrap();
    let mut reflection = ServerReflectionClient::new(channel);

    let request = ServerReflectionRequest {
        host: String::new(),
        message_request: Some(MessageRequest::ListServices(String::new())),
    };
    let mut responses = reflection
        .server_reflection_info(tokio_stream::iter(vec![request]))
        .await
        .unwrap()
        .into_inner();
    let response = responses.message().await.unwrap().expect("one response");

    let services: Vec<String> = match response.message_response {
        Some(MessageResponse::ListServicesResponse(list)) => {
            list.service.into_iter().map(|service| service.name).collect()
        }
        other => panic!("unexpected reflection response: {other:?}"),
    };
    assert!(
        services.iter().any(|name| name == "pcbook.v1.LaptopService"),
        "got {services:?}"
    );
}

// =============================================================================
// CreateLaptop RPC
// =============================================================================

#[tokio::test]
async fn test_create_then_search_round_trips_record() {
    let (addr, _dir) = start_test_server().await;
    let client = LaptopClient::connect(&addr).await.unwrap();

    let laptop = sample::new_laptop();
    let id = client.create_laptop(laptop.clone()).await.unwrap();
    assert_eq!(id, laptop.id);

    let mut found = client.search_laptop(Filter::default()).await.unwrap();
    let first = found.next().await.expect("one result").unwrap();
    assert_eq!(first, laptop);
    assert!(found.next().await.is_none());
}

#[tokio::test]
async fn test_create_without_id_assigns_one() {
    let (addr, _dir) = start_test_server().await;
    let client = LaptopClient::connect(&addr).await.unwrap();

    let mut laptop = sample::new_laptop();
    laptop.id.clear();
    let id = client.create_laptop(laptop).await.unwrap();
    assert!(uuid::Uuid::parse_str(&id).is_ok());
}

#[tokio::test]
async fn test_create_errors_carry_status_codes() {
    let (addr, _dir) = start_test_server().await;
    let client = LaptopClient::connect(&addr).await.unwrap();

    let laptop = sample::new_laptop();
    client.create_laptop(laptop.clone()).await.unwrap();
    let err = client.create_laptop(laptop).await.unwrap_err();
    assert!(matches!(err, PcbookError::AlreadyExists(_)), "got {err:?}");

    let mut invalid = sample::new_laptop();
    invalid.id = "invalid-uuid".to_string();
    let err = client.create_laptop(invalid).await.unwrap_err();
    assert!(matches!(err, PcbookError::InvalidArgument(_)), "got {err:?}");
}

#[tokio::test]
async fn test_create_without_laptop_is_invalid_argument() {
    let (addr, _dir) = start_test_server().await;
    let mut grpc_client = LaptopServiceClient::connect(addr).await.unwrap();

    let status = grpc_client
        .create_laptop(proto::CreateLaptopRequest { laptop: None })
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::InvalidArgument);
}

// =============================================================================
// SearchLaptop RPC
// =============================================================================

#[tokio::test]
async fn test_search_streams_only_matches() {
    let (addr, _dir) = start_test_server().await;
    let client = LaptopClient::connect(&addr).await.unwrap();

    let mut cheap = sample::new_laptop();
    cheap.price_usd = 1200.0;
    cheap.ram = Memory::gigabytes(16);
    let mut pricey = sample::new_laptop();
    pricey.price_usd = 3200.0;
    pricey.ram = Memory::gigabytes(16);
    client.create_laptop(cheap.clone()).await.unwrap();
    client.create_laptop(pricey).await.unwrap();

    let filter = Filter::new()
        .max_price_usd(2000.0)
        .min_ram(Memory::gigabytes(8));
    let ids: Vec<String> = client
        .search_laptop(filter)
        .await
        .unwrap()
        .map(|laptop| laptop.unwrap().id)
        .collect()
        .await;
    assert_eq!(ids, vec![cheap.id]);
}

#[tokio::test]
async fn test_search_client_can_stop_early() {
    let (addr, _dir) = start_test_server().await;
    let client = LaptopClient::connect(&addr).await.unwrap();
    for _ in 0..10 {
        client.create_laptop(sample::new_laptop()).await.unwrap();
    }

    let mut found = client.search_laptop(Filter::default()).await.unwrap();
    assert!(found.next().await.is_some());
    drop(found);

    // The server keeps serving after an abandoned stream.
    let id = client.create_laptop(sample::new_laptop()).await.unwrap();
    assert!(!id.is_empty());
}

// =============================================================================
// UploadImage RPC
// =============================================================================

#[tokio::test]
async fn test_upload_image_in_chunks() {
    let (addr, dir) = start_test_server().await;
    let client = LaptopClient::connect(&addr).await.unwrap();
    let laptop = sample::new_laptop();
    client.create_laptop(laptop.clone()).await.unwrap();

    let data = vec![7u8; 3000];
    let response = client
        .upload_image_bytes(laptop.id, ".jpg", &data)
        .await
        .unwrap();

    assert_eq!(response.size, 3000);
    let path = dir.path().join(format!("{}.jpg", response.id));
    assert_eq!(std::fs::read(path).unwrap(), data);
}

#[tokio::test]
async fn test_upload_image_file_uses_extension() {
    let (addr, dir) = start_test_server().await;
    let client = LaptopClient::connect(&addr).await.unwrap();
    let laptop = sample::new_laptop();
    client.create_laptop(laptop.clone()).await.unwrap();

    let source = tempfile::tempdir().unwrap();
    let file = source.path().join("laptop.png");
    std::fs::write(&file, [1u8, 2, 3]).unwrap();

    let response = client.upload_image(laptop.id, &file).await.unwrap();
    assert_eq!(response.size, 3);
    assert!(dir.path().join(format!("{}.png", response.id)).exists());
}

#[tokio::test]
async fn test_upload_too_large_is_rejected() {
    let (addr, dir) = start_test_server().await;
    let client = LaptopClient::connect(&addr).await.unwrap();
    let laptop = sample::new_laptop();
    client.create_laptop(laptop.clone()).await.unwrap();

    let data = vec![0u8; MAX_IMAGE_SIZE + 1];
    let err = client
        .upload_image_bytes(laptop.id, ".jpg", &data)
        .await
        .unwrap_err();
    assert!(matches!(err, PcbookError::InvalidArgument(_)), "got {err:?}");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_upload_for_unknown_laptop_is_rejected() {
    let (addr, _dir) = start_test_server().await;
    let client = LaptopClient::connect(&addr).await.unwrap();

    let err = client
        .upload_image_bytes(uuid::Uuid::new_v4().to_string(), ".jpg", &[1, 2, 3])
        .await
        .unwrap_err();
    assert!(matches!(err, PcbookError::InvalidArgument(_)), "got {err:?}");
}

// =============================================================================
// RateLaptop RPC
// =============================================================================

#[tokio::test]
async fn test_rate_laptop_streams_running_average() {
    let (addr, _dir) = start_test_server().await;
    let client = LaptopClient::connect(&addr).await.unwrap();
    let laptop = sample::new_laptop();
    client.create_laptop(laptop.clone()).await.unwrap();

    let requests = ["4", "5", "3"]
        .into_iter()
        .map(|score| RateRequest::new(laptop.id.clone(), score))
        .collect();
    let responses = client.rate_laptop(requests).await.unwrap();

    let summary: Vec<(u32, f64)> = responses
        .iter()
        .map(|r| (r.rated_count, r.average_score))
        .collect();
    assert_eq!(summary, vec![(1, 4.0), (2, 4.5), (3, 4.0)]);
}

#[tokio::test]
async fn test_rate_unknown_laptop_is_not_found() {
    let (addr, _dir) = start_test_server().await;
    let client = LaptopClient::connect(&addr).await.unwrap();

    let err = client
        .rate_laptop(vec![RateRequest::new("missing", "5")])
        .await
        .unwrap_err();
    assert!(matches!(err, PcbookError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_rate_unparsable_score_is_unknown() {
    let (addr, _dir) = start_test_server().await;
    let client = LaptopClient::connect(&addr).await.unwrap();
    let laptop = sample::new_laptop();
    client.create_laptop(laptop.clone()).await.unwrap();

    let err = client
        .rate_laptop(vec![RateRequest::new(laptop.id, "great")])
        .await
        .unwrap_err();
    assert!(matches!(err, PcbookError::Unknown(_)), "got {err:?}");
}
