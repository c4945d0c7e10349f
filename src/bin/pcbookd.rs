//! pcbookd - laptop catalog daemon.
//!
//! Serves the [`LaptopCatalog`](pcbook::LaptopCatalog) over gRPC, alongside
//! the server reflection service.

use std::sync::Arc;

use clap::Parser;
use tonic::transport::Server;
use tracing::info;

use pcbook::LaptopCatalog;
use pcbook::server::LaptopServer;
use pcbook::server::config::Config;
use pcbook::server::proto::FILE_DESCRIPTOR_SET;
use pcbook::server::proto::laptop_service_server::LaptopServiceServer;
use pcbook::store::{DiskImageStore, InMemoryLaptopStore, InMemoryRatingStore};

/// pcbookd - laptop catalog service.
#[derive(Parser)]
#[command(name = "pcbookd")]
#[command(version = pcbook::PKG_VERSION)]
#[command(about = "Laptop catalog gRPC daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Port to listen on, overriding the configured address.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Default: info for this crate; override with RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pcbook=info,pcbookd=info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let addr = config.bind_address(args.port)?;

    let images = DiskImageStore::open(&config.storage.image_dir)?;
    let catalog = LaptopCatalog::new(
        Arc::new(InMemoryLaptopStore::new()),
        Arc::new(images),
        Arc::new(InMemoryRatingStore::new()),
    );

    info!(
        version = pcbook::version_string(),
        %addr,
        image_dir = %config.storage.image_dir.display(),
        "pcbookd starting"
    );

    let service = LaptopServer::new(Arc::new(catalog))
        .with_stream_buffer(config.server.limits.stream_buffer);
    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1()?;

    Server::builder()
        .concurrency_limit_per_connection(config.server.limits.max_concurrent_requests)
        .add_service(LaptopServiceServer::new(service))
        .add_service(reflection)
        .serve_with_shutdown(addr, async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
        })
        .await?;

    Ok(())
}
