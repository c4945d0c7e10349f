//! pcbook - laptop catalog CLI client
//!
//! Exercises every pcbookd RPC and dumps sample records to disk.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use pcbook::client::LaptopClient;
use pcbook::{Filter, Laptop, Memory, RateRequest, sample, serializer};

/// pcbook CLI client
#[derive(Parser)]
#[command(name = "pcbook")]
#[command(version = pcbook::PKG_VERSION)]
#[command(about = "Laptop catalog client")]
struct Args {
    /// Server address
    #[arg(
        short,
        long,
        env = "PCBOOK_ADDRESS",
        default_value = "http://127.0.0.1:9000"
    )]
    address: String,

    /// Per-call deadline in seconds
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create random sample laptops
    Create {
        /// Number of laptops to create
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Send an empty id and let the server assign one
        #[arg(long)]
        no_id: bool,
    },

    /// Search laptops matching a filter
    Search {
        /// Maximum price in USD
        #[arg(long)]
        max_price: Option<f64>,
        /// Minimum CPU core count
        #[arg(long)]
        min_cores: Option<u32>,
        /// Minimum CPU base clock in GHz
        #[arg(long)]
        min_ghz: Option<f64>,
        /// Minimum RAM in gigabytes
        #[arg(long)]
        min_ram_gb: Option<u64>,
    },

    /// Upload an image for a laptop
    Upload {
        /// Laptop id
        laptop_id: String,
        /// Image file; its extension becomes the image type
        path: PathBuf,
    },

    /// Rate a laptop (random scores if none are given)
    Rate {
        /// Laptop id
        laptop_id: String,
        /// Scores to send, in order
        scores: Vec<String>,
        /// Number of random scores when none are given
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,
    },

    /// Write a random laptop to JSON and protobuf files
    Sample {
        /// JSON output path
        #[arg(long, default_value = "laptop.json")]
        json: PathBuf,
        /// Protobuf binary output path
        #[arg(long, default_value = "laptop.bin")]
        binary: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    // Commands that don't require a pcbookd connection
    if let Command::Sample { json, binary } = &args.command {
        let laptop = sample::new_laptop();
        serializer::write_json_file(&laptop, json)?;
        serializer::write_binary_file(&laptop, binary)?;
        let read_back = serializer::read_binary_file(binary)?;
        println!("laptop {} written", read_back.id);
        println!("json:   {}", json.display());
        println!("binary: {}", binary.display());
        return Ok(());
    }

    let client = LaptopClient::connect(&args.address)
        .await?
        .with_timeout(Duration::from_secs(args.timeout));

    match args.command {
        Command::Create { count, no_id } => {
            for _ in 0..count {
                let mut laptop = sample::new_laptop();
                if no_id {
                    laptop.id.clear();
                }
                let id = client.create_laptop(laptop).await?;
                println!("{id}");
            }
        }

        Command::Search {
            max_price,
            min_cores,
            min_ghz,
            min_ram_gb,
        } => {
            let mut filter = Filter::new();
            if let Some(price) = max_price {
                filter = filter.max_price_usd(price);
            }
            if let Some(cores) = min_cores {
                filter = filter.min_cpu_cores(cores);
            }
            if let Some(ghz) = min_ghz {
                filter = filter.min_cpu_ghz(ghz);
            }
            if let Some(gb) = min_ram_gb {
                filter = filter.min_ram(Memory::gigabytes(gb));
            }

            let mut found = client.search_laptop(filter).await?;
            let mut count = 0usize;
            while let Some(laptop) = found.next().await {
                print_laptop(&laptop?);
                count += 1;
            }
            println!("{count} laptop(s) found");
        }

        Command::Upload { laptop_id, path } => {
            let response = client.upload_image(laptop_id, &path).await?;
            println!("image {} uploaded ({} bytes)", response.id, response.size);
        }

        Command::Rate {
            laptop_id,
            scores,
            count,
        } => {
            let scores = if scores.is_empty() {
                (0..count)
                    .map(|_| sample::random_score().to_string())
                    .collect()
            } else {
                scores
            };
            let requests = scores
                .into_iter()
                .map(|score| RateRequest::new(laptop_id.clone(), score))
                .collect();
            for response in client.rate_laptop(requests).await? {
                println!(
                    "{}: rated {} time(s), average {:.2}",
                    response.laptop_id, response.rated_count, response.average_score
                );
            }
        }

        Command::Sample { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Display one laptop on a single line.
fn print_laptop(laptop: &Laptop) {
    println!(
        "{}  {} {}  {} cores @ {:.2} GHz  {} {:?}  ${:.2}",
        laptop.id,
        laptop.brand,
        laptop.name,
        laptop.cpu.number_cores,
        laptop.cpu.min_ghz,
        laptop.ram.value,
        laptop.ram.unit,
        laptop.price_usd
    );
}
