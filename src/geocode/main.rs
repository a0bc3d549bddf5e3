//! Command-line address geocoder.
//!
//! Looks up each address with one request to the OneMap search API and
//! prints the coordinates of the first match.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use demarc::config::Config;
use demarc::{Coordinates, OneMapClient};

#[derive(Parser, Debug)]
#[command(name = "geocode")]
#[command(about = "Geocode addresses with the OneMap search API")]
struct Args {
    /// Addresses to look up
    #[arg(required = true)]
    addresses: Vec<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bearer token (overrides the config file)
    #[arg(long)]
    token: Option<String>,

    /// Search endpoint URL (overrides the config file)
    #[arg(long)]
    endpoint: Option<String>,

    /// Print one JSON object per address
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Lookup<'a> {
    address: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    coordinates: Option<Coordinates>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_ref())?;
    if let Some(token) = args.token {
        config.geocoder.token = token;
    }
    if let Some(endpoint) = args.endpoint {
        config.geocoder.endpoint = endpoint;
    }

    info!("Geocoding {} address(es) via {}", args.addresses.len(), config.geocoder.endpoint);
    let client = OneMapClient::new(&config.geocoder)?;

    let mut found = 0;
    for address in &args.addresses {
        let coordinates = client.geocode(address).await;
        if coordinates.is_some() {
            found += 1;
        }

        if args.json {
            let line = serde_json::to_string(&Lookup {
                address,
                coordinates,
            })?;
            println!("{}", line);
        } else {
            match coordinates {
                Some(c) => println!("{}\t{}\t{}", address, c.latitude, c.longitude),
                None => println!("{}\tnot found", address),
            }
        }
    }

    info!("Resolved {}/{} addresses", found, args.addresses.len());
    Ok(())
}
