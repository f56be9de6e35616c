//! Command-line interface parsing for the aerodex server
//!
//! This module defines the clap argument surface: listen port, cache TTL
//! and snapshot location, and the Amadeus credentials (read from the
//! environment, matching how the original server was configured).

use clap::Parser;
use std::path::PathBuf;

/// Aerodex - airport lookup service with a TTL cache over the Amadeus API
#[derive(Parser, Debug)]
#[command(name = "aerodex")]
#[command(about = "Airport code lookup service backed by the Amadeus travel API")]
#[command(version)]
pub struct Cli {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5001)]
    pub port: u16,

    /// How long a cached airport stays fresh, in hours
    #[arg(long, value_name = "HOURS", default_value_t = 24)]
    pub ttl_hours: u64,

    /// Directory for the cache snapshot (defaults to the platform cache dir)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Run without persisting the cache to disk
    #[arg(long)]
    pub no_persist: bool,

    /// Amadeus API base URL (switch to the production host, or point at a
    /// mock server)
    #[arg(long, value_name = "URL", default_value = "https://test.api.amadeus.com")]
    pub amadeus_url: String,

    /// Amadeus API client id
    #[arg(long, env = "AMADEUS_CLIENT_ID", hide_env_values = true)]
    pub amadeus_client_id: Option<String>,

    /// Amadeus API client secret
    #[arg(long, env = "AMADEUS_CLIENT_SECRET", hide_env_values = true)]
    pub amadeus_client_secret: Option<String>,
}
