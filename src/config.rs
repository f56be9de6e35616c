//! Runtime configuration derived from CLI arguments
//!
//! Validates the parsed arguments and bundles them into a `Config` the
//! composition root consumes. Credentials are optional as a pair: the
//! server boots without them, but remote resolution then fails with a
//! configuration error, which the original server also tolerated.

use chrono::Duration;
use std::path::PathBuf;
use thiserror::Error;

use crate::cli::Cli;
use crate::data::Credentials;

/// Errors produced while validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TTL of zero would make every entry stale on arrival
    #[error("--ttl-hours must be greater than zero")]
    ZeroTtl,

    /// Only one half of the credential pair was supplied
    #[error("AMADEUS_CLIENT_ID and AMADEUS_CLIENT_SECRET must be set together")]
    PartialCredentials,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server listens on
    pub port: u16,
    /// Freshness window applied by both the cache and the snapshot store
    pub ttl: Duration,
    /// Snapshot directory override; `None` means the platform cache dir
    pub cache_dir: Option<PathBuf>,
    /// Whether to snapshot the cache to disk at all
    pub persist: bool,
    /// Amadeus API base URL
    pub amadeus_url: String,
    /// Provider credentials, present only when both halves are set
    pub credentials: Option<Credentials>,
}

impl Config {
    /// Builds a validated configuration from parsed CLI arguments
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        if cli.ttl_hours == 0 {
            return Err(ConfigError::ZeroTtl);
        }

        let credentials = match (&cli.amadeus_client_id, &cli.amadeus_client_secret) {
            (Some(id), Some(secret)) => Some(Credentials {
                client_id: id.clone(),
                client_secret: secret.clone(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialCredentials),
        };

        Ok(Self {
            port: cli.port,
            ttl: Duration::hours(cli.ttl_hours as i64),
            cache_dir: cli.cache_dir.clone(),
            persist: !cli.no_persist,
            amadeus_url: cli.amadeus_url.clone(),
            credentials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["aerodex"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    #[test]
    fn test_ttl_is_converted_to_hours() {
        let config = Config::from_cli(&cli(&["--ttl-hours", "6"])).expect("Valid config");
        assert_eq!(config.ttl, Duration::hours(6));
    }

    #[test]
    fn test_zero_ttl_is_rejected() {
        let result = Config::from_cli(&cli(&["--ttl-hours", "0"]));
        assert!(matches!(result, Err(ConfigError::ZeroTtl)));
    }

    #[test]
    fn test_partial_credentials_are_rejected() {
        let result = Config::from_cli(&cli(&["--amadeus-client-id", "id-only"]));
        assert!(matches!(result, Err(ConfigError::PartialCredentials)));
    }

    #[test]
    fn test_full_credentials_are_bundled() {
        let config = Config::from_cli(&cli(&[
            "--amadeus-client-id",
            "id",
            "--amadeus-client-secret",
            "secret",
        ]))
        .expect("Valid config");

        let credentials = config.credentials.expect("Credentials should be present");
        assert_eq!(credentials.client_id, "id");
        assert_eq!(credentials.client_secret, "secret");
    }

    #[test]
    fn test_no_persist_disables_snapshotting() {
        let config = Config::from_cli(&cli(&["--no-persist"])).expect("Valid config");
        assert!(!config.persist);
    }
}
