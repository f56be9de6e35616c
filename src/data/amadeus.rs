//! Amadeus location API client
//!
//! This module resolves IATA codes and free-text keywords against the
//! Amadeus `reference-data/locations` endpoint, mapping the provider's
//! response shape into our `Airport` record. Authentication uses the OAuth2
//! client-credentials flow; the bearer token is cached in-process and
//! refreshed shortly before it expires.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::Airport;

/// Base URL for the Amadeus test environment
const AMADEUS_BASE_URL: &str = "https://test.api.amadeus.com";

/// OAuth2 token endpoint path
const TOKEN_PATH: &str = "/v1/security/oauth2/token";

/// Location search endpoint path
const LOCATIONS_PATH: &str = "/v1/reference-data/locations";

/// Per-request timeout; the upstream source had none, so a hung provider
/// call hung the lookup indefinitely. Bounding it is a deliberate deviation.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Keywords shorter than this return no results without hitting the API
const MIN_KEYWORD_LEN: usize = 2;

/// Refresh the bearer token this long before its reported expiry
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// Errors that can occur when talking to the Amadeus API
#[derive(Debug, Error)]
pub enum AmadeusError {
    /// Client id/secret were not supplied
    #[error("Amadeus credentials are not configured")]
    MissingCredentials,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse provider response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Token endpoint rejected the credentials
    #[error("Token request rejected with HTTP {0}")]
    AuthRejected(u16),

    /// Provider answered with a non-success status
    #[error("Provider returned HTTP {0}")]
    ProviderStatus(u16),
}

/// Amadeus API credentials (client-credentials grant)
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Outcome of resolving a single key within a batch
///
/// Batch resolution reports every key explicitly instead of silently
/// dropping failures inside a loop; callers decide what a partial result
/// means to them.
#[derive(Debug)]
pub enum Resolution {
    /// The provider returned a match
    Found(Airport),
    /// The provider returned zero matches for this code
    NotFound(String),
    /// The lookup for this code failed; the rest of the batch is unaffected
    Failed { code: String, error: AmadeusError },
}

/// A cached OAuth2 bearer token
#[derive(Debug, Clone)]
struct BearerToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl BearerToken {
    fn is_valid(&self) -> bool {
        self.expires_at - Utc::now() > Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS)
    }
}

/// Client for the Amadeus location API
///
/// Holds an HTTP client and the cached bearer token. Construct once and
/// share behind an `Arc`; the token cache is interior-mutable.
#[derive(Debug)]
pub struct AmadeusClient {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
    token: Mutex<Option<BearerToken>>,
}

impl AmadeusClient {
    /// Creates a new client against the default Amadeus endpoint
    ///
    /// `credentials` may be `None`; every remote call then fails with
    /// `MissingCredentials`, which keeps the service bootable without a
    /// provider account.
    pub fn new(credentials: Option<Credentials>) -> Self {
        Self {
            client: Client::new(),
            base_url: AMADEUS_BASE_URL.to_string(),
            credentials,
            token: Mutex::new(None),
        }
    }

    /// Overrides the provider base URL (test vs production host, or a mock
    /// server in tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Whether credentials were supplied at construction
    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Resolves a single IATA code to an airport record
    ///
    /// # Returns
    /// * `Ok(Some(airport))` - the provider matched the code
    /// * `Ok(None)` - the provider returned zero matches (not an error)
    /// * `Err(AmadeusError)` - authentication, network, or parse failure
    pub async fn resolve_one(&self, code: &str) -> Result<Option<Airport>, AmadeusError> {
        let code = code.trim().to_uppercase();
        debug!(code = %code, "Resolving airport via Amadeus");

        let mut locations = self.fetch_locations(&code, 1).await?;
        Ok(if locations.is_empty() {
            None
        } else {
            Some(locations.remove(0))
        })
    }

    /// Resolves a batch of codes concurrently
    ///
    /// Every lookup runs as an independent request; a per-key failure is
    /// reported in that key's `Resolution` and never aborts or retries the
    /// rest of the batch. The output preserves input order.
    pub async fn resolve_many(&self, codes: &[String]) -> Vec<Resolution> {
        let lookups = codes.iter().map(|code| async move {
            match self.resolve_one(code).await {
                Ok(Some(airport)) => Resolution::Found(airport),
                Ok(None) => Resolution::NotFound(code.trim().to_uppercase()),
                Err(error) => {
                    warn!(code = %code, error = %error, "Batch lookup failed for code");
                    Resolution::Failed {
                        code: code.trim().to_uppercase(),
                        error,
                    }
                }
            }
        });

        futures::future::join_all(lookups).await
    }

    /// Searches airports by free-text keyword for autocomplete
    ///
    /// Keywords shorter than two characters return an empty list without a
    /// request. Results keep the provider's relevance order.
    pub async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<Airport>, AmadeusError> {
        let keyword = keyword.trim();
        if keyword.len() < MIN_KEYWORD_LEN {
            return Ok(Vec::new());
        }
        self.fetch_locations(keyword, limit).await
    }

    /// Issues the locations request and maps the response
    async fn fetch_locations(
        &self,
        keyword: &str,
        limit: usize,
    ) -> Result<Vec<Airport>, AmadeusError> {
        let token = self.token().await?;
        let url = format!("{}{}", self.base_url, LOCATIONS_PATH);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("subType", "AIRPORT"),
                ("keyword", keyword),
                ("page[limit]", &limit.to_string()),
            ])
            .bearer_auth(&token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AmadeusError::ProviderStatus(status.as_u16()));
        }

        let text = response.text().await?;
        let api_response: LocationsResponse = serde_json::from_str(&text)?;

        Ok(api_response
            .data
            .into_iter()
            .filter_map(map_location)
            .collect())
    }

    /// Returns a valid bearer token, requesting a new one when needed
    async fn token(&self) -> Result<String, AmadeusError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(AmadeusError::MissingCredentials)?;

        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            if token.is_valid() {
                return Ok(token.access_token.clone());
            }
        }

        debug!("Requesting new Amadeus access token");
        let url = format!("{}{}", self.base_url, TOKEN_PATH);
        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", &credentials.client_id),
                ("client_secret", &credentials.client_secret),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AmadeusError::AuthRejected(status.as_u16()));
        }

        let text = response.text().await?;
        let token_response: TokenResponse = serde_json::from_str(&text)?;

        let token = BearerToken {
            access_token: token_response.access_token,
            expires_at: Utc::now() + Duration::seconds(token_response.expires_in),
        };
        let access_token = token.access_token.clone();
        *guard = Some(token);

        Ok(access_token)
    }
}

/// Maps a provider location into an airport record, skipping entries that
/// lack an IATA code or coordinates
fn map_location(location: LocationData) -> Option<Airport> {
    let geo = location.geo_code?;
    let address = location.address.unwrap_or_default();
    Some(Airport {
        iata_code: location.iata_code?.to_uppercase(),
        name: location.name.unwrap_or_default(),
        latitude: geo.latitude,
        longitude: geo.longitude,
        city: address.city_name.unwrap_or_default(),
        country: address.country_name.unwrap_or_default(),
    })
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Amadeus locations response envelope
#[derive(Debug, Deserialize)]
struct LocationsResponse {
    #[serde(default)]
    data: Vec<LocationData>,
}

/// A single location entry from Amadeus
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationData {
    iata_code: Option<String>,
    name: Option<String>,
    geo_code: Option<GeoCode>,
    address: Option<Address>,
}

/// Coordinates of a location
#[derive(Debug, Deserialize)]
struct GeoCode {
    latitude: f64,
    longitude: f64,
}

/// City/country portion of a location
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Address {
    city_name: Option<String>,
    country_name: Option<String>,
}
