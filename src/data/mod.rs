//! Core data models for the airport lookup service
//!
//! This module contains the airport record type shared across the cache,
//! the Amadeus client, and the HTTP layer, along with the provider client
//! itself.

pub mod amadeus;

pub use amadeus::{AmadeusClient, AmadeusError, Credentials, Resolution};

use serde::{Deserialize, Serialize};

/// A resolved airport record
///
/// The IATA code is uppercase-normalized and unique; it doubles as the
/// cache key. Records are immutable once fetched. Field names serialize in
/// camelCase to match the wire format the frontend consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    /// Three-letter IATA airport code, uppercased
    pub iata_code: String,
    /// Official airport name
    pub name: String,
    /// Latitude coordinate
    pub latitude: f64,
    /// Longitude coordinate
    pub longitude: f64,
    /// City the airport serves
    pub city: String,
    /// Country the airport is in
    pub country: String,
}
