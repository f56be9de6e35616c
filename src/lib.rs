//! Aerodex - airport lookup service with TTL caching
//!
//! Resolves IATA airport codes against the Amadeus travel API, keeping
//! resolved records in an in-memory cache with a 24-hour freshness window
//! and snapshotting that cache to disk across restarts.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod service;
