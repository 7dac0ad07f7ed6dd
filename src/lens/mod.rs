//! Lens module
//!
//! This module provides high-level "lens" abstractions that combine business logic
//! with output formatting. Lenses are designed to be reusable across different
//! interfaces (CLI, library callers, bots).
//!
//! # Feature Requirements
//!
//! | Lens | Feature Required | Dependencies |
//! |------|-----------------|--------------|
//! | `AsnLens` | (always) | ureq, ipnet |
//! | `GeoLens` | `geoip` | maxminddb |
//!
//! # Architecture
//!
//! Each lens module exports:
//! - A **Lens struct** (e.g., `AsnLens`, `GeoLens`) - the main entry point for all operations
//! - **Args structs** - input arguments for lens methods
//! - **Output types** - return types and format enums
//!
//! # Usage
//!
//! ```rust,ignore
//! // ASN and prefix ownership
//! use aslookup::lens::asn::{AsnLens, AsnLookupArgs, AsnLookupResult};
//!
//! // Location of an IP address (geoip)
//! use aslookup::lens::geoip::{GeoLens, GeoInfo};
//! ```

// =============================================================================
// Utility module
// =============================================================================
pub mod utils;

// AsnLens - ASN and prefix ownership lookup
pub mod asn;

// GeoLens - location lookup in a MaxMind City database
#[cfg(feature = "geoip")]
pub mod geoip;
