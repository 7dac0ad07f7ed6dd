#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! aslookup - ASN and prefix ownership lookups
//!
//! aslookup resolves who announces an IP address (AS number, covering prefix,
//! owner) and what an AS announces (owner, prefix list) by querying a remote
//! text service. It can be used as both a command-line application and a
//! library.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | (none) | Classification, lookup client, response parser | `ureq`, `ipnet` |
//! | `geoip` | Location lookups in a MaxMind City database | `maxminddb` |
//! | `display` | Table formatting | `tabled`, `json_to_table` |
//! | `cli` | Command-line binary | All above + `clap`, `tracing-subscriber` |
//!
//! # Architecture
//!
//! - **[`lens`]**: lookup logic
//!   - `asn`: classification, lookup client, response parsing, records
//!   - `geoip`: location lookups (requires `geoip`)
//!   - `utils`: output formats
//! - **[`config`]**: configuration management
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use aslookup::lens::asn::{classify, AsnLens, QueryKind};
//!
//! let lens = AsnLens::new();
//!
//! match classify("AS13335") {
//!     QueryKind::As => {
//!         let record = lens.resolve_as("AS13335")?;
//!         println!("AS{} {}", record.asn_number, record.owner_name);
//!         println!("{}", record.rendered_cidr_list());
//!     }
//!     QueryKind::Ip => {
//!         let record = lens.resolve_ip("1.1.1.1")?;
//!         println!("{} AS{}", record.cidr_string(), record.asn_number);
//!     }
//!     QueryKind::None => println!("not an IP address or AS number"),
//! }
//! ```

pub mod config;
pub mod lens;

// =============================================================================
// Configuration
// =============================================================================

pub use config::AslookupConfig;

// =============================================================================
// Lens Module
// =============================================================================

pub use lens::asn::{
    classify, AsRecord, AsnLens, AsnLookupArgs, AsnLookupResult, AsnSource, HttpAsnSource,
    IpAsnRecord, LookupError, ParseMode, ParseWarning, QueryKind,
};
pub use lens::utils::OutputFormat;

#[cfg(feature = "geoip")]
pub use lens::geoip::{GeoInfo, GeoLens};
