//! ASN lens arguments
//!
//! Argument structures for ASN lookups, usable from the CLI (clap) and from
//! serialized requests (serde).

use serde::{Deserialize, Serialize};

use super::classify::classify;
use super::types::{ParseMode, QueryKind};

/// Arguments for an ASN lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct AsnLookupArgs {
    /// IP address (e.g. "1.1.1.1") or AS number (e.g. "AS13335")
    #[cfg_attr(feature = "cli", clap(value_name = "QUERY"))]
    pub query: String,

    /// Fail the lookup when the AS number or prefix in the response is malformed
    #[cfg_attr(feature = "cli", clap(long))]
    #[serde(default)]
    pub strict: bool,
}

impl AsnLookupArgs {
    /// Create new args for a single query
    pub fn new(query: &str) -> Self {
        Self {
            query: query.trim().to_string(),
            strict: false,
        }
    }

    /// Set strict parsing
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn parse_mode(&self) -> ParseMode {
        if self.strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }

    /// Kind of identifier held by `query`
    pub fn query_kind(&self) -> QueryKind {
        classify(&self.query)
    }

    /// Validate the arguments
    ///
    /// Returns an error message if the query is not a lookup identifier.
    pub fn validate(&self) -> Result<(), String> {
        if self.query.is_empty() {
            return Err("A query is required".to_string());
        }
        if self.query_kind() == QueryKind::None {
            return Err(format!(
                "'{}' is neither an IP address nor an AS number (ASxxxx)",
                self.query
            ));
        }
        Ok(())
    }
}
