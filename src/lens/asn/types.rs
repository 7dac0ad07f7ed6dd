//! ASN lens types
//!
//! This module defines the query classification, the two lookup record shapes
//! and the error type shared by the classifier, the client and the parser.

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

// =============================================================================
// Query Kind
// =============================================================================

/// Kind of identifier detected from user input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    /// IPv4 or IPv6 address
    Ip,
    /// AS number token, e.g. `AS13335`
    As,
    /// Neither an address nor an AS token
    None,
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryKind::Ip => write!(f, "ip"),
            QueryKind::As => write!(f, "as"),
            QueryKind::None => write!(f, "none"),
        }
    }
}

// =============================================================================
// Parse Mode and Warnings
// =============================================================================

/// How malformed numeric or prefix fields are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Keep the record, zero the number or drop the prefix, and record a warning
    #[default]
    Lenient,
    /// Fail the whole lookup
    Strict,
}

/// A field that could not be converted but did not fail the parse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ParseWarning {
    /// AS number field was not a decimal number
    InvalidAsn(String),
    /// CIDR field was not a valid network prefix
    InvalidCidr(String),
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::InvalidAsn(v) => write!(f, "invalid AS number '{}'", v),
            ParseWarning::InvalidCidr(v) => write!(f, "invalid CIDR '{}'", v),
        }
    }
}

// =============================================================================
// Records
// =============================================================================

/// ASN ownership of a single IP address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAsnRecord {
    /// The queried address
    #[serde(rename = "ip")]
    pub queried_ip: IpAddr,
    /// AS number announcing the covering prefix (0 if the field was malformed)
    #[serde(rename = "asn")]
    pub asn_number: u32,
    /// Covering prefix, `None` if the field was malformed
    #[serde(rename = "prefix")]
    pub cidr_block: Option<IpNet>,
    /// Registrant or organization name
    #[serde(rename = "owner")]
    pub owner_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ParseWarning>,
}

impl IpAsnRecord {
    /// Create an empty record for an address that is about to be resolved
    pub fn new(queried_ip: IpAddr) -> Self {
        Self {
            queried_ip,
            asn_number: 0,
            cidr_block: None,
            owner_name: String::new(),
            warnings: vec![],
        }
    }

    /// True if every field was parsed without falling back
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty() && self.cidr_block.is_some()
    }

    /// Prefix rendered as text, empty when unavailable
    pub fn cidr_string(&self) -> String {
        self.cidr_block.map(|n| n.to_string()).unwrap_or_default()
    }
}

/// Ownership and announced prefixes of an AS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsRecord {
    /// AS number taken from the caller's token
    #[serde(rename = "asn")]
    pub asn_number: u32,
    #[serde(rename = "owner")]
    pub owner_name: String,
    /// Announced prefixes in response order, as written by the service
    #[serde(rename = "prefixes")]
    pub cidr_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ParseWarning>,
}

impl AsRecord {
    /// Create an empty record for an AS number that is about to be resolved
    pub fn new(asn_number: u32) -> Self {
        Self {
            asn_number,
            owner_name: String::new(),
            cidr_list: vec![],
            warnings: vec![],
        }
    }

    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Prefix list joined with `", "`, without a trailing separator
    pub fn rendered_cidr_list(&self) -> String {
        self.cidr_list.join(", ")
    }
}

/// Result of an auto-classified lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AsnLookupResult {
    Ip(IpAsnRecord),
    As(AsRecord),
}

// =============================================================================
// Errors
// =============================================================================

/// Errors returned by ASN lookups
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("'{0}' is neither an IP address nor an AS number")]
    InvalidIdentifier(String),
    #[error("invalid AS number token '{0}'")]
    InvalidAsn(String),
    #[error("lookup request failed: {0}")]
    Transport(#[from] ureq::Error),
    #[error("response contains no data")]
    NoData,
    #[error("response is missing field #{index} ({name})")]
    MissingField { index: usize, name: &'static str },
    #[error("malformed response field: {0}")]
    MalformedField(ParseWarning),
    #[cfg(feature = "geoip")]
    #[error("geoip database error: {0}")]
    GeoIp(#[from] maxminddb::MaxMindDbError),
}

impl LookupError {
    /// True for errors that mean "nothing known about this identifier"
    /// rather than a local or transport problem
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LookupError::NoData | LookupError::MissingField { .. } | LookupError::MalformedField(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_kind_display() {
        assert_eq!(QueryKind::Ip.to_string(), "ip");
        assert_eq!(QueryKind::As.to_string(), "as");
        assert_eq!(QueryKind::None.to_string(), "none");
    }

    #[test]
    fn test_rendered_cidr_list() {
        let mut record = AsRecord::new(13335);
        assert_eq!(record.rendered_cidr_list(), "");

        record.cidr_list = vec!["104.20.208.0/20".to_string()];
        assert_eq!(record.rendered_cidr_list(), "104.20.208.0/20");

        record.cidr_list.push("172.68.148.0/22".to_string());
        assert_eq!(
            record.rendered_cidr_list(),
            "104.20.208.0/20, 172.68.148.0/22"
        );
    }

    #[test]
    fn test_ip_record_completeness() {
        let mut record = IpAsnRecord::new("1.1.1.1".parse().unwrap());
        assert!(!record.is_complete());
        assert_eq!(record.cidr_string(), "");

        record.cidr_block = Some("1.1.1.0/24".parse().unwrap());
        assert!(record.is_complete());
        assert_eq!(record.cidr_string(), "1.1.1.0/24");

        record.warnings.push(ParseWarning::InvalidAsn("x".to_string()));
        assert!(!record.is_complete());
    }

    #[test]
    fn test_serialize_ip_record() {
        let record = IpAsnRecord {
            queried_ip: "1.1.1.1".parse().unwrap(),
            asn_number: 13335,
            cidr_block: Some("1.1.1.0/24".parse().unwrap()),
            owner_name: "CLOUDFLARENET".to_string(),
            warnings: vec![],
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["ip"], "1.1.1.1");
        assert_eq!(value["asn"], 13335);
        assert_eq!(value["prefix"], "1.1.1.0/24");
        assert!(value.get("warnings").is_none());
    }

    #[test]
    fn test_not_found_errors() {
        assert!(LookupError::NoData.is_not_found());
        assert!(LookupError::MissingField {
            index: 2,
            name: "owner"
        }
        .is_not_found());
        assert!(!LookupError::InvalidIdentifier("x".to_string()).is_not_found());
    }
}
