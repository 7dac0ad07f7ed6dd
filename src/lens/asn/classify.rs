//! Identifier classification
//!
//! Decides whether user input is an IP address, an AS token or neither,
//! and extracts the AS number from an AS token.

use super::types::QueryKind;
use std::net::IpAddr;

/// Literal prefix of an AS token (case-sensitive)
pub const AS_PREFIX: &str = "AS";

/// Classify a raw identifier
///
/// Detection rules, in order:
/// - parses as an IPv4 or IPv6 address -> [`QueryKind::Ip`]
/// - starts with the uppercase literal `AS` -> [`QueryKind::As`]
/// - everything else, including empty input -> [`QueryKind::None`]
///
/// The suffix of an AS token is not validated here.
pub fn classify(input: &str) -> QueryKind {
    if is_ip(input) {
        return QueryKind::Ip;
    }
    if is_as_token(input) {
        return QueryKind::As;
    }
    QueryKind::None
}

pub fn is_ip(input: &str) -> bool {
    input.parse::<IpAddr>().is_ok()
}

pub fn is_as_token(input: &str) -> bool {
    input.starts_with(AS_PREFIX)
}

/// Parse the number following the `AS` prefix
///
/// Returns `None` if the token does not start with `AS` or if the suffix is
/// not a decimal `u32`.
pub fn parse_as_token(token: &str) -> Option<u32> {
    token.strip_prefix(AS_PREFIX)?.parse::<u32>().ok()
}
