//! ASN lookup lens
//!
//! This module resolves ASN and prefix ownership for an IP address or an AS
//! number by querying a remote text service and parsing its answer.
//!
//! The workflow is classify -> fetch -> parse:
//! - [`classify`] decides what kind of identifier the input is
//! - an [`AsnSource`] fetches the raw response text
//! - the [`parser`] turns the text into an [`IpAsnRecord`] or an [`AsRecord`]

pub mod args;
pub mod classify;
pub mod client;
pub mod parser;
pub mod types;

pub use args::AsnLookupArgs;
pub use classify::{classify, parse_as_token};
pub use client::{AsnSource, HttpAsnSource, DEFAULT_ENDPOINT, DEFAULT_IDLE_TIMEOUT};
pub use types::{
    AsRecord, AsnLookupResult, IpAsnRecord, LookupError, ParseMode, ParseWarning, QueryKind,
};

use crate::config::AslookupConfig;
use crate::lens::utils::{truncate_text, OutputFormat, MAX_TEXT_LEN};
use std::net::IpAddr;
use tracing::warn;

/// ASN lookup lens
///
/// Holds the response source and the parse mode. Every call builds fresh
/// records; nothing is cached between lookups.
///
/// # Example
///
/// ```rust,ignore
/// use aslookup::lens::asn::{AsnLens, AsnLookupArgs, AsnLookupResult};
///
/// let lens = AsnLens::new();
///
/// let record = lens.resolve_ip("1.1.1.1")?;
/// println!("AS{} {} {}", record.asn_number, record.cidr_string(), record.owner_name);
///
/// match lens.lookup(&AsnLookupArgs::new("AS13335"))? {
///     AsnLookupResult::As(r) => println!("{}", r.rendered_cidr_list()),
///     AsnLookupResult::Ip(_) => unreachable!(),
/// }
/// ```
pub struct AsnLens<S = HttpAsnSource> {
    source: S,
    mode: ParseMode,
}

impl AsnLens {
    /// Create a new ASN lens using the default endpoint
    pub fn new() -> Self {
        Self::with_source(HttpAsnSource::new())
    }

    /// Create a lens with endpoint, transport and parse settings from configuration
    pub fn from_config(config: &AslookupConfig) -> Self {
        let source = HttpAsnSource::with_options(
            &config.endpoint,
            config.idle_timeout(),
            &config.user_agent,
        );
        Self::with_source(source).with_mode(config.parse_mode())
    }
}

impl Default for AsnLens {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AsnSource> AsnLens<S> {
    /// Create a lens over any response source
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            mode: ParseMode::default(),
        }
    }

    /// Set the parse mode
    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Classify a raw identifier
    pub fn classify(&self, input: &str) -> QueryKind {
        classify(input)
    }

    /// Resolve ASN, covering prefix and owner for an IP address
    pub fn resolve_ip(&self, address: &str) -> Result<IpAsnRecord, LookupError> {
        self.resolve_ip_with(address, self.mode)
    }

    /// Resolve owner and announced prefixes for an AS token such as `AS13335`
    ///
    /// The AS number is taken from the token before any request is made. In
    /// lenient mode a non-numeric suffix yields AS number 0 with a warning.
    pub fn resolve_as(&self, token: &str) -> Result<AsRecord, LookupError> {
        self.resolve_as_with(token, self.mode)
    }

    /// Classify the query and resolve it
    ///
    /// `args.strict` tightens the lens's parse mode for this call only.
    pub fn lookup(&self, args: &AsnLookupArgs) -> Result<AsnLookupResult, LookupError> {
        let mode = if args.strict {
            ParseMode::Strict
        } else {
            self.mode
        };
        match classify(&args.query) {
            QueryKind::Ip => self
                .resolve_ip_with(&args.query, mode)
                .map(AsnLookupResult::Ip),
            QueryKind::As => self
                .resolve_as_with(&args.query, mode)
                .map(AsnLookupResult::As),
            QueryKind::None => Err(LookupError::InvalidIdentifier(args.query.clone())),
        }
    }

    /// Format a lookup result for display
    pub fn format_result(&self, result: &AsnLookupResult, format: &OutputFormat) -> String {
        match format {
            OutputFormat::Json => serde_json::to_string(result).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(result).unwrap_or_default(),
            OutputFormat::Text => format_text(result),
            OutputFormat::Table => format_table(result),
        }
    }

    fn resolve_ip_with(&self, address: &str, mode: ParseMode) -> Result<IpAsnRecord, LookupError> {
        let ip: IpAddr = address
            .parse()
            .map_err(|_| LookupError::InvalidIdentifier(address.to_string()))?;

        let mut record = IpAsnRecord::new(ip);
        let body = self.source.fetch(&ip.to_string())?;

        if let Err(e) = parser::parse_ip_response(&mut record, &body, mode) {
            warn!("error parsing ASN data for {}: {}", ip, e);
            return Err(e);
        }
        Ok(record)
    }

    fn resolve_as_with(&self, token: &str, mode: ParseMode) -> Result<AsRecord, LookupError> {
        if !classify::is_as_token(token) {
            return Err(LookupError::InvalidIdentifier(token.to_string()));
        }

        let mut record = match parse_as_token(token) {
            Some(asn) => AsRecord::new(asn),
            None if mode == ParseMode::Strict => {
                return Err(LookupError::InvalidAsn(token.to_string()));
            }
            None => {
                warn!("AS token '{}' has no valid number, using 0", token);
                let suffix = token.strip_prefix(classify::AS_PREFIX).unwrap_or(token);
                let mut record = AsRecord::new(0);
                record
                    .warnings
                    .push(ParseWarning::InvalidAsn(suffix.to_string()));
                record
            }
        };

        let body = self.source.fetch(token)?;

        if let Err(e) = parser::parse_as_response(&mut record, &body, mode) {
            warn!("error parsing ASN data for {}: {}", token, e);
            return Err(e);
        }
        Ok(record)
    }
}

fn format_text(result: &AsnLookupResult) -> String {
    match result {
        AsnLookupResult::Ip(r) => format!(
            "*ASN:* AS{}\n*CIDR:* `{}`\n*Owner:* {}",
            r.asn_number,
            r.cidr_string(),
            r.owner_name
        ),
        AsnLookupResult::As(r) => {
            let text = format!(
                "*ASN:* AS{}\n*Owner:* {}\n*CIDRs:*```{}```",
                r.asn_number,
                r.owner_name,
                r.rendered_cidr_list()
            );
            truncate_text(&text, MAX_TEXT_LEN, "...```")
        }
    }
}

#[cfg(feature = "display")]
fn format_table(result: &AsnLookupResult) -> String {
    use tabled::builder::Builder;
    use tabled::settings::Style;

    let mut builder = Builder::default();
    match result {
        AsnLookupResult::Ip(r) => {
            builder.push_record([String::from("ip"), r.queried_ip.to_string()]);
            builder.push_record([String::from("asn"), r.asn_number.to_string()]);
            builder.push_record([String::from("prefix"), r.cidr_string()]);
            builder.push_record([String::from("owner"), r.owner_name.clone()]);
        }
        AsnLookupResult::As(r) => {
            builder.push_record([String::from("asn"), r.asn_number.to_string()]);
            builder.push_record([String::from("owner"), r.owner_name.clone()]);
            builder.push_record([String::from("prefixes"), r.cidr_list.join("\n")]);
        }
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

#[cfg(not(feature = "display"))]
fn format_table(result: &AsnLookupResult) -> String {
    format_text(result)
}

// =============================================================================
// Tests
// =============================================================================
