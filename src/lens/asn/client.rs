//! Lookup client for the remote aslookup service

use super::types::LookupError;
use percent_encoding::{AsciiSet, CONTROLS};
use std::time::Duration;
use tracing::debug;

/// Default lookup endpoint, `{}` is replaced with the identifier
pub const DEFAULT_ENDPOINT: &str = "https://api.hackertarget.com/aslookup/?q={}";

/// Idle pooled connections are closed after this long
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_USER_AGENT: &str = concat!("aslookup/", env!("CARGO_PKG_VERSION"));

/// Characters escaped when an identifier is placed in the query string
const QUERY_VALUE_PCT_ENCODING_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'/')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b']')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Source of raw lookup responses
///
/// Implementations return the full response body for one identifier.
pub trait AsnSource {
    fn fetch(&self, identifier: &str) -> Result<String, LookupError>;
}

/// HTTP client for the aslookup service
///
/// Each call issues exactly one GET request with no retries. Status codes are
/// not checked: the service reports unknown identifiers in the body.
#[derive(Debug, Clone)]
pub struct HttpAsnSource {
    agent: ureq::Agent,
    endpoint: String,
}

impl HttpAsnSource {
    /// Create a client for the default endpoint
    pub fn new() -> Self {
        Self::with_options(DEFAULT_ENDPOINT, DEFAULT_IDLE_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a client with a custom endpoint template and transport settings
    pub fn with_options(endpoint: &str, idle_timeout: Duration, user_agent: &str) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_idle_age(idle_timeout)
            .user_agent(user_agent)
            .build()
            .into();

        Self {
            agent,
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Substitute the percent-encoded identifier into the endpoint template
    pub fn url_for(&self, identifier: &str) -> String {
        let encoded =
            percent_encoding::utf8_percent_encode(identifier, QUERY_VALUE_PCT_ENCODING_SET)
                .to_string();
        if self.endpoint.contains("{}") {
            self.endpoint.replace("{}", &encoded)
        } else {
            format!("{}{}", self.endpoint, encoded)
        }
    }
}

impl Default for HttpAsnSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AsnSource for HttpAsnSource {
    fn fetch(&self, identifier: &str) -> Result<String, LookupError> {
        let url = self.url_for(identifier);
        debug!("requesting {}", url);

        let mut resp = self.agent.get(&url).call()?;
        let status = resp.status();
        let body = resp.body_mut().read_to_string()?;
        debug!("received {} bytes with status {}", body.len(), status);

        Ok(body)
    }
}
