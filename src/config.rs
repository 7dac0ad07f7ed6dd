use anyhow::{anyhow, Result};
use config::Config;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::lens::asn::client::DEFAULT_USER_AGENT;
use crate::lens::asn::{ParseMode, DEFAULT_ENDPOINT};

#[derive(Debug, Clone, Serialize)]
pub struct AslookupConfig {
    /// Lookup endpoint template, `{}` is replaced with the identifier
    pub endpoint: String,

    /// Idle pooled connections are closed after this many seconds (default: 10)
    pub idle_timeout_secs: u64,

    /// User-Agent header sent with lookups
    pub user_agent: String,

    /// Fail lookups whose AS number or prefix is malformed
    pub strict: bool,

    /// Path to a MaxMind City database used to enrich IP lookups
    pub geoip_db: Option<String>,
}

const EMPTY_CONFIG: &str = r#"### aslookup configuration file

### lookup endpoint, {} is replaced with the IP address or AS number
# endpoint = "https://api.hackertarget.com/aslookup/?q={}"

### close idle connections after this many seconds
# idle_timeout_secs = 10

### fail lookups when the AS number or prefix in a response is malformed
# strict = false

### MaxMind City database for location details of IP addresses
# geoip_db = "~/.aslookup/GeoIP2-City.mmdb"
"#;

impl Default for AslookupConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            idle_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            strict: false,
            geoip_db: None,
        }
    }
}

impl AslookupConfig {
    /// Function to create and initialize a new configuration
    pub fn new(path: &Option<String>) -> Result<AslookupConfig> {
        let mut builder = Config::builder();

        // Add in toml configuration file
        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                // By default use $HOME/.aslookup/aslookup.toml as the configuration file path
                let home_dir = dirs::home_dir()
                    .ok_or_else(|| anyhow!("Could not find home directory"))?
                    .to_str()
                    .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?
                    .to_owned();
                let aslookup_dir = format!("{}/.aslookup", home_dir.as_str());
                std::fs::create_dir_all(aslookup_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create aslookup directory: {}", e))?;
                let p = format!("{}/aslookup.toml", aslookup_dir.as_str());
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
            }
        }

        // Add in settings from the environment (with a prefix of ASLOOKUP)
        // E.g., `ASLOOKUP_STRICT=true ./aslookup` would enable strict parsing
        builder = builder.add_source(config::Environment::with_prefix("ASLOOKUP"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_map(&config)
    }

    fn from_map(config: &HashMap<String, String>) -> Result<AslookupConfig> {
        let defaults = AslookupConfig::default();

        let endpoint = config
            .get("endpoint")
            .cloned()
            .unwrap_or(defaults.endpoint);
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(anyhow!("endpoint must be an http(s) URL: {}", endpoint));
        }

        // Parse idle timeout (default: 10 seconds)
        let idle_timeout_secs = match config.get("idle_timeout_secs") {
            Some(s) => s
                .parse()
                .map_err(|_| anyhow!("idle_timeout_secs must be a number: {}", s))?,
            None => defaults.idle_timeout_secs,
        };

        let user_agent = config
            .get("user_agent")
            .cloned()
            .unwrap_or(defaults.user_agent);

        let strict = match config.get("strict") {
            Some(s) => s
                .parse()
                .map_err(|_| anyhow!("strict must be true or false: {}", s))?,
            None => defaults.strict,
        };

        let geoip_db = config
            .get("geoip_db")
            .filter(|s| !s.is_empty())
            .map(|s| expand_home(s));

        Ok(AslookupConfig {
            endpoint,
            idle_timeout_secs,
            user_agent,
            strict,
            geoip_db,
        })
    }

    /// Get idle connection timeout as Duration
    pub fn idle_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn parse_mode(&self) -> ParseMode {
        if self.strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        let lines = [
            format!("Config File:        {}", Self::config_file_path()),
            format!("Endpoint:           {}", self.endpoint),
            format!("Idle Timeout:       {} seconds", self.idle_timeout_secs),
            format!("User Agent:         {}", self.user_agent),
            format!("Parse Mode:         {:?}", self.parse_mode()),
            format!(
                "GeoIP Database:     {}",
                self.geoip_db.as_deref().unwrap_or("(not configured)")
            ),
        ];
        lines.join("\n")
    }

    /// Get the config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.aslookup/aslookup.toml", home_dir)
    }
}

/// Replace a leading `~/` with the home directory
fn expand_home(path: &str) -> String {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => format!("{}/{}", home.to_string_lossy(), rest),
        _ => path.to_string(),
    }
}
