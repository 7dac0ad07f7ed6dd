use aslookup::lens::asn::{AsnLens, AsnLookupResult, IpAsnRecord, ParseMode};
use aslookup::lens::geoip::{GeoInfo, GeoLens};
use aslookup::lens::utils::OutputFormat;
use aslookup::AslookupConfig;
use clap::Args;
use json_to_table::json_to_table;
use serde::Serialize;
use std::net::IpAddr;
use tracing::warn;

/// Arguments for the Ip command
#[derive(Args)]
pub struct IpArgs {
    /// IP address to look up
    #[clap(value_name = "IP")]
    pub ip: String,

    /// MaxMind City database to add location details (overrides the config file)
    #[clap(long)]
    pub geoip_db: Option<String>,

    /// Fail when the AS number or prefix in the response is malformed
    #[clap(long)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
struct IpReport {
    ip: IpAddr,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<GeoInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    network: Option<IpAsnRecord>,
}

pub fn run(config: &AslookupConfig, args: IpArgs, format: OutputFormat) {
    let IpArgs {
        ip,
        geoip_db,
        strict,
    } = args;

    let addr: IpAddr = match ip.trim().parse() {
        Ok(addr) => addr,
        Err(_) => {
            eprintln!("ERROR: '{}' is not a valid IP address", ip);
            std::process::exit(1);
        }
    };
    let ip = addr.to_string();

    let location = match geoip_db.or_else(|| config.geoip_db.clone()) {
        Some(path) => {
            let geo = match GeoLens::open(&path) {
                Ok(geo) => geo,
                Err(e) => {
                    eprintln!("ERROR: unable to open geoip database {}: {}", path, e);
                    std::process::exit(1);
                }
            };
            match geo.lookup(&ip) {
                Ok(info) => info,
                Err(e) => {
                    warn!("geoip lookup failed for {}: {}", ip, e);
                    None
                }
            }
        }
        None => None,
    };

    let mut lens = AsnLens::from_config(config);
    if strict {
        lens = lens.with_mode(ParseMode::Strict);
    }

    // ASN details are dropped on failure; location alone is still reported
    let network = match lens.resolve_ip(&ip) {
        Ok(record) => Some(record),
        Err(e) if location.is_some() => {
            warn!("ASN lookup failed for {}: {}", ip, e);
            None
        }
        Err(e) => super::exit_with_lookup_error(&ip, &e),
    };

    let report = IpReport {
        ip: addr,
        location,
        network,
    };

    match format {
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let output = if format == OutputFormat::JsonPretty {
                serde_json::to_string_pretty(&report)
            } else {
                serde_json::to_string(&report)
            };
            match output {
                Ok(s) => println!("{}", s),
                Err(e) => eprintln!("Error serializing result: {}", e),
            }
        }
        OutputFormat::Table => {
            let json_value = serde_json::json!(&report);
            let mut table = json_to_table(&json_value);
            table.collapse();
            println!("{}", table);
        }
        OutputFormat::Text => {
            let mut sections = vec![];
            if let Some(location) = &report.location {
                sections.push(location.to_text());
            }
            if let Some(network) = report.network {
                sections.push(lens.format_result(&AsnLookupResult::Ip(network), &format));
            }
            println!("{}", sections.join("\n"));
        }
    }
}
