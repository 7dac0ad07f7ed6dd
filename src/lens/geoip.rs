//! GeoIP lookup lens
//!
//! Location details for an IP address from a local MaxMind City database.
//! Names are reported in English.

use crate::lens::asn::LookupError;
use maxminddb::Reader;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::Path;
use tracing::debug;

const NAME_LANG: &str = "en";

/// Subset of a GeoIP2 City record used by this lens
#[derive(Debug, Clone, Default, Deserialize)]
struct CityRecord {
    city: Option<NamedRecord>,
    continent: Option<NamedRecord>,
    country: Option<NamedRecord>,
    location: Option<LocationRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct NamedRecord {
    #[serde(default)]
    names: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LocationRecord {
    latitude: Option<f64>,
    longitude: Option<f64>,
    time_zone: Option<String>,
}

fn english_name(record: Option<NamedRecord>) -> Option<String> {
    record.and_then(|mut r| r.names.remove(NAME_LANG))
}

/// Location of an IP address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoInfo {
    pub ip: IpAddr,
    pub city: Option<String>,
    pub continent: Option<String>,
    pub country: Option<String>,
    pub time_zone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl GeoInfo {
    fn from_record(ip: IpAddr, record: CityRecord) -> Self {
        let location = record.location.unwrap_or_default();
        Self {
            ip,
            city: english_name(record.city),
            continent: english_name(record.continent),
            country: english_name(record.country),
            time_zone: location.time_zone,
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }

    /// Markdown-style summary, one field per line
    pub fn to_text(&self) -> String {
        let coordinates = match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => format!("{}, {}", lat, lon),
            _ => String::new(),
        };
        format!(
            "*City:* {}\n*Continent:* {}\n*Country:* {}\n*Timezone:* {}\n*Coordinates:* {}",
            self.city.as_deref().unwrap_or_default(),
            self.continent.as_deref().unwrap_or_default(),
            self.country.as_deref().unwrap_or_default(),
            self.time_zone.as_deref().unwrap_or_default(),
            coordinates
        )
    }
}

/// GeoIP lookup lens over an opened City database
pub struct GeoLens {
    reader: Reader<Vec<u8>>,
}

impl GeoLens {
    /// Open a MaxMind City database file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LookupError> {
        debug!("opening geoip database {}", path.as_ref().display());
        let reader = Reader::open_readfile(path)?;
        Ok(Self { reader })
    }

    /// Look up the location of an address
    ///
    /// Returns `Ok(None)` if the address is not covered by the database.
    pub fn lookup(&self, address: &str) -> Result<Option<GeoInfo>, LookupError> {
        let ip: IpAddr = address
            .parse()
            .map_err(|_| LookupError::InvalidIdentifier(address.to_string()))?;

        let record = self.reader.lookup(ip)?.decode::<CityRecord>()?;
        Ok(record.map(|r| GeoInfo::from_record(ip, r)))
    }
}
