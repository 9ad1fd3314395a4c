//! Coarse IP geolocation from a local MaxMind City database
//!
//! Lookups read a GeoLite2/GeoIP2 City `.mmdb` file opened once at startup
//! and never touch the network. Without a database every address resolves
//! to nothing, which formats as "Unknown".

use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

use maxminddb::{geoip2, MaxMindDbError, Reader};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::UNKNOWN;

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("failed to open geolocation database: {0}")]
    Open(#[from] MaxMindDbError),
}

/// Raw lookup output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoLookup {
    pub city: Option<String>,
    pub country: Option<String>,
}

impl GeoLookup {
    pub fn location(&self) -> String {
        format_location(self.city.as_deref(), self.country.as_deref())
    }
}

impl From<&geoip2::City<'_>> for GeoLookup {
    fn from(record: &geoip2::City<'_>) -> Self {
        let named = |name: Option<&str>| name.filter(|n| !n.is_empty()).map(str::to_string);

        Self {
            city: named(record.city.names.english),
            country: named(record.country.names.english),
        }
    }
}

/// "City, Country" when both are known, "Country" when only the country is,
/// otherwise "Unknown"
pub fn format_location(city: Option<&str>, country: Option<&str>) -> String {
    match (city, country) {
        (Some(city), Some(country)) => format!("{city}, {country}"),
        (None, Some(country)) => country.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Parses the first entry of a possibly comma-separated forwarded address
///
/// IPv4-mapped IPv6 addresses are reduced to plain IPv4.
fn parse_address(raw: &str) -> Option<IpAddr> {
    let ip: IpAddr = raw.split(',').next()?.trim().parse().ok()?;
    Some(ip.to_canonical())
}

/// Shared handle to an optional City database
#[derive(Clone, Default)]
pub struct GeoLocator {
    reader: Option<Arc<Reader<Vec<u8>>>>,
}

impl GeoLocator {
    /// Locator that resolves every address to "Unknown"
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, GeoError> {
        let reader = Reader::open_readfile(path)?;
        Ok(Self {
            reader: Some(Arc::new(reader)),
        })
    }

    /// Opens the database at `path`, degrading to [`GeoLocator::disabled`]
    /// when no path is configured or the file cannot be opened
    pub fn from_path(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            warn!("GEO_DATA not set, visit locations will be Unknown");
            return Self::disabled();
        };

        match Self::open(path) {
            Ok(locator) => {
                info!("Using geolocation database: {}", path.display());
                locator
            }
            Err(err) => {
                warn!("{err} ({}), visit locations will be Unknown", path.display());
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.reader.is_some()
    }

    /// Best-effort lookup; anything unparseable or unlisted resolves to nothing
    pub fn lookup(&self, address: &str) -> GeoLookup {
        let (Some(reader), Some(ip)) = (&self.reader, parse_address(address)) else {
            return GeoLookup::default();
        };

        let result = match reader.lookup(ip) {
            Ok(result) => result,
            Err(err) => {
                debug!("Geolocation lookup failed for {ip}: {err}");
                return GeoLookup::default();
            }
        };

        match result.decode::<geoip2::City>() {
            Ok(Some(record)) => GeoLookup::from(&record),
            Ok(None) => GeoLookup::default(),
            Err(err) => {
                debug!("Geolocation lookup failed for {ip}: {err}");
                GeoLookup::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city_record<'a>(city: Option<&'a str>, country: Option<&'a str>) -> geoip2::City<'a> {
        let mut record = geoip2::City::default();
        record.city.names.english = city;
        record.country.names.english = country;
        record
    }

    #[test]
    fn formats_location_by_priority() {
        assert_eq!(format_location(Some("Pune"), Some("India")), "Pune, India");
        assert_eq!(format_location(None, Some("India")), "India");
        assert_eq!(format_location(None, None), "Unknown");
        assert_eq!(format_location(Some("Pune"), None), "Unknown");
    }

    #[test]
    fn city_records_map_english_names() {
        let lookup = GeoLookup::from(&city_record(Some("Pune"), Some("India")));
        assert_eq!(lookup.city.as_deref(), Some("Pune"));
        assert_eq!(lookup.location(), "Pune, India");

        let lookup = GeoLookup::from(&city_record(None, Some("India")));
        assert_eq!(lookup.location(), "India");

        let lookup = GeoLookup::from(&city_record(Some(""), None));
        assert_eq!(lookup, GeoLookup::default());
        assert_eq!(lookup.location(), "Unknown");
    }

    #[test]
    fn parses_forwarded_lists_and_mapped_addresses() {
        let expected: IpAddr = "192.0.2.7".parse().unwrap();

        assert_eq!(parse_address("192.0.2.7, 10.0.0.1"), Some(expected));
        assert_eq!(parse_address(" ::ffff:192.0.2.7 "), Some(expected));
        assert_eq!(parse_address("not an ip"), None);
        assert_eq!(parse_address(""), None);
    }

    #[test]
    fn missing_database_degrades_to_unknown() {
        let geo = GeoLocator::from_path(Some(Path::new("/nonexistent/GeoLite2-City.mmdb")));

        assert!(!geo.is_enabled());
        assert_eq!(geo.lookup("81.2.69.142").location(), "Unknown");
        assert!(GeoLocator::open("/nonexistent/GeoLite2-City.mmdb").is_err());
    }

    #[test]
    fn unconfigured_locator_resolves_nothing() {
        let geo = GeoLocator::from_path(None);

        assert!(!geo.is_enabled());
        assert_eq!(geo.lookup("8.8.8.8"), GeoLookup::default());
    }

    // Uses MaxMind's GeoIP2-City-Test.mmdb when GEO_TEST_DB points at it
    #[test]
    fn resolves_addresses_from_city_database() {
        let Ok(path) = std::env::var("GEO_TEST_DB") else {
            return;
        };
        let geo = GeoLocator::open(&path).unwrap();

        assert_eq!(geo.lookup("81.2.69.142").location(), "London, United Kingdom");
        assert_eq!(geo.lookup("::ffff:81.2.69.142").location(), "London, United Kingdom");
        assert_eq!(geo.lookup("127.0.0.1").location(), "Unknown");
    }
}
