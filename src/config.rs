use core::fmt;

use crate::constants::REDACTED;
use crate::endpoint::{self, Endpoint};
use crate::spot;
use crate::template::*;

/// Settings for one physical installation, baked into the firmware image.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    // Wi-Fi SSID to connect to
    pub wifi_ssid: &'static str,

    // Wi-Fi pre-shared key, only ever handed to the association routine
    pub wifi_password: &'static str,

    // Occupancy readings are POSTed here
    pub ingest_url: &'static str,

    // Returns every spot, the device looks up its own id in the list
    pub status_url: &'static str,

    // Spot this device monitors, upper-case label such as "A-01" or "NORTE-01"
    pub spot_id: &'static str,
}

// config values are generated at compile time
include!(concat!(env!("OUT_DIR"), "/config.rs"));

/// Configuration compiled into this build.
pub fn load() -> DeviceConfig {
    CONFIG
}

/// Same order as the keys of cfg.toml.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    WifiSsid,
    WifiPassword,
    IngestUrl,
    StatusUrl,
    SpotId,
}

impl Field {
    pub fn name(self) -> &'static str {
        FIELDS[self as usize].name
    }

    fn placeholder(self) -> Option<&'static str> {
        FIELDS[self as usize].placeholder
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    Empty(Field),
    Placeholder(Field),
    Endpoint(Field, endpoint::Error),
    SameEndpoints,
    SpotId(spot::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Empty(field) => write!(f, "{} is empty", field.name()),
            Error::Placeholder(field) => write!(f, "{} still holds the template value", field.name()),
            Error::Endpoint(field, e) => write!(f, "{}: {}", field.name(), e),
            Error::SameEndpoints => f.write_str("ingest_url and status_url point to the same endpoint"),
            Error::SpotId(e) => write!(f, "spot_id: {}", e),
        }
    }
}

impl DeviceConfig {
    fn fields(&self) -> [(Field, &'static str); 5] {
        [
            (Field::WifiSsid, self.wifi_ssid),
            (Field::WifiPassword, self.wifi_password),
            (Field::IngestUrl, self.ingest_url),
            (Field::StatusUrl, self.status_url),
            (Field::SpotId, self.spot_id),
        ]
    }

    pub fn ingest_endpoint(&self) -> Result<Endpoint<'static>, endpoint::Error> {
        Endpoint::parse(self.ingest_url)
    }

    pub fn status_endpoint(&self) -> Result<Endpoint<'static>, endpoint::Error> {
        Endpoint::parse(self.status_url)
    }

    /// Check the values a deployer is expected to fill in. Reports the first
    /// problem: empty fields, then leftover template values, then endpoints,
    /// then the spot id.
    pub fn validate(&self) -> Result<(), Error> {
        for (field, value) in self.fields() {
            if value.trim().is_empty() {
                return Err(Error::Empty(field));
            }
        }

        for (field, value) in self.fields() {
            if field.placeholder() == Some(value) {
                return Err(Error::Placeholder(field));
            }
        }

        let ingest = self
            .ingest_endpoint()
            .map_err(|e| Error::Endpoint(Field::IngestUrl, e))?;
        let status = self
            .status_endpoint()
            .map_err(|e| Error::Endpoint(Field::StatusUrl, e))?;
        if ingest.same_address(&status) {
            return Err(Error::SameEndpoints);
        }

        spot::validate_spot_id(self.spot_id).map_err(Error::SpotId)
    }

    /// Log where this device reports to. The password is never logged.
    pub fn log_summary(&self) {
        log::info!("Spot: {}", self.spot_id);
        log::info!("WiFi SSID: {:?}", self.wifi_ssid);
        log::info!("Ingest endpoint: {}", self.ingest_url);
        log::info!("Status endpoint: {}", self.status_url);
    }
}

impl fmt::Debug for DeviceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceConfig")
            .field("wifi_ssid", &self.wifi_ssid)
            .field("wifi_password", &REDACTED)
            .field("ingest_url", &self.ingest_url)
            .field("status_url", &self.status_url)
            .field("spot_id", &self.spot_id)
            .finish()
    }
}
