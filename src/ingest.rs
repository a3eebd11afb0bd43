use alloc::string::String;
use core::fmt;

use serde::Serialize;

use crate::config::DeviceConfig;
use crate::spot::SpotStatus;

#[derive(Debug)]
pub enum Error {
    Format(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Format(e) => write!(f, "cannot encode reading: {}", e),
        }
    }
}

/// One occupancy sample, posted as `{"spot_id": "A-01", "status": 0}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reading<'a> {
    pub spot_id: &'a str,
    pub status: SpotStatus,
}

impl<'a> Reading<'a> {
    /// The sensor only tells occupied from free, never reserved.
    pub fn new(spot_id: &'a str, occupied: bool) -> Self {
        Self {
            spot_id,
            status: SpotStatus::from_occupied(occupied),
        }
    }

    pub fn from_config(config: &DeviceConfig, occupied: bool) -> Reading<'static> {
        Reading::new(config.spot_id, occupied)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(Error::Format)
    }
}
