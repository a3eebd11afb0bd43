use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::spot::SpotStatus;

#[derive(Debug)]
pub enum Error {
    Json(serde_json::Error),
    SpotNotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Json(e) => write!(f, "malformed status listing: {}", e),
            Error::SpotNotFound => f.write_str("spot not present in status listing"),
        }
    }
}

/// One entry of the status listing.
///
/// Members the device does not interpret (coordinates, zone, reservation data
/// and so on) are kept as-is in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SpotStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupied: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SpotRecord {
    /// Numeric `status` wins over the boolean `occupied` flag when both are present.
    pub fn status(&self) -> Option<SpotStatus> {
        self.status
            .or_else(|| self.occupied.map(SpotStatus::from_occupied))
    }
}

/// Every spot returned by the status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusListing {
    pub spots: Vec<SpotRecord>,
}

impl StatusListing {
    pub fn parse(body: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(body).map_err(Error::Json)
    }

    pub fn find(&self, spot_id: &str) -> Option<&SpotRecord> {
        self.spots.iter().find(|spot| spot.id == spot_id)
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }
}

/// Parse a status response body and pull out the record for `spot_id`.
pub fn find_spot(body: &[u8], spot_id: &str) -> Result<SpotRecord, Error> {
    let mut listing = StatusListing::parse(body)?;
    log::debug!("Status listing holds {} spots", listing.len());

    let index = listing.spots.iter().position(|spot| spot.id == spot_id);
    match index {
        Some(i) => Ok(listing.spots.swap_remove(i)),
        None => {
            log::warn!("Spot {} not found among {} spots", spot_id, listing.len());
            Err(Error::SpotNotFound)
        }
    }
}
