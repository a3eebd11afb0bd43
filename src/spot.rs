use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    Empty,
    TooLong,
    /// Spots are stored upper-cased, a lowercase id never matches
    Lowercase,
    /// Whitespace, control characters or `/`
    InvalidCharacter,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Empty => f.write_str("spot id is empty"),
            Error::TooLong => write!(f, "spot id longer than {} bytes", MAX_SPOT_ID_LEN),
            Error::Lowercase => f.write_str("spot id must be upper-case"),
            Error::InvalidCharacter => {
                f.write_str("spot id contains whitespace, a control character or `/`")
            }
        }
    }
}

/// Check a spot identifier the way the cloud stores it.
///
/// Labels are free-form (`A-01`, `NORTE-01`, `P1-01`) but the cloud trims and
/// upper-cases them when a spot is created, and `/` cannot appear in a
/// document id.
pub fn validate_spot_id(id: &str) -> Result<(), Error> {
    if id.is_empty() {
        return Err(Error::Empty);
    }
    if id.len() > MAX_SPOT_ID_LEN {
        return Err(Error::TooLong);
    }
    if id
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || c == '/')
    {
        return Err(Error::InvalidCharacter);
    }
    if id.chars().any(char::is_lowercase) {
        return Err(Error::Lowercase);
    }

    Ok(())
}

/// Occupancy of a spot as encoded by the ingest and status services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotStatus {
    Occupied,
    Available,
    /// Only ever set by the server; a sensor cannot observe a reservation
    Reserved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownStatus(pub u8);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown spot status code {}", self.0)
    }
}

impl SpotStatus {
    pub fn code(self) -> u8 {
        match self {
            SpotStatus::Occupied => STATUS_OCCUPIED,
            SpotStatus::Available => STATUS_AVAILABLE,
            SpotStatus::Reserved => STATUS_RESERVED,
        }
    }

    pub fn from_occupied(occupied: bool) -> Self {
        if occupied {
            SpotStatus::Occupied
        } else {
            SpotStatus::Available
        }
    }

    /// A reserved spot is held for someone else and is not free.
    pub fn is_free(self) -> bool {
        self == SpotStatus::Available
    }
}

impl TryFrom<u8> for SpotStatus {
    type Error = UnknownStatus;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            STATUS_OCCUPIED => Ok(SpotStatus::Occupied),
            STATUS_AVAILABLE => Ok(SpotStatus::Available),
            STATUS_RESERVED => Ok(SpotStatus::Reserved),
            other => Err(UnknownStatus(other)),
        }
    }
}

impl Serialize for SpotStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for SpotStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        SpotStatus::try_from(code).map_err(serde::de::Error::custom)
    }
}
