//! Configuration for the S-Parking spot sensor and the contract it uses to
//! talk to the ingest and status services.
//!
//! Values come from `cfg.toml` at build time (see `cfg.toml.example`) and are
//! exposed through [`config::load`]. The firmware owns WiFi, TLS and sockets;
//! this crate frames the requests and interprets the responses.
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod constants;
pub mod endpoint;
pub mod http;
pub mod ingest;
pub mod spot;
pub mod status;
pub mod template;

pub use config::{load, DeviceConfig};
pub use endpoint::Endpoint;
pub use spot::SpotStatus;
pub use status::{find_spot, SpotRecord, StatusListing};
