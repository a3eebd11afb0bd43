/// Current firmware version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default port for `https` endpoints without an explicit port
pub const HTTPS_PORT: u16 = 443;

/// Longest spot identifier accepted
pub const MAX_SPOT_ID_LEN: usize = 32;

/// Size of the buffer holding a framed HTTP request (headers and ingest body)
pub const REQUEST_BUFFER_SIZE: usize = 512;

/// Shown instead of the WiFi password in debug output
pub const REDACTED: &str = "***";

/// Occupancy codes shared with the ingest and status services
pub const STATUS_OCCUPIED: u8 = 0;
pub const STATUS_AVAILABLE: u8 = 1;
pub const STATUS_RESERVED: u8 = 2;
