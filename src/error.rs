//! Error types for the probecast crate.

use thiserror::Error;

/// The main error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Bluetooth-related error from the underlying BLE library.
    #[error("Bluetooth error: {0}")]
    Bluetooth(#[from] btleplug::Error),

    /// Bluetooth is not available or is disabled on this system.
    #[error("Bluetooth not available or disabled")]
    BluetoothUnavailable,

    /// The advertisement payload is too short to decode.
    #[error("truncated advertisement payload: {len} bytes (need at least {needed})")]
    TruncatedPacket {
        /// Number of bytes that were supplied.
        len: usize,
        /// Minimum number of bytes the decoder reads.
        needed: usize,
    },
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
