//! # probecast
//!
//! Decoder for the manufacturer-specific BLE advertisements broadcast by
//! wireless multi-sensor temperature probes (predictive probes, repeater
//! nodes, and their accessories, company identifier `0x09C7`).
//!
//! The heart of the crate is [`AdvertisingData::parse`]: a pure function
//! from a raw manufacturer-data payload to a typed packet record carrying
//! per-thermistor temperatures, device identity, battery state, virtual
//! sensor assignments, and overheat flags. It holds no state, performs no
//! I/O, and may be called concurrently on shared buffers.
//!
//! A thin scanning layer ([`BleScanner`]) is included for convenience: it
//! finds an adapter, filters advertisements by company identifier, and
//! broadcasts decoded packets to subscribers. Connection-oriented probe
//! features (pairing, log download, predictions) are out of scope.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use probecast::{BleScanner, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scanner = BleScanner::new().await?;
//!     let mut events = scanner.subscribe();
//!     scanner.start_scanning().await?;
//!
//!     while let Ok(event) = events.recv().await {
//!         let packet = &event.packet;
//!         println!("{}: {:?} {:?}", packet.serial_number, packet.mode, packet.temperatures);
//!     }
//!
//!     scanner.stop_scanning().await?;
//!     Ok(())
//! }
//! ```
//!
//! Payloads obtained elsewhere (another scanner, a packet capture) can be
//! decoded directly with [`AdvertisingData::parse`] — no adapter required.
//!
//! ## Platform Notes
//!
//! ### macOS
//! Requires Bluetooth permission. Add `NSBluetoothAlwaysUsageDescription`
//! to your Info.plist for bundled apps.
//!
//! ### Linux
//! Requires BlueZ. User may need to be in the `bluetooth` group.
//!
//! ### Windows
//! Requires Windows 10 or later with Bluetooth LE support.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for decoded packets

// Public modules
pub mod ble;
pub mod data;
pub mod error;

// Re-exports for convenience
pub use ble::advertising::{AdvertisingData, ColorId, ProbeId, ProbeMode, ProductType};
pub use ble::scanner::{BleScanner, PacketEvent};
pub use ble::MANUFACTURER_ID;
pub use data::{RawTemperature, ThermistorData, VirtualSensorSelection};
pub use error::{Error, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that key types are exported
        let _ = std::any::TypeId::of::<BleScanner>();
        let _ = std::any::TypeId::of::<AdvertisingData>();
        let _ = std::any::TypeId::of::<Error>();
        let _ = std::any::TypeId::of::<RawTemperature>();
        let _ = std::any::TypeId::of::<VirtualSensorSelection>();
        let _ = std::any::TypeId::of::<PacketEvent>();
    }

    #[test]
    fn test_manufacturer_id() {
        assert_eq!(MANUFACTURER_ID, 0x09C7);
    }
}
