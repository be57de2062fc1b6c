//! BLE scanning functionality.
//!
//! Discovers the wireless adapter, runs the scan loop, filters
//! advertisements by company identifier, and fans decoded packets out to
//! subscribers. All of the interesting work happens in
//! [`AdvertisingData::parse`]; this layer is glue.

use btleplug::api::{Central, CentralEvent, Manager as _, ScanFilter};
use btleplug::platform::{Adapter, Manager};
use futures::stream::StreamExt;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error, info, trace};

use crate::ble::advertising::AdvertisingData;
use crate::ble::MANUFACTURER_ID;
use crate::error::{Error, Result};

/// Event emitted for every decoded probe advertisement.
#[derive(Debug, Clone)]
pub struct PacketEvent {
    /// The BLE peripheral identifier the advertisement came from.
    pub identifier: String,
    /// The decoded packet.
    pub packet: AdvertisingData,
}

/// BLE scanner for probe advertisements.
///
/// Every advertisement whose company identifier matches
/// [`MANUFACTURER_ID`] is decoded and broadcast to subscribers.
/// Filtering of duplicate or stale advertisements is left to the
/// consumer, which knows its own freshness requirements.
pub struct BleScanner {
    /// The BLE adapter to use for scanning.
    adapter: Adapter,
    /// Whether scanning is currently active.
    is_scanning: Arc<RwLock<bool>>,
    /// Channel for decoded packet events.
    event_tx: broadcast::Sender<PacketEvent>,
    /// Handle to the scanning task.
    scan_handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl BleScanner {
    /// Create a new BLE scanner on the first available adapter.
    ///
    /// # Errors
    ///
    /// Returns an error if Bluetooth is not available.
    pub async fn new() -> Result<Self> {
        let manager = Manager::new()
            .await
            .map_err(|_e| Error::BluetoothUnavailable)?;

        let adapters = manager.adapters().await.map_err(Error::Bluetooth)?;

        let adapter = adapters
            .into_iter()
            .next()
            .ok_or(Error::BluetoothUnavailable)?;

        info!(
            "Using Bluetooth adapter: {:?}",
            adapter.adapter_info().await.ok()
        );

        Ok(Self::with_adapter(adapter))
    }

    /// Create a new BLE scanner with a specific adapter.
    pub fn with_adapter(adapter: Adapter) -> Self {
        let (event_tx, _) = broadcast::channel(100);

        Self {
            adapter,
            is_scanning: Arc::new(RwLock::new(false)),
            event_tx,
            scan_handle: Arc::new(RwLock::new(None)),
        }
    }

    /// Start scanning for probe advertisements.
    ///
    /// # Errors
    ///
    /// Returns an error if scanning cannot be started.
    pub async fn start_scanning(&self) -> Result<()> {
        if *self.is_scanning.read() {
            debug!("Already scanning, ignoring start request");
            return Ok(());
        }

        info!("Starting BLE scan for probe advertisements");

        self.adapter
            .start_scan(ScanFilter::default())
            .await
            .map_err(Error::Bluetooth)?;

        *self.is_scanning.write() = true;

        // Start the event processing task
        let adapter = self.adapter.clone();
        let is_scanning = self.is_scanning.clone();
        let event_tx = self.event_tx.clone();

        let handle = tokio::spawn(async move {
            let mut events = match adapter.events().await {
                Ok(events) => events,
                Err(e) => {
                    error!("Failed to get adapter events: {}", e);
                    return;
                }
            };

            while *is_scanning.read() {
                tokio::select! {
                    Some(event) = events.next() => {
                        Self::handle_event(event, &event_tx);
                    }
                    _ = tokio::time::sleep(Duration::from_millis(100)) => {
                        // Check if we should stop scanning
                        if !*is_scanning.read() {
                            break;
                        }
                    }
                }
            }

            debug!("Scan event loop ended");
        });

        *self.scan_handle.write() = Some(handle);

        Ok(())
    }

    /// Stop scanning for probe advertisements.
    pub async fn stop_scanning(&self) -> Result<()> {
        if !*self.is_scanning.read() {
            debug!("Not scanning, ignoring stop request");
            return Ok(());
        }

        info!("Stopping BLE scan");

        *self.is_scanning.write() = false;

        self.adapter.stop_scan().await.map_err(Error::Bluetooth)?;

        // Wait for the scan task to complete
        if let Some(handle) = self.scan_handle.write().take() {
            let _ = handle.await;
        }

        Ok(())
    }

    /// Check if currently scanning.
    pub fn is_scanning(&self) -> bool {
        *self.is_scanning.read()
    }

    /// Subscribe to decoded packet events.
    pub fn subscribe(&self) -> broadcast::Receiver<PacketEvent> {
        self.event_tx.subscribe()
    }

    /// Get the underlying adapter.
    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Handle a BLE central event.
    ///
    /// Only manufacturer-data advertisements are interesting here: they
    /// carry the payload directly, and this crate never connects to
    /// peripherals.
    fn handle_event(event: CentralEvent, event_tx: &broadcast::Sender<PacketEvent>) {
        if let CentralEvent::ManufacturerDataAdvertisement {
            id,
            manufacturer_data,
        } = event
        {
            let payload = match manufacturer_data.get(&MANUFACTURER_ID) {
                Some(payload) => payload,
                None => return,
            };

            match AdvertisingData::parse(payload) {
                Ok(packet) => {
                    trace!("Decoded advertisement from {:?}", id);
                    let _ = event_tx.send(PacketEvent {
                        identifier: id.to_string(),
                        packet,
                    });
                }
                Err(e) => {
                    // A matching company ID with an undecodable payload
                    // must not kill the scan loop
                    debug!("Ignoring undecodable advertisement from {:?}: {}", id, e);
                }
            }
        }
    }
}

impl Drop for BleScanner {
    fn drop(&mut self) {
        *self.is_scanning.write() = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_event_clone() {
        // Just verify the struct is Clone
        fn assert_clone<T: Clone>() {}
        assert_clone::<PacketEvent>();
    }
}
