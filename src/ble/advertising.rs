//! Advertising data decoding.
//!
//! Decodes manufacturer-specific advertising payloads from probes into
//! typed packet records. Decoding is pure: the input buffer is borrowed
//! read-only and every call produces a fresh, caller-owned record.

use crate::data::{ThermistorData, VirtualSensorSelection};
use crate::error::{Error, Result};

/// Product type identifier from advertising data.
///
/// Decoded from the first payload byte. The set is open: firmware revisions
/// add device types, and an unrecognized byte decodes to `Unknown` rather
/// than failing so older decoders keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ProductType {
    /// Unknown or unrecognized product type.
    Unknown = 0,
    /// Predictive temperature probe.
    PredictiveProbe = 1,
    /// Repeater node (re-broadcasts probe data).
    RepeaterNode = 2,
    /// Giant Grill Gauge.
    GiantGrillGauge = 3,
    /// Display (timer).
    Display = 4,
    /// Booster (charger).
    Booster = 5,
}

impl ProductType {
    /// Create from raw byte value.
    pub fn from_raw(value: u8) -> Self {
        match value {
            1 => Self::PredictiveProbe,
            2 => Self::RepeaterNode,
            3 => Self::GiantGrillGauge,
            4 => Self::Display,
            5 => Self::Booster,
            _ => Self::Unknown,
        }
    }

    /// Check if this is a Predictive Probe.
    pub fn is_predictive_probe(&self) -> bool {
        matches!(self, Self::PredictiveProbe)
    }
}

/// Probe operational mode from advertising data.
///
/// A firmware-fixed 2-bit field, so the set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ProbeMode {
    /// Normal cooking mode, all eight thermistors reported.
    #[default]
    Normal = 0,
    /// Instant read mode, a single ad-hoc reading.
    InstantRead = 1,
    /// Reserved for future use.
    Reserved = 2,
    /// Error state.
    Error = 3,
}

impl ProbeMode {
    /// Create from raw byte value (low two bits).
    pub fn from_raw(value: u8) -> Self {
        match value & 0x03 {
            1 => Self::InstantRead,
            2 => Self::Reserved,
            3 => Self::Error,
            _ => Self::Normal,
        }
    }

    /// Convert to raw byte value.
    pub fn to_raw(&self) -> u8 {
        *self as u8
    }
}

/// Color identifier (silicone ring color) from advertising data.
///
/// Kept as an open newtype: the decode convention (see
/// [`AdvertisingData::parse`]) can yield values outside the documented
/// color table, and those must round-trip rather than collapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorId(pub u8);

impl ColorId {
    /// Yellow silicone ring.
    pub const YELLOW: Self = Self(0);
    /// Grey silicone ring.
    pub const GREY: Self = Self(1);

    /// Get the raw identifier value.
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

/// Probe identifier from advertising data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProbeId(pub u8);

impl ProbeId {
    /// Get the raw identifier value.
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for ProbeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decoded advertising payload from a probe.
///
/// Produced by [`AdvertisingData::parse`]; immutable once produced and
/// independent of every other packet. The thermistor readings are in
/// Celsius; unit conversion is left to the caller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdvertisingData {
    /// Product type (probe, repeater, display, ...).
    pub product_type: ProductType,
    /// Device serial number as 8 lowercase hex characters.
    pub serial_number: String,
    /// Thermistor readings in Celsius. Eight entries in Normal mode
    /// (index 0 = T1 at the tip), one in InstantRead mode, empty otherwise.
    pub temperatures: Vec<f32>,
    /// Operational mode.
    pub mode: ProbeMode,
    /// Color identifier.
    pub color_id: ColorId,
    /// Probe identifier.
    pub probe_id: ProbeId,
    /// Battery state, true while the battery fault flag is clear.
    pub battery_ok: bool,
    /// Which thermistors the firmware designates as core/surface/ambient.
    /// Only meaningful as indices into `temperatures` in Normal mode.
    pub virtual_sensors: VirtualSensorSelection,
    /// Per-thermistor overheat flags, index 0 = T1 through index 7 = T8.
    pub overheating: [bool; 8],
}

impl AdvertisingData {
    /// Minimum payload length; bytes 0-21 are read.
    pub const MIN_SIZE: usize = 22;

    /// Decode a manufacturer-specific advertising payload.
    ///
    /// `data` is the vendor payload that follows the company identifier in
    /// the advertisement. The caller's buffer is never modified; wire
    /// fields that need byte-swapping are reversed on local copies.
    ///
    /// # Errors
    ///
    /// [`Error::TruncatedPacket`] if `data` is shorter than
    /// [`MIN_SIZE`](Self::MIN_SIZE) bytes. Every other field decodes
    /// totally: out-of-table product types become
    /// [`ProductType::Unknown`].
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < Self::MIN_SIZE {
            return Err(Error::TruncatedPacket {
                len: data.len(),
                needed: Self::MIN_SIZE,
            });
        }

        // Byte 0: Product type
        let product_type = ProductType::from_raw(data[0]);

        // Bytes 1-4: Serial number, little-endian on the wire
        let mut serial = [data[1], data[2], data[3], data[4]];
        serial.reverse();
        let serial_number: String = serial.iter().map(|b| format!("{:02x}", b)).collect();

        // Byte 18: Mode and ID
        // - Bits 0-1: Mode
        // - Bits 2-4: Color ID
        // - Bits 5-7: Probe ID
        //
        // TODO: confirm the color/probe masks against the vendor BLE spec.
        // 0x07 would make them contiguous 3-bit ids, but shipping decoders
        // apply 0x70 after the shift, so that arithmetic is kept verbatim.
        let mode_id_byte = data[18];
        let mode = ProbeMode::from_raw(mode_id_byte & 0x03);
        let color_id = ColorId((mode_id_byte >> 2) & 0x70);
        let probe_id = ProbeId((mode_id_byte >> 5) & 0x70);

        // Bytes 5-17: packed thermistor window
        let thermistors =
            ThermistorData::from_wire(&data[5..18]).ok_or(Error::TruncatedPacket {
                len: data.len(),
                needed: Self::MIN_SIZE,
            })?;

        let temperatures = match mode {
            ProbeMode::Normal => thermistors
                .thermistors()
                .iter()
                .map(|t| t.to_celsius())
                .collect(),
            // Only the last packed slot carries a valid reading
            ProbeMode::InstantRead => vec![thermistors.instant_read().to_celsius()],
            // No thermistor data is defined for these modes
            ProbeMode::Reserved | ProbeMode::Error => Vec::new(),
        };

        // Byte 19: Battery status and virtual sensor selection
        // - Bit 0: battery fault flag (0 = OK)
        // - Bits 1-7: virtual sensor selection
        let status_byte = data[19];
        let battery_ok = status_byte & 0x01 == 0x00;
        let virtual_sensors = VirtualSensorSelection::from_byte(status_byte >> 1);

        // Byte 20: Network information (unused by the probe)

        // Byte 21: Overheating flags, bit 0 = T1 through bit 7 = T8
        let overheat_byte = data[21];
        let overheating: [bool; 8] = std::array::from_fn(|i| overheat_byte & (1 << i) != 0);

        Ok(Self {
            product_type,
            serial_number,
            temperatures,
            mode,
            color_id,
            probe_id,
            battery_ok,
            virtual_sensors,
            overheating,
        })
    }

    /// Temperature reported by the virtual core sensor, Normal mode only.
    pub fn virtual_core(&self) -> Option<f32> {
        self.virtual_temp(self.virtual_sensors.core_sensor)
    }

    /// Temperature reported by the virtual surface sensor, Normal mode only.
    pub fn virtual_surface(&self) -> Option<f32> {
        self.virtual_temp(self.virtual_sensors.surface_sensor)
    }

    /// Temperature reported by the virtual ambient sensor, Normal mode only.
    pub fn virtual_ambient(&self) -> Option<f32> {
        self.virtual_temp(self.virtual_sensors.ambient_sensor)
    }

    fn virtual_temp(&self, index: u8) -> Option<f32> {
        if self.mode != ProbeMode::Normal {
            return None;
        }
        self.temperatures.get(index as usize).copied()
    }

    /// Check if any thermistor is overheating.
    pub fn is_any_overheating(&self) -> bool {
        self.overheating.iter().any(|&flag| flag)
    }
}
