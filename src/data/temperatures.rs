//! Temperature data structures.
//!
//! Contains the raw 13-bit thermistor reading type, the packed thermistor
//! window from advertising payloads, and the virtual sensor selection.

/// Raw temperature value from a thermistor (13-bit).
///
/// The probe reports 13-bit raw values that are converted to Celsius with
/// the device's published transfer function:
/// `celsius = (raw_value * 0.05) - 20.0`
///
/// This gives a range of -20°C to ~389°C with 0.05°C resolution. The
/// arithmetic is single-precision on the device, so conversion is done in
/// `f32` here as well to keep decoded values comparable bit-for-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawTemperature(pub u16);

impl RawTemperature {
    /// Create a new RawTemperature, masking to the 13-bit range.
    pub fn new(value: u16) -> Self {
        Self(value & 0x1FFF)
    }

    /// Convert the raw value to Celsius.
    ///
    /// # Example
    ///
    /// ```
    /// use probecast::RawTemperature;
    ///
    /// // Raw 0 is the bottom of the scale
    /// assert_eq!(RawTemperature::new(0).to_celsius(), -20.0);
    ///
    /// // 20°C = raw value 800 (800 * 0.05 - 20 = 20)
    /// assert_eq!(RawTemperature::new(800).to_celsius(), 20.0);
    /// ```
    pub fn to_celsius(&self) -> f32 {
        (self.0 as f32 * 0.05) - 20.0
    }

    /// Get the raw 13-bit value.
    pub fn raw_value(&self) -> u16 {
        self.0
    }
}

/// Packed thermistor readings from an advertising payload.
///
/// The payload carries 13 bytes holding eight 13-bit readings (104 bits,
/// filling the window exactly). The bytes arrive little-endian on the wire;
/// this type copies them and reverses the copy so the readings can be
/// extracted as consecutive big-endian bit fields, most significant field
/// first. The caller's buffer is never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThermistorData {
    window: [u8; 13],
}

impl ThermistorData {
    /// Number of packed readings in the window.
    pub const SENSOR_COUNT: usize = 8;

    /// Width of the window in bytes.
    pub const SIZE: usize = 13;

    /// Build from the wire bytes of the thermistor field.
    ///
    /// Copies the first 13 bytes and reverses the copy. Returns `None` if
    /// fewer than 13 bytes are supplied.
    pub fn from_wire(bytes: &[u8]) -> Option<Self> {
        let mut window: [u8; Self::SIZE] = bytes.get(..Self::SIZE)?.try_into().ok()?;
        window.reverse();
        Some(Self { window })
    }

    /// Extract the packed 13-bit field at `slot` (0-7, most significant
    /// field first).
    ///
    /// A field spans two bytes when it starts within the top three bit
    /// positions of a byte and three bytes otherwise.
    pub fn value(&self, slot: usize) -> RawTemperature {
        debug_assert!(slot < Self::SENSOR_COUNT);
        let bit = slot * 13;
        let byte = bit / 8;
        let start = bit % 8;

        let raw = if start <= 3 {
            let word = u16::from_be_bytes([self.window[byte], self.window[byte + 1]]);
            (word >> (3 - start)) & 0x1FFF
        } else {
            let word = u32::from_be_bytes([
                0,
                self.window[byte],
                self.window[byte + 1],
                self.window[byte + 2],
            ]);
            ((word >> (11 - start)) & 0x1FFF) as u16
        };

        RawTemperature(raw)
    }

    /// All eight thermistor readings, index 0 = T1 (tip) through
    /// index 7 = T8 (handle).
    ///
    /// T1 sits in the last packed slot and T8 in the first, so the slot
    /// order is inverted here.
    pub fn thermistors(&self) -> [RawTemperature; 8] {
        std::array::from_fn(|i| self.value(Self::SENSOR_COUNT - 1 - i))
    }

    /// The single reading populated in instant-read mode.
    ///
    /// Instant-read payloads only carry a valid value in the last packed
    /// slot (the T1 position); the rest of the window is not meaningful.
    pub fn instant_read(&self) -> RawTemperature {
        self.value(Self::SENSOR_COUNT - 1)
    }
}

/// Virtual sensor selection - which physical thermistors the firmware is
/// currently using for the core, surface, and ambient readings.
///
/// The probe picks these dynamically based on insertion depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualSensorSelection {
    /// Physical thermistor index (0-7) used for core temperature.
    pub core_sensor: u8,
    /// Physical thermistor index (3-6) used for surface temperature (T4-T7).
    pub surface_sensor: u8,
    /// Physical thermistor index (4-7) used for ambient temperature (T5-T8).
    pub ambient_sensor: u8,
}

impl VirtualSensorSelection {
    /// Parse the selection from the virtual sensor bits.
    ///
    /// `byte` is the status byte already shifted past the battery bit:
    /// - Bits 0-2: core thermistor index
    /// - Bits 3-4: surface thermistor, offset from T4 (add 3)
    /// - Bits 5-6: ambient thermistor, offset from T5 (add 4)
    ///
    /// The +3/+4 offsets are a firmware convention: surface is always drawn
    /// from T4-T7 and ambient from T5-T8.
    pub fn from_byte(byte: u8) -> Self {
        let core_sensor = byte & 0x07;
        let surface_sensor = ((byte >> 3) & 0x03) + 3;
        let ambient_sensor = ((byte >> 5) & 0x03) + 4;
        Self {
            core_sensor,
            surface_sensor,
            ambient_sensor,
        }
    }

    /// Display name for the core thermistor (e.g. "T1").
    pub fn core_sensor_name(&self) -> String {
        format!("T{}", self.core_sensor + 1)
    }

    /// Display name for the surface thermistor (e.g. "T4").
    pub fn surface_sensor_name(&self) -> String {
        format!("T{}", self.surface_sensor + 1)
    }

    /// Display name for the ambient thermistor (e.g. "T5").
    pub fn ambient_sensor_name(&self) -> String {
        format!("T{}", self.ambient_sensor + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_temperature_to_celsius() {
        // Formula: celsius = raw * 0.05 - 20
        assert_eq!(RawTemperature::new(0).to_celsius(), -20.0);
        assert_eq!(RawTemperature::new(400).to_celsius(), 0.0);
        assert_eq!(RawTemperature::new(800).to_celsius(), 20.0);
        assert_eq!(RawTemperature::new(2400).to_celsius(), 100.0);

        // Top of the 13-bit range (not exactly representable, so no
        // exact compare here)
        assert!((RawTemperature::new(0x1FFF).to_celsius() - 389.55).abs() < 0.001);
    }

    #[test]
    fn test_raw_temperature_masks_to_13_bits() {
        assert_eq!(RawTemperature::new(0xFFFF).raw_value(), 0x1FFF);
        assert_eq!(RawTemperature::new(0x2001).raw_value(), 0x0001);
    }

    #[test]
    fn test_thermistor_data_requires_13_bytes() {
        assert!(ThermistorData::from_wire(&[0u8; 12]).is_none());
        assert!(ThermistorData::from_wire(&[0u8; 13]).is_some());
        // Extra bytes beyond the window are ignored
        assert!(ThermistorData::from_wire(&[0u8; 20]).is_some());
    }

    #[test]
    fn test_first_packed_slot_is_t8() {
        // Slot 0 comes from the end of the wire field (the window is
        // reversed): wire[12] contributes the high 8 bits, wire[11] the
        // low 5. Raw = 0x01 << 5 | 0x40 >> 3 = 40.
        let mut wire = [0u8; 13];
        wire[12] = 0x01;
        wire[11] = 0x40;
        let data = ThermistorData::from_wire(&wire).unwrap();

        assert_eq!(data.value(0).raw_value(), 40);
        assert_eq!(data.thermistors()[7].raw_value(), 40);
        for i in 0..7 {
            assert_eq!(data.thermistors()[i].raw_value(), 0);
        }
    }

    #[test]
    fn test_last_packed_slot_is_t1() {
        // Slot 7 lives in the first two wire bytes: raw 800 = 0x320,
        // so wire[1] holds 0x03 and wire[0] holds 0x20 after reversal.
        let mut wire = [0u8; 13];
        wire[1] = 0x03;
        wire[0] = 0x20;
        let data = ThermistorData::from_wire(&wire).unwrap();

        assert_eq!(data.value(7).raw_value(), 800);
        assert_eq!(data.instant_read().raw_value(), 800);
        assert_eq!(data.thermistors()[0].to_celsius(), 20.0);
    }

    #[test]
    fn test_all_ones_window() {
        let data = ThermistorData::from_wire(&[0xFF; 13]).unwrap();
        for reading in data.thermistors() {
            assert_eq!(reading.raw_value(), 0x1FFF);
        }
    }

    #[test]
    fn test_virtual_sensor_selection_from_byte() {
        let sel = VirtualSensorSelection::from_byte(0x00);
        assert_eq!(sel.core_sensor, 0);
        assert_eq!(sel.surface_sensor, 3);
        assert_eq!(sel.ambient_sensor, 4);

        // Core = 5, surface bits = 2 (-> T6), ambient bits = 1 (-> T6)
        let sel = VirtualSensorSelection::from_byte(0b01_10_101);
        assert_eq!(sel.core_sensor, 5);
        assert_eq!(sel.surface_sensor, 5);
        assert_eq!(sel.ambient_sensor, 5);

        let sel = VirtualSensorSelection::from_byte(0b11_11_111);
        assert_eq!(sel.core_sensor, 7);
        assert_eq!(sel.surface_sensor, 6);
        assert_eq!(sel.ambient_sensor, 7);
    }

    #[test]
    fn test_virtual_sensor_names() {
        let sel = VirtualSensorSelection::from_byte(0x00);
        assert_eq!(sel.core_sensor_name(), "T1");
        assert_eq!(sel.surface_sensor_name(), "T4");
        assert_eq!(sel.ambient_sensor_name(), "T5");
    }
}
