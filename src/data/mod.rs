//! Data structures for probe readings.
//!
//! This module contains the core data types used to represent raw
//! thermistor values and the firmware's virtual sensor selection.

pub mod temperatures;

pub use temperatures::{RawTemperature, ThermistorData, VirtualSensorSelection};
