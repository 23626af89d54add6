use heapless::Vec;

use super::error::SensorError;
use crate::configuration::{SLOT_COUNT, SlotKind};

/// Task value slot, 1..=3 as numbered by the host.
pub type SlotNum = u8;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Quantity {
    Voltage,
    Current,
    Power,
}

impl Quantity {
    pub const fn unit(self) -> &'static str {
        match self {
            Quantity::Voltage => "V",
            Quantity::Current => "A",
            Quantity::Power => "W",
        }
    }
}

impl SlotKind {
    pub const fn quantity(self) -> Option<Quantity> {
        match self {
            SlotKind::None => None,
            SlotKind::Voltage => Some(Quantity::Voltage),
            SlotKind::Current => Some(Quantity::Current),
            SlotKind::Power => Some(Quantity::Power),
        }
    }
}

/// A value stored into a task slot, in base units.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    pub slot: SlotNum,
    pub quantity: Quantity,
    pub value: f32,
}

/// Outcome of one read cycle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleResult {
    /// Values stored before the cycle ended, in slot order.
    pub values: Vec<Measurement, SLOT_COUNT>,
    /// Error that aborted the remaining slots.
    pub error: Option<SensorError>,
    pub dispatched: bool,
}

impl SampleResult {
    pub const fn new() -> Self {
        Self {
            values: Vec::new(),
            error: None,
            dispatched: false,
        }
    }

    pub fn value(&self, slot: SlotNum) -> Option<f32> {
        self.values
            .iter()
            .find(|measurement| measurement.slot == slot)
            .map(|measurement| measurement.value)
    }

    /// A completed cycle with a current or power value is worth sending.
    pub fn has_non_voltage_reading(&self) -> bool {
        self.error.is_none()
            && self
                .values
                .iter()
                .any(|measurement| measurement.quantity != Quantity::Voltage)
    }
}

impl Default for SampleResult {
    fn default() -> Self {
        Self::new()
    }
}
