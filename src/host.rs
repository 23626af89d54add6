//! Host side of the plugin contract
//!
//! The host framework owns the task value buffer, the data dispatch, its clock and the
//! I2C bus bookkeeping. The task only talks to it through [`TaskHost`].

use crate::ina219_sensor::SlotNum;

pub type BusNum = u8;

/// Buses probed for the sensor, in order.
pub const I2C_BUS_CANDIDATES: [BusNum; 2] = [0, 1];

pub trait TaskHost {
    /// Whether the host hardware exposes I2C bus `bus`.
    fn is_i2c_usable(&self, bus: BusNum) -> bool;

    /// Whether I2C bus `bus` is enabled in the host configuration.
    fn is_i2c_enabled(&self, bus: BusNum) -> bool;

    /// Milliseconds since host start.
    fn millis(&self) -> u64;

    /// Stores `value` for slot 1..=3 of the task.
    fn set_value(&mut self, slot: SlotNum, value: f32, suppress_event: bool);

    /// Sends the currently stored values to the configured controllers.
    fn send_data(&mut self);
}

/// First bus that is both usable and enabled.
pub fn find_i2c_bus<H: TaskHost + ?Sized>(host: &H) -> Option<BusNum> {
    I2C_BUS_CANDIDATES
        .into_iter()
        .find(|bus| host.is_i2c_usable(*bus) && host.is_i2c_enabled(*bus))
}
