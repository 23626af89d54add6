//! Driver seam
//!
//! The register level INA219 driver lives outside this crate. The task builds a handle through
//! a [`PowerMonitorConnector`] and samples it through [`PowerMonitor`]. Errors are I2C errors so
//! their [`ErrorKind`](embedded_hal::i2c::ErrorKind) can be reported.

use embedded_hal::i2c::ErrorType;

use crate::configuration::{TaskConfig, VoltageRange};
use crate::host::BusNum;

/// Shunt fitted on the INA219 breakout boards, in ohms.
pub const SHUNT_OHMS: f32 = 0.1;

/// Everything needed to open and calibrate a sensor handle.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSettings {
    pub bus: BusNum,
    pub address: u8,
    pub shunt_ohms: f32,
    /// `None` lets the driver auto-range the calibration.
    pub max_expected_current_ma: Option<u16>,
    pub voltage_range: VoltageRange,
}

impl SensorSettings {
    pub fn new(bus: BusNum, config: &TaskConfig) -> Self {
        Self {
            bus,
            address: config.i2c_address,
            shunt_ohms: SHUNT_OHMS,
            max_expected_current_ma: config.max_current.limit_ma(),
            voltage_range: config.voltage_range,
        }
    }
}

pub trait PowerMonitor: ErrorType {
    /// Applies the bus voltage range.
    fn configure(&mut self, voltage_range: VoltageRange) -> Result<(), Self::Error>;

    /// Supply voltage (bus plus shunt) in volts.
    fn supply_voltage(&mut self) -> Result<f32, Self::Error>;

    /// Current through the shunt in mA.
    fn current(&mut self) -> Result<f32, Self::Error>;

    /// Power in mW.
    fn power(&mut self) -> Result<f32, Self::Error>;
}

pub trait PowerMonitorConnector {
    type Monitor: PowerMonitor;

    /// Opens a handle on the chip described by `settings`.
    fn connect(
        &mut self,
        settings: &SensorSettings,
    ) -> Result<Self::Monitor, <Self::Monitor as ErrorType>::Error>;
}
