use core::fmt;

use embedded_hal::i2c::ErrorKind;

use super::data_model::SlotNum;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// No I2C bus is both usable and enabled.
    BusUnavailable,
    /// The configured address is below the plausible range.
    AddressRejected(u8),
    /// Opening or configuring the sensor failed.
    Construction(ErrorKind),
    /// Sampling a slot failed.
    Read { slot: SlotNum, kind: ErrorKind },
    NotInitialized,
    /// The task is switched off.
    Disabled,
}

impl SensorError {
    pub fn description(&self) -> &'static str {
        match self {
            SensorError::BusUnavailable => "No usable I2C bus",
            SensorError::AddressRejected(_) => "I2C address not configured",
            SensorError::Construction(_) => "INA219 can not be initialized",
            SensorError::Read { .. } => "INA219 read error",
            SensorError::NotInitialized => "INA219 not initialized",
            SensorError::Disabled => "INA219 task disabled",
        }
    }
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::AddressRejected(address) => {
                write!(f, "{}: {:#04x}", self.description(), address)
            }
            SensorError::Construction(kind) => write!(f, "{}: {}", self.description(), kind),
            SensorError::Read { slot, kind } => {
                write!(f, "{} on slot {}: {}", self.description(), slot, kind)
            }
            _ => f.write_str(self.description()),
        }
    }
}

impl core::error::Error for SensorError {}
