mod data_model;
mod driver;
mod error;
mod read_guard;
mod sensor_task;

pub use crate::ina219_sensor::data_model::{Measurement, Quantity, SampleResult, SlotNum};
pub use crate::ina219_sensor::driver::{
    PowerMonitor, PowerMonitorConnector, SHUNT_OHMS, SensorSettings,
};
pub use crate::ina219_sensor::error::SensorError;
pub use crate::ina219_sensor::sensor_task::{DEFAULT_INTERVAL_S, Ina219Task};
