//! INA219 voltage, current and power task for a home automation host
//!
//! The host drives a task through [`Ina219Task::init`] and [`Ina219Task::read`], supplies
//! its environment through [`TaskHost`] and the chip driver through [`PowerMonitorConnector`].
#![cfg_attr(not(test), no_std)]

pub mod configuration;
pub mod host;
pub mod ina219_sensor;
pub mod plugin_info;
pub mod units;

pub use crate::configuration::{Arity, ConfigError, TaskConfig, TaskConfigForm};
pub use crate::host::{BusNum, TaskHost};
pub use crate::ina219_sensor::{
    Ina219Task, PowerMonitor, PowerMonitorConnector, SampleResult, SensorError, SensorSettings,
};
pub use crate::plugin_info::{PLUGIN_INFO, PluginInfo};
