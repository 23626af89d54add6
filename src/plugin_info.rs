//! Static plugin metadata the host uses to list and render INA219 tasks.

use crate::configuration::{Arity, SLOT_COUNT};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceType {
    I2c,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PluginInfo {
    pub id: u16,
    pub name: &'static str,
    pub device_type: DeviceType,
    pub value_names: [&'static str; SLOT_COUNT],
    pub decimals: [u8; 4],
    pub value_count: u8,
    pub send_data_option: bool,
    pub timer_option: bool,
    pub timer_optional: bool,
    pub formula_option: bool,
}

impl PluginInfo {
    /// Value names shown for a task reporting `arity` values.
    pub fn active_value_names(&self, arity: Arity) -> &[&'static str] {
        &self.value_names[..arity.value_count() as usize]
    }
}

pub static PLUGIN_INFO: PluginInfo = PluginInfo {
    id: 27,
    name: "Energy (DC) - INA219",
    device_type: DeviceType::I2c,
    value_names: ["Voltage", "Current", "Power"],
    decimals: [3, 3, 3, 0],
    value_count: SLOT_COUNT as u8,
    send_data_option: true,
    timer_option: true,
    timer_optional: false,
    formula_option: true,
};
