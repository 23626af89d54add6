use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Addresses selectable for the INA219 (A0/A1 strapping of the common breakout boards).
pub const ALLOWED_ADDRESSES: [u8; 4] = [0x40, 0x41, 0x44, 0x45];
pub const DEFAULT_ADDRESS: u8 = 0x40;
/// Configured addresses at or below this value are treated as unset.
pub const ADDRESS_FLOOR: u8 = 0x39;
/// Current bounds offered for calibration, in mA.
pub const CURRENT_LIMITS_MA: [u16; 7] = [200, 400, 800, 1000, 1600, 2000, 3200];
pub const SLOT_COUNT: usize = 3;
pub const RAW_CONFIG_LEN: usize = 6;

/// The six-integer layout the host persists: address, max current, voltage range, slot 1..3.
pub type RawTaskConfig = [i32; RAW_CONFIG_LEN];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MaxCurrent {
    /// Let the driver pick the calibration from the shunt and voltage range.
    #[default]
    Auto,
    /// Maximum expected current in mA.
    Limit(u16),
}

impl MaxCurrent {
    /// Anything below 1 mA means auto-range.
    pub fn from_raw(raw: i32) -> Self {
        if raw < 1 {
            MaxCurrent::Auto
        } else {
            MaxCurrent::Limit(u16::try_from(raw).unwrap_or(u16::MAX))
        }
    }

    pub const fn to_raw(self) -> i32 {
        match self {
            MaxCurrent::Auto => 0,
            MaxCurrent::Limit(ma) => ma as i32,
        }
    }

    pub const fn limit_ma(self) -> Option<u16> {
        match self {
            MaxCurrent::Auto => None,
            MaxCurrent::Limit(ma) => Some(ma),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum VoltageRange {
    Range16V = 0,
    #[default]
    Range32V = 1,
}

impl VoltageRange {
    /// Selectors other than 0 and 1 are clamped to the 32V range.
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            0 => VoltageRange::Range16V,
            _ => VoltageRange::Range32V,
        }
    }

    pub const fn to_raw(self) -> i32 {
        self as i32
    }

    pub const fn volts(self) -> u8 {
        match self {
            VoltageRange::Range16V => 16,
            VoltageRange::Range32V => 32,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SlotKind {
    #[default]
    None = 0,
    Voltage = 1,
    Current = 2,
    Power = 3,
}

impl SlotKind {
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            1 => SlotKind::Voltage,
            2 => SlotKind::Current,
            3 => SlotKind::Power,
            _ => SlotKind::None,
        }
    }

    pub const fn to_raw(self) -> i32 {
        self as i32
    }

    pub const fn is_none(self) -> bool {
        matches!(self, SlotKind::None)
    }
}

/// Number of values the task reports to the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Arity {
    Single = 1,
    Dual = 2,
    Triple = 3,
}

impl Arity {
    pub const fn value_count(self) -> u8 {
        self as u8
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(try_from = "RawTaskConfig", into = "RawTaskConfig")]
pub struct TaskConfig {
    pub i2c_address: u8,
    pub max_current: MaxCurrent,
    pub voltage_range: VoltageRange,
    pub slots: [SlotKind; SLOT_COUNT],
}

impl TaskConfig {
    pub const fn new() -> Self {
        Self {
            i2c_address: DEFAULT_ADDRESS,
            max_current: MaxCurrent::Auto,
            voltage_range: VoltageRange::Range32V,
            slots: [SlotKind::Voltage, SlotKind::None, SlotKind::None],
        }
    }

    /// Slot 2 and 3 unused gives a single value, only slot 3 unused gives two.
    pub const fn arity(&self) -> Arity {
        match (self.slots[1], self.slots[2]) {
            (SlotKind::None, SlotKind::None) => Arity::Single,
            (_, SlotKind::None) => Arity::Dual,
            _ => Arity::Triple,
        }
    }

    /// Whether the address is plausible enough to try talking to the chip.
    pub const fn has_usable_address(&self) -> bool {
        self.i2c_address > ADDRESS_FLOOR
    }

    pub fn to_raw(&self) -> RawTaskConfig {
        [
            i32::from(self.i2c_address),
            self.max_current.to_raw(),
            self.voltage_range.to_raw(),
            self.slots[0].to_raw(),
            self.slots[1].to_raw(),
            self.slots[2].to_raw(),
        ]
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<RawTaskConfig> for TaskConfig {
    type Error = ConfigError;

    fn try_from(raw: RawTaskConfig) -> Result<Self, Self::Error> {
        let i2c_address = u8::try_from(raw[0])
            .ok()
            .filter(|address| *address <= 0x7F)
            .ok_or(ConfigError::InvalidAddress(raw[0]))?;

        Ok(Self {
            i2c_address,
            max_current: MaxCurrent::from_raw(raw[1]),
            voltage_range: VoltageRange::from_raw(raw[2]),
            slots: [
                SlotKind::from_raw(raw[3]),
                SlotKind::from_raw(raw[4]),
                SlotKind::from_raw(raw[5]),
            ],
        })
    }
}

impl From<TaskConfig> for RawTaskConfig {
    fn from(config: TaskConfig) -> Self {
        config.to_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_slots(slots: [SlotKind; 3]) -> TaskConfig {
        TaskConfig {
            slots,
            ..TaskConfig::default()
        }
    }

    #[test]
    fn defaults_match_form_defaults() {
        let config = TaskConfig::default();
        assert_eq!(config.i2c_address, 0x40);
        assert_eq!(config.max_current, MaxCurrent::Auto);
        assert_eq!(config.voltage_range, VoltageRange::Range32V);
        assert_eq!(
            config.slots,
            [SlotKind::Voltage, SlotKind::None, SlotKind::None]
        );
        assert_eq!(config.to_raw(), [0x40, 0, 1, 1, 0, 0]);
    }

    #[test]
    fn arity_follows_trailing_slots() {
        use SlotKind::*;

        let kinds = [None, Voltage, Current, Power];
        for s1 in kinds {
            for s2 in kinds {
                for s3 in kinds {
                    let expected = if s2.is_none() && s3.is_none() {
                        Arity::Single
                    } else if s3.is_none() {
                        Arity::Dual
                    } else {
                        Arity::Triple
                    };
                    assert_eq!(with_slots([s1, s2, s3]).arity(), expected);
                }
            }
        }

        assert_eq!(with_slots([Voltage, None, Power]).arity(), Arity::Triple);
        assert_eq!(Arity::Dual.value_count(), 2);
    }

    #[test]
    fn raw_conversion_is_lenient_like_the_runtime() {
        let config = TaskConfig::try_from([0x41, -5, 7, 2, 9, 3]).unwrap();
        assert_eq!(config.i2c_address, 0x41);
        assert_eq!(config.max_current, MaxCurrent::Auto);
        assert_eq!(config.voltage_range, VoltageRange::Range32V);
        assert_eq!(
            config.slots,
            [SlotKind::Current, SlotKind::None, SlotKind::Power]
        );

        let config = TaskConfig::try_from([0x45, 800, 0, 0, 0, 0]).unwrap();
        assert_eq!(config.max_current, MaxCurrent::Limit(800));
        assert_eq!(config.voltage_range, VoltageRange::Range16V);
        assert_eq!(config.to_raw(), [0x45, 800, 0, 0, 0, 0]);
    }

    #[test]
    fn raw_conversion_rejects_non_i2c_addresses() {
        assert_eq!(
            TaskConfig::try_from([0x80, 0, 1, 1, 0, 0]),
            Err(ConfigError::InvalidAddress(0x80))
        );
        assert_eq!(
            TaskConfig::try_from([-1, 0, 1, 1, 0, 0]),
            Err(ConfigError::InvalidAddress(-1))
        );
    }

    #[test]
    fn address_floor() {
        let mut config = TaskConfig::default();
        assert!(config.has_usable_address());
        config.i2c_address = 0x39;
        assert!(!config.has_usable_address());
        config.i2c_address = 0x3A;
        assert!(config.has_usable_address());
    }

    #[test]
    fn max_current_saturates() {
        assert_eq!(MaxCurrent::from_raw(0), MaxCurrent::Auto);
        assert_eq!(MaxCurrent::from_raw(1), MaxCurrent::Limit(1));
        assert_eq!(MaxCurrent::from_raw(100_000), MaxCurrent::Limit(u16::MAX));
        assert_eq!(MaxCurrent::Limit(3200).limit_ma(), Some(3200));
        assert_eq!(MaxCurrent::Auto.limit_ma(), None);
    }
}
