use core::fmt;

/// Form field a configuration error refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigField {
    Address,
    MaxCurrent,
    VoltageRange,
    Slot(u8),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The value does not fit a 7-bit I2C address.
    InvalidAddress(i32),
    /// The submitted value is not an integer.
    InvalidNumber(ConfigField),
    /// The submitted value is not one of the offered options.
    InvalidSelection(ConfigField, i32),
    /// The JSON submission could not be parsed.
    Json,
}

impl ConfigError {
    pub fn description(&self) -> &'static str {
        match self {
            ConfigError::InvalidAddress(_) => "Invalid I2C address",
            ConfigError::InvalidNumber(_) => "Submitted value is not a number",
            ConfigError::InvalidSelection(..) => "Submitted value is not an offered option",
            ConfigError::Json => "Malformed form submission",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigField::Address => f.write_str("I2C address"),
            ConfigField::MaxCurrent => f.write_str("maximum current"),
            ConfigField::VoltageRange => f.write_str("max voltage"),
            ConfigField::Slot(n) => write!(f, "param{}", n),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidAddress(value) => write!(f, "{}: {}", self.description(), value),
            ConfigError::InvalidNumber(field) => write!(f, "{} ({})", self.description(), field),
            ConfigError::InvalidSelection(field, value) => {
                write!(f, "{} ({} = {})", self.description(), field, value)
            }
            ConfigError::Json => f.write_str(self.description()),
        }
    }
}

impl core::error::Error for ConfigError {}
