use core::fmt;

use crc::{CRC_32_ISCSI, Crc};
use defmt_or_log as log;

use super::settings::TaskConfig;

/// Upper bound of an encoded config: six varints of up to five bytes plus the checksum.
pub const STORAGE_SIZE: usize = 6 * 5 + 4;

static CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    Serialization,
    Deserialization,
}

impl StorageError {
    pub fn description(&self) -> &'static str {
        match self {
            StorageError::Serialization => "Can't serialize task config",
            StorageError::Deserialization => "Stored task config is corrupted",
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl core::error::Error for StorageError {}

/// Encodes `config` into `buffer` followed by a CRC-32 and returns the used part.
pub fn save<'b>(config: &TaskConfig, buffer: &'b mut [u8]) -> Result<&'b mut [u8], StorageError> {
    let used = postcard::to_slice_crc32(config, buffer, CRC.digest())
        .map_err(|_| StorageError::Serialization)?;

    log::debug!("Task config encoded into {} bytes", used.len());
    Ok(used)
}

/// Decodes a config previously written by [`save`], verifying the checksum.
pub fn load(buffer: &[u8]) -> Result<TaskConfig, StorageError> {
    postcard::from_bytes_crc32::<TaskConfig>(buffer, CRC.digest())
        .map_err(|_| StorageError::Deserialization)
}

/// Loads the stored config, falling back to defaults when the data can't be used.
pub fn load_or_default(buffer: &[u8]) -> TaskConfig {
    match load(buffer) {
        Ok(config) => config,
        Err(error) => {
            log::error!(
                "Can't load task config from storage: {:?}. Using default settings.",
                error
            );
            TaskConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::{MaxCurrent, SlotKind, VoltageRange};

    fn sample_config() -> TaskConfig {
        TaskConfig {
            i2c_address: 0x41,
            max_current: MaxCurrent::Limit(3200),
            voltage_range: VoltageRange::Range16V,
            slots: [SlotKind::Current, SlotKind::Power, SlotKind::Voltage],
        }
    }

    #[test]
    fn stored_config_loads_back() {
        let mut buffer = [0u8; STORAGE_SIZE];
        let used = save(&sample_config(), &mut buffer).unwrap().len();
        assert!(used <= STORAGE_SIZE);
        assert_eq!(load(&buffer[..used]), Ok(sample_config()));
    }

    #[test]
    fn corrupted_data_is_rejected() {
        let mut buffer = [0u8; STORAGE_SIZE];
        let used = save(&sample_config(), &mut buffer).unwrap().len();
        buffer[0] ^= 0x01;
        assert_eq!(
            load(&buffer[..used]),
            Err(StorageError::Deserialization)
        );
        assert_eq!(load_or_default(&buffer[..used]), TaskConfig::default());
    }

    #[test]
    fn small_buffer_fails_to_serialize() {
        let mut buffer = [0u8; 4];
        assert_eq!(
            save(&sample_config(), &mut buffer).map(|used| used.len()),
            Err(StorageError::Serialization)
        );
    }

    #[test]
    fn empty_storage_falls_back_to_defaults() {
        assert_eq!(load_or_default(&[]), TaskConfig::default());
    }
}
