mod error;
mod form;
mod settings;
pub mod storage;

pub use error::{ConfigError, ConfigField};
pub use form::{
    ADDRESS_FIELD_ID, ADDRESS_OPTIONS, CURRENT_FIELD_ID, CURRENT_OPTIONS, FORM_FIELD_COUNT,
    FormField, SLOT_FIELD_IDS, SLOT_OPTIONS, SelectOption, TaskConfigForm, VOLTAGE_FIELD_ID,
    VOLTAGE_OPTIONS, load_form,
};
pub use settings::{
    ADDRESS_FLOOR, ALLOWED_ADDRESSES, Arity, CURRENT_LIMITS_MA, DEFAULT_ADDRESS, MaxCurrent,
    RAW_CONFIG_LEN, RawTaskConfig, SLOT_COUNT, SlotKind, TaskConfig, VoltageRange,
};
pub use storage::StorageError;
