//! Task configuration form
//!
//! Describes the six selectors the host renders for the task and turns a submitted form back
//! into a validated [`TaskConfig`]. Rendering the form is left to the host.

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigField};
use super::settings::*;

pub const ADDRESS_FIELD_ID: &str = "plugin_027_addr";
pub const CURRENT_FIELD_ID: &str = "plugin_027_amp";
pub const VOLTAGE_FIELD_ID: &str = "plugin_027_volt";
pub const SLOT_FIELD_IDS: [&str; SLOT_COUNT] = ["plugin_027_p1", "plugin_027_p2", "plugin_027_p3"];
pub const FORM_FIELD_COUNT: usize = 6;

const BUS_NOTE: &str = "Enable <a href='pinout'>I2C bus</a> first, than <a href='i2cscanner'>search for the used address</a>!";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SelectOption {
    pub label: &'static str,
    pub value: i32,
}

const fn option(label: &'static str, value: i32) -> SelectOption {
    SelectOption { label, value }
}

pub const ADDRESS_OPTIONS: [SelectOption; 4] = [
    option("0x40", 0x40),
    option("0x41", 0x41),
    option("0x44", 0x44),
    option("0x45", 0x45),
];

pub const CURRENT_OPTIONS: [SelectOption; 8] = [
    option("AUTO", 0),
    option("200", 200),
    option("400", 400),
    option("800", 800),
    option("1000", 1000),
    option("1600", 1600),
    option("2000", 2000),
    option("3200", 3200),
];

pub const VOLTAGE_OPTIONS: [SelectOption; 2] = [option("32", 1), option("16", 0)];

pub const SLOT_OPTIONS: [SelectOption; 4] = [
    option("None", 0),
    option("Voltage", 1),
    option("Current", 2),
    option("Power", 3),
];

/// A single selector of the configuration form.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FormField {
    pub label: &'static str,
    pub id: &'static str,
    pub options: &'static [SelectOption],
    pub selected: i32,
    pub unit: Option<&'static str>,
    pub note: Option<&'static str>,
}

impl FormField {
    const fn selector(
        label: &'static str,
        id: &'static str,
        options: &'static [SelectOption],
        selected: i32,
    ) -> Self {
        Self {
            label,
            id,
            options,
            selected,
            unit: None,
            note: None,
        }
    }

    const fn with_unit(mut self, unit: &'static str) -> Self {
        self.unit = Some(unit);
        self
    }

    const fn with_note(mut self, note: &'static str) -> Self {
        self.note = Some(note);
        self
    }

    /// Label of the currently selected option, if the stored value is one of the options.
    pub fn selected_label(&self) -> Option<&'static str> {
        self.options
            .iter()
            .find(|option| option.value == self.selected)
            .map(|option| option.label)
    }
}

/// Builds the form description with every selector preset from `config`.
pub fn load_form(config: &TaskConfig) -> [FormField; FORM_FIELD_COUNT] {
    let raw = config.to_raw();
    [
        FormField::selector("I2C address", ADDRESS_FIELD_ID, &ADDRESS_OPTIONS, raw[0])
            .with_note(BUS_NOTE),
        FormField::selector("Maximum current", CURRENT_FIELD_ID, &CURRENT_OPTIONS, raw[1])
            .with_unit("mA"),
        FormField::selector("Max voltage", VOLTAGE_FIELD_ID, &VOLTAGE_OPTIONS, raw[2])
            .with_unit("V"),
        FormField::selector("Param1", SLOT_FIELD_IDS[0], &SLOT_OPTIONS, raw[3]),
        FormField::selector("Param2", SLOT_FIELD_IDS[1], &SLOT_OPTIONS, raw[4]),
        FormField::selector("Param3", SLOT_FIELD_IDS[2], &SLOT_OPTIONS, raw[5]),
    ]
}

/// Submitted form values. A missing field falls back to its default on conversion.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct TaskConfigForm {
    #[serde(rename = "plugin_027_addr")]
    pub address: Option<i32>,
    #[serde(rename = "plugin_027_amp")]
    pub max_current: Option<i32>,
    #[serde(rename = "plugin_027_volt")]
    pub voltage_range: Option<i32>,
    #[serde(rename = "plugin_027_p1")]
    pub slot1: Option<i32>,
    #[serde(rename = "plugin_027_p2")]
    pub slot2: Option<i32>,
    #[serde(rename = "plugin_027_p3")]
    pub slot3: Option<i32>,
}

impl TaskConfigForm {
    pub const fn new() -> Self {
        Self {
            address: None,
            max_current: None,
            voltage_range: None,
            slot1: None,
            slot2: None,
            slot3: None,
        }
    }

    /// Parses a JSON object keyed by the field ids.
    pub fn from_json(json: &[u8]) -> Result<Self, ConfigError> {
        serde_json_core::from_slice::<Self>(json)
            .map(|(form, _)| form)
            .map_err(|_| ConfigError::Json)
    }

    /// Collects url-encoded style `(id, value)` pairs. Unknown ids are ignored.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut form = Self::new();
        for (id, value) in pairs {
            form.set_field(id, value)?;
        }
        Ok(form)
    }

    /// Sets one field from its submitted text. An empty value leaves the field unset.
    pub fn set_field(&mut self, id: &str, value: &str) -> Result<(), ConfigError> {
        let (slot, field) = match id {
            ADDRESS_FIELD_ID => (&mut self.address, ConfigField::Address),
            CURRENT_FIELD_ID => (&mut self.max_current, ConfigField::MaxCurrent),
            VOLTAGE_FIELD_ID => (&mut self.voltage_range, ConfigField::VoltageRange),
            id if id == SLOT_FIELD_IDS[0] => (&mut self.slot1, ConfigField::Slot(1)),
            id if id == SLOT_FIELD_IDS[1] => (&mut self.slot2, ConfigField::Slot(2)),
            id if id == SLOT_FIELD_IDS[2] => (&mut self.slot3, ConfigField::Slot(3)),
            _ => return Ok(()),
        };

        let value = value.trim();
        *slot = if value.is_empty() {
            None
        } else {
            Some(
                value
                    .parse::<i32>()
                    .map_err(|_| ConfigError::InvalidNumber(field))?,
            )
        };
        Ok(())
    }
}

impl From<&TaskConfig> for TaskConfigForm {
    fn from(config: &TaskConfig) -> Self {
        let raw = config.to_raw();
        Self {
            address: Some(raw[0]),
            max_current: Some(raw[1]),
            voltage_range: Some(raw[2]),
            slot1: Some(raw[3]),
            slot2: Some(raw[4]),
            slot3: Some(raw[5]),
        }
    }
}

fn select(
    field: ConfigField,
    submitted: Option<i32>,
    default: i32,
    options: &[SelectOption],
) -> Result<i32, ConfigError> {
    let value = submitted.unwrap_or(default);
    if options.iter().any(|option| option.value == value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidSelection(field, value))
    }
}

impl TryFrom<&TaskConfigForm> for TaskConfig {
    type Error = ConfigError;

    fn try_from(form: &TaskConfigForm) -> Result<Self, Self::Error> {
        let defaults = TaskConfig::default().to_raw();
        let raw: RawTaskConfig = [
            select(ConfigField::Address, form.address, defaults[0], &ADDRESS_OPTIONS)?,
            select(ConfigField::MaxCurrent, form.max_current, defaults[1], &CURRENT_OPTIONS)?,
            select(ConfigField::VoltageRange, form.voltage_range, defaults[2], &VOLTAGE_OPTIONS)?,
            select(ConfigField::Slot(1), form.slot1, defaults[3], &SLOT_OPTIONS)?,
            select(ConfigField::Slot(2), form.slot2, defaults[4], &SLOT_OPTIONS)?,
            select(ConfigField::Slot(3), form.slot3, defaults[5], &SLOT_OPTIONS)?,
        ];
        TaskConfig::try_from(raw)
    }
}

impl TryFrom<TaskConfigForm> for TaskConfig {
    type Error = ConfigError;

    fn try_from(form: TaskConfigForm) -> Result<Self, Self::Error> {
        Self::try_from(&form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_reflects_stored_config() {
        let config = TaskConfig {
            i2c_address: 0x44,
            max_current: MaxCurrent::Limit(1600),
            voltage_range: VoltageRange::Range16V,
            slots: [SlotKind::Power, SlotKind::Current, SlotKind::None],
        };
        let form = load_form(&config);

        assert_eq!(form.len(), FORM_FIELD_COUNT);
        assert_eq!(form[0].id, ADDRESS_FIELD_ID);
        assert_eq!(form[0].selected_label(), Some("0x44"));
        assert!(form[0].note.is_some());
        assert_eq!(form[1].selected_label(), Some("1600"));
        assert_eq!(form[1].unit, Some("mA"));
        assert_eq!(form[2].selected_label(), Some("16"));
        assert_eq!(form[2].unit, Some("V"));
        assert_eq!(form[3].selected_label(), Some("Power"));
        assert_eq!(form[4].selected_label(), Some("Current"));
        assert_eq!(form[5].selected_label(), Some("None"));
        assert_eq!(form[5].label, "Param3");
    }

    #[test]
    fn voltage_options_list_32v_first() {
        assert_eq!(VOLTAGE_OPTIONS[0], SelectOption { label: "32", value: 1 });
        assert_eq!(VOLTAGE_OPTIONS[1], SelectOption { label: "16", value: 0 });
    }

    #[test]
    fn empty_submission_yields_defaults() {
        let form = TaskConfigForm::from_pairs([
            (ADDRESS_FIELD_ID, ""),
            (CURRENT_FIELD_ID, ""),
            (VOLTAGE_FIELD_ID, " "),
        ])
        .unwrap();
        let config = TaskConfig::try_from(&form).unwrap();
        assert_eq!(config, TaskConfig::default());
        assert_eq!(config.arity(), Arity::Single);
    }

    #[test]
    fn pairs_submission_is_parsed() {
        let form = TaskConfigForm::from_pairs([
            (ADDRESS_FIELD_ID, "69"),
            (CURRENT_FIELD_ID, "400"),
            (VOLTAGE_FIELD_ID, "0"),
            ("plugin_027_p1", "1"),
            ("plugin_027_p2", "2"),
            ("plugin_027_p3", "3"),
            ("taskdevicename", "ina"),
        ])
        .unwrap();
        let config = TaskConfig::try_from(form).unwrap();
        assert_eq!(config.i2c_address, 0x45);
        assert_eq!(config.max_current, MaxCurrent::Limit(400));
        assert_eq!(config.voltage_range, VoltageRange::Range16V);
        assert_eq!(
            config.slots,
            [SlotKind::Voltage, SlotKind::Current, SlotKind::Power]
        );
        assert_eq!(config.arity(), Arity::Triple);
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        assert_eq!(
            TaskConfigForm::from_pairs([(CURRENT_FIELD_ID, "lots")]),
            Err(ConfigError::InvalidNumber(ConfigField::MaxCurrent))
        );
    }

    #[test]
    fn value_outside_options_is_rejected() {
        let form = TaskConfigForm {
            address: Some(0x42),
            ..TaskConfigForm::new()
        };
        assert_eq!(
            TaskConfig::try_from(&form),
            Err(ConfigError::InvalidSelection(ConfigField::Address, 0x42))
        );

        let form = TaskConfigForm {
            slot2: Some(4),
            ..TaskConfigForm::new()
        };
        assert_eq!(
            TaskConfig::try_from(&form),
            Err(ConfigError::InvalidSelection(ConfigField::Slot(2), 4))
        );
    }

    #[test]
    fn json_submission_is_parsed() {
        let json = br#"{"plugin_027_addr":65,"plugin_027_p2":3,"plugin_027_p3":null}"#;
        let form = TaskConfigForm::from_json(json).unwrap();
        assert_eq!(form.address, Some(0x41));
        assert_eq!(form.slot2, Some(3));
        assert_eq!(form.slot3, None);

        let config = TaskConfig::try_from(&form).unwrap();
        assert_eq!(config.i2c_address, 0x41);
        assert_eq!(
            config.slots,
            [SlotKind::Voltage, SlotKind::Power, SlotKind::None]
        );
        assert_eq!(config.arity(), Arity::Dual);

        assert_eq!(
            TaskConfigForm::from_json(b"{\"plugin_027_addr\":"),
            Err(ConfigError::Json)
        );
    }

    #[test]
    fn stored_config_fills_the_form() {
        let config = TaskConfig {
            slots: [SlotKind::Current, SlotKind::None, SlotKind::None],
            ..TaskConfig::default()
        };
        let form = TaskConfigForm::from(&config);
        assert_eq!(TaskConfig::try_from(&form), Ok(config));
    }
}
