use core::cell::{Cell, RefCell};

use defmt_or_log as log;
use embedded_hal::i2c::Error as _;
use portable_atomic::{AtomicBool, Ordering};

use super::data_model::*;
use super::driver::*;
use super::error::SensorError;
use super::read_guard::ReadGuard;
use crate::configuration::{
    Arity, ConfigError, FORM_FIELD_COUNT, FormField, TaskConfig, TaskConfigForm, load_form,
};
use crate::host::{TaskHost, find_i2c_bus};
use crate::plugin_info::PLUGIN_INFO;
use crate::units::{MilliExt, TimeExt};

/// Default task interval, in seconds.
pub const DEFAULT_INTERVAL_S: u32 = 60;

/// One configured INA219 task of the host.
///
/// Initialization needs exclusive access. Sampling runs through a shared reference, guarded by
/// an atomic in-progress flag, so an overlapping read is rejected instead of queued.
pub struct Ina219Task<C: PowerMonitorConnector> {
    connector: C,
    config: TaskConfig,
    arity: Arity,
    enabled: bool,
    initialized: bool,
    interval_s: u32,
    monitor: RefCell<Option<C::Monitor>>,
    read_in_progress: AtomicBool,
    last_served_ms: Cell<u64>,
}

impl<C: PowerMonitorConnector> Ina219Task<C> {
    pub fn new(connector: C, config: TaskConfig) -> Self {
        Self {
            connector,
            arity: config.arity(),
            config,
            enabled: true,
            initialized: false,
            interval_s: DEFAULT_INTERVAL_S,
            monitor: RefCell::new(None),
            read_in_progress: AtomicBool::new(false),
            last_served_ms: Cell::new(0),
        }
    }

    pub fn with_interval(mut self, interval_s: u32) -> Self {
        self.interval_s = interval_s;
        self
    }

    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    /// Replaces the config and returns the recomputed arity. Takes effect on the next init.
    pub fn set_config(&mut self, config: TaskConfig) -> Arity {
        self.config = config;
        self.arity = config.arity();
        self.arity
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Names of the values this task reports, for the host's value list.
    pub fn value_names(&self) -> &'static [&'static str] {
        PLUGIN_INFO.active_value_names(self.arity)
    }

    pub fn interval_s(&self) -> u32 {
        self.interval_s
    }

    pub fn set_interval(&mut self, interval_s: u32) {
        self.interval_s = interval_s;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_reading(&self) -> bool {
        self.read_in_progress.load(Ordering::Acquire)
    }

    /// Host time of the last served read cycle.
    pub fn last_served_ms(&self) -> u64 {
        self.last_served_ms.get()
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// (Re)initializes the task, optionally changing its enabled state first.
    ///
    /// Returns whether a new sensor handle is ready. Failures are logged and leave the task
    /// uninitialized.
    pub fn init<H: TaskHost + ?Sized>(&mut self, host: &H, enable: Option<bool>) -> bool {
        match self.try_init(host, enable) {
            Ok(()) => {
                log::info!(
                    "INA219 initialized at {:#04x}, {}V range",
                    self.config.i2c_address,
                    self.config.voltage_range.volts()
                );
            }
            Err(SensorError::Disabled) => log::debug!("INA219 task disabled"),
            Err(SensorError::AddressRejected(address)) => {
                log::debug!("INA219 address {:#04x} not usable", address);
            }
            Err(SensorError::BusUnavailable) => {
                log::warn!("INA219: no usable and enabled I2C bus");
            }
            Err(e) => {
                log::error!("INA219 can not be initialized: {:?}", e);
            }
        }
        self.initialized
    }

    /// Same as [`init`](Self::init) but reports why no handle was opened.
    ///
    /// Any previous sensor handle is dropped first.
    pub fn try_init<H: TaskHost + ?Sized>(
        &mut self,
        host: &H,
        enable: Option<bool>,
    ) -> Result<(), SensorError> {
        if let Some(enable) = enable {
            self.enabled = enable;
        }
        self.initialized = false;
        *self.monitor.get_mut() = None;

        if !self.enabled {
            return Err(SensorError::Disabled);
        }

        let monitor = self.open_monitor(host)?;
        *self.monitor.get_mut() = Some(monitor);
        self.initialized = true;
        Ok(())
    }

    /// Seconds until the first read after init: two seconds early unless the interval is short.
    fn first_read_delay_s(&self) -> u32 {
        if self.interval_s > 2 {
            self.interval_s - 2
        } else {
            self.interval_s
        }
    }

    fn open_monitor<H: TaskHost + ?Sized>(&mut self, host: &H) -> Result<C::Monitor, SensorError> {
        let bus = find_i2c_bus(host).ok_or(SensorError::BusUnavailable)?;

        self.last_served_ms.set(
            host.millis()
                .saturating_sub(self.first_read_delay_s().s_to_ms()),
        );

        if !self.config.has_usable_address() {
            return Err(SensorError::AddressRejected(self.config.i2c_address));
        }

        let settings = SensorSettings::new(bus, &self.config);
        log::debug!(
            "Opening INA219 on bus {} at {:#04x}",
            settings.bus,
            settings.address
        );

        let mut monitor = self.connector.connect(&settings).map_err(|e| {
            log::error!(
                "INA219 connect error: {:?}",
                defmt_or_log::Debug2Format(&e)
            );
            SensorError::Construction(e.kind())
        })?;

        monitor.configure(settings.voltage_range).map_err(|e| {
            log::error!(
                "INA219 configure error: {:?}",
                defmt_or_log::Debug2Format(&e)
            );
            SensorError::Construction(e.kind())
        })?;

        Ok(monitor)
    }

    /// Host read hook. Returns whether a read cycle ran.
    pub fn read<H: TaskHost + ?Sized>(&self, host: &mut H) -> bool {
        self.sample(host).is_some()
    }

    /// Runs one read cycle and reports what it produced.
    ///
    /// Returns `None` when the task is disabled, uninitialized or already reading. Values are
    /// stored slot by slot; an error stops the cycle but keeps what was already stored. Data is
    /// sent only when a current or power value was read and the cycle completed.
    pub fn sample<H: TaskHost + ?Sized>(&self, host: &mut H) -> Option<SampleResult> {
        if !self.enabled || !self.initialized {
            return None;
        }
        let Some(_guard) = ReadGuard::acquire(&self.read_in_progress) else {
            log::debug!("INA219 read already in progress");
            return None;
        };

        let mut result = self.read_slots(host);
        if result.has_non_voltage_reading() {
            host.send_data();
            result.dispatched = true;
        }
        self.last_served_ms.set(host.millis());

        Some(result)
    }

    fn read_slots<H: TaskHost + ?Sized>(&self, host: &mut H) -> SampleResult {
        let mut result = SampleResult::new();

        let Ok(mut monitor) = self.monitor.try_borrow_mut() else {
            result.error = Some(SensorError::NotInitialized);
            return result;
        };
        let Some(monitor) = monitor.as_mut() else {
            result.error = Some(SensorError::NotInitialized);
            return result;
        };

        for (slot, kind) in (1..).zip(self.config.slots) {
            let Some(quantity) = kind.quantity() else {
                continue;
            };

            match measure(monitor, quantity) {
                Ok(value) => {
                    host.set_value(slot, value, false);
                    // Capacity matches the slot count.
                    let _ = result.values.push(Measurement {
                        slot,
                        quantity,
                        value,
                    });
                }
                Err(e) => {
                    log::error!(
                        "INA219: slot {} read error: {:?}",
                        slot,
                        defmt_or_log::Debug2Format(&e)
                    );
                    result.error = Some(SensorError::Read {
                        slot,
                        kind: e.kind(),
                    });
                    break;
                }
            }
        }

        result
    }

    /// Form description preset from the current config.
    pub fn load_form(&self) -> [FormField; FORM_FIELD_COUNT] {
        load_form(&self.config)
    }

    /// Applies a submitted form. On error the current config is kept.
    pub fn save_form(&mut self, form: &TaskConfigForm) -> Result<Arity, ConfigError> {
        match TaskConfig::try_from(form) {
            Ok(config) => Ok(self.set_config(config)),
            Err(e) => {
                log::warn!("INA219 config rejected: {:?}", e);
                Err(e)
            }
        }
    }
}

fn measure<M: PowerMonitor>(monitor: &mut M, quantity: Quantity) -> Result<f32, M::Error> {
    match quantity {
        Quantity::Voltage => monitor.supply_voltage(),
        Quantity::Current => monitor.current().map(MilliExt::from_milli),
        Quantity::Power => monitor.power().map(MilliExt::from_milli),
    }
}
