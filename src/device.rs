//! High-level driver API for the MAX1704x
//!
//! [`Max1704xDriver`] wraps the generated register device and interprets
//! register contents according to the configured [`DeviceVariant`]. Nothing
//! is cached: every call goes to the bus.
//!
//! Features missing on MAX17043/44 return [`Error::Unsupported`] before any
//! bus transaction.

use crate::alert::{
    athd_to_threshold, reset_voltage_code_to_volts, reset_voltage_volts_to_code,
    threshold_to_athd, valrt_code_to_volts, valrt_volts_to_code, StatusFlag, StatusFlags,
    MAX_RESET_VOLTAGE_CODE,
};
use crate::measurement::{charge_rate_to_percent_per_hour, soc_to_percent, vcell_to_volts};
use crate::power::{
    active_threshold_code_to_volts, active_threshold_volts_to_code,
    hibernate_threshold_code_to_percent, hibernate_threshold_percent_to_code, ModeChange,
};
use crate::registers::{
    RegisterDevice, COMMAND_POWER_ON_RESET, HIBRT_ALWAYS_HIBERNATE, HIBRT_NEVER_HIBERNATE,
};
use crate::variant::{Capability, DeviceVariant};
use crate::{Error, VERSION_ID_BIT};

// Only import the blocking traits when not using async feature
#[cfg(not(feature = "async"))]
use crate::interface::DeviceProbe;
#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

#[cfg(feature = "async")]
use crate::interface::AsyncDeviceProbe;

/// Main driver for the MAX1704x fuel gauges
pub struct Max1704xDriver<I> {
    device: RegisterDevice<I>,
    variant: DeviceVariant,
}

impl<I> Max1704xDriver<I> {
    /// Create a new driver for the given variant
    ///
    /// No bus traffic happens here. Call `begin()` to check the device is
    /// present.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let interface = I2cInterface::new(i2c);
    /// let mut gauge = Max1704xDriver::new(interface, DeviceVariant::Max17048);
    /// gauge.begin()?;
    /// ```
    pub fn new(interface: I, variant: DeviceVariant) -> Self {
        Self {
            device: RegisterDevice::new(interface),
            variant,
        }
    }

    /// The configured device variant
    pub const fn variant(&self) -> DeviceVariant {
        self.variant
    }

    /// Change the device variant
    ///
    /// Scaling and capability checks follow the new variant from the next
    /// call on.
    pub fn set_variant(&mut self, variant: DeviceVariant) {
        self.variant = variant;
    }

    /// Full-scale VCELL voltage for the configured variant
    pub const fn full_scale(&self) -> f32 {
        self.variant.full_scale()
    }

    /// Consume the driver and return the underlying interface
    pub fn release(self) -> I {
        self.device.interface
    }

    /// Get a reference to the underlying register device (for advanced usage)
    pub const fn device(&self) -> &RegisterDevice<I> {
        &self.device
    }

    /// Fail with [`Error::Unsupported`] unless the variant has `capability`
    fn require<E>(&self, capability: Capability) -> Result<(), Error<E>> {
        if self.variant.supports(capability) {
            Ok(())
        } else {
            #[cfg(feature = "defmt")]
            defmt::debug!("{} lacks {}", self.variant, capability);
            Err(Error::Unsupported)
        }
    }
}

#[cfg(not(feature = "async"))]
impl<I> Max1704xDriver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Check whether a MAX1704x answers on the bus
    ///
    /// Probes address 0x36, then reads VERSION. On MAX17048/49 the version
    /// must have bit 4 set, which rules out other parts at the same address.
    ///
    /// # Errors
    ///
    /// Returns an error if the VERSION read fails after the device
    /// acknowledged its address.
    pub fn is_connected(&mut self) -> Result<bool, Error<I::Error>>
    where
        I: DeviceProbe,
    {
        if !self.device.interface.probe() {
            #[cfg(feature = "defmt")]
            defmt::debug!("No ACK at 0x36");
            return Ok(false);
        }

        let version = self.read_version()?;
        if self.variant.supports(Capability::VersionCheck) && version & VERSION_ID_BIT == 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("Unexpected VERSION {=u16:#x} for {}", version, self.variant);
            return Ok(false);
        }

        Ok(true)
    }

    /// Verify the device is present before first use
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] if [`is_connected`](Self::is_connected)
    /// reports `false`, or a bus error from the VERSION read.
    pub fn begin(&mut self) -> Result<(), Error<I::Error>>
    where
        I: DeviceProbe,
    {
        if !self.is_connected()? {
            return Err(Error::NotConnected);
        }

        #[cfg(feature = "defmt")]
        defmt::info!("{} connected", self.variant);

        Ok(())
    }

    /// Restart fuel-gauge calculations
    ///
    /// Writes the quick-start bit to MODE. Use only when the cell voltage is
    /// known to be settled, as a bad starting point skews SOC for hours.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn quick_start(&mut self) -> Result<(), Error<I::Error>> {
        self.device.mode().write(|w| {
            w.set_quick_start(true);
        })?;
        Ok(())
    }

    /// Read the cell voltage in volts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_voltage(&mut self) -> Result<f32, Error<I::Error>> {
        let reg = self.device.vcell().read()?;
        Ok(vcell_to_volts(reg.voltage(), self.variant))
    }

    /// Read the state of charge in percent
    ///
    /// The IC may report slightly above 100% right after charging.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_soc(&mut self) -> Result<f32, Error<I::Error>> {
        let reg = self.device.soc().read()?;
        Ok(soc_to_percent(reg.percent(), reg.fraction()))
    }

    /// Read the production version
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_version(&mut self) -> Result<u16, Error<I::Error>> {
        let reg = self.device.version().read()?;
        Ok(reg.version())
    }

    /// Read the factory ID byte (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn read_id(&mut self) -> Result<u8, Error<I::Error>> {
        self.require(Capability::ResetVoltage)?;
        let reg = self.device.vreset_id().read()?;
        Ok(reg.id())
    }

    /// Read the charge rate in %/hr (MAX17048/49)
    ///
    /// Positive while charging, negative while discharging.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn read_change_rate(&mut self) -> Result<f32, Error<I::Error>> {
        self.require(Capability::ChargeRate)?;
        let reg = self.device.charge_rate().read()?;
        Ok(charge_rate_to_percent_per_hour(reg.rate()))
    }

    /// Read the raw 7-bit reset voltage code (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn read_reset_voltage_threshold(&mut self) -> Result<u8, Error<I::Error>> {
        self.require(Capability::ResetVoltage)?;
        let reg = self.device.vreset_id().read()?;
        Ok(reg.vreset())
    }

    /// Read the reset voltage threshold in volts (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn read_reset_voltage_volts(&mut self) -> Result<f32, Error<I::Error>> {
        let code = self.read_reset_voltage_threshold()?;
        Ok(reset_voltage_code_to_volts(code))
    }

    /// Set the reset voltage threshold from a raw code (MAX17048/49)
    ///
    /// 40 mV per LSB. The comparator disable bit and ID byte are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44,
    /// [`Error::InvalidArgument`] if `code` exceeds 127, or a bus error.
    pub fn set_reset_voltage_threshold(&mut self, code: u8) -> Result<(), Error<I::Error>> {
        self.require(Capability::ResetVoltage)?;
        if code > MAX_RESET_VOLTAGE_CODE {
            return Err(Error::InvalidArgument);
        }

        self.device.vreset_id().modify(|w| {
            w.set_vreset(code);
        })?;
        Ok(())
    }

    /// Set the reset voltage threshold in volts (MAX17048/49)
    ///
    /// Clamped to 0 - 5.08 V and truncated to 40 mV steps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn set_reset_voltage_volts(&mut self, volts: f64) -> Result<(), Error<I::Error>> {
        self.set_reset_voltage_threshold(reset_voltage_volts_to_code(volts))
    }

    /// Enable the reset voltage comparator (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn enable_comparator(&mut self) -> Result<(), Error<I::Error>> {
        self.require(Capability::ResetVoltage)?;
        self.device.vreset_id().modify(|w| {
            w.set_dis(false);
        })?;
        Ok(())
    }

    /// Disable the reset voltage comparator (MAX17048/49)
    ///
    /// Saves about 0.5 uA in hibernate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn disable_comparator(&mut self) -> Result<(), Error<I::Error>> {
        self.require(Capability::ResetVoltage)?;
        self.device.vreset_id().modify(|w| {
            w.set_dis(true);
        })?;
        Ok(())
    }

    /// Check whether the reset voltage comparator is enabled (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn is_comparator_enabled(&mut self) -> Result<bool, Error<I::Error>> {
        self.require(Capability::ResetVoltage)?;
        let reg = self.device.vreset_id().read()?;
        Ok(!reg.dis())
    }

    /// Read all STATUS flags (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn read_status(&mut self) -> Result<StatusFlags, Error<I::Error>> {
        self.require(Capability::Status)?;
        let reg = self.device.status().read()?;
        Ok(StatusFlags {
            reset_indicator: reg.ri(),
            voltage_high: reg.vh(),
            voltage_low: reg.vl(),
            voltage_reset: reg.vr(),
            soc_low: reg.hd(),
            soc_change: reg.sc(),
            voltage_reset_alert_enabled: reg.en_vr(),
        })
    }

    /// Clear the given STATUS flags (MAX17048/49)
    ///
    /// Only flags set in `flags` are cleared. `voltage_reset_alert_enabled`
    /// is a setting, not a flag, and is ignored here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn clear_status_flags(&mut self, flags: StatusFlags) -> Result<(), Error<I::Error>> {
        self.require(Capability::Status)?;
        self.device.status().modify(|w| {
            if flags.reset_indicator {
                w.set_ri(false);
            }
            if flags.voltage_high {
                w.set_vh(false);
            }
            if flags.voltage_low {
                w.set_vl(false);
            }
            if flags.voltage_reset {
                w.set_vr(false);
            }
            if flags.soc_low {
                w.set_hd(false);
            }
            if flags.soc_change {
                w.set_sc(false);
            }
        })?;
        Ok(())
    }

    /// Read one STATUS flag, optionally clearing it (MAX17048/49)
    ///
    /// STATUS is read once. If `clear` is set and the flag was set, a second
    /// read-modify-write clears only that flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn read_status_flag(
        &mut self,
        flag: StatusFlag,
        clear: bool,
    ) -> Result<bool, Error<I::Error>> {
        let set = self.read_status()?.contains(flag);
        if clear && set {
            self.clear_status_flags(StatusFlags::from(flag))?;
        }
        Ok(set)
    }

    /// RI: the IC was reset and needs configuring (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn is_reset(&mut self, clear: bool) -> Result<bool, Error<I::Error>> {
        self.read_status_flag(StatusFlag::ResetIndicator, clear)
    }

    /// VH: VCELL went above VALRT.MAX (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn is_voltage_high(&mut self, clear: bool) -> Result<bool, Error<I::Error>> {
        self.read_status_flag(StatusFlag::VoltageHigh, clear)
    }

    /// VL: VCELL went below VALRT.MIN (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn is_voltage_low(&mut self, clear: bool) -> Result<bool, Error<I::Error>> {
        self.read_status_flag(StatusFlag::VoltageLow, clear)
    }

    /// VR: a voltage reset was detected (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn is_voltage_reset(&mut self, clear: bool) -> Result<bool, Error<I::Error>> {
        self.read_status_flag(StatusFlag::VoltageReset, clear)
    }

    /// HD: SOC crossed the empty threshold (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn is_low(&mut self, clear: bool) -> Result<bool, Error<I::Error>> {
        self.read_status_flag(StatusFlag::SocLow, clear)
    }

    /// SC: SOC changed by at least 1% (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn is_change(&mut self, clear: bool) -> Result<bool, Error<I::Error>> {
        self.read_status_flag(StatusFlag::SocChange, clear)
    }

    /// Enable the voltage reset alert (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn enable_voltage_reset_alert(&mut self) -> Result<(), Error<I::Error>> {
        self.require(Capability::Status)?;
        self.device.status().modify(|w| {
            w.set_en_vr(true);
        })?;
        Ok(())
    }

    /// Disable the voltage reset alert (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn disable_voltage_reset_alert(&mut self) -> Result<(), Error<I::Error>> {
        self.require(Capability::Status)?;
        self.device.status().modify(|w| {
            w.set_en_vr(false);
        })?;
        Ok(())
    }

    /// Check whether the voltage reset alert is enabled (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn is_voltage_reset_alert_enabled(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(self.read_status()?.voltage_reset_alert_enabled)
    }

    /// Read the CONFIG.ALRT bit, optionally clearing it
    ///
    /// When `clear` is set and the bit was set, the CONFIG value just read is
    /// written back with ALRT cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_alert(&mut self, clear: bool) -> Result<bool, Error<I::Error>> {
        let config = self.device.config().read()?;
        let alert = config.alrt();

        if clear && alert {
            self.device.config().write(|w| {
                *w = config;
                w.set_alrt(false);
            })?;
        }

        Ok(alert)
    }

    /// Clear CONFIG.ALRT
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn clear_alert(&mut self) -> Result<(), Error<I::Error>> {
        self.device.config().modify(|w| {
            w.set_alrt(false);
        })?;
        Ok(())
    }

    /// Enable the 1% SOC change alert (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, [`Error::Verify`] if
    /// the bit did not stick, or a bus error.
    pub fn enable_soc_alert(&mut self) -> Result<(), Error<I::Error>> {
        self.set_soc_alert(true)
    }

    /// Disable the 1% SOC change alert (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, [`Error::Verify`] if
    /// the bit did not stick, or a bus error.
    pub fn disable_soc_alert(&mut self) -> Result<(), Error<I::Error>> {
        self.set_soc_alert(false)
    }

    fn set_soc_alert(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        self.require(Capability::SocAlert)?;
        self.device.config().modify(|w| {
            w.set_alsc(enable);
        })?;

        let readback = self.device.config().read()?;
        if readback.alsc() != enable {
            #[cfg(feature = "defmt")]
            defmt::warn!("CONFIG.ALSC readback mismatch, expected {}", enable);
            return Err(Error::Verify);
        }

        Ok(())
    }

    /// Check whether the 1% SOC change alert is enabled (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn is_soc_alert_enabled(&mut self) -> Result<bool, Error<I::Error>> {
        self.require(Capability::SocAlert)?;
        let reg = self.device.config().read()?;
        Ok(reg.alsc())
    }

    /// Check CONFIG.SLEEP
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn is_sleeping(&mut self) -> Result<bool, Error<I::Error>> {
        let reg = self.device.config().read()?;
        Ok(reg.sleep())
    }

    /// Read the empty alert threshold in percent (1 - 32)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_threshold(&mut self) -> Result<u8, Error<I::Error>> {
        let reg = self.device.config().read()?;
        Ok(athd_to_threshold(reg.athd()))
    }

    /// Set the empty alert threshold in percent
    ///
    /// ALRT asserts when SOC drops below this value. The other CONFIG fields
    /// are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `percent` is outside 1 - 32,
    /// or a bus error.
    pub fn set_threshold(&mut self, percent: u8) -> Result<(), Error<I::Error>> {
        let athd = threshold_to_athd(percent).ok_or(Error::InvalidArgument)?;
        self.device.config().modify(|w| {
            w.set_athd(athd);
        })?;
        Ok(())
    }

    /// Read the RCOMP compensation byte
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_compensation(&mut self) -> Result<u8, Error<I::Error>> {
        let reg = self.device.config().read()?;
        Ok(reg.rcomp())
    }

    /// Set the RCOMP compensation byte
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_compensation(&mut self, rcomp: u8) -> Result<(), Error<I::Error>> {
        self.device.config().modify(|w| {
            w.set_rcomp(rcomp);
        })?;
        Ok(())
    }

    /// Read VALRT.MAX as a raw code, 20 mV per LSB (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn read_valrt_max(&mut self) -> Result<u8, Error<I::Error>> {
        self.require(Capability::VoltageAlert)?;
        let reg = self.device.valrt().read()?;
        Ok(reg.max())
    }

    /// Read VALRT.MIN as a raw code, 20 mV per LSB (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn read_valrt_min(&mut self) -> Result<u8, Error<I::Error>> {
        self.require(Capability::VoltageAlert)?;
        let reg = self.device.valrt().read()?;
        Ok(reg.min())
    }

    /// Read VALRT.MAX in volts (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn read_valrt_max_volts(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(valrt_code_to_volts(self.read_valrt_max()?))
    }

    /// Read VALRT.MIN in volts (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn read_valrt_min_volts(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(valrt_code_to_volts(self.read_valrt_min()?))
    }

    /// Set VALRT.MAX from a raw code, keeping VALRT.MIN (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn set_valrt_max(&mut self, code: u8) -> Result<(), Error<I::Error>> {
        self.require(Capability::VoltageAlert)?;
        self.device.valrt().modify(|w| {
            w.set_max(code);
        })?;
        Ok(())
    }

    /// Set VALRT.MIN from a raw code, keeping VALRT.MAX (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn set_valrt_min(&mut self, code: u8) -> Result<(), Error<I::Error>> {
        self.require(Capability::VoltageAlert)?;
        self.device.valrt().modify(|w| {
            w.set_min(code);
        })?;
        Ok(())
    }

    /// Set VALRT.MAX in volts (MAX17048/49)
    ///
    /// Clamped to 0 - 5.1 V and truncated to 20 mV steps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn set_valrt_max_volts(&mut self, volts: f64) -> Result<(), Error<I::Error>> {
        self.set_valrt_max(valrt_volts_to_code(volts))
    }

    /// Set VALRT.MIN in volts (MAX17048/49)
    ///
    /// Clamped to 0 - 5.1 V and truncated to 20 mV steps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn set_valrt_min_volts(&mut self, volts: f64) -> Result<(), Error<I::Error>> {
        self.set_valrt_min(valrt_volts_to_code(volts))
    }

    /// Check MODE.HibStat (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn is_hibernating(&mut self) -> Result<bool, Error<I::Error>> {
        self.require(Capability::Hibernate)?;
        let reg = self.device.mode().read()?;
        Ok(reg.hib_stat())
    }

    /// Read the HIBRT active threshold, 1.25 mV per LSB (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn read_hibernate_active_threshold(&mut self) -> Result<u8, Error<I::Error>> {
        self.require(Capability::Hibernate)?;
        let reg = self.device.hibrt().read()?;
        Ok(reg.act_thr())
    }

    /// Read the HIBRT active threshold in volts (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn read_hibernate_active_threshold_volts(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(active_threshold_code_to_volts(self.read_hibernate_active_threshold()?))
    }

    /// Set the HIBRT active threshold from a raw code (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn set_hibernate_active_threshold(&mut self, code: u8) -> Result<(), Error<I::Error>> {
        self.require(Capability::Hibernate)?;
        self.device.hibrt().modify(|w| {
            w.set_act_thr(code);
        })?;
        Ok(())
    }

    /// Set the HIBRT active threshold in volts (MAX17048/49)
    ///
    /// Clamped to 0 - 0.31875 V and truncated to 1.25 mV steps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn set_hibernate_active_threshold_volts(
        &mut self,
        volts: f64,
    ) -> Result<(), Error<I::Error>> {
        self.set_hibernate_active_threshold(active_threshold_volts_to_code(volts))
    }

    /// Read the HIBRT hibernate threshold, 0.208 %/hr per LSB (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn read_hibernate_threshold(&mut self) -> Result<u8, Error<I::Error>> {
        self.require(Capability::Hibernate)?;
        let reg = self.device.hibrt().read()?;
        Ok(reg.hib_thr())
    }

    /// Read the HIBRT hibernate threshold in %/hr (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn read_hibernate_threshold_percent(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(hibernate_threshold_code_to_percent(self.read_hibernate_threshold()?))
    }

    /// Set the HIBRT hibernate threshold from a raw code (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn set_hibernate_threshold(&mut self, code: u8) -> Result<(), Error<I::Error>> {
        self.require(Capability::Hibernate)?;
        self.device.hibrt().modify(|w| {
            w.set_hib_thr(code);
        })?;
        Ok(())
    }

    /// Set the HIBRT hibernate threshold in %/hr (MAX17048/49)
    ///
    /// Clamped to 0 - 53.04 %/hr and truncated to 0.208 %/hr steps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn set_hibernate_threshold_percent(
        &mut self,
        percent_per_hour: f64,
    ) -> Result<(), Error<I::Error>> {
        self.set_hibernate_threshold(hibernate_threshold_percent_to_code(percent_per_hour))
    }

    /// Force hibernate mode by writing 0xFFFF to HIBRT (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn enable_hibernate(&mut self) -> Result<(), Error<I::Error>> {
        self.require(Capability::Hibernate)?;
        self.device.hibrt().write(|w| {
            w.set_act_thr(HIBRT_ALWAYS_HIBERNATE);
            w.set_hib_thr(HIBRT_ALWAYS_HIBERNATE);
        })?;
        Ok(())
    }

    /// Disable hibernate mode by writing 0x0000 to HIBRT (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub fn disable_hibernate(&mut self) -> Result<(), Error<I::Error>> {
        self.require(Capability::Hibernate)?;
        self.device.hibrt().write(|w| {
            w.set_act_thr(HIBRT_NEVER_HIBERNATE);
            w.set_hib_thr(HIBRT_NEVER_HIBERNATE);
        })?;
        Ok(())
    }

    /// Put the device to sleep
    ///
    /// On MAX17048/49 MODE.EnSleep is written first, otherwise CONFIG.SLEEP
    /// has no effect. Returns [`ModeChange::Unchanged`] if the device was
    /// already asleep.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn sleep(&mut self) -> Result<ModeChange, Error<I::Error>> {
        if self.variant.supports(Capability::EnSleep) {
            self.device.mode().write(|w| {
                w.set_en_sleep(true);
            })?;
        }

        let config = self.device.config().read()?;
        if config.sleep() {
            #[cfg(feature = "defmt")]
            defmt::debug!("sleep: already asleep");
            return Ok(ModeChange::Unchanged);
        }

        self.device.config().write(|w| {
            *w = config;
            w.set_sleep(true);
        })?;

        #[cfg(feature = "defmt")]
        defmt::debug!("sleep: entered sleep mode");

        Ok(ModeChange::Changed)
    }

    /// Wake the device from sleep
    ///
    /// On MAX17048/49 MODE is cleared afterwards, which also drops EnSleep.
    /// Returns [`ModeChange::Unchanged`] if the device was awake.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn wake(&mut self) -> Result<ModeChange, Error<I::Error>> {
        let config = self.device.config().read()?;
        if !config.sleep() {
            #[cfg(feature = "defmt")]
            defmt::debug!("wake: already awake");
            return Ok(ModeChange::Unchanged);
        }

        self.device.config().write(|w| {
            *w = config;
            w.set_sleep(false);
        })?;

        if self.variant.supports(Capability::EnSleep) {
            self.device.mode().write(|_| {})?;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("wake: left sleep mode");

        Ok(ModeChange::Changed)
    }

    /// Issue a power-on reset
    ///
    /// The IC resets before it can acknowledge the COMMAND write, so a bus
    /// error here is expected and ignored. All registers return to their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Never fails.
    pub fn reset(&mut self) -> Result<(), Error<I::Error>> {
        let result = self.device.command().write(|w| {
            w.set_command(COMMAND_POWER_ON_RESET);
        });

        if result.is_err() {
            #[cfg(feature = "defmt")]
            defmt::debug!("reset: COMMAND write not acknowledged");
        }

        Ok(())
    }
}

#[cfg(feature = "async")]
impl<I> Max1704xDriver<I>
where
    I: device_driver::AsyncRegisterInterface<AddressType = u8>,
{
    /// Check whether a MAX1704x answers on the bus
    ///
    /// Probes address 0x36, then reads VERSION. On MAX17048/49 the version
    /// must have bit 4 set, which rules out other parts at the same address.
    ///
    /// # Errors
    ///
    /// Returns an error if the VERSION read fails after the device
    /// acknowledged its address.
    pub async fn is_connected(&mut self) -> Result<bool, Error<I::Error>>
    where
        I: AsyncDeviceProbe,
    {
        if !self.device.interface.probe().await {
            #[cfg(feature = "defmt")]
            defmt::debug!("No ACK at 0x36");
            return Ok(false);
        }

        let version = self.read_version().await?;
        if self.variant.supports(Capability::VersionCheck) && version & VERSION_ID_BIT == 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("Unexpected VERSION {=u16:#x} for {}", version, self.variant);
            return Ok(false);
        }

        Ok(true)
    }

    /// Verify the device is present before first use
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] if [`is_connected`](Self::is_connected)
    /// reports `false`, or a bus error from the VERSION read.
    pub async fn begin(&mut self) -> Result<(), Error<I::Error>>
    where
        I: AsyncDeviceProbe,
    {
        if !self.is_connected().await? {
            return Err(Error::NotConnected);
        }

        #[cfg(feature = "defmt")]
        defmt::info!("{} connected", self.variant);

        Ok(())
    }

    /// Restart fuel-gauge calculations
    ///
    /// Writes the quick-start bit to MODE. Use only when the cell voltage is
    /// known to be settled, as a bad starting point skews SOC for hours.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn quick_start(&mut self) -> Result<(), Error<I::Error>> {
        self.device
            .mode()
            .write_async(|w| {
                w.set_quick_start(true);
            })
            .await?;
        Ok(())
    }

    /// Read the cell voltage in volts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_voltage(&mut self) -> Result<f32, Error<I::Error>> {
        let reg = self.device.vcell().read_async().await?;
        Ok(vcell_to_volts(reg.voltage(), self.variant))
    }

    /// Read the state of charge in percent
    ///
    /// The IC may report slightly above 100% right after charging.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_soc(&mut self) -> Result<f32, Error<I::Error>> {
        let reg = self.device.soc().read_async().await?;
        Ok(soc_to_percent(reg.percent(), reg.fraction()))
    }

    /// Read the production version
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_version(&mut self) -> Result<u16, Error<I::Error>> {
        let reg = self.device.version().read_async().await?;
        Ok(reg.version())
    }

    /// Read the factory ID byte (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn read_id(&mut self) -> Result<u8, Error<I::Error>> {
        self.require(Capability::ResetVoltage)?;
        let reg = self.device.vreset_id().read_async().await?;
        Ok(reg.id())
    }

    /// Read the charge rate in %/hr (MAX17048/49)
    ///
    /// Positive while charging, negative while discharging.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn read_change_rate(&mut self) -> Result<f32, Error<I::Error>> {
        self.require(Capability::ChargeRate)?;
        let reg = self.device.charge_rate().read_async().await?;
        Ok(charge_rate_to_percent_per_hour(reg.rate()))
    }

    /// Read the raw 7-bit reset voltage code (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn read_reset_voltage_threshold(&mut self) -> Result<u8, Error<I::Error>> {
        self.require(Capability::ResetVoltage)?;
        let reg = self.device.vreset_id().read_async().await?;
        Ok(reg.vreset())
    }

    /// Read the reset voltage threshold in volts (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn read_reset_voltage_volts(&mut self) -> Result<f32, Error<I::Error>> {
        let code = self.read_reset_voltage_threshold().await?;
        Ok(reset_voltage_code_to_volts(code))
    }

    /// Set the reset voltage threshold from a raw code (MAX17048/49)
    ///
    /// 40 mV per LSB. The comparator disable bit and ID byte are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44,
    /// [`Error::InvalidArgument`] if `code` exceeds 127, or a bus error.
    pub async fn set_reset_voltage_threshold(&mut self, code: u8) -> Result<(), Error<I::Error>> {
        self.require(Capability::ResetVoltage)?;
        if code > MAX_RESET_VOLTAGE_CODE {
            return Err(Error::InvalidArgument);
        }

        self.device
            .vreset_id()
            .modify_async(|w| {
                w.set_vreset(code);
            })
            .await?;
        Ok(())
    }

    /// Set the reset voltage threshold in volts (MAX17048/49)
    ///
    /// Clamped to 0 - 5.08 V and truncated to 40 mV steps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn set_reset_voltage_volts(&mut self, volts: f64) -> Result<(), Error<I::Error>> {
        self.set_reset_voltage_threshold(reset_voltage_volts_to_code(volts)).await
    }

    /// Enable the reset voltage comparator (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn enable_comparator(&mut self) -> Result<(), Error<I::Error>> {
        self.require(Capability::ResetVoltage)?;
        self.device
            .vreset_id()
            .modify_async(|w| {
                w.set_dis(false);
            })
            .await?;
        Ok(())
    }

    /// Disable the reset voltage comparator (MAX17048/49)
    ///
    /// Saves about 0.5 uA in hibernate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn disable_comparator(&mut self) -> Result<(), Error<I::Error>> {
        self.require(Capability::ResetVoltage)?;
        self.device
            .vreset_id()
            .modify_async(|w| {
                w.set_dis(true);
            })
            .await?;
        Ok(())
    }

    /// Check whether the reset voltage comparator is enabled (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn is_comparator_enabled(&mut self) -> Result<bool, Error<I::Error>> {
        self.require(Capability::ResetVoltage)?;
        let reg = self.device.vreset_id().read_async().await?;
        Ok(!reg.dis())
    }

    /// Read all STATUS flags (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn read_status(&mut self) -> Result<StatusFlags, Error<I::Error>> {
        self.require(Capability::Status)?;
        let reg = self.device.status().read_async().await?;
        Ok(StatusFlags {
            reset_indicator: reg.ri(),
            voltage_high: reg.vh(),
            voltage_low: reg.vl(),
            voltage_reset: reg.vr(),
            soc_low: reg.hd(),
            soc_change: reg.sc(),
            voltage_reset_alert_enabled: reg.en_vr(),
        })
    }

    /// Clear the given STATUS flags (MAX17048/49)
    ///
    /// Only flags set in `flags` are cleared. `voltage_reset_alert_enabled`
    /// is a setting, not a flag, and is ignored here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn clear_status_flags(&mut self, flags: StatusFlags) -> Result<(), Error<I::Error>> {
        self.require(Capability::Status)?;
        self.device
            .status()
            .modify_async(|w| {
                if flags.reset_indicator {
                    w.set_ri(false);
                }
                if flags.voltage_high {
                    w.set_vh(false);
                }
                if flags.voltage_low {
                    w.set_vl(false);
                }
                if flags.voltage_reset {
                    w.set_vr(false);
                }
                if flags.soc_low {
                    w.set_hd(false);
                }
                if flags.soc_change {
                    w.set_sc(false);
                }
            })
            .await?;
        Ok(())
    }

    /// Read one STATUS flag, optionally clearing it (MAX17048/49)
    ///
    /// STATUS is read once. If `clear` is set and the flag was set, a second
    /// read-modify-write clears only that flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn read_status_flag(
        &mut self,
        flag: StatusFlag,
        clear: bool,
    ) -> Result<bool, Error<I::Error>> {
        let set = self.read_status().await?.contains(flag);
        if clear && set {
            self.clear_status_flags(StatusFlags::from(flag)).await?;
        }
        Ok(set)
    }

    /// RI: the IC was reset and needs configuring (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn is_reset(&mut self, clear: bool) -> Result<bool, Error<I::Error>> {
        self.read_status_flag(StatusFlag::ResetIndicator, clear).await
    }

    /// VH: VCELL went above VALRT.MAX (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn is_voltage_high(&mut self, clear: bool) -> Result<bool, Error<I::Error>> {
        self.read_status_flag(StatusFlag::VoltageHigh, clear).await
    }

    /// VL: VCELL went below VALRT.MIN (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn is_voltage_low(&mut self, clear: bool) -> Result<bool, Error<I::Error>> {
        self.read_status_flag(StatusFlag::VoltageLow, clear).await
    }

    /// VR: a voltage reset was detected (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn is_voltage_reset(&mut self, clear: bool) -> Result<bool, Error<I::Error>> {
        self.read_status_flag(StatusFlag::VoltageReset, clear).await
    }

    /// HD: SOC crossed the empty threshold (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn is_low(&mut self, clear: bool) -> Result<bool, Error<I::Error>> {
        self.read_status_flag(StatusFlag::SocLow, clear).await
    }

    /// SC: SOC changed by at least 1% (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn is_change(&mut self, clear: bool) -> Result<bool, Error<I::Error>> {
        self.read_status_flag(StatusFlag::SocChange, clear).await
    }

    /// Enable the voltage reset alert (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn enable_voltage_reset_alert(&mut self) -> Result<(), Error<I::Error>> {
        self.require(Capability::Status)?;
        self.device
            .status()
            .modify_async(|w| {
                w.set_en_vr(true);
            })
            .await?;
        Ok(())
    }

    /// Disable the voltage reset alert (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn disable_voltage_reset_alert(&mut self) -> Result<(), Error<I::Error>> {
        self.require(Capability::Status)?;
        self.device
            .status()
            .modify_async(|w| {
                w.set_en_vr(false);
            })
            .await?;
        Ok(())
    }

    /// Check whether the voltage reset alert is enabled (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn is_voltage_reset_alert_enabled(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(self.read_status().await?.voltage_reset_alert_enabled)
    }

    /// Read the CONFIG.ALRT bit, optionally clearing it
    ///
    /// When `clear` is set and the bit was set, the CONFIG value just read is
    /// written back with ALRT cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_alert(&mut self, clear: bool) -> Result<bool, Error<I::Error>> {
        let config = self.device.config().read_async().await?;
        let alert = config.alrt();

        if clear && alert {
            self.device
                .config()
                .write_async(|w| {
                    *w = config;
                    w.set_alrt(false);
                })
                .await?;
        }

        Ok(alert)
    }

    /// Clear CONFIG.ALRT
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn clear_alert(&mut self) -> Result<(), Error<I::Error>> {
        self.device
            .config()
            .modify_async(|w| {
                w.set_alrt(false);
            })
            .await?;
        Ok(())
    }

    /// Enable the 1% SOC change alert (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, [`Error::Verify`] if
    /// the bit did not stick, or a bus error.
    pub async fn enable_soc_alert(&mut self) -> Result<(), Error<I::Error>> {
        self.set_soc_alert(true).await
    }

    /// Disable the 1% SOC change alert (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, [`Error::Verify`] if
    /// the bit did not stick, or a bus error.
    pub async fn disable_soc_alert(&mut self) -> Result<(), Error<I::Error>> {
        self.set_soc_alert(false).await
    }

    async fn set_soc_alert(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        self.require(Capability::SocAlert)?;
        self.device
            .config()
            .modify_async(|w| {
                w.set_alsc(enable);
            })
            .await?;

        let readback = self.device.config().read_async().await?;
        if readback.alsc() != enable {
            #[cfg(feature = "defmt")]
            defmt::warn!("CONFIG.ALSC readback mismatch, expected {}", enable);
            return Err(Error::Verify);
        }

        Ok(())
    }

    /// Check whether the 1% SOC change alert is enabled (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn is_soc_alert_enabled(&mut self) -> Result<bool, Error<I::Error>> {
        self.require(Capability::SocAlert)?;
        let reg = self.device.config().read_async().await?;
        Ok(reg.alsc())
    }

    /// Check CONFIG.SLEEP
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn is_sleeping(&mut self) -> Result<bool, Error<I::Error>> {
        let reg = self.device.config().read_async().await?;
        Ok(reg.sleep())
    }

    /// Read the empty alert threshold in percent (1 - 32)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_threshold(&mut self) -> Result<u8, Error<I::Error>> {
        let reg = self.device.config().read_async().await?;
        Ok(athd_to_threshold(reg.athd()))
    }

    /// Set the empty alert threshold in percent
    ///
    /// ALRT asserts when SOC drops below this value. The other CONFIG fields
    /// are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `percent` is outside 1 - 32,
    /// or a bus error.
    pub async fn set_threshold(&mut self, percent: u8) -> Result<(), Error<I::Error>> {
        let athd = threshold_to_athd(percent).ok_or(Error::InvalidArgument)?;
        self.device
            .config()
            .modify_async(|w| {
                w.set_athd(athd);
            })
            .await?;
        Ok(())
    }

    /// Read the RCOMP compensation byte
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_compensation(&mut self) -> Result<u8, Error<I::Error>> {
        let reg = self.device.config().read_async().await?;
        Ok(reg.rcomp())
    }

    /// Set the RCOMP compensation byte
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_compensation(&mut self, rcomp: u8) -> Result<(), Error<I::Error>> {
        self.device
            .config()
            .modify_async(|w| {
                w.set_rcomp(rcomp);
            })
            .await?;
        Ok(())
    }

    /// Read VALRT.MAX as a raw code, 20 mV per LSB (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn read_valrt_max(&mut self) -> Result<u8, Error<I::Error>> {
        self.require(Capability::VoltageAlert)?;
        let reg = self.device.valrt().read_async().await?;
        Ok(reg.max())
    }

    /// Read VALRT.MIN as a raw code, 20 mV per LSB (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn read_valrt_min(&mut self) -> Result<u8, Error<I::Error>> {
        self.require(Capability::VoltageAlert)?;
        let reg = self.device.valrt().read_async().await?;
        Ok(reg.min())
    }

    /// Read VALRT.MAX in volts (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn read_valrt_max_volts(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(valrt_code_to_volts(self.read_valrt_max().await?))
    }

    /// Read VALRT.MIN in volts (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn read_valrt_min_volts(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(valrt_code_to_volts(self.read_valrt_min().await?))
    }

    /// Set VALRT.MAX from a raw code, keeping VALRT.MIN (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn set_valrt_max(&mut self, code: u8) -> Result<(), Error<I::Error>> {
        self.require(Capability::VoltageAlert)?;
        self.device
            .valrt()
            .modify_async(|w| {
                w.set_max(code);
            })
            .await?;
        Ok(())
    }

    /// Set VALRT.MIN from a raw code, keeping VALRT.MAX (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn set_valrt_min(&mut self, code: u8) -> Result<(), Error<I::Error>> {
        self.require(Capability::VoltageAlert)?;
        self.device
            .valrt()
            .modify_async(|w| {
                w.set_min(code);
            })
            .await?;
        Ok(())
    }

    /// Set VALRT.MAX in volts (MAX17048/49)
    ///
    /// Clamped to 0 - 5.1 V and truncated to 20 mV steps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn set_valrt_max_volts(&mut self, volts: f64) -> Result<(), Error<I::Error>> {
        self.set_valrt_max(valrt_volts_to_code(volts)).await
    }

    /// Set VALRT.MIN in volts (MAX17048/49)
    ///
    /// Clamped to 0 - 5.1 V and truncated to 20 mV steps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn set_valrt_min_volts(&mut self, volts: f64) -> Result<(), Error<I::Error>> {
        self.set_valrt_min(valrt_volts_to_code(volts)).await
    }

    /// Check MODE.HibStat (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn is_hibernating(&mut self) -> Result<bool, Error<I::Error>> {
        self.require(Capability::Hibernate)?;
        let reg = self.device.mode().read_async().await?;
        Ok(reg.hib_stat())
    }

    /// Read the HIBRT active threshold, 1.25 mV per LSB (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn read_hibernate_active_threshold(&mut self) -> Result<u8, Error<I::Error>> {
        self.require(Capability::Hibernate)?;
        let reg = self.device.hibrt().read_async().await?;
        Ok(reg.act_thr())
    }

    /// Read the HIBRT active threshold in volts (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn read_hibernate_active_threshold_volts(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(active_threshold_code_to_volts(self.read_hibernate_active_threshold().await?))
    }

    /// Set the HIBRT active threshold from a raw code (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn set_hibernate_active_threshold(
        &mut self,
        code: u8,
    ) -> Result<(), Error<I::Error>> {
        self.require(Capability::Hibernate)?;
        self.device
            .hibrt()
            .modify_async(|w| {
                w.set_act_thr(code);
            })
            .await?;
        Ok(())
    }

    /// Set the HIBRT active threshold in volts (MAX17048/49)
    ///
    /// Clamped to 0 - 0.31875 V and truncated to 1.25 mV steps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn set_hibernate_active_threshold_volts(
        &mut self,
        volts: f64,
    ) -> Result<(), Error<I::Error>> {
        self.set_hibernate_active_threshold(active_threshold_volts_to_code(volts))
            .await
    }

    /// Read the HIBRT hibernate threshold, 0.208 %/hr per LSB (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn read_hibernate_threshold(&mut self) -> Result<u8, Error<I::Error>> {
        self.require(Capability::Hibernate)?;
        let reg = self.device.hibrt().read_async().await?;
        Ok(reg.hib_thr())
    }

    /// Read the HIBRT hibernate threshold in %/hr (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn read_hibernate_threshold_percent(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(hibernate_threshold_code_to_percent(self.read_hibernate_threshold().await?))
    }

    /// Set the HIBRT hibernate threshold from a raw code (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn set_hibernate_threshold(&mut self, code: u8) -> Result<(), Error<I::Error>> {
        self.require(Capability::Hibernate)?;
        self.device
            .hibrt()
            .modify_async(|w| {
                w.set_hib_thr(code);
            })
            .await?;
        Ok(())
    }

    /// Set the HIBRT hibernate threshold in %/hr (MAX17048/49)
    ///
    /// Clamped to 0 - 53.04 %/hr and truncated to 0.208 %/hr steps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn set_hibernate_threshold_percent(
        &mut self,
        percent_per_hour: f64,
    ) -> Result<(), Error<I::Error>> {
        self.set_hibernate_threshold(hibernate_threshold_percent_to_code(percent_per_hour))
            .await
    }

    /// Force hibernate mode by writing 0xFFFF to HIBRT (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn enable_hibernate(&mut self) -> Result<(), Error<I::Error>> {
        self.require(Capability::Hibernate)?;
        self.device
            .hibrt()
            .write_async(|w| {
                w.set_act_thr(HIBRT_ALWAYS_HIBERNATE);
                w.set_hib_thr(HIBRT_ALWAYS_HIBERNATE);
            })
            .await?;
        Ok(())
    }

    /// Disable hibernate mode by writing 0x0000 to HIBRT (MAX17048/49)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] on MAX17043/44, or a bus error.
    pub async fn disable_hibernate(&mut self) -> Result<(), Error<I::Error>> {
        self.require(Capability::Hibernate)?;
        self.device
            .hibrt()
            .write_async(|w| {
                w.set_act_thr(HIBRT_NEVER_HIBERNATE);
                w.set_hib_thr(HIBRT_NEVER_HIBERNATE);
            })
            .await?;
        Ok(())
    }

    /// Put the device to sleep
    ///
    /// On MAX17048/49 MODE.EnSleep is written first, otherwise CONFIG.SLEEP
    /// has no effect. Returns [`ModeChange::Unchanged`] if the device was
    /// already asleep.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn sleep(&mut self) -> Result<ModeChange, Error<I::Error>> {
        if self.variant.supports(Capability::EnSleep) {
            self.device
                .mode()
                .write_async(|w| {
                    w.set_en_sleep(true);
                })
                .await?;
        }

        let config = self.device.config().read_async().await?;
        if config.sleep() {
            #[cfg(feature = "defmt")]
            defmt::debug!("sleep: already asleep");
            return Ok(ModeChange::Unchanged);
        }

        self.device
            .config()
            .write_async(|w| {
                *w = config;
                w.set_sleep(true);
            })
            .await?;

        #[cfg(feature = "defmt")]
        defmt::debug!("sleep: entered sleep mode");

        Ok(ModeChange::Changed)
    }

    /// Wake the device from sleep
    ///
    /// On MAX17048/49 MODE is cleared afterwards, which also drops EnSleep.
    /// Returns [`ModeChange::Unchanged`] if the device was awake.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn wake(&mut self) -> Result<ModeChange, Error<I::Error>> {
        let config = self.device.config().read_async().await?;
        if !config.sleep() {
            #[cfg(feature = "defmt")]
            defmt::debug!("wake: already awake");
            return Ok(ModeChange::Unchanged);
        }

        self.device
            .config()
            .write_async(|w| {
                *w = config;
                w.set_sleep(false);
            })
            .await?;

        if self.variant.supports(Capability::EnSleep) {
            self.device.mode().write_async(|_| {}).await?;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("wake: left sleep mode");

        Ok(ModeChange::Changed)
    }

    /// Issue a power-on reset
    ///
    /// The IC resets before it can acknowledge the COMMAND write, so a bus
    /// error here is expected and ignored. All registers return to their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Never fails.
    pub async fn reset(&mut self) -> Result<(), Error<I::Error>> {
        let result = self
            .device
            .command()
            .write_async(|w| {
                w.set_command(COMMAND_POWER_ON_RESET);
            })
            .await;

        if result.is_err() {
            #[cfg(feature = "defmt")]
            defmt::debug!("reset: COMMAND write not acknowledged");
        }

        Ok(())
    }
}
