//! Alert configuration and status flags
//!
//! The MAX1704x can raise its ALRT pin on several conditions:
//! - **Empty threshold**: SOC falls below CONFIG.ATHD (all parts)
//! - **SOC change**: SOC moves by 1% (MAX17048/49, CONFIG.ALSC)
//! - **Voltage window**: VCELL leaves the VALRT window (MAX17048/49)
//! - **Voltage reset**: VCELL drops below VRESET (MAX17048/49, STATUS.EnVR)
//!
//! The MAX17048/49 STATUS register records which condition fired. Flags stay
//! set until software clears them.
//!
//! # Example
//!
//! ```ignore
//! # use max1704x::{DeviceVariant, I2cInterface, Max1704xDriver, alert::StatusFlag};
//! # let mut gauge: Max1704xDriver<_> = todo!();
//! // Alert when the battery drops below 10%
//! gauge.set_threshold(10)?;
//!
//! // Alert outside 3.3 V - 4.2 V
//! gauge.set_valrt_min_volts(3.3)?;
//! gauge.set_valrt_max_volts(4.2)?;
//!
//! if gauge.read_status_flag(StatusFlag::VoltageLow, true)? {
//!     // handle undervoltage, flag is now cleared
//! }
//! # Ok::<(), max1704x::Error<()>>(())
//! ```

/// Smallest empty-alert threshold in percent
pub const MIN_THRESHOLD_PERCENT: u8 = 1;

/// Largest empty-alert threshold in percent
pub const MAX_THRESHOLD_PERCENT: u8 = 32;

/// VALRT resolution in volts per LSB
pub const VALRT_VOLTS_PER_LSB: f64 = 0.02;

/// Highest voltage accepted by the VALRT volts setters
pub const VALRT_MAX_VOLTS: f64 = 5.1;

/// VRESET resolution in volts per LSB
pub const RESET_VOLTAGE_VOLTS_PER_LSB: f64 = 0.04;

/// Highest voltage accepted by the VRESET volts setter
pub const RESET_VOLTAGE_MAX_VOLTS: f64 = 5.08;

/// Largest 7-bit VRESET code
pub const MAX_RESET_VOLTAGE_CODE: u8 = 0x7F;

/// A single alert flag in the STATUS register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusFlag {
    /// RI: the IC was reset and needs configuring
    ResetIndicator,
    /// VH: VCELL is above VALRT.MAX
    VoltageHigh,
    /// VL: VCELL is below VALRT.MIN
    VoltageLow,
    /// VR: a voltage reset was detected
    VoltageReset,
    /// HD: SOC crossed the empty threshold
    SocLow,
    /// SC: SOC changed by at least 1%
    SocChange,
}

impl StatusFlag {
    /// Every alert flag, in register order
    pub const ALL: [Self; 6] = [
        Self::ResetIndicator,
        Self::VoltageHigh,
        Self::VoltageLow,
        Self::VoltageReset,
        Self::SocLow,
        Self::SocChange,
    ];

    /// Bit position within the 16-bit STATUS register
    #[must_use]
    pub const fn register_bit(self) -> u8 {
        match self {
            Self::ResetIndicator => 8,
            Self::VoltageHigh => 9,
            Self::VoltageLow => 10,
            Self::VoltageReset => 11,
            Self::SocLow => 12,
            Self::SocChange => 13,
        }
    }
}

/// Decoded STATUS register contents (MAX17048/49)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct StatusFlags {
    /// RI: the IC was reset
    pub reset_indicator: bool,
    /// VH: voltage high alert
    pub voltage_high: bool,
    /// VL: voltage low alert
    pub voltage_low: bool,
    /// VR: voltage reset alert
    pub voltage_reset: bool,
    /// HD: SOC low alert
    pub soc_low: bool,
    /// SC: 1% SOC change alert
    pub soc_change: bool,
    /// EnVR: voltage reset alert enabled (a setting, not a flag)
    pub voltage_reset_alert_enabled: bool,
}

impl StatusFlags {
    /// Build from the 7-bit STATUS field (register bits 8..15 shifted down)
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            reset_indicator: bits & 0x01 != 0,
            voltage_high: bits & 0x02 != 0,
            voltage_low: bits & 0x04 != 0,
            voltage_reset: bits & 0x08 != 0,
            soc_low: bits & 0x10 != 0,
            soc_change: bits & 0x20 != 0,
            voltage_reset_alert_enabled: bits & 0x40 != 0,
        }
    }

    /// The 7-bit STATUS field (register bits 8..15 shifted down)
    #[must_use]
    pub const fn bits(&self) -> u8 {
        (self.reset_indicator as u8)
            | (self.voltage_high as u8) << 1
            | (self.voltage_low as u8) << 2
            | (self.voltage_reset as u8) << 3
            | (self.soc_low as u8) << 4
            | (self.soc_change as u8) << 5
            | (self.voltage_reset_alert_enabled as u8) << 6
    }

    /// Check a single alert flag
    #[must_use]
    pub const fn contains(&self, flag: StatusFlag) -> bool {
        match flag {
            StatusFlag::ResetIndicator => self.reset_indicator,
            StatusFlag::VoltageHigh => self.voltage_high,
            StatusFlag::VoltageLow => self.voltage_low,
            StatusFlag::VoltageReset => self.voltage_reset,
            StatusFlag::SocLow => self.soc_low,
            StatusFlag::SocChange => self.soc_change,
        }
    }

    /// Set a single alert flag
    pub fn insert(&mut self, flag: StatusFlag) {
        match flag {
            StatusFlag::ResetIndicator => self.reset_indicator = true,
            StatusFlag::VoltageHigh => self.voltage_high = true,
            StatusFlag::VoltageLow => self.voltage_low = true,
            StatusFlag::VoltageReset => self.voltage_reset = true,
            StatusFlag::SocLow => self.soc_low = true,
            StatusFlag::SocChange => self.soc_change = true,
        }
    }

    /// Whether any alert flag (not EnVR) is set
    #[must_use]
    pub const fn any_alert(&self) -> bool {
        self.bits() & 0x3F != 0
    }
}

impl From<StatusFlag> for StatusFlags {
    fn from(flag: StatusFlag) -> Self {
        let mut flags = Self::default();
        flags.insert(flag);
        flags
    }
}

/// Encode an empty-alert percentage into CONFIG.ATHD
///
/// Returns `None` outside 1..=32.
#[must_use]
pub const fn threshold_to_athd(percent: u8) -> Option<u8> {
    if percent < MIN_THRESHOLD_PERCENT || percent > MAX_THRESHOLD_PERCENT {
        None
    } else {
        Some(MAX_THRESHOLD_PERCENT - percent)
    }
}

/// Decode CONFIG.ATHD into a percentage
#[must_use]
pub const fn athd_to_threshold(athd: u8) -> u8 {
    MAX_THRESHOLD_PERCENT - (athd & 0x1F)
}

/// Clamp `value` to `0..=max`, divide by `lsb` and truncate toward zero
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn quantize(value: f64, max: f64, lsb: f64) -> u8 {
    (value.clamp(0.0, max) / lsb) as u8
}

/// Scale a register code back to physical units
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn dequantize(code: u8, lsb: f64) -> f32 {
    (f64::from(code) * lsb) as f32
}

/// Convert a voltage to a VALRT code (20 mV per LSB, clamped to 0-5.1 V)
#[must_use]
pub fn valrt_volts_to_code(volts: f64) -> u8 {
    quantize(volts, VALRT_MAX_VOLTS, VALRT_VOLTS_PER_LSB)
}

/// Convert a VALRT code to volts
#[must_use]
pub fn valrt_code_to_volts(code: u8) -> f32 {
    dequantize(code, VALRT_VOLTS_PER_LSB)
}

/// Convert a voltage to a VRESET code (40 mV per LSB, clamped to 0-5.08 V)
#[must_use]
pub fn reset_voltage_volts_to_code(volts: f64) -> u8 {
    quantize(volts, RESET_VOLTAGE_MAX_VOLTS, RESET_VOLTAGE_VOLTS_PER_LSB)
}

/// Convert a VRESET code to volts
#[must_use]
pub fn reset_voltage_code_to_volts(code: u8) -> f32 {
    dequantize(code & MAX_RESET_VOLTAGE_CODE, RESET_VOLTAGE_VOLTS_PER_LSB)
}
