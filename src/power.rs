//! Power management and low-power modes
//!
//! The MAX1704x has two ways to cut current draw:
//! - **Sleep mode**: all measurements stop, ~0.5 uA typical. Entered through
//!   CONFIG.SLEEP (MAX17048/49 also need MODE.EnSleep set first).
//! - **Hibernate mode** (MAX17048/49): the ADC samples slower while the cell is
//!   idle. Entry and exit are governed by the HIBRT thresholds.
//!
//! # Hibernate thresholds
//! - **Active threshold** (HIBRT low byte): exit hibernate when a single
//!   OCV reading moves by more than this voltage. 1.25 mV per LSB.
//! - **Hibernate threshold** (HIBRT high byte): enter hibernate when the
//!   absolute charge rate stays below this for 6 minutes. 0.208 %/hr per LSB.
//!
//! # Example
//!
//! ```ignore
//! # use max1704x::{Max1704xDriver, ModeChange};
//! # let mut gauge: Max1704xDriver<_> = todo!();
//! gauge.set_hibernate_active_threshold_volts(0.06)?;
//! gauge.set_hibernate_threshold_percent(4.0)?;
//!
//! if gauge.sleep()? == ModeChange::Unchanged {
//!     // already asleep
//! }
//! # Ok::<(), max1704x::Error<()>>(())
//! ```

use crate::alert::{dequantize, quantize};

/// HIBRT active threshold resolution in volts per LSB
pub const ACTIVE_THRESHOLD_VOLTS_PER_LSB: f64 = 0.001_25;

/// Highest voltage accepted by the active threshold setter
pub const ACTIVE_THRESHOLD_MAX_VOLTS: f64 = 0.318_75;

/// HIBRT hibernate threshold resolution in %/hr per LSB
pub const HIBERNATE_THRESHOLD_PERCENT_PER_LSB: f64 = 0.208;

/// Highest rate accepted by the hibernate threshold setter
pub const HIBERNATE_THRESHOLD_MAX_PERCENT: f64 = 53.04;

/// Outcome of a sleep or wake request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeChange {
    /// The device changed mode
    Changed,
    /// The device was already in the requested mode, nothing was written
    Unchanged,
}

impl ModeChange {
    /// Whether the request changed the device mode
    #[must_use]
    pub const fn is_changed(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Convert a voltage to a HIBRT active threshold code
///
/// Clamped to 0 - 0.31875 V and truncated to 1.25 mV steps.
#[must_use]
pub fn active_threshold_volts_to_code(volts: f64) -> u8 {
    quantize(
        volts,
        ACTIVE_THRESHOLD_MAX_VOLTS,
        ACTIVE_THRESHOLD_VOLTS_PER_LSB,
    )
}

/// Convert a HIBRT active threshold code to volts
#[must_use]
pub fn active_threshold_code_to_volts(code: u8) -> f32 {
    dequantize(code, ACTIVE_THRESHOLD_VOLTS_PER_LSB)
}

/// Convert a charge rate to a HIBRT hibernate threshold code
///
/// Clamped to 0 - 53.04 %/hr and truncated to 0.208 %/hr steps.
#[must_use]
pub fn hibernate_threshold_percent_to_code(percent_per_hour: f64) -> u8 {
    quantize(
        percent_per_hour,
        HIBERNATE_THRESHOLD_MAX_PERCENT,
        HIBERNATE_THRESHOLD_PERCENT_PER_LSB,
    )
}

/// Convert a HIBRT hibernate threshold code to %/hr
#[must_use]
pub fn hibernate_threshold_code_to_percent(code: u8) -> f32 {
    dequantize(code, HIBERNATE_THRESHOLD_PERCENT_PER_LSB)
}
