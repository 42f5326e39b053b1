//! Conversions for the measurement registers
//!
//! VCELL, SOC and CRATE are read-only. These helpers turn their raw contents
//! into volts, percent and percent per hour.

use crate::DeviceVariant;

/// CRATE resolution in %/hr per LSB
pub const CHARGE_RATE_PERCENT_PER_HOUR_PER_LSB: f32 = 0.208;

/// Convert a raw VCELL value to volts
///
/// MAX17043/44 only use the upper 12 bits, MAX17048/49 use all 16. The
/// divider is the number of codes per volt at the part's full-scale range.
#[must_use]
pub fn vcell_to_volts(raw: u16, variant: DeviceVariant) -> f32 {
    let full_scale = variant.full_scale();
    if variant.vcell_bits() == 12 {
        f32::from(raw >> 4) / (4096.0 / full_scale)
    } else {
        f32::from(raw) / (65536.0 / full_scale)
    }
}

/// Combine the SOC register bytes into a percentage
#[must_use]
pub fn soc_to_percent(percent: u8, fraction: u8) -> f32 {
    f32::from(percent) + f32::from(fraction) / 256.0
}

/// Convert a raw CRATE value to %/hr
///
/// The register is two's complement. Negative values mean discharge.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn charge_rate_to_percent_per_hour(raw: u16) -> f32 {
    f32::from(raw as i16) * CHARGE_RATE_PERCENT_PER_HOUR_PER_LSB
}
