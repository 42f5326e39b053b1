//! Device variants and their capabilities
//!
//! The four parts share one register map but differ in VCELL resolution,
//! full-scale voltage and which of the newer registers exist. All variant
//! checks in the driver go through [`DeviceVariant::supports`].

/// Fuel gauge part number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceVariant {
    /// MAX17043: 1 cell, 12-bit VCELL, 1.25 mV/LSB
    #[default]
    Max17043,
    /// MAX17044: 2 cells, 12-bit VCELL, 2.5 mV/LSB
    Max17044,
    /// MAX17048: 1 cell, 16-bit VCELL, 78.125 uV/LSB
    Max17048,
    /// MAX17049: 2 cells, 16-bit VCELL, 156.25 uV/LSB
    Max17049,
}

/// A feature that only some variants implement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Capability {
    /// HIBRT register and MODE.HibStat
    Hibernate,
    /// STATUS register (alert flags and EnVR)
    Status,
    /// CRATE register
    ChargeRate,
    /// VALRT register
    VoltageAlert,
    /// VRESET/ID register (reset threshold, comparator, factory ID)
    ResetVoltage,
    /// CONFIG.ALSC (1% SOC change alert)
    SocAlert,
    /// MODE.EnSleep must be set before CONFIG.SLEEP takes effect
    EnSleep,
    /// VERSION bit 4 identifies the part during connection checks
    VersionCheck,
}

impl DeviceVariant {
    /// Full-scale VCELL voltage in volts
    #[must_use]
    pub const fn full_scale(self) -> f32 {
        match self {
            Self::Max17043 | Self::Max17048 => 5.12,
            Self::Max17044 | Self::Max17049 => 10.24,
        }
    }

    /// Number of significant VCELL bits
    #[must_use]
    pub const fn vcell_bits(self) -> u8 {
        match self {
            Self::Max17043 | Self::Max17044 => 12,
            Self::Max17048 | Self::Max17049 => 16,
        }
    }

    /// Whether this part belongs to the newer MAX17048/49 generation
    #[must_use]
    pub const fn has_extended_registers(self) -> bool {
        matches!(self, Self::Max17048 | Self::Max17049)
    }

    /// Check whether the variant implements a capability
    #[must_use]
    pub const fn supports(self, capability: Capability) -> bool {
        match capability {
            Capability::Hibernate
            | Capability::Status
            | Capability::ChargeRate
            | Capability::VoltageAlert
            | Capability::ResetVoltage
            | Capability::SocAlert
            | Capability::EnSleep
            | Capability::VersionCheck => self.has_extended_registers(),
        }
    }
}
