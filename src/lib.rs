#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod alert;
pub mod device;
pub mod interface;
pub mod measurement;
pub mod power;
pub mod registers;
pub mod variant;

// Re-export main types
pub use alert::{StatusFlag, StatusFlags};
pub use device::Max1704xDriver;
pub use interface::{DeviceProbe, I2cInterface};
#[cfg(feature = "async")]
pub use interface::AsyncDeviceProbe;
pub use power::ModeChange;
pub use variant::{Capability, DeviceVariant};

/// Fixed 7-bit I2C address shared by all MAX1704x parts
pub const I2C_ADDRESS: u8 = 0x36;

/// VERSION bit that identifies a MAX17048/49 during connection checks
pub const VERSION_ID_BIT: u16 = 0x0010;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// The configured variant does not implement this register or feature
    Unsupported,
    /// Argument outside the accepted range
    InvalidArgument,
    /// A written setting did not read back as expected
    Verify,
    /// No device acknowledged, or the VERSION register did not match
    NotConnected,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
