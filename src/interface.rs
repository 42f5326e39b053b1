//! Bus interface for the MAX1704x
//!
//! Implements the `device-driver` register traits over I2C. Every register is
//! two bytes, MSB first, addressed by a single register byte.

use crate::I2C_ADDRESS;

use device_driver::RegisterInterface;

/// Checks whether a device answers at its bus address
///
/// Implemented separately from [`RegisterInterface`] so test doubles can
/// control the answer directly.
pub trait DeviceProbe {
    /// Return `true` if the device acknowledged its address
    fn probe(&mut self) -> bool;
}

/// Async counterpart of [`DeviceProbe`]
#[cfg(feature = "async")]
#[allow(async_fn_in_trait)]
pub trait AsyncDeviceProbe {
    /// Return `true` if the device acknowledged its address
    async fn probe(&mut self) -> bool;
}

/// I2C interface for the MAX1704x
///
/// All four parts live at the fixed 7-bit address 0x36.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface at the fixed address (0x36)
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::new(i2c);
    /// let mut gauge = Max1704xDriver::new(interface, DeviceVariant::Max17048);
    /// ```
    pub const fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: I2C_ADDRESS,
        }
    }

    /// The 7-bit bus address in use
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[address], read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        // Register byte followed by the 16-bit value
        let mut buffer = [0u8; 3];
        buffer[0] = address;
        let len = write_data.len().min(2);
        buffer[1..=len].copy_from_slice(&write_data[..len]);

        self.i2c.write(self.address, &buffer[..=len])
    }
}

impl<I2C, E> DeviceProbe for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    fn probe(&mut self) -> bool {
        self.i2c.write(self.address, &[]).is_ok()
    }
}

#[cfg(feature = "async")]
impl<I2C, E> device_driver::AsyncRegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal_async::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c
            .write_read(self.address, &[address], read_data)
            .await
    }

    async fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut buffer = [0u8; 3];
        buffer[0] = address;
        let len = write_data.len().min(2);
        buffer[1..=len].copy_from_slice(&write_data[..len]);

        self.i2c.write(self.address, &buffer[..=len]).await
    }
}

#[cfg(feature = "async")]
impl<I2C, E> AsyncDeviceProbe for I2cInterface<I2C>
where
    I2C: embedded_hal_async::i2c::I2c<Error = E>,
{
    async fn probe(&mut self) -> bool {
        self.i2c.write(self.address, &[]).await.is_ok()
    }
}
