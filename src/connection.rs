use core::fmt::{Debug, Display};

use embedded_hal::i2c;

/// A single output register that accepts one byte per write. For the PCF8574 this is the
/// quasi-bidirectional port latch; every byte written appears on P0-P7.
pub trait ByteSink {
    type Error: Debug;

    fn write_byte(&mut self, value: u8) -> Result<(), Self::Error>;
}

/// Hands out the connection to a device at a given bus address. The display acquires its
/// connection once, during `start()`, and keeps it for the rest of its life.
pub trait Connector {
    type Connection: ByteSink;
    type Error: Debug;

    fn connect(&mut self, address: u8, bus: u8) -> Result<Self::Connection, Self::Error>;
}

#[derive(Debug, PartialEq, Copy, Clone)]
/// Errors returned by [`I2cConnector::connect`]
pub enum ConnectError {
    /// The connector does not serve the requested bus index
    UnknownBus(u8),
    /// Not a 7-bit I2C address
    InvalidAddress(u8),
    /// The I2C peripheral has already been handed out
    BusInUse,
}

impl From<&ConnectError> for &'static str {
    fn from(err: &ConnectError) -> Self {
        match err {
            ConnectError::UnknownBus(_) => "Unknown I2C bus",
            ConnectError::InvalidAddress(_) => "Invalid I2C address",
            ConnectError::BusInUse => "I2C bus already in use",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConnectError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ConnectError::UnknownBus(bus) => defmt::write!(fmt, "Unknown I2C bus {}", bus),
            ConnectError::InvalidAddress(address) => {
                defmt::write!(fmt, "Invalid I2C address {=u8:#x}", address)
            }
            ConnectError::BusInUse => defmt::write!(fmt, "I2C bus already in use"),
        }
    }
}

#[cfg(feature = "ufmt")]
impl ufmt::uDisplay for ConnectError {
    fn fmt<W>(&self, w: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        let msg: &'static str = From::from(self);
        ufmt::uwrite!(w, "{}", msg)
    }
}

impl Display for ConnectError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = From::from(self);
        match self {
            ConnectError::UnknownBus(bus) => write!(f, "{} {}", msg, bus),
            ConnectError::InvalidAddress(address) => write!(f, "{} {:#04x}", msg, address),
            ConnectError::BusInUse => write!(f, "{}", msg),
        }
    }
}

/// [`Connector`] over a single `embedded-hal` I2C peripheral. `bus` is the index of the bus
/// the peripheral drives, e.g. `1` for `/dev/i2c-1` or `I2C1`.
#[derive(Debug)]
pub struct I2cConnector<I2C>
where
    I2C: i2c::I2c,
{
    i2c: Option<I2C>,
    bus: u8,
}

impl<I2C> I2cConnector<I2C>
where
    I2C: i2c::I2c,
{
    pub fn new(i2c: I2C, bus: u8) -> Self {
        Self { i2c: Some(i2c), bus }
    }

    /// returns the bus index served by this connector
    pub fn bus(&self) -> u8 {
        self.bus
    }
}

impl<I2C> Connector for I2cConnector<I2C>
where
    I2C: i2c::I2c,
{
    type Connection = I2cConnection<I2C>;
    type Error = ConnectError;

    fn connect(&mut self, address: u8, bus: u8) -> Result<Self::Connection, Self::Error> {
        if bus != self.bus {
            return Err(ConnectError::UnknownBus(bus));
        }
        if address > 0x7F {
            return Err(ConnectError::InvalidAddress(address));
        }
        let i2c = self.i2c.take().ok_or(ConnectError::BusInUse)?;
        Ok(I2cConnection { i2c, address })
    }
}

/// A device address bound to an I2C peripheral.
#[derive(Debug)]
pub struct I2cConnection<I2C>
where
    I2C: i2c::I2c,
{
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cConnection<I2C>
where
    I2C: i2c::I2c,
{
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Gives back the I2C peripheral.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> ByteSink for I2cConnection<I2C>
where
    I2C: i2c::I2c,
{
    type Error = I2C::Error;

    fn write_byte(&mut self, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[value])
    }
}
