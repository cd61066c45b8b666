pub mod hd44780;
pub mod transport;

use embedded_hal::delay::DelayNs;

use crate::{connection::Connector, CharacterDisplayError, Timing};

/// State of the HD44780 register select line for a transfer.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum RegisterSelect {
    /// RS low: the byte is an instruction
    Command,
    /// RS high: the byte goes to CGRAM or DDRAM, depending on the last address instruction
    Data,
}

impl RegisterSelect {
    pub fn is_data(&self) -> bool {
        *self == RegisterSelect::Data
    }
}

/// Trait for the 4-bit transfer path to the controller. Implementors supply the single
/// nibble transfer; full bytes are always sent as two nibbles, high nibble first.
pub trait CommandCodec {
    type Connector: Connector;
    type Delay: DelayNs;

    /// the delays used for this display
    fn timing(&self) -> &Timing;

    /// return a mutable reference to the delay object
    fn delay(&mut self) -> &mut Self::Delay;

    /// whether the backlight bit is asserted on writes
    fn backlight_enabled(&self) -> bool;

    /// Changes the backlight bit and immediately writes it to the expander.
    fn set_backlight(&mut self, on: bool) -> Result<(), CharacterDisplayError<Self::Connector>>;

    /// Writes a byte carrying nothing but the current backlight bit.
    fn latch_backlight(&mut self) -> Result<(), CharacterDisplayError<Self::Connector>>;

    /// Transfers the low nibble of `nibble` on D4-D7 with one enable pulse.
    fn send_nibble(
        &mut self,
        mode: RegisterSelect,
        nibble: u8,
    ) -> Result<(), CharacterDisplayError<Self::Connector>>;

    /// Transfers a full byte as two nibbles, high nibble first.
    fn transmit(
        &mut self,
        mode: RegisterSelect,
        value: u8,
    ) -> Result<(), CharacterDisplayError<Self::Connector>> {
        self.send_nibble(mode, value >> 4)
            .and_then(|_| self.send_nibble(mode, value & 0x0F))
    }

    /// Sends an instruction byte.
    fn command(&mut self, value: u8) -> Result<(), CharacterDisplayError<Self::Connector>> {
        self.transmit(RegisterSelect::Command, value)
    }
}
