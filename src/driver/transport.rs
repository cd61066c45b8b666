use embedded_hal::delay::DelayNs;

use crate::{
    bit_configurations::Pcf8574Bits,
    connection::{ByteSink, Connector},
    driver::{CommandCodec, RegisterSelect},
    CharacterDisplayError, Timing,
};

/// 4-bit transfer path through a PCF8574T expander. Owns the connection once it has been
/// acquired, the delay provider, and the backlight bit that has to ride along on every write:
/// the backlight transistor is driven by P3, so any byte written without it turns the light off.
pub struct NibbleTransport<CONN, DELAY>
where
    CONN: Connector,
    DELAY: DelayNs,
{
    connection: Option<CONN::Connection>,
    delay: DELAY,
    timing: Timing,
    backlight: bool,
}

impl<CONN, DELAY> NibbleTransport<CONN, DELAY>
where
    CONN: Connector,
    DELAY: DelayNs,
{
    pub fn new(delay: DELAY, timing: Timing, backlight: bool) -> Self {
        Self {
            connection: None,
            delay,
            timing,
            backlight,
        }
    }

    pub fn attach(&mut self, connection: CONN::Connection) {
        self.connection = Some(connection);
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Writes `bits` with the backlight bit applied.
    fn write_bits(&mut self, mut bits: Pcf8574Bits) -> Result<(), CharacterDisplayError<CONN>> {
        bits.set_backlight(self.backlight as u8);
        let connection = self
            .connection
            .as_mut()
            .ok_or(CharacterDisplayError::NotStarted)?;
        connection
            .write_byte(bits.0)
            .map_err(CharacterDisplayError::IoError)
    }
}

impl<CONN, DELAY> CommandCodec for NibbleTransport<CONN, DELAY>
where
    CONN: Connector,
    DELAY: DelayNs,
{
    type Connector = CONN;
    type Delay = DELAY;

    fn timing(&self) -> &Timing {
        &self.timing
    }

    fn delay(&mut self) -> &mut DELAY {
        &mut self.delay
    }

    fn backlight_enabled(&self) -> bool {
        self.backlight
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), CharacterDisplayError<CONN>> {
        self.backlight = on;
        self.latch_backlight()
    }

    fn latch_backlight(&mut self) -> Result<(), CharacterDisplayError<CONN>> {
        self.write_bits(Pcf8574Bits(0))
    }

    fn send_nibble(
        &mut self,
        mode: RegisterSelect,
        nibble: u8,
    ) -> Result<(), CharacterDisplayError<CONN>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("nibble {=u8:#x} rs={}", nibble & 0x0F, mode.is_data());
        let mut bits = Pcf8574Bits(0);
        bits.set_rs(mode.is_data() as u8);
        bits.set_rw(0);
        bits.set_data(nibble & 0x0F);

        // the controller latches D4-D7 on the falling edge of enable
        bits.set_enable(1);
        self.write_bits(bits)?;
        self.delay.delay_us(self.timing.enable_pulse_us);
        bits.set_enable(0);
        self.write_bits(bits)?;
        self.delay.delay_us(self.timing.settle_us);
        Ok(())
    }
}
