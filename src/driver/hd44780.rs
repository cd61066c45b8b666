// HD44780 Support
// The HD44780 struct tracks the controller's function, display control and entry mode
// registers and turns each display operation into instructions. It never touches the bus
// itself; every transfer goes through the CommandCodec handed to it, which for this crate
// is the 4-bit NibbleTransport over a PCF8574T backpack.
//

use embedded_hal::delay::DelayNs;

use crate::{
    bit_configurations::{DisplayControl, DisplayFunction, EntryMode},
    driver::{CommandCodec, RegisterSelect},
    CharacterDisplayError, DotSize, LcdDisplayType, TeardownError, TeardownStep,
};

// commands
const LCD_CMD_CLEARDISPLAY: u8 = 0x01; //  Clear display, set cursor position to zero
const LCD_CMD_RETURNHOME: u8 = 0x02; //  Set cursor position to zero
const LCD_CMD_CURSORSHIFT: u8 = 0x10; //  Lets you move the cursor
const LCD_CMD_SETCGRAMADDR: u8 = 0x40; //  Used to set the CGRAM (character generator RAM) with characters
const LCD_CMD_SETDDRAMADDR: u8 = 0x80; //  Used to set the DDRAM (Display Data RAM)

// flags for display/cursor shift
const LCD_FLAG_DISPLAYMOVE: u8 = 0x08; //  Flag for moving the display
const LCD_FLAG_MOVERIGHT: u8 = 0x04; //  Flag for moving right
const LCD_FLAG_MOVELEFT: u8 = 0x00; //  Flag for moving left

// 4-bit reset handshake nibbles
const LCD_NIBBLE_8BITMODE: u8 = 0x03; //  Function set, 8 bit interface
const LCD_NIBBLE_4BITMODE: u8 = 0x02; //  Function set, 4 bit interface

/// DDRAM address of the first column of each row. Rows 2 and 3 continue rows 0 and 1.
const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Number of CGRAM slots for custom characters
pub const CUSTOM_CHARACTER_SLOTS: u8 = 8;

pub struct HD44780 {
    lcd_type: LcdDisplayType,
    display_function: DisplayFunction,
    display_control: DisplayControl,
    display_mode: EntryMode,
}

impl HD44780 {
    /// The function set is fixed here; the other registers get their power-on values in
    /// [`HD44780::init`].
    pub fn new(lcd_type: LcdDisplayType, dot_size: DotSize) -> Self {
        Self {
            lcd_type,
            display_function: DisplayFunction::for_geometry(lcd_type.rows(), dot_size),
            display_control: DisplayControl::default(),
            display_mode: EntryMode::default(),
        }
    }

    pub fn lcd_type(&self) -> LcdDisplayType {
        self.lcd_type
    }

    pub fn display_function(&self) -> DisplayFunction {
        self.display_function
    }

    pub fn display_control(&self) -> DisplayControl {
        self.display_control
    }

    pub fn display_mode(&self) -> EntryMode {
        self.display_mode
    }

    /// Runs the power-on handshake that forces the controller into 4-bit mode regardless of
    /// the state it was left in, then applies the function set and the power-on defaults.
    pub fn init<D: CommandCodec>(
        &mut self,
        device: &mut D,
    ) -> Result<(), CharacterDisplayError<D::Connector>> {
        let timing = *device.timing();
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "initializing {} display, function set {=u8:#x}",
            self.lcd_type,
            self.display_function.command()
        );

        device.delay().delay_us(timing.power_on_us);
        device.latch_backlight()?;
        device.delay().delay_us(timing.prime_us);

        // three times 8-bit mode, then switch to 4-bit
        device.send_nibble(RegisterSelect::Command, LCD_NIBBLE_8BITMODE)?;
        device.delay().delay_us(timing.reset_wait_us);
        device.send_nibble(RegisterSelect::Command, LCD_NIBBLE_8BITMODE)?;
        device.delay().delay_us(timing.reset_wait_us);
        device.send_nibble(RegisterSelect::Command, LCD_NIBBLE_8BITMODE)?;
        device.delay().delay_us(timing.reset_final_us);
        device.send_nibble(RegisterSelect::Command, LCD_NIBBLE_4BITMODE)?;
        #[cfg(feature = "defmt")]
        defmt::debug!("4-bit interface selected");

        device.command(self.display_function.command())?;
        self.display_control = DisplayControl::power_on_default();
        device.command(self.display_control.command())?;
        self.clear(device)?;
        self.display_mode = EntryMode::power_on_default();
        device.command(self.display_mode.command())?;
        self.home(device)?;
        #[cfg(feature = "defmt")]
        defmt::debug!("display ready");
        Ok(())
    }

    pub fn clear<D: CommandCodec>(
        &mut self,
        device: &mut D,
    ) -> Result<(), CharacterDisplayError<D::Connector>> {
        device.command(LCD_CMD_CLEARDISPLAY)?;
        let wait = device.timing().clear_home_us;
        device.delay().delay_us(wait);
        Ok(())
    }

    pub fn home<D: CommandCodec>(
        &mut self,
        device: &mut D,
    ) -> Result<(), CharacterDisplayError<D::Connector>> {
        device.command(LCD_CMD_RETURNHOME)?;
        let wait = device.timing().clear_home_us;
        device.delay().delay_us(wait);
        Ok(())
    }

    /// Moves the cursor. Out of range coordinates are clamped to the last row and column.
    pub fn set_cursor<D: CommandCodec>(
        &mut self,
        device: &mut D,
        col: u8,
        row: u8,
    ) -> Result<(), CharacterDisplayError<D::Connector>> {
        let row = row.min(self.lcd_type.rows() - 1);
        let col = col.min(self.lcd_type.cols() - 1);
        let address = ROW_OFFSETS[row as usize].wrapping_add(col) & 0x7F;
        device.command(LCD_CMD_SETDDRAMADDR | address)
    }

    pub fn show_display<D: CommandCodec>(
        &mut self,
        device: &mut D,
        show_display: bool,
    ) -> Result<(), CharacterDisplayError<D::Connector>> {
        self.display_control.set_display_on(show_display);
        device.command(self.display_control.command())
    }

    pub fn show_cursor<D: CommandCodec>(
        &mut self,
        device: &mut D,
        show_cursor: bool,
    ) -> Result<(), CharacterDisplayError<D::Connector>> {
        self.display_control.set_cursor_on(show_cursor);
        device.command(self.display_control.command())
    }

    pub fn blink_cursor<D: CommandCodec>(
        &mut self,
        device: &mut D,
        blink_cursor: bool,
    ) -> Result<(), CharacterDisplayError<D::Connector>> {
        self.display_control.set_blink_on(blink_cursor);
        device.command(self.display_control.command())
    }

    /// Drops both the underline and the blinking block with a single instruction.
    pub fn hide_cursor<D: CommandCodec>(
        &mut self,
        device: &mut D,
    ) -> Result<(), CharacterDisplayError<D::Connector>> {
        self.display_control.set_cursor_on(false);
        self.display_control.set_blink_on(false);
        device.command(self.display_control.command())
    }

    pub fn scroll_display_left<D: CommandCodec>(
        &mut self,
        device: &mut D,
    ) -> Result<(), CharacterDisplayError<D::Connector>> {
        device.command(LCD_CMD_CURSORSHIFT | LCD_FLAG_DISPLAYMOVE | LCD_FLAG_MOVELEFT)
    }

    pub fn scroll_display_right<D: CommandCodec>(
        &mut self,
        device: &mut D,
    ) -> Result<(), CharacterDisplayError<D::Connector>> {
        device.command(LCD_CMD_CURSORSHIFT | LCD_FLAG_DISPLAYMOVE | LCD_FLAG_MOVERIGHT)
    }

    pub fn left_to_right<D: CommandCodec>(
        &mut self,
        device: &mut D,
    ) -> Result<(), CharacterDisplayError<D::Connector>> {
        self.display_mode.set_left_to_right(true);
        device.command(self.display_mode.command())
    }

    pub fn right_to_left<D: CommandCodec>(
        &mut self,
        device: &mut D,
    ) -> Result<(), CharacterDisplayError<D::Connector>> {
        self.display_mode.set_left_to_right(false);
        device.command(self.display_mode.command())
    }

    pub fn autoscroll<D: CommandCodec>(
        &mut self,
        device: &mut D,
        autoscroll: bool,
    ) -> Result<(), CharacterDisplayError<D::Connector>> {
        self.display_mode.set_shift_increment(autoscroll);
        device.command(self.display_mode.command())
    }

    pub fn backlight<D: CommandCodec>(
        &mut self,
        device: &mut D,
        on: bool,
    ) -> Result<(), CharacterDisplayError<D::Connector>> {
        device.set_backlight(on)
    }

    /// Loads a 5x8 glyph into CGRAM. Only the low three bits of `location` are used; the
    /// masked slot is returned. The DDRAM address is not restored, so the next write needs a
    /// cursor move or a clear to land on screen.
    pub fn create_char<D: CommandCodec>(
        &mut self,
        device: &mut D,
        location: u8,
        charmap: [u8; 8],
    ) -> Result<u8, CharacterDisplayError<D::Connector>> {
        let location = location % CUSTOM_CHARACTER_SLOTS;
        device.command(LCD_CMD_SETCGRAMADDR | (location << 3))?;
        for &charmap_byte in charmap.iter() {
            device.transmit(RegisterSelect::Data, charmap_byte)?;
        }
        Ok(location)
    }

    /// Sends raw character codes. If a transfer fails part way, the error reports how many
    /// bytes made it to the display.
    pub fn write_bytes<D: CommandCodec>(
        &mut self,
        device: &mut D,
        bytes: &[u8],
    ) -> Result<usize, CharacterDisplayError<D::Connector>> {
        for (written, &byte) in bytes.iter().enumerate() {
            if let Err(e) = device.transmit(RegisterSelect::Data, byte) {
                return Err(match e {
                    CharacterDisplayError::IoError(error) => {
                        CharacterDisplayError::IncompleteWrite { written, error }
                    }
                    other => other,
                });
            }
        }
        Ok(bytes.len())
    }

    /// Each `char` is truncated to its low byte, which maps ASCII onto the HD44780 ROM.
    pub fn print<D: CommandCodec>(
        &mut self,
        device: &mut D,
        text: &str,
    ) -> Result<(), CharacterDisplayError<D::Connector>> {
        for c in text.chars() {
            device.transmit(RegisterSelect::Data, c as u8)?;
        }
        Ok(())
    }

    /// Blanks and darkens the display. Every step is attempted even when an earlier one
    /// fails; the failures are collected per step.
    pub fn teardown<D: CommandCodec>(
        &mut self,
        device: &mut D,
    ) -> Result<(), TeardownError<D::Connector>> {
        let mut failures = TeardownError::new();
        let result = self.clear(device);
        failures.record(TeardownStep::Clear, result);
        let result = self.backlight(device, false);
        failures.record(TeardownStep::BacklightOff, result);
        let result = self.hide_cursor(device);
        failures.record(TeardownStep::CursorOff, result);
        let result = self.show_display(device, false);
        failures.record(TeardownStep::DisplayOff, result);
        failures.into_result()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use crate::{
        connection::{Connector, I2cConnector},
        driver::transport::NibbleTransport,
        test_utils::{byte_writes, init_transactions, RecordingDelay},
        Timing,
    };
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::{
        delay::NoopDelay,
        i2c::{Mock as I2cMock, Transaction as I2cTransaction},
    };
    use std::vec::Vec;

    type Transport<DELAY> = NibbleTransport<I2cConnector<I2cMock>, DELAY>;

    fn connected_transport<DELAY: DelayNs>(i2c: I2cMock, delay: DELAY) -> Transport<DELAY> {
        let mut transport = NibbleTransport::new(delay, Timing::default(), false);
        transport.attach(I2cConnector::new(i2c, 1).connect(0x27, 1).unwrap());
        transport
    }

    fn commands(values: &[u8]) -> Vec<I2cTransaction> {
        values
            .iter()
            .flat_map(|&value| byte_writes(0x27, value, false, false))
            .collect()
    }

    #[test]
    fn test_init_single_line_5x10() {
        let expected_transactions = init_transactions(0x27, 0x24, false);
        let i2c = I2cMock::new(&expected_transactions);
        let mut i2c_handle = i2c.clone();
        let mut transport = connected_transport(i2c, NoopDelay::new());

        let mut controller = HD44780::new(LcdDisplayType::Lcd16x1, DotSize::Dots5x10);
        assert!(controller.init(&mut transport).is_ok());
        assert!(controller.display_function().dots_5x10());
        assert!(!controller.display_function().two_line());
        assert_eq!(controller.display_control().command(), 0x0C);
        assert_eq!(controller.display_mode().command(), 0x06);
        i2c_handle.done();
    }

    #[test]
    fn test_init_timing() {
        let expected_transactions = init_transactions(0x27, 0x28, false);
        let i2c = I2cMock::new(&expected_transactions);
        let mut i2c_handle = i2c.clone();
        let mut transport = connected_transport(i2c, RecordingDelay::default());

        let mut controller = HD44780::new(LcdDisplayType::Lcd16x2, DotSize::Dots5x8);
        assert!(controller.init(&mut transport).is_ok());

        let waits = &transport.delay().waits_us;
        assert_eq!(
            waits[..12],
            [50_000, 1_000, 1, 50, 45_000, 1, 50, 45_000, 1, 50, 150, 1]
        );
        // clear and home each wait for the controller after their two nibbles
        assert_eq!(waits.iter().filter(|&&us| us == 2_000).count(), 2);
        assert_eq!(waits.last(), Some(&2_000));
        i2c_handle.done();
    }

    #[test]
    fn test_init_aborts_on_failure() {
        let expected_transactions = [
            I2cTransaction::write(0x27, std::vec![0x00]),
            I2cTransaction::write(0x27, std::vec![0x34]).with_error(ErrorKind::Other),
        ];
        let i2c = I2cMock::new(&expected_transactions);
        let mut i2c_handle = i2c.clone();
        let mut transport = connected_transport(i2c, NoopDelay::new());

        let mut controller = HD44780::new(LcdDisplayType::Lcd16x2, DotSize::Dots5x8);
        assert!(matches!(
            controller.init(&mut transport),
            Err(CharacterDisplayError::IoError(ErrorKind::Other))
        ));
        i2c_handle.done();
    }

    #[test]
    fn test_set_cursor_clamps() {
        // 16x2: (3, 5) lands on row 1, (99, 0) on column 15
        let expected_transactions = commands(&[0xC3, 0xC3, 0x8F, 0xCF]);
        let i2c = I2cMock::new(&expected_transactions);
        let mut i2c_handle = i2c.clone();
        let mut transport = connected_transport(i2c, NoopDelay::new());

        let mut controller = HD44780::new(LcdDisplayType::Lcd16x2, DotSize::Dots5x8);
        assert!(controller.set_cursor(&mut transport, 3, 5).is_ok());
        assert!(controller.set_cursor(&mut transport, 3, 1).is_ok());
        assert!(controller.set_cursor(&mut transport, 99, 0).is_ok());
        assert!(controller.set_cursor(&mut transport, 255, 255).is_ok());
        i2c_handle.done();
    }

    #[test]
    fn test_set_cursor_row_offsets() {
        let expected_transactions = commands(&[0x80, 0xC0, 0x94, 0xD4, 0xE7]);
        let i2c = I2cMock::new(&expected_transactions);
        let mut i2c_handle = i2c.clone();
        let mut transport = connected_transport(i2c, NoopDelay::new());

        let mut controller = HD44780::new(LcdDisplayType::Lcd20x4, DotSize::Dots5x8);
        for row in 0..4 {
            assert!(controller.set_cursor(&mut transport, 0, row).is_ok());
        }
        assert!(controller.set_cursor(&mut transport, 19, 3).is_ok());
        i2c_handle.done();
    }

    #[test]
    fn test_display_control_toggles() {
        // on, underline, blink, underline off, blink off, both via hide_cursor
        let expected_transactions =
            commands(&[0x0C, 0x0E, 0x0F, 0x0D, 0x0C, 0x0E, 0x0F, 0x0C, 0x08]);
        let i2c = I2cMock::new(&expected_transactions);
        let mut i2c_handle = i2c.clone();
        let mut transport = connected_transport(i2c, NoopDelay::new());

        let mut controller = HD44780::new(LcdDisplayType::Lcd16x2, DotSize::Dots5x8);
        assert!(controller.show_display(&mut transport, true).is_ok());
        let before = controller.display_control();
        assert!(controller.show_cursor(&mut transport, true).is_ok());
        assert!(controller.blink_cursor(&mut transport, true).is_ok());
        assert!(controller.show_cursor(&mut transport, false).is_ok());
        assert!(controller.blink_cursor(&mut transport, false).is_ok());
        assert_eq!(controller.display_control(), before);

        assert!(controller.show_cursor(&mut transport, true).is_ok());
        assert!(controller.blink_cursor(&mut transport, true).is_ok());
        assert!(controller.hide_cursor(&mut transport).is_ok());
        assert!(!controller.display_control().cursor_on());
        assert!(!controller.display_control().blink_on());
        assert!(controller.show_display(&mut transport, false).is_ok());
        i2c_handle.done();
    }

    #[test]
    fn test_entry_mode_changes() {
        let expected_transactions = commands(&[0x06, 0x07, 0x05, 0x04, 0x06]);
        let i2c = I2cMock::new(&expected_transactions);
        let mut i2c_handle = i2c.clone();
        let mut transport = connected_transport(i2c, NoopDelay::new());

        let mut controller = HD44780::new(LcdDisplayType::Lcd16x2, DotSize::Dots5x8);
        assert!(controller.left_to_right(&mut transport).is_ok());
        assert!(controller.autoscroll(&mut transport, true).is_ok());
        assert!(controller.right_to_left(&mut transport).is_ok());
        assert!(!controller.display_mode().left_to_right());
        assert!(controller.autoscroll(&mut transport, false).is_ok());
        assert!(controller.left_to_right(&mut transport).is_ok());
        i2c_handle.done();
    }

    #[test]
    fn test_scroll_display() {
        let expected_transactions = commands(&[0x18, 0x1C]);
        let i2c = I2cMock::new(&expected_transactions);
        let mut i2c_handle = i2c.clone();
        let mut transport = connected_transport(i2c, NoopDelay::new());

        let mut controller = HD44780::new(LcdDisplayType::Lcd16x2, DotSize::Dots5x8);
        assert!(controller.scroll_display_left(&mut transport).is_ok());
        assert!(controller.scroll_display_right(&mut transport).is_ok());
        i2c_handle.done();
    }

    #[test]
    fn test_create_char_masks_location() {
        let charmap = [0x00, 0x0A, 0x1F, 0x1F, 0x0E, 0x04, 0x00, 0x00];
        // slot 9 wraps to slot 1, CGRAM address 0x08
        let mut expected_transactions = commands(&[0x48]);
        for &row in charmap.iter() {
            expected_transactions.extend(byte_writes(0x27, row, true, false));
        }
        let i2c = I2cMock::new(&expected_transactions);
        let mut i2c_handle = i2c.clone();
        let mut transport = connected_transport(i2c, NoopDelay::new());

        let mut controller = HD44780::new(LcdDisplayType::Lcd16x2, DotSize::Dots5x8);
        let location = controller.create_char(&mut transport, 9, charmap);
        assert!(matches!(location, Ok(1)));
        i2c_handle.done();
    }

    #[test]
    fn test_write_bytes_reports_progress() {
        let mut expected_transactions = Vec::new();
        expected_transactions.extend(byte_writes(0x27, b'a', true, false));
        expected_transactions.extend(byte_writes(0x27, b'b', true, false));
        expected_transactions
            .push(I2cTransaction::write(0x27, std::vec![0x65]).with_error(ErrorKind::Other));
        let i2c = I2cMock::new(&expected_transactions);
        let mut i2c_handle = i2c.clone();
        let mut transport = connected_transport(i2c, NoopDelay::new());

        let mut controller = HD44780::new(LcdDisplayType::Lcd16x2, DotSize::Dots5x8);
        assert!(matches!(
            controller.write_bytes(&mut transport, b"abcd"),
            Err(CharacterDisplayError::IncompleteWrite {
                written: 2,
                error: ErrorKind::Other
            })
        ));
        i2c_handle.done();
    }

    #[test]
    fn test_write_bytes_complete() {
        let mut expected_transactions = Vec::new();
        for &byte in b"Hi\x00" {
            expected_transactions.extend(byte_writes(0x27, byte, true, false));
        }
        let i2c = I2cMock::new(&expected_transactions);
        let mut i2c_handle = i2c.clone();
        let mut transport = connected_transport(i2c, NoopDelay::new());

        let mut controller = HD44780::new(LcdDisplayType::Lcd16x2, DotSize::Dots5x8);
        assert!(matches!(
            controller.write_bytes(&mut transport, b"Hi\x00"),
            Ok(3)
        ));
        assert!(matches!(controller.write_bytes(&mut transport, &[]), Ok(0)));
        i2c_handle.done();
    }

    #[test]
    fn test_clear_twice() {
        let expected_transactions = commands(&[0x01, 0x01]);
        let i2c = I2cMock::new(&expected_transactions);
        let mut i2c_handle = i2c.clone();
        let mut transport = connected_transport(i2c, RecordingDelay::default());

        let mut controller = HD44780::new(LcdDisplayType::Lcd16x2, DotSize::Dots5x8);
        assert!(controller.clear(&mut transport).is_ok());
        assert!(controller.clear(&mut transport).is_ok());
        assert_eq!(
            transport.delay().waits_us,
            [1, 50, 1, 50, 2_000, 1, 50, 1, 50, 2_000]
        );
        i2c_handle.done();
    }

    #[test]
    fn test_teardown_collects_every_failure() {
        let mut expected_transactions = Vec::new();
        // clear fails on its first write
        expected_transactions
            .push(I2cTransaction::write(0x27, std::vec![0x04]).with_error(ErrorKind::Other));
        // backlight off
        expected_transactions.push(I2cTransaction::write(0x27, std::vec![0x00]));
        // cursor off succeeds
        expected_transactions.extend(commands(&[0x08]));
        // display off fails on its last write
        let mut display_off = byte_writes(0x27, 0x08, false, false);
        display_off[3] = I2cTransaction::write(0x27, std::vec![0x80]).with_error(ErrorKind::Other);
        expected_transactions.extend(display_off);
        let i2c = I2cMock::new(&expected_transactions);
        let mut i2c_handle = i2c.clone();
        let mut transport = connected_transport(i2c, NoopDelay::new());

        let mut controller = HD44780::new(LcdDisplayType::Lcd16x2, DotSize::Dots5x8);
        match controller.teardown(&mut transport) {
            Err(failures) => {
                assert_eq!(failures.len(), 2);
                let steps: Vec<TeardownStep> = failures.iter().map(|(step, _)| step).collect();
                assert_eq!(steps, [TeardownStep::Clear, TeardownStep::DisplayOff]);
                assert!(failures.error(TeardownStep::BacklightOff).is_none());
            }
            Ok(()) => panic!("teardown should report the failed steps"),
        }
        assert!(!transport.backlight_enabled());
        i2c_handle.done();
    }
}
