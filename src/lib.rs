//! This Rust `embedded-hal`-based library drives a [HD44780](https://en.wikipedia.org/wiki/Hitachi_HD44780_LCD_controller)
//! compatible character display through a PCF8574 "I2C backpack" in an embedded, `no_std` environment.
//! These backpacks are ubiquitous on eBay and AliExpress and have no clear branding. They wire the display's
//! 4-bit data pins to P4-P7 of the PCF8574 and the RS, RW, enable and backlight lines to P0-P3, so every
//! instruction is sent as two nibbles with an enable pulse each.
//!
//! Key features include:
//! - Convenient, chainable high-level API for controlling the display
//! - Support for custom characters
//! - Backlight control
//! - `core::fmt::Write` implementation for easy use with the `write!` macro
//! - Compatible with the `embedded-hal` traits v1.0 and later
//! - Adjustable timing for slow or marginal modules
//! - Optional support for the `defmt` and `ufmt` logging frameworks
//!
//! ## Usage
//! Add this to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! pcf8574-character-display = { version = "0.1", features = ["defmt"] }
//! ```
//! The `features = ["defmt"]` line is optional and enables the `defmt` feature, which allows the library's errors to be
//! used with the `defmt` logging framework and emits log messages while the display starts and stops. Another optional
//! feature is `features = ["ufmt"]`, which allows the `uwriteln!` and `uwrite!` macros to be used.
//!
//! Create the display from an I2C peripheral wrapped in an [`I2cConnector`]:
//! ```rust
//! use pcf8574_character_display::{CharacterDisplay, DotSize, I2cConnector, LcdDisplayType};
//!
//! // board setup
//! let i2c = ...; // I2C peripheral for bus 1
//! let delay = ...; // DelayNs implementation
//!
//! let mut lcd = CharacterDisplay::new(I2cConnector::new(i2c, 1), LcdDisplayType::Lcd16x2, DotSize::Dots5x8, delay);
//! ```
//! A different backpack address, bus, initial backlight state or timing can be given with
//! [`CharacterDisplay::new_with_config`] and a [`DisplayConfig`].
//!
//! Start the display. This acquires the bus connection and runs the HD44780 initialization sequence:
//! ```rust
//! if let Err(e) = lcd.start() {
//!    panic!("Error initializing LCD: {}", e);
//! }
//! ```
//! Use the display:
//! ```rust
//! // set up the display
//! lcd.backlight(true)?.clear()?.home()?;
//! // print a message
//! lcd.print("Hello, world!")?;
//! // can also use the `core::fmt::write!` macro
//! use core::fmt::Write;
//!
//! write!(lcd, "Hello, world!")?;
//! ```
//! The optional `ufmt` feature enables the `ufmt` crate, which allows the `uwriteln!` and `uwrite!` macros to be used with the display:
//! ```rust
//! use ufmt::uwriteln;
//!
//! uwriteln!(lcd, "Hello, world!")?;
//! ```
//!
//! The various methods for controlling the LCD each return a `Result` that wraps the display object in `Ok()`, allowing for easy chaining
//! of commands. For example:
//! ```rust
//! lcd.backlight(true)?.clear()?.home()?.print("Hello, world!")?;
//! ```
//! ### Custom characters
//! The HD44780 has eight CGRAM slots for user defined 5x8 glyphs. [`CharacterDisplay::register_character`] loads a glyph and
//! returns a [`CustomCharacter`] that can be written like any other character:
//! ```rust
//! let heart = lcd.register_character(0, [0x00, 0x0A, 0x1F, 0x1F, 0x0E, 0x04, 0x00, 0x00])?;
//! lcd.set_cursor(0, 0)?;
//! write!(lcd, "I {} Rust", heart)?;
//! ```
//! ### Shutting down
//! [`CharacterDisplay::stop`] clears the display, turns off the backlight, the cursor and the display. Every step is attempted
//! even if earlier ones fail; the failed steps are reported in a [`TeardownError`].
//!
#![no_std]
use core::fmt::{Debug, Display};

use embedded_hal::delay::DelayNs;

mod bit_configurations;
mod config;
mod connection;
mod driver;
#[cfg(test)]
mod test_utils;

pub use bit_configurations::{DisplayControl, DisplayFunction, EntryMode};
pub use config::{DisplayConfig, Timing};
pub use connection::{ByteSink, ConnectError, Connector, I2cConnection, I2cConnector};
pub use driver::hd44780::CUSTOM_CHARACTER_SLOTS;

use driver::{hd44780::HD44780, transport::NibbleTransport, CommandCodec};

/// Error type of the byte sink behind a connector
pub type SinkError<CONN> = <<CONN as Connector>::Connection as ByteSink>::Error;

/// Errors that can occur when using the LCD backpack
pub enum CharacterDisplayError<CONN>
where
    CONN: Connector,
{
    /// The connector could not provide a connection to the backpack
    ConnectionError(CONN::Error),
    /// A write to the backpack failed
    IoError(SinkError<CONN>),
    /// A multi-byte write failed after `written` bytes reached the display
    IncompleteWrite {
        written: usize,
        error: SinkError<CONN>,
    },
    /// The display has not been started
    NotStarted,
    /// `start()` was called on a display that is already running
    AlreadyStarted,
    /// Formatting error
    FormattingError(core::fmt::Error),
}

impl<CONN> From<core::fmt::Error> for CharacterDisplayError<CONN>
where
    CONN: Connector,
{
    fn from(err: core::fmt::Error) -> Self {
        CharacterDisplayError::FormattingError(err)
    }
}

impl<CONN> From<&CharacterDisplayError<CONN>> for &'static str
where
    CONN: Connector,
{
    fn from(err: &CharacterDisplayError<CONN>) -> Self {
        match err {
            CharacterDisplayError::ConnectionError(_) => "Connection failed",
            CharacterDisplayError::IoError(_) => "Bus write failed",
            CharacterDisplayError::IncompleteWrite { .. } => "Write incomplete",
            CharacterDisplayError::NotStarted => "Display not started",
            CharacterDisplayError::AlreadyStarted => "Display already started",
            CharacterDisplayError::FormattingError(_) => "Formatting error",
        }
    }
}

impl<CONN> Debug for CharacterDisplayError<CONN>
where
    CONN: Connector,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CharacterDisplayError::ConnectionError(e) => {
                f.debug_tuple("ConnectionError").field(e).finish()
            }
            CharacterDisplayError::IoError(e) => f.debug_tuple("IoError").field(e).finish(),
            CharacterDisplayError::IncompleteWrite { written, error } => f
                .debug_struct("IncompleteWrite")
                .field("written", written)
                .field("error", error)
                .finish(),
            CharacterDisplayError::NotStarted => f.write_str("NotStarted"),
            CharacterDisplayError::AlreadyStarted => f.write_str("AlreadyStarted"),
            CharacterDisplayError::FormattingError(e) => {
                f.debug_tuple("FormattingError").field(e).finish()
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl<CONN> defmt::Format for CharacterDisplayError<CONN>
where
    CONN: Connector,
{
    fn format(&self, fmt: defmt::Formatter) {
        let msg: &'static str = From::from(self);
        match self {
            CharacterDisplayError::IncompleteWrite { written, .. } => {
                defmt::write!(fmt, "{} after {} bytes", msg, written)
            }
            _ => defmt::write!(fmt, "{}", msg),
        }
    }
}

#[cfg(feature = "ufmt")]
impl<CONN> ufmt::uDisplay for CharacterDisplayError<CONN>
where
    CONN: Connector,
{
    fn fmt<W>(&self, w: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        let msg: &'static str = From::from(self);
        ufmt::uwrite!(w, "{}", msg)
    }
}

impl<CONN> Display for CharacterDisplayError<CONN>
where
    CONN: Connector,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = From::from(self);
        match self {
            CharacterDisplayError::ConnectionError(e) => write!(f, "{}: {:?}", msg, e),
            CharacterDisplayError::IoError(e) => write!(f, "{}: {:?}", msg, e),
            CharacterDisplayError::IncompleteWrite { written, error } => {
                write!(f, "{} after {} bytes: {:?}", msg, written, error)
            }
            _ => write!(f, "{}", msg),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// The steps of [`CharacterDisplay::stop`], in the order they run.
pub enum TeardownStep {
    Clear,
    BacklightOff,
    CursorOff,
    DisplayOff,
}

impl TeardownStep {
    pub const ALL: [TeardownStep; 4] = [
        TeardownStep::Clear,
        TeardownStep::BacklightOff,
        TeardownStep::CursorOff,
        TeardownStep::DisplayOff,
    ];
}

impl From<&TeardownStep> for &'static str {
    fn from(step: &TeardownStep) -> Self {
        match step {
            TeardownStep::Clear => "clear",
            TeardownStep::BacklightOff => "backlight off",
            TeardownStep::CursorOff => "cursor off",
            TeardownStep::DisplayOff => "display off",
        }
    }
}

impl Display for TeardownStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = From::from(self);
        write!(f, "{}", msg)
    }
}

/// Failures collected while stopping the display, one slot per [`TeardownStep`].
pub struct TeardownError<CONN>
where
    CONN: Connector,
{
    failures: [Option<CharacterDisplayError<CONN>>; 4],
}

impl<CONN> TeardownError<CONN>
where
    CONN: Connector,
{
    pub(crate) fn new() -> Self {
        Self {
            failures: [None, None, None, None],
        }
    }

    pub(crate) fn record(
        &mut self,
        step: TeardownStep,
        result: Result<(), CharacterDisplayError<CONN>>,
    ) {
        if let Err(e) = result {
            #[cfg(feature = "defmt")]
            defmt::warn!("teardown step {} failed: {}", step, e);
            self.failures[step as usize] = Some(e);
        }
    }

    pub(crate) fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// number of failed steps
    pub fn len(&self) -> usize {
        self.failures.iter().filter(|f| f.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The error of a single step, if it failed
    pub fn error(&self, step: TeardownStep) -> Option<&CharacterDisplayError<CONN>> {
        self.failures[step as usize].as_ref()
    }

    /// Iterates over the failed steps in the order they ran
    pub fn iter(&self) -> impl Iterator<Item = (TeardownStep, &CharacterDisplayError<CONN>)> {
        self.failures
            .iter()
            .zip(TeardownStep::ALL)
            .filter_map(|(failure, step)| failure.as_ref().map(|e| (step, e)))
    }
}

impl<CONN> Debug for TeardownError<CONN>
where
    CONN: Connector,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<CONN> Display for TeardownError<CONN>
where
    CONN: Connector,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Teardown failed")?;
        let mut separator = ":";
        for (step, e) in self.iter() {
            write!(f, "{} {}: {}", separator, step, e)?;
            separator = ";";
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl<CONN> defmt::Format for TeardownError<CONN>
where
    CONN: Connector,
{
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Teardown failed in {} steps", self.len());
        for (step, e) in self.iter() {
            defmt::write!(fmt, "; {}: {}", step, e);
        }
    }
}

#[cfg(feature = "ufmt")]
impl<CONN> ufmt::uDisplay for TeardownError<CONN>
where
    CONN: Connector,
{
    fn fmt<W>(&self, w: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        ufmt::uwrite!(w, "Teardown failed")?;
        for (step, e) in self.iter() {
            let step: &'static str = From::from(&step);
            ufmt::uwrite!(w, "; {}: {}", step, e)?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// The type of LCD display. This is used to determine the number of rows and columns.
pub enum LcdDisplayType {
    /// 8x1 display
    Lcd8x1,
    /// 8x2 display
    Lcd8x2,
    /// 16x1 display
    Lcd16x1,
    /// 16x2 display
    Lcd16x2,
    /// 16x4 display
    Lcd16x4,
    /// 20x2 display
    Lcd20x2,
    /// 20x4 display
    Lcd20x4,
    /// 40x2 display
    Lcd40x2,
    /// Any other geometry. Rows are limited to 1-4 and columns to 1-40, the most a single
    /// HD44780 can address.
    Custom { cols: u8, rows: u8 },
}

impl From<&LcdDisplayType> for &'static str {
    fn from(display_type: &LcdDisplayType) -> Self {
        match display_type {
            LcdDisplayType::Lcd8x1 => "8x1",
            LcdDisplayType::Lcd8x2 => "8x2",
            LcdDisplayType::Lcd16x1 => "16x1",
            LcdDisplayType::Lcd16x2 => "16x2",
            LcdDisplayType::Lcd16x4 => "16x4",
            LcdDisplayType::Lcd20x2 => "20x2",
            LcdDisplayType::Lcd20x4 => "20x4",
            LcdDisplayType::Lcd40x2 => "40x2",
            LcdDisplayType::Custom { .. } => "custom",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LcdDisplayType {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}x{}", self.cols(), self.rows());
    }
}

#[cfg(feature = "ufmt")]
impl ufmt::uDisplay for LcdDisplayType {
    fn fmt<W>(&self, w: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        ufmt::uwrite!(w, "{}x{}", self.cols(), self.rows())
    }
}

impl Display for LcdDisplayType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LcdDisplayType::Custom { .. } => write!(f, "{}x{}", self.cols(), self.rows()),
            _ => {
                let msg: &'static str = From::from(self);
                write!(f, "{}", msg)
            }
        }
    }
}

const fn clamp(value: u8, min: u8, max: u8) -> u8 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

impl LcdDisplayType {
    /// Get the number of rows for the display type
    pub const fn rows(&self) -> u8 {
        match self {
            LcdDisplayType::Lcd8x1 | LcdDisplayType::Lcd16x1 => 1,
            LcdDisplayType::Lcd8x2
            | LcdDisplayType::Lcd16x2
            | LcdDisplayType::Lcd20x2
            | LcdDisplayType::Lcd40x2 => 2,
            LcdDisplayType::Lcd16x4 | LcdDisplayType::Lcd20x4 => 4,
            LcdDisplayType::Custom { rows, .. } => clamp(*rows, 1, 4),
        }
    }

    /// Get the number of columns for the display type
    pub const fn cols(&self) -> u8 {
        match self {
            LcdDisplayType::Lcd8x1 | LcdDisplayType::Lcd8x2 => 8,
            LcdDisplayType::Lcd16x1 | LcdDisplayType::Lcd16x2 | LcdDisplayType::Lcd16x4 => 16,
            LcdDisplayType::Lcd20x2 | LcdDisplayType::Lcd20x4 => 20,
            LcdDisplayType::Lcd40x2 => 40,
            LcdDisplayType::Custom { cols, .. } => clamp(*cols, 1, 40),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Character font. The 5x10 font only exists on single line displays and is ignored otherwise.
pub enum DotSize {
    #[default]
    Dots5x8,
    Dots5x10,
}

/// A glyph loaded into one of the CGRAM slots. Writing its code point shows the glyph.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct CustomCharacter {
    location: u8,
    charmap: [u8; 8],
}

impl CustomCharacter {
    /// CGRAM slot, 0 to 7
    pub fn location(&self) -> u8 {
        self.location
    }

    /// The character code that displays this glyph. Same as the slot.
    pub fn code_point(&self) -> u8 {
        self.location
    }

    pub fn charmap(&self) -> &[u8; 8] {
        &self.charmap
    }

    pub fn as_char(&self) -> char {
        char::from(self.location)
    }
}

impl Display for CustomCharacter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use core::fmt::Write;
        f.write_char(self.as_char())
    }
}

#[cfg(feature = "ufmt")]
impl ufmt::uDisplay for CustomCharacter {
    fn fmt<W>(&self, w: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        let mut buffer = [0_u8; 4];
        w.write_str(self.as_char().encode_utf8(&mut buffer))
    }
}

/// HD44780 character display behind a PCF8574 I2C backpack.
pub struct CharacterDisplay<CONN, DELAY>
where
    CONN: Connector,
    DELAY: DelayNs,
{
    connector: CONN,
    config: DisplayConfig,
    transport: NibbleTransport<CONN, DELAY>,
    controller: HD44780,
}

impl<CONN, DELAY> CharacterDisplay<CONN, DELAY>
where
    CONN: Connector,
    DELAY: DelayNs,
{
    /// Create a new character display object with the default configuration: address 0x27 on bus 1,
    /// backlight off and [`Timing::default`].
    pub fn new(connector: CONN, lcd_type: LcdDisplayType, dot_size: DotSize, delay: DELAY) -> Self {
        Self::new_with_config(connector, lcd_type, dot_size, delay, DisplayConfig::default())
    }

    /// Create a new character display object with a specific configuration.
    pub fn new_with_config(
        connector: CONN,
        lcd_type: LcdDisplayType,
        dot_size: DotSize,
        delay: DELAY,
        config: DisplayConfig,
    ) -> Self {
        Self {
            connector,
            config,
            transport: NibbleTransport::new(delay, config.timing, config.backlight),
            controller: HD44780::new(lcd_type, dot_size),
        }
    }

    /// Connect to the backpack and initialize the display. This must be called before using the display,
    /// and only once. If the initialization sequence fails part way the connection is kept, so the
    /// display cannot be started again.
    pub fn start(&mut self) -> Result<(), CharacterDisplayError<CONN>> {
        if self.transport.is_connected() {
            return Err(CharacterDisplayError::AlreadyStarted);
        }
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "connecting to backpack {=u8:#x} on bus {}",
            self.config.address,
            self.config.bus
        );
        let connection = self
            .connector
            .connect(self.config.address, self.config.bus)
            .map_err(CharacterDisplayError::ConnectionError)?;
        self.transport.attach(connection);
        self.controller.init(&mut self.transport)
    }

    /// Clear the display and turn off the backlight, the cursor and the display. The connection is kept.
    pub fn stop(&mut self) -> Result<(), TeardownError<CONN>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("stopping display");
        self.controller.teardown(&mut self.transport)
    }

    /// `true` once `start()` has acquired the connection
    pub fn is_started(&self) -> bool {
        self.transport.is_connected()
    }

    /// returns the `LcdDisplayType` used to create the display
    pub fn display_type(&self) -> LcdDisplayType {
        self.controller.lcd_type()
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn display_function(&self) -> DisplayFunction {
        self.controller.display_function()
    }

    pub fn display_control(&self) -> DisplayControl {
        self.controller.display_control()
    }

    pub fn entry_mode(&self) -> EntryMode {
        self.controller.display_mode()
    }

    pub fn backlight_enabled(&self) -> bool {
        self.transport.backlight_enabled()
    }

    /// returns a mutable reference to the delay object, so it can be shared with the application
    pub fn delay(&mut self) -> &mut DELAY {
        self.transport.delay()
    }

    //--------------------------------------------------------------------------------------------------
    // high level commands, for the user!
    //--------------------------------------------------------------------------------------------------

    /// Clear the display
    pub fn clear(&mut self) -> Result<&mut Self, CharacterDisplayError<CONN>> {
        self.controller.clear(&mut self.transport)?;
        Ok(self)
    }

    /// Set the cursor to the home position.
    pub fn home(&mut self) -> Result<&mut Self, CharacterDisplayError<CONN>> {
        self.controller.home(&mut self.transport)?;
        Ok(self)
    }

    /// Set the cursor position at specified column and row. Columns and rows are zero-indexed.
    /// Positions past the last row or column are clamped to it.
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<&mut Self, CharacterDisplayError<CONN>> {
        self.controller.set_cursor(&mut self.transport, col, row)?;
        Ok(self)
    }

    /// Set the underline cursor visibility.
    pub fn show_cursor(
        &mut self,
        show_cursor: bool,
    ) -> Result<&mut Self, CharacterDisplayError<CONN>> {
        self.controller.show_cursor(&mut self.transport, show_cursor)?;
        Ok(self)
    }

    /// Set the cursor blinking.
    pub fn blink_cursor(
        &mut self,
        blink_cursor: bool,
    ) -> Result<&mut Self, CharacterDisplayError<CONN>> {
        self.controller.blink_cursor(&mut self.transport, blink_cursor)?;
        Ok(self)
    }

    /// Set the display visibility. Display contents are kept while it is off.
    pub fn show_display(
        &mut self,
        show_display: bool,
    ) -> Result<&mut Self, CharacterDisplayError<CONN>> {
        self.controller.show_display(&mut self.transport, show_display)?;
        Ok(self)
    }

    /// Scroll the display to the left.
    pub fn scroll_display_left(&mut self) -> Result<&mut Self, CharacterDisplayError<CONN>> {
        self.controller.scroll_display_left(&mut self.transport)?;
        Ok(self)
    }

    /// Scroll the display to the right.
    pub fn scroll_display_right(&mut self) -> Result<&mut Self, CharacterDisplayError<CONN>> {
        self.controller.scroll_display_right(&mut self.transport)?;
        Ok(self)
    }

    /// Set the text flow direction to left to right.
    pub fn left_to_right(&mut self) -> Result<&mut Self, CharacterDisplayError<CONN>> {
        self.controller.left_to_right(&mut self.transport)?;
        Ok(self)
    }

    /// Set the text flow direction to right to left.
    pub fn right_to_left(&mut self) -> Result<&mut Self, CharacterDisplayError<CONN>> {
        self.controller.right_to_left(&mut self.transport)?;
        Ok(self)
    }

    /// Set the auto scroll mode.
    pub fn autoscroll(&mut self, autoscroll: bool) -> Result<&mut Self, CharacterDisplayError<CONN>> {
        self.controller.autoscroll(&mut self.transport, autoscroll)?;
        Ok(self)
    }

    /// Turn the backlight on or off. The new state is written immediately and kept on every later write.
    pub fn backlight(&mut self, on: bool) -> Result<&mut Self, CharacterDisplayError<CONN>> {
        self.controller.backlight(&mut self.transport, on)?;
        Ok(self)
    }

    /// Prints a string to the LCD at the current cursor position.
    pub fn print(&mut self, text: &str) -> Result<&mut Self, CharacterDisplayError<CONN>> {
        self.controller.print(&mut self.transport, text)?;
        Ok(self)
    }

    /// Load a custom 5x8 glyph into CGRAM slot `location` (0-7, higher values wrap). Each entry of
    /// `charmap` is one pixel row, top to bottom, using the low five bits.
    /// Move the cursor or clear the display before writing text again.
    pub fn register_character(
        &mut self,
        location: u8,
        charmap: [u8; 8],
    ) -> Result<CustomCharacter, CharacterDisplayError<CONN>> {
        let location = self
            .controller
            .create_char(&mut self.transport, location, charmap)?;
        Ok(CustomCharacter { location, charmap })
    }

    /// Writes raw character codes at the current cursor position and returns how many were written.
    /// On a bus failure the error is `IncompleteWrite` with the number of bytes that made it.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize, CharacterDisplayError<CONN>> {
        self.controller.write_bytes(&mut self.transport, bytes)
    }
}

/// Implement the `core::fmt::Write` trait for the LCD backpack, allowing it to be used with the `write!` macro.
impl<CONN, DELAY> core::fmt::Write for CharacterDisplay<CONN, DELAY>
where
    CONN: Connector,
    DELAY: DelayNs,
{
    fn write_str(&mut self, s: &str) -> Result<(), core::fmt::Error> {
        if let Err(_e) = self.print(s) {
            return Err(core::fmt::Error);
        }
        Ok(())
    }
}

#[cfg(feature = "ufmt")]
/// Implement the `ufmt::uWrite` trait for the LCD backpack, allowing it to be used with the `uwriteln!` and `uwrite!` macros.
impl<CONN, DELAY> ufmt::uWrite for CharacterDisplay<CONN, DELAY>
where
    CONN: Connector,
    DELAY: DelayNs,
{
    fn write_str(&mut self, s: &str) -> Result<(), CharacterDisplayError<CONN>> {
        self.print(s)?;
        Ok(())
    }

    type Error = CharacterDisplayError<CONN>;
}
