use bitfield::bitfield;

use crate::DotSize;

// Output byte of the PCF8574T based 4-bit LCD interface. The controller data pins D4-D7
// are wired to P4-P7, the control lines to P0-P3.
bitfield! {
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Pcf8574Bits(u8);
    impl Debug;
    pub rs, set_rs: 0, 0;
    pub rw, set_rw: 1, 1;
    pub enable, set_enable: 2, 2;
    pub backlight, set_backlight: 3, 3;
    pub data, set_data: 7, 4;
}

// Function set register. Only the flag bits are stored; the command bit is added
// when the register is rendered into an instruction.
bitfield! {
    /// HD44780 function set register: bus width, line count and font.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct DisplayFunction(u8);
    impl Debug;
    /// `true` for an 8-bit data bus. Always `false` once the display is initialized.
    pub eight_bit_bus, set_eight_bit_bus: 4;
    /// `true` when the controller drives two (or more) display lines.
    pub two_line, set_two_line: 3;
    /// `true` for the 5x10 dot font.
    pub dots_5x10, set_dots_5x10: 2;
}

bitfield! {
    /// HD44780 display control register.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct DisplayControl(u8);
    impl Debug;
    pub display_on, set_display_on: 2;
    /// underline cursor
    pub cursor_on, set_cursor_on: 1;
    pub blink_on, set_blink_on: 0;
}

bitfield! {
    /// HD44780 entry mode register.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct EntryMode(u8);
    impl Debug;
    /// `true` when text flows left to right.
    pub left_to_right, set_left_to_right: 1;
    /// `true` when the display shifts with every character written (autoscroll).
    pub shift_increment, set_shift_increment: 0;
}

const LCD_CMD_ENTRYMODESET: u8 = 0x04; //  Sets the entry mode
const LCD_CMD_DISPLAYCONTROL: u8 = 0x08; //  Controls the display; does stuff like turning it off and on
const LCD_CMD_FUNCTIONSET: u8 = 0x20; //  Used to send the function to set to the display

impl DisplayFunction {
    /// Function set for a 4-bit bus. The two line flag follows the row count. The 5x10 font
    /// is only available on single line displays, so it is ignored when `rows > 1`.
    pub fn for_geometry(rows: u8, dot_size: DotSize) -> Self {
        let mut function = DisplayFunction(0);
        function.set_eight_bit_bus(false);
        function.set_two_line(rows > 1);
        function.set_dots_5x10(rows == 1 && dot_size == DotSize::Dots5x10);
        function
    }

    /// Raw flag bits of the register
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// The function set instruction carrying this register
    pub fn command(&self) -> u8 {
        LCD_CMD_FUNCTIONSET | self.0
    }
}

impl DisplayControl {
    /// Display on, underline cursor off, blink off.
    pub fn power_on_default() -> Self {
        let mut control = DisplayControl(0);
        control.set_display_on(true);
        control
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn command(&self) -> u8 {
        LCD_CMD_DISPLAYCONTROL | self.0
    }
}

impl EntryMode {
    /// Left to right with shift decrement (no autoscroll).
    pub fn power_on_default() -> Self {
        let mut mode = EntryMode(0);
        mode.set_left_to_right(true);
        mode
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn command(&self) -> u8 {
        LCD_CMD_ENTRYMODESET | self.0
    }
}
