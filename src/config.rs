/// Delays used while talking to the HD44780, in microseconds. The datasheet minimums are
/// far below the defaults here, but cheap backpacks and long wires routinely need margin.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Timing {
    /// wait after power is applied before the first instruction (datasheet: >= 40 ms)
    pub power_on_us: u32,
    /// wait after the backlight-only byte primes the expander
    pub prime_us: u32,
    /// wait after each of the first two "function set 8-bit" nibbles of the reset handshake
    pub reset_wait_us: u32,
    /// wait after the third "function set 8-bit" nibble
    pub reset_final_us: u32,
    /// time the enable line is held high (datasheet: >= 450 ns)
    pub enable_pulse_us: u32,
    /// wait after the enable line drops, before the next transfer (datasheet: >= 37 us)
    pub settle_us: u32,
    /// wait after clear display and return home (datasheet: >= 1.52 ms)
    pub clear_home_us: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            power_on_us: 50_000,
            prime_us: 1_000,
            reset_wait_us: 45_000,
            reset_final_us: 150,
            enable_pulse_us: 1,
            settle_us: 50,
            clear_home_us: 2_000,
        }
    }
}

impl Timing {
    /// Millisecond scale pulse and settle delays with a one second wait after priming the
    /// expander. Very slow, but works with modules that miss instructions at the default rate.
    pub const fn conservative() -> Self {
        Self {
            power_on_us: 50_000,
            prime_us: 1_000_000,
            reset_wait_us: 45_000,
            reset_final_us: 150,
            enable_pulse_us: 1_000,
            settle_us: 50_000,
            clear_home_us: 2_000,
        }
    }
}

/// Overrides for how the display is reached and driven.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct DisplayConfig {
    /// I2C address of the PCF8574
    pub address: u8,
    /// index of the I2C bus the backpack is connected to
    pub bus: u8,
    /// backlight state applied from the very first write
    pub backlight: bool,
    pub timing: Timing,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            address: Self::DEFAULT_ADDRESS,
            bus: Self::DEFAULT_BUS,
            backlight: false,
            timing: Timing::default(),
        }
    }
}

impl DisplayConfig {
    /// Most PCF8574T backpacks ship strapped to 0x27
    pub const DEFAULT_ADDRESS: u8 = 0x27;
    pub const DEFAULT_BUS: u8 = 1;

    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_bus(mut self, bus: u8) -> Self {
        self.bus = bus;
        self
    }

    pub fn with_backlight(mut self, on: bool) -> Self {
        self.backlight = on;
        self
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }
}
