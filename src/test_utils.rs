extern crate std;

use embedded_hal::delay::DelayNs;
use embedded_hal_mock::eh1::i2c::Transaction as I2cTransaction;
use std::vec::Vec;

/// Delay that records every requested wait, in microseconds
#[derive(Default)]
pub struct RecordingDelay {
    pub waits_us: Vec<u32>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits_us.push(ns / 1_000);
    }

    fn delay_us(&mut self, us: u32) {
        self.waits_us.push(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits_us.push(ms * 1_000);
    }
}

/// The four expander writes that carry one byte: high nibble then low nibble, each
/// written with enable high and then with enable low.
pub fn byte_writes(address: u8, value: u8, rs: bool, backlight: bool) -> [I2cTransaction; 4] {
    let flags = rs as u8 | if backlight { 0b0000_1000 } else { 0 };
    let high = (value & 0xF0) | flags;
    let low = ((value << 4) & 0xF0) | flags;
    [
        I2cTransaction::write(address, std::vec![high | 0b0000_0100]),
        I2cTransaction::write(address, std::vec![high]),
        I2cTransaction::write(address, std::vec![low | 0b0000_0100]),
        I2cTransaction::write(address, std::vec![low]),
    ]
}

/// Every expander write of a successful `start()`
pub fn init_transactions(address: u8, function_set: u8, backlight: bool) -> Vec<I2cTransaction> {
    let bl = if backlight { 0b0000_1000 } else { 0 };
    // backlight-only byte primes the expander
    let mut expected = std::vec![I2cTransaction::write(address, std::vec![bl])];
    // reset handshake: 0x3 three times, then 0x2
    for nibble in [0x30_u8, 0x30, 0x30, 0x20] {
        expected.push(I2cTransaction::write(address, std::vec![nibble | bl | 0b0000_0100]));
        expected.push(I2cTransaction::write(address, std::vec![nibble | bl]));
    }
    // function set, display on, clear, entry mode, home
    for command in [function_set, 0x0C, 0x01, 0x06, 0x02] {
        expected.extend(byte_writes(address, command, false, backlight));
    }
    expected
}
