//! Fuzz target: `Lp3944::set_leds`
//!
//! The first two bytes seed the LS0/LS1 selector registers of an in-memory
//! chip; every following byte is one update (low nibble = LED index, which
//! may be invalid; bits 4..5 = state).  Asserts that a rejected batch
//! leaves the chip untouched and that an accepted batch only changes the
//! fields it names.
//!
//! cargo fuzz run fuzz_led_updates

#![no_main]

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal::i2c::ErrorKind;
use libfuzzer_sys::fuzz_target;
use lp3944::drivers::lp3944::{LedState, selector_for};
use lp3944::{BusConfig, BusTransport, DriverConfig, Error, Lp3944};

#[derive(Debug)]
struct ChipError;

impl embedded_hal::i2c::Error for ChipError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

struct Chip {
    registers: [u8; 10],
    pointer: usize,
}

impl BusTransport for Chip {
    type Error = ChipError;

    fn configure(&mut self, _config: &BusConfig) -> Result<(), ChipError> {
        Ok(())
    }

    fn write(&mut self, _address: u8, bytes: &[u8], _stop: bool) -> Result<(), ChipError> {
        match *bytes {
            [register] => self.pointer = usize::from(register),
            [register, value] => self.registers[usize::from(register)] = value,
            _ => return Err(ChipError),
        }
        Ok(())
    }

    fn read(&mut self, _address: u8, buffer: &mut [u8], _stop: bool) -> Result<(), ChipError> {
        buffer.fill(self.registers[self.pointer]);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ChipError> {
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let [ls0, ls1, rest @ ..] = data else {
        return;
    };
    let updates: Vec<(u8, LedState)> = rest
        .iter()
        .map(|&b| (b & 0x0f, LedState::from_bits(b >> 4)))
        .collect();

    let mut chip = Chip {
        registers: [0; 10],
        pointer: 0,
    };
    chip.registers[6] = *ls0;
    chip.registers[7] = *ls1;
    let before = chip.registers;

    let mut driver = Lp3944::new(&mut chip, NoDelay, NoPin, DriverConfig::default());
    driver.init().unwrap();
    let result = driver.set_leds(&updates);

    if let Some(&(bad, _)) = updates.iter().find(|&&(index, _)| index > 7) {
        assert_eq!(result, Err(Error::InvalidIndex(bad)));
        assert_eq!(chip.registers, before);
        return;
    }
    assert!(result.is_ok());

    let mut expected = before;
    for &(index, state) in &updates {
        let selector = selector_for(index).unwrap();
        let bank = usize::from(selector.bank.addr());
        expected[bank] = selector.apply(expected[bank], state);
    }
    assert_eq!(chip.registers, expected);
});
