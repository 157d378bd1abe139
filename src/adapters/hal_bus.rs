//! `embedded-hal` bus adapter.
//!
//! Implements [`BusTransport`] on top of any blocking
//! [`embedded_hal::i2c::I2c`].  The HAL trait has no "write without stop"
//! primitive; instead it offers `write_read`, which the HAL performs as
//! write + repeated start + read + stop.  So a no-stop write is held back
//! and sent together with the read that follows it.
//!
//! | Port call                    | HAL call                          |
//! |------------------------------|-----------------------------------|
//! | `write(.., stop = true)`     | `write`                           |
//! | `write(.., stop = false)`    | held until the next read / stop   |
//! | `read` with a held write     | `write_read` (repeated start)     |
//! | `read` without a held write  | `read`                            |
//! | `stop` with a held write     | `write` (flush)                   |
//! | `stop` after `write_read`    | nothing (the HAL already stopped) |
//!
//! Because the held latch write travels inside `write_read`, a device that
//! does not acknowledge its address fails the port `read` call with
//! `NoAcknowledge(Address)`.  The driver charges that kind to the latch
//! write step.
//!
//! Bus timing (`BusConfig`) is fixed when the HAL peripheral is built, so
//! `configure` only logs the request.

use embedded_hal::i2c::{self, ErrorKind, I2c};
use heapless::Vec;
use log::debug;

use crate::app::ports::BusTransport;
use crate::config::BusConfig;

/// Longest no-stop write that can be held for a repeated start.
pub const HOLD_CAPACITY: usize = 4;

/// Error of the [`HalBus`] adapter.
#[derive(Debug)]
pub enum HalBusError<E> {
    /// The underlying HAL reported an error.
    I2c(E),
    /// A no-stop write exceeded [`HOLD_CAPACITY`].
    HoldOverflow,
}

impl<E: i2c::Error> i2c::Error for HalBusError<E> {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::I2c(e) => e.kind(),
            Self::HoldOverflow => ErrorKind::Overrun,
        }
    }
}

/// Adapter that exposes an `embedded-hal` I2C peripheral as a [`BusTransport`].
pub struct HalBus<I> {
    i2c: I,
    held_address: u8,
    held: Vec<u8, HOLD_CAPACITY>,
}

impl<I: I2c> HalBus<I> {
    pub fn new(i2c: I) -> Self {
        Self {
            i2c,
            held_address: 0,
            held: Vec::new(),
        }
    }

    /// Give back the HAL peripheral.  A held write is dropped.
    pub fn into_inner(self) -> I {
        self.i2c
    }

    fn flush_held(&mut self) -> Result<(), HalBusError<I::Error>> {
        if self.held.is_empty() {
            return Ok(());
        }
        let result = self.i2c.write(self.held_address, &self.held);
        self.held.clear();
        result.map_err(HalBusError::I2c)
    }
}

impl<I: I2c> BusTransport for HalBus<I> {
    type Error = HalBusError<I::Error>;

    fn configure(&mut self, config: &BusConfig) -> Result<(), Self::Error> {
        debug!(
            "hal_bus: {} Hz, buffer timeout {} requested, timing fixed by HAL peripheral",
            config.frequency_hz, config.buffer_timeout
        );
        self.held.clear();
        Ok(())
    }

    fn write(&mut self, address: u8, bytes: &[u8], stop: bool) -> Result<(), Self::Error> {
        self.flush_held()?;
        if stop {
            return self.i2c.write(address, bytes).map_err(HalBusError::I2c);
        }
        self.held
            .extend_from_slice(bytes)
            .map_err(|()| HalBusError::HoldOverflow)?;
        self.held_address = address;
        Ok(())
    }

    fn read(&mut self, address: u8, buffer: &mut [u8], _stop: bool) -> Result<(), Self::Error> {
        // The HAL always closes a transaction with a stop, so a later
        // `stop()` after this read is a no-op.
        if !self.held.is_empty() && self.held_address == address {
            let result = self.i2c.write_read(address, &self.held, buffer);
            self.held.clear();
            return result.map_err(HalBusError::I2c);
        }
        self.flush_held()?;
        self.i2c.read(address, buffer).map_err(HalBusError::I2c)
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.flush_held()
    }
}
