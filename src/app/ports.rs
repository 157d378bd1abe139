//! Bus transport port (driven adapter: driver → bus master).
//!
//! ```text
//!   Lp3944 ──▶ BusTransport ──▶ HalBus / platform bus master
//! ```
//!
//! The driver composes register accesses out of these primitive
//! sub-transactions.  A write or read issued with `stop == false` leaves
//! the bus claimed so the next sub-transaction goes out behind a repeated
//! start; [`BusTransport::stop`] releases it.
//!
//! ## Ownership
//!
//! The transport is the only shared mutable resource in the system.
//! Implementations are not expected to lock: whoever owns the driver owns
//! the bus, and callers sharing a driver across threads must wrap the whole
//! driver (not individual calls) in a mutex.

use embedded_hal::i2c;

use crate::config::BusConfig;

// ───────────────────────────────────────────────────────────────
// Bus transport port
// ───────────────────────────────────────────────────────────────

/// Addressed write/read primitives with optional repeated-start semantics.
///
/// Errors are reported through [`embedded_hal::i2c::Error`] so the driver
/// can classify them without knowing the concrete bus type.  Retry and
/// timeout policy belong to the implementation, never to the driver.
pub trait BusTransport {
    type Error: i2c::Error;

    /// Apply clock and buffer parameters.  Called from `Lp3944::init()`.
    fn configure(&mut self, config: &BusConfig) -> Result<(), Self::Error>;

    /// Write `bytes` to the 7-bit `address`.  `stop == false` keeps the bus.
    fn write(&mut self, address: u8, bytes: &[u8], stop: bool) -> Result<(), Self::Error>;

    /// Fill `buffer` from the 7-bit `address`.  `stop == false` keeps the bus.
    fn read(&mut self, address: u8, buffer: &mut [u8], stop: bool) -> Result<(), Self::Error>;

    /// Issue an explicit stop condition.
    fn stop(&mut self) -> Result<(), Self::Error>;
}

impl<T> BusTransport for &mut T
where
    T: BusTransport,
{
    type Error = T::Error;

    fn configure(&mut self, config: &BusConfig) -> Result<(), Self::Error> {
        T::configure(self, config)
    }

    fn write(&mut self, address: u8, bytes: &[u8], stop: bool) -> Result<(), Self::Error> {
        T::write(self, address, bytes, stop)
    }

    fn read(&mut self, address: u8, buffer: &mut [u8], stop: bool) -> Result<(), Self::Error> {
        T::read(self, address, buffer, stop)
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        T::stop(self)
    }
}
