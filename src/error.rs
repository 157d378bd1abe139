//! Unified error types for the LP3944 driver.
//!
//! A single `Error` enum that every layer converts into. All variants are
//! `Copy`: transport and GPIO errors are reduced to their `embedded-hal`
//! error kinds so the driver's error type does not depend on the bus type.

use core::fmt;

use embedded_hal::{digital, i2c};

use crate::drivers::lp3944::Register;

// ---------------------------------------------------------------------------
// Top-level driver error
// ---------------------------------------------------------------------------

/// Every fallible driver operation returns this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A bus sub-transaction failed. Never retried by the driver.
    Bus(BusError),
    /// The reset line could not be driven.
    Gpio(digital::ErrorKind),
    /// LED index outside 0..=7.
    InvalidIndex(u8),
    /// Dim channel outside {0, 1}.
    InvalidChannel(u8),
    /// A human-unit value is outside its accepted domain.
    OutOfRange {
        quantity: Quantity,
        value: u16,
        max: u16,
    },
    /// Write attempted to a read-only register.
    ReadOnlyRegister(Register),
    /// Register access attempted before `init()` completed.
    NotInitialized,
    /// Configuration is invalid or could not be decoded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus: {e}"),
            Self::Gpio(kind) => write!(f, "reset line: {kind:?}"),
            Self::InvalidIndex(index) => write!(f, "invalid LED index {index} (expected 0-7)"),
            Self::InvalidChannel(channel) => {
                write!(f, "invalid dim channel {channel} (expected 0 or 1)")
            }
            Self::OutOfRange {
                quantity,
                value,
                max,
            } => write!(f, "{quantity} {value} out of range (max {max})"),
            Self::ReadOnlyRegister(reg) => write!(f, "register {reg:?} is read-only"),
            Self::NotInitialized => write!(f, "driver not initialised"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Bus errors
// ---------------------------------------------------------------------------

/// Which bus sub-transaction failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    Configure,
    Write,
    Read,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusError {
    pub op: BusOp,
    pub kind: i2c::ErrorKind,
}

impl BusError {
    /// Reduce a transport error to its kind, tagged with the failing step.
    pub fn from_transport<E: i2c::Error>(op: BusOp, error: &E) -> Self {
        Self {
            op,
            kind: error.kind(),
        }
    }
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} failed: {:?}", self.op, self.kind)
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

// ---------------------------------------------------------------------------
// Range errors
// ---------------------------------------------------------------------------

/// The human unit that failed range validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// PWM duty cycle in percent.
    DutyCycle,
    /// Dimming period in milliseconds.
    DimPeriod,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DutyCycle => write!(f, "duty cycle %"),
            Self::DimPeriod => write!(f, "dim period ms"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Driver-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
