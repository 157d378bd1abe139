//! Driver configuration parameters
//!
//! Bus parameters handed to the transport during `init()` plus the settling
//! delays the LP3944 bus requires between sub-transactions.
//! Persisted with postcard; values are validated, never clamped.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fastest SCL the LP3944 accepts (fast mode).
pub const MAX_BUS_FREQUENCY_HZ: u32 = 400_000;

/// Bus-master parameters. Seven-bit addressing, no high-speed mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusConfig {
    /// SCL frequency in Hz
    pub frequency_hz: u32,
    /// Transport buffer timeout (transport-defined units)
    pub buffer_timeout: u16,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 100_000,
            buffer_timeout: u16::MAX,
        }
    }
}

/// Core driver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    pub bus: BusConfig,

    // --- Timing ---
    /// Quiescence after every write sub-transaction (microseconds)
    pub write_settle_us: u32,
    /// Quiescence after the stop that closes a register read (microseconds)
    pub read_settle_us: u32,
    /// Low time of the reset pulse; 0 issues both edges back to back
    pub reset_pulse_us: u32,

    // --- Lifecycle ---
    /// Attempts at configuring the bus before `init()` gives up
    pub bus_init_attempts: u8,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            bus: BusConfig::default(),

            write_settle_us: 50,
            read_settle_us: 1,
            reset_pulse_us: 0,

            bus_init_attempts: 3,
        }
    }
}

impl DriverConfig {
    /// Reject configurations the chip or bus cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.bus.frequency_hz == 0 || self.bus.frequency_hz > MAX_BUS_FREQUENCY_HZ {
            return Err(Error::Config("bus frequency must be 1..=400000 Hz"));
        }
        if self.bus_init_attempts == 0 {
            return Err(Error::Config("bus_init_attempts must be at least 1"));
        }
        if self.write_settle_us == 0 {
            return Err(Error::Config("write_settle_us must be non-zero"));
        }
        Ok(())
    }

    /// Validate and encode for persistent storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.validate()?;
        postcard::to_allocvec(self).map_err(|_| Error::Config("encode failed"))
    }

    /// Decode a stored config. Stored values are re-validated.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let config: Self =
            postcard::from_bytes(bytes).map_err(|_| Error::Config("stored config corrupted"))?;
        config.validate()?;
        Ok(config)
    }
}
