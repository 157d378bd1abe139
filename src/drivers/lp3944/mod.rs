//! LP3944 8-channel LED driver.
//!
//! Each LED has a 2-bit output mode packed four to a selector register
//! (LS0 for LED0-3, LS1 for LED4-7).  Changing one LED is a
//! read-modify-write of its bank: the bank is re-read from the chip on
//! every update, so there is no cached copy that could drift from what
//! the chip really holds.  The PWM and prescaler registers are not shared
//! and are written directly.
//!
//! ## Caller obligations
//!
//! - Call [`Lp3944::init`] before any register access.  Until it succeeds
//!   every register operation fails with [`Error::NotInitialized`].
//! - The read-modify-write is not atomic on the bus.  Two callers updating
//!   LEDs of the same bank concurrently lose updates (last write wins).
//!   Keep a single owner, or hold one mutex around the whole driver.
//!
//! ## Bus sequences (device address 0x60)
//!
//! ```text
//! write: S [0x60 W] [reg] [value] P                  settle write_settle_us
//! read:  S [0x60 W] [reg]                            settle write_settle_us
//!        Sr [0x60 R] [value]                         settle write_settle_us
//!        P                                           settle read_settle_us
//! ```

mod convert;
mod registers;

pub use convert::{
    MAX_DIM_PERIOD_MS, MAX_DUTY_PERCENT, dim_period_ms, dim_period_register, duty_cycle_register,
};
pub use registers::{
    DEVICE_ADDRESS, DimChannel, LED_BANKS, LED_COUNT, LED_SELECTORS, LedSelector, LedState,
    Register, selector_for,
};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, OutputPin};
use embedded_hal::i2c::{self, ErrorKind, NoAcknowledgeSource};
use log::{debug, trace, warn};

use crate::app::ports::BusTransport;
use crate::config::DriverConfig;
use crate::error::{BusError, BusOp, Error, Result};

pub struct Lp3944<B, D, R> {
    bus: B,
    delay: D,
    reset: R,
    config: DriverConfig,
    initialized: bool,
}

impl<B, D, R> Lp3944<B, D, R>
where
    B: BusTransport,
    D: DelayNs,
    R: OutputPin,
{
    /// Build the driver.  Touches no hardware; call [`init`](Self::init) next.
    pub fn new(bus: B, delay: D, reset: R, config: DriverConfig) -> Self {
        Self {
            bus,
            delay,
            reset,
            config,
            initialized: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Release the reset line and configure the bus.
    ///
    /// Bus configuration is attempted up to `bus_init_attempts` times; the
    /// last failure is returned.  A failed call leaves the driver
    /// uninitialized even if an earlier `init()` succeeded.
    pub fn init(&mut self) -> Result<()> {
        self.initialized = false;
        self.config.validate()?;
        self.reset.set_high().map_err(|e| Error::Gpio(e.kind()))?;

        let attempts = self.config.bus_init_attempts;
        for attempt in 1..=attempts {
            match self.bus.configure(&self.config.bus) {
                Ok(()) => {
                    self.initialized = true;
                    debug!(
                        "lp3944: bus configured at {} Hz (attempt {})",
                        self.config.bus.frequency_hz, attempt
                    );
                    return Ok(());
                }
                Err(e) if attempt < attempts => {
                    warn!(
                        "lp3944: bus configure attempt {}/{} failed: {:?}",
                        attempt,
                        attempts,
                        i2c::Error::kind(&e)
                    );
                }
                Err(e) => return Err(BusError::from_transport(BusOp::Configure, &e).into()),
            }
        }
        Err(Error::Config("bus_init_attempts must be at least 1"))
    }

    /// Pulse the hardware reset line low, then high.
    ///
    /// Independent of the bus; may be called before `init()`.  The chip
    /// comes back with every LED off.
    pub fn reset(&mut self) -> Result<()> {
        self.reset.set_low().map_err(|e| Error::Gpio(e.kind()))?;
        if self.config.reset_pulse_us > 0 {
            self.delay.delay_us(self.config.reset_pulse_us);
        }
        self.reset.set_high().map_err(|e| Error::Gpio(e.kind()))?;
        debug!("lp3944: reset pulse issued");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Give back the bus, delay, and reset line.
    pub fn release(self) -> (B, D, R) {
        (self.bus, self.delay, self.reset)
    }

    // ── Register access ───────────────────────────────────────

    /// Single addressed write, followed by the post-write settle delay.
    pub fn write_register(&mut self, register: Register, value: u8) -> Result<()> {
        self.ensure_initialized()?;
        if !register.is_writable() {
            return Err(Error::ReadOnlyRegister(register));
        }

        let frame = [register.addr(), value];
        trace!("lp3944: {:?} <- 0x{:02x}", register, value);
        let result = self.bus.write(DEVICE_ADDRESS, &frame, true);
        self.delay.delay_us(self.config.write_settle_us);
        result.map_err(|e| BusError::from_transport(BusOp::Write, &e))?;
        Ok(())
    }

    /// Latch the register address without a stop, read one byte behind a
    /// repeated start, then stop.
    ///
    /// The stop is sent even when an earlier step failed so the bus is
    /// released; the first failure is the one returned.  A transport that
    /// sends the latch and the read as one transaction can only report an
    /// unacknowledged device address from the read step; that failure is
    /// reported as [`BusOp::Write`], the step where the address first
    /// goes out.
    pub fn read_register(&mut self, register: Register) -> Result<u8> {
        self.ensure_initialized()?;

        let address = [register.addr()];
        let mut data = [0u8; 1];
        let settle_us = self.config.write_settle_us;

        let mut result = self
            .bus
            .write(DEVICE_ADDRESS, &address, false)
            .map_err(|e| BusError::from_transport(BusOp::Write, &e));
        self.delay.delay_us(settle_us);

        if result.is_ok() {
            result = self
                .bus
                .read(DEVICE_ADDRESS, &mut data, false)
                .map_err(|e| BusError::from_transport(read_step_op(&e), &e));
            self.delay.delay_us(settle_us);
        }

        let stopped = self
            .bus
            .stop()
            .map_err(|e| BusError::from_transport(BusOp::Stop, &e));
        self.delay.delay_us(self.config.read_settle_us);

        result?;
        stopped?;
        trace!("lp3944: {:?} -> 0x{:02x}", register, data[0]);
        Ok(data[0])
    }

    // ── LED state ─────────────────────────────────────────────

    /// Set one LED's output mode, leaving the other three LEDs of its bank
    /// untouched.  A failed read skips the write.
    pub fn set_led(&mut self, index: u8, state: LedState) -> Result<()> {
        let selector = selector_for(index)?;
        let previous = self.read_register(selector.bank)?;
        self.write_register(selector.bank, selector.apply(previous, state))
    }

    /// Apply several LED updates with one read-modify-write per bank.
    ///
    /// Every index is checked before the bus is touched.  When an LED
    /// appears more than once the last entry wins.
    ///
    /// Banks are updated in order (LS0, then LS1) and a bus failure stops
    /// the batch where it happened: if LS1 fails, the LS0 update has
    /// already been written and stays applied.
    pub fn set_leds(&mut self, updates: &[(u8, LedState)]) -> Result<()> {
        for &(index, _) in updates {
            selector_for(index)?;
        }

        for bank in LED_BANKS {
            let mut touched = updates
                .iter()
                .filter_map(|&(index, state)| {
                    selector_for(index)
                        .ok()
                        .filter(|selector| selector.bank == bank)
                        .map(|selector| (selector, state))
                })
                .peekable();
            if touched.peek().is_none() {
                continue;
            }

            let previous = self.read_register(bank)?;
            let updated = touched.fold(previous, |value, (selector, state)| {
                selector.apply(value, state)
            });
            self.write_register(bank, updated)?;
        }
        Ok(())
    }

    /// Read back one LED's output mode from its bank register.
    pub fn led_state(&mut self, index: u8) -> Result<LedState> {
        let selector = selector_for(index)?;
        let bank_value = self.read_register(selector.bank)?;
        Ok(selector.extract(bank_value))
    }

    /// Pin levels of LED0..LED7 (bit n = LEDn).
    pub fn read_inputs(&mut self) -> Result<u8> {
        self.read_register(Register::Input)
    }

    // ── Dim channels ──────────────────────────────────────────

    pub fn set_duty_cycle(&mut self, channel: DimChannel, percentage: u8) -> Result<()> {
        let value = duty_cycle_register(percentage)?;
        self.write_register(channel.pwm_register(), value)
    }

    pub fn set_dim_period(&mut self, channel: DimChannel, period_ms: u16) -> Result<()> {
        let value = dim_period_register(period_ms)?;
        trace!(
            "lp3944: {:?} period {} ms -> {} ms effective",
            channel,
            period_ms,
            dim_period_ms(value)
        );
        self.write_register(channel.prescaler_register(), value)
    }

    /// Program period and duty of one channel.  Both values are checked
    /// first, so an invalid argument writes neither register.
    pub fn configure_channel(
        &mut self,
        channel: DimChannel,
        period_ms: u16,
        percentage: u8,
    ) -> Result<()> {
        let prescaler = dim_period_register(period_ms)?;
        let pwm = duty_cycle_register(percentage)?;
        self.write_register(channel.prescaler_register(), prescaler)?;
        self.write_register(channel.pwm_register(), pwm)
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }
}

/// Which step a failure of the read sub-transaction is charged to.
fn read_step_op<E: i2c::Error>(error: &E) -> BusOp {
    match error.kind() {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => BusOp::Write,
        _ => BusOp::Read,
    }
}
