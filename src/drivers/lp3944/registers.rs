//! LP3944 register map, LED state encoding, and the LED selector table.
//!
//! ```text
//! Reg  Name     Access  Function
//! 0x0  INPUT1   RO      LED0-7 input levels
//! 0x1  REG1     RO      unused
//! 0x2  PSC0     RW      dim channel 0 prescaler (period)
//! 0x3  PWM0     RW      dim channel 0 duty cycle
//! 0x4  PSC1     RW      dim channel 1 prescaler (period)
//! 0x5  PWM1     RW      dim channel 1 duty cycle
//! 0x6  LS0      RW      LED0-3 selector
//! 0x7  LS1      RW      LED4-7 selector
//! 0x8  REG8     RW      unused
//! 0x9  REG9     RW      unused
//! ```

use crate::error::{Error, Result};

/// Fixed 7-bit bus address of the chip.
pub const DEVICE_ADDRESS: u8 = 0x60;

/// Number of LED outputs.
pub const LED_COUNT: usize = 8;

/// Width of one LED field in a selector register.
const FIELD_MASK: u8 = 0b11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    Input = 0x00,
    Reserved1 = 0x01,
    Prescaler0 = 0x02,
    Pwm0 = 0x03,
    Prescaler1 = 0x04,
    Pwm1 = 0x05,
    LedSelect0 = 0x06,
    LedSelect1 = 0x07,
    Reserved8 = 0x08,
    Reserved9 = 0x09,
}

impl Register {
    pub const fn addr(self) -> u8 {
        self as u8
    }

    pub const fn is_writable(self) -> bool {
        !matches!(self, Self::Input | Self::Reserved1)
    }
}

/// Output mode of one LED (2-bit field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LedState {
    Off = 0b00,
    On = 0b01,
    /// Follows dim channel 0.
    Dim0 = 0b10,
    /// Follows dim channel 1.
    Dim1 = 0b11,
}

impl LedState {
    pub const ALL: [Self; 4] = [Self::Off, Self::On, Self::Dim0, Self::Dim1];

    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode the low two bits; higher bits are ignored.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & FIELD_MASK {
            0b00 => Self::Off,
            0b01 => Self::On,
            0b10 => Self::Dim0,
            _ => Self::Dim1,
        }
    }
}

/// One of the two independent PWM / dimming channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimChannel {
    Dim0,
    Dim1,
}

impl DimChannel {
    pub const fn prescaler_register(self) -> Register {
        match self {
            Self::Dim0 => Register::Prescaler0,
            Self::Dim1 => Register::Prescaler1,
        }
    }

    pub const fn pwm_register(self) -> Register {
        match self {
            Self::Dim0 => Register::Pwm0,
            Self::Dim1 => Register::Pwm1,
        }
    }

    /// The LED state that makes an output follow this channel.
    pub const fn led_state(self) -> LedState {
        match self {
            Self::Dim0 => LedState::Dim0,
            Self::Dim1 => LedState::Dim1,
        }
    }
}

impl TryFrom<u8> for DimChannel {
    type Error = Error;

    fn try_from(channel: u8) -> Result<Self> {
        match channel {
            0 => Ok(Self::Dim0),
            1 => Ok(Self::Dim1),
            other => Err(Error::InvalidChannel(other)),
        }
    }
}

/// Where one LED's 2-bit field lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedSelector {
    pub bank: Register,
    pub offset: u8,
}

impl LedSelector {
    /// Replace this LED's field in `bank_value`, keeping every other bit.
    pub const fn apply(self, bank_value: u8, state: LedState) -> u8 {
        let cleared = bank_value & !(FIELD_MASK << self.offset);
        cleared | (state.bits() << self.offset)
    }

    /// Extract this LED's state from `bank_value`.
    pub const fn extract(self, bank_value: u8) -> LedState {
        LedState::from_bits(bank_value >> self.offset)
    }
}

/// Bank/offset assignment for LED0..LED7, indexed by LED number.
#[rustfmt::skip]
pub const LED_SELECTORS: [LedSelector; LED_COUNT] = [
    LedSelector { bank: Register::LedSelect0, offset: 0 },
    LedSelector { bank: Register::LedSelect0, offset: 2 },
    LedSelector { bank: Register::LedSelect0, offset: 4 },
    LedSelector { bank: Register::LedSelect0, offset: 6 },
    LedSelector { bank: Register::LedSelect1, offset: 0 },
    LedSelector { bank: Register::LedSelect1, offset: 2 },
    LedSelector { bank: Register::LedSelect1, offset: 4 },
    LedSelector { bank: Register::LedSelect1, offset: 6 },
];

/// The two selector registers, in LED order.
pub const LED_BANKS: [Register; 2] = [Register::LedSelect0, Register::LedSelect1];

/// Look up the selector for a logical LED index.
pub fn selector_for(index: u8) -> Result<LedSelector> {
    LED_SELECTORS
        .get(usize::from(index))
        .copied()
        .ok_or(Error::InvalidIndex(index))
}
