//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter   | Implements    | Connects to                     |
//! |-----------|---------------|---------------------------------|
//! | `hal_bus` | BusTransport  | any `embedded_hal::i2c::I2c`    |

pub mod hal_bus;
