//! LP3944 LED driver library.
//!
//! Exposes the register logic, the bus port, and the `embedded-hal`
//! adapter for host-side integration testing.  The ESP-IDF bring-up
//! binary lives in `main.rs` behind the `espidf` feature.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;

pub use adapters::hal_bus::{HalBus, HalBusError};
pub use app::ports::BusTransport;
pub use config::{BusConfig, DriverConfig};
pub use drivers::lp3944::{DimChannel, LedState, Lp3944, Register};
pub use error::{BusError, BusOp, Error, Quantity, Result};
