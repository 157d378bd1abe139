//! Port traits: the boundary between the driver core and the platform.
//!
//! The driver never touches a bus peripheral directly. Everything it
//! needs from the platform is expressed as a trait in [`ports`], which
//! keeps the register logic testable without real hardware.

pub mod ports;
