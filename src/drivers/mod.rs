//! Peripheral drivers.

pub mod lp3944;
