//! Panel protocol and state.
//!
//! Drives an ILI9341 or ILI948x controller: power-on sequence, orientation,
//! address window caching and 24-bit pixel fills.

mod controller;
mod device;

pub mod protocol;

pub use controller::{Controller, InitStep, PanelConfig, ResetTiming, SLEEP_OUT_DELAY_MS};
pub use device::{AddressWindow, TftPanel};
