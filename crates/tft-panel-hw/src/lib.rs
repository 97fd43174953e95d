//! TFT Panel Hardware Library
//!
//! Drives ILI9341 and ILI948x based TFT panels over a 4-wire SPI bus with a
//! data/command line, an optional chip-select, reset and backlight line.
//! Works with any `embedded-hal` 1.0 bus, pin and delay implementation.

pub mod bitmap;
pub mod color;
pub mod error;
pub mod framer;
pub mod lines;
pub mod orientation;
pub mod panel;
pub mod sim;
pub mod transport;

pub use error::{Error, Result};
pub use framer::CommandFramer;
pub use lines::{NoPin, PanelPins, ResetStrategy};
pub use orientation::{ColorOrder, Orientation, Rotation};
pub use panel::{AddressWindow, Controller, PanelConfig, TftPanel};
pub use transport::{TransportChannel, WordWidth};
