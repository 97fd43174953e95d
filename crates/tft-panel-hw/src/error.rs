//! Error types for the TFT panel driver.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the panel.
#[derive(Error, Debug)]
pub enum Error {
    /// Target rectangle does not fit inside the current logical extents.
    #[error(
        "rectangle {width}x{height} at ({x}, {y}) outside {limit_width}x{limit_height} display area"
    )]
    OutOfBounds {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        limit_width: u16,
        limit_height: u16,
    },

    /// SPI transfer failed.
    #[error("SPI transfer failed: {0:?}")]
    Spi(embedded_hal::spi::ErrorKind),

    /// Chip-select, data/command, reset or backlight line could not be driven.
    #[error("control line error: {0:?}")]
    Pin(embedded_hal::digital::ErrorKind),

    /// Bitmap source is not something the streamer can forward.
    #[error("Invalid bitmap: {0}")]
    Bitmap(String),

    /// Bitmap source I/O error.
    #[error("Bitmap source I/O error: {0}")]
    Source(#[from] std::io::Error),

    /// Word width outside the 8/16/24-bit controller RAM formats.
    #[error("Unsupported word width: {0} bytes")]
    WordWidth(usize),

    /// Transport buffer cannot hold a single 24-bit word.
    #[error("Transport buffer too small: {0} bytes (minimum 3)")]
    BufferCapacity(usize),

    /// Fixed scroll margins exceed the panel height.
    #[error("Scroll margins {top}+{bottom} exceed panel height {height}")]
    ScrollArea { top: u16, bottom: u16, height: u16 },

    /// Pixel slice does not cover the target rectangle exactly.
    #[error("Pixel count mismatch: expected {expected}, got {actual}")]
    PixelCount { expected: usize, actual: usize },

    /// Invalid controller name.
    #[error("Invalid controller: {0}")]
    InvalidController(String),

    /// Invalid rotation value.
    #[error("Invalid rotation: {0}")]
    InvalidRotation(String),

    /// Invalid color order value.
    #[error("Invalid color order: {0}")]
    InvalidColorOrder(String),
}

impl Error {
    pub(crate) fn spi<E: embedded_hal::spi::Error>(err: E) -> Self {
        Error::Spi(err.kind())
    }

    pub(crate) fn pin<E: embedded_hal::digital::Error>(err: E) -> Self {
        Error::Pin(err.kind())
    }
}
