//! Command framing on top of the transport.
//!
//! A framed command is chip-select low, the opcode with data/command low, the
//! arguments with data/command high, chip-select high. Pixel payloads go out
//! as separate bursts, each in its own chip-select bracket, so they can be
//! chunked by the transport at any length.

use crate::lines::NoPin;
use crate::transport::{TransportChannel, WordWidth};
use crate::{Error, Result};
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

/// Frames commands and raw bursts over a transport.
pub struct CommandFramer<SPI, DC, CS = NoPin> {
    transport: TransportChannel<SPI>,
    dc: DC,
    cs: Option<CS>,
}

impl<SPI, DC, CS> CommandFramer<SPI, DC, CS>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CS: OutputPin,
{
    /// Wraps a transport and drives the lines idle (deselected, data mode).
    pub fn new(transport: TransportChannel<SPI>, dc: DC, cs: Option<CS>) -> Result<Self> {
        let mut framer = Self { transport, dc, cs };
        framer.deselect()?;
        framer.dc.set_high().map_err(Error::pin)?;
        Ok(framer)
    }

    /// Releases the transport and lines.
    pub fn release(self) -> (TransportChannel<SPI>, DC, Option<CS>) {
        (self.transport, self.dc, self.cs)
    }

    /// Sends one opcode followed by its argument bytes.
    pub fn send_command(&mut self, opcode: u8, data: &[u8]) -> Result<()> {
        self.bracket(|framer| {
            framer.dc.set_low().map_err(Error::pin)?;
            framer.transport.write_scalar(opcode as u32, WordWidth::U8)?;
            framer.dc.set_high().map_err(Error::pin)?;
            framer.transport.write_bytes(data)
        })
    }

    /// Sends `count` copies of one word as a raw burst.
    pub fn burst_repeated(&mut self, word: u32, width: WordWidth, count: usize) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        self.burst(|transport| transport.write_repeated(word, width, count))
    }

    /// Sends distinct words as a raw burst.
    pub fn burst_slice<W: Copy + Into<u32>>(&mut self, words: &[W], width: WordWidth) -> Result<()> {
        if words.is_empty() {
            return Ok(());
        }
        self.burst(|transport| transport.write_slice(words, width))
    }

    /// Sends pre-serialized bytes as a raw burst.
    pub fn burst_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.burst(|transport| transport.write_bytes(bytes))
    }

    fn burst<F>(&mut self, write: F) -> Result<()>
    where
        F: FnOnce(&mut TransportChannel<SPI>) -> Result<()>,
    {
        self.bracket(|framer| {
            framer.dc.set_high().map_err(Error::pin)?;
            write(&mut framer.transport)
        })
    }

    /// Runs `body` with chip-select asserted. The line is released even when
    /// `body` fails; the body's error wins over a release error.
    fn bracket<F>(&mut self, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.select()?;
        let outcome = body(self);
        let released = self.deselect();
        outcome?;
        released
    }

    fn select(&mut self) -> Result<()> {
        match self.cs.as_mut() {
            Some(cs) => cs.set_low().map_err(Error::pin),
            None => Ok(()),
        }
    }

    fn deselect(&mut self) -> Result<()> {
        match self.cs.as_mut() {
            Some(cs) => cs.set_high().map_err(Error::pin),
            None => Ok(()),
        }
    }
}
