//! In-memory panel wire for tests and host-side rendering.
//!
//! A [`Wire`] hands out an SPI bus, output pins and a delay that all record
//! into one shared event log. The log can be decoded back into framed
//! commands and pixel bursts, and replayed into a [`Framebuffer`] that models
//! controller memory.

mod framebuffer;

pub use framebuffer::Framebuffer;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, SpiBus};
use std::cell::RefCell;
use std::rc::Rc;

/// Control line identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    ChipSelect,
    DataCommand,
    Reset,
    Backlight,
}

/// One recorded wire event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireEvent {
    /// A control line was driven.
    Level { line: Line, high: bool },
    /// Bytes written on the bus by a single transfer.
    Transfer(Vec<u8>),
    /// Blocking wait.
    Delay { ns: u64 },
}

/// A framed command or a raw pixel burst decoded from the event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Command { opcode: u8, data: Vec<u8> },
    Burst(Vec<u8>),
}

impl Frame {
    /// Returns the opcode of a command frame.
    pub fn opcode(&self) -> Option<u8> {
        match self {
            Frame::Command { opcode, .. } => Some(*opcode),
            Frame::Burst(_) => None,
        }
    }
}

#[derive(Default)]
struct WireState {
    events: Vec<WireEvent>,
    /// Successful writes left before the bus starts failing.
    writes_left: Option<usize>,
    /// Lines that can no longer be driven.
    failed_lines: Vec<Line>,
}

/// Shared recording wire.
#[derive(Clone, Default)]
pub struct Wire {
    state: Rc<RefCell<WireState>>,
}

impl Wire {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a bus recording into this wire.
    pub fn bus(&self) -> SimBus {
        SimBus { wire: self.clone() }
    }

    /// Returns an output pin recording into this wire.
    pub fn pin(&self, line: Line) -> SimPin {
        SimPin {
            wire: self.clone(),
            line,
        }
    }

    /// Returns a delay that records instead of sleeping.
    pub fn delay(&self) -> SimDelay {
        SimDelay { wire: self.clone() }
    }

    /// Makes every bus write after the next `writes` successful ones fail.
    pub fn fail_after(&self, writes: usize) {
        self.state.borrow_mut().writes_left = Some(writes);
    }

    /// Makes every later attempt to drive `line` fail.
    pub fn fail_line(&self, line: Line) {
        self.state.borrow_mut().failed_lines.push(line);
    }

    /// Drops all recorded events.
    pub fn clear(&self) {
        self.state.borrow_mut().events.clear();
    }

    pub fn events(&self) -> Vec<WireEvent> {
        self.state.borrow().events.clone()
    }

    /// Payloads of all bus transfers in order.
    pub fn transfers(&self) -> Vec<Vec<u8>> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|e| match e {
                WireEvent::Transfer(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    /// Levels a line was driven to, in order.
    pub fn levels(&self, line: Line) -> Vec<bool> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|e| match e {
                WireEvent::Level { line: l, high } if *l == line => Some(*high),
                _ => None,
            })
            .collect()
    }

    /// Recorded waits in whole milliseconds.
    pub fn delays_ms(&self) -> Vec<u64> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|e| match e {
                WireEvent::Delay { ns } => Some(ns / 1_000_000),
                _ => None,
            })
            .collect()
    }

    /// Decodes the event log into frames.
    pub fn frames(&self) -> Vec<Frame> {
        decode(&self.state.borrow().events)
    }

    /// Opcodes of all command frames in order.
    pub fn opcodes(&self) -> Vec<u8> {
        self.frames().iter().filter_map(Frame::opcode).collect()
    }

    fn record(&self, event: WireEvent) {
        self.state.borrow_mut().events.push(event);
    }

    fn record_level(&self, line: Line, high: bool) -> Result<(), SimError> {
        let mut state = self.state.borrow_mut();
        if state.failed_lines.contains(&line) {
            return Err(SimError);
        }
        state.events.push(WireEvent::Level { line, high });
        Ok(())
    }

    fn record_write(&self, bytes: &[u8]) -> Result<(), SimError> {
        let mut state = self.state.borrow_mut();
        match state.writes_left {
            Some(0) => return Err(SimError),
            Some(ref mut left) => *left -= 1,
            None => {}
        }
        state.events.push(WireEvent::Transfer(bytes.to_vec()));
        Ok(())
    }
}

/// Decodes wire events into frames.
///
/// Bytes sent with data/command low start one command frame per byte; data
/// bytes extend the open frame until chip-select is released, otherwise they
/// open a burst. Without a chip-select line, data after a command is always
/// attributed to that command.
pub fn decode(events: &[WireEvent]) -> Vec<Frame> {
    let mut frames = Vec::new();
    let mut data_mode = true;
    let mut open = false;

    for event in events {
        match event {
            WireEvent::Level {
                line: Line::ChipSelect,
                ..
            } => open = false,
            WireEvent::Level {
                line: Line::DataCommand,
                high,
            } => data_mode = *high,
            WireEvent::Transfer(bytes) if !data_mode => {
                frames.extend(bytes.iter().map(|&opcode| Frame::Command {
                    opcode,
                    data: Vec::new(),
                }));
                open = true;
            }
            WireEvent::Transfer(bytes) => {
                let current = if open { frames.last_mut() } else { None };
                match current {
                    Some(Frame::Command { data, .. }) | Some(Frame::Burst(data)) => {
                        data.extend_from_slice(bytes)
                    }
                    None => {
                        frames.push(Frame::Burst(bytes.clone()));
                        open = true;
                    }
                }
            }
            _ => {}
        }
    }

    frames
}

/// Error returned by a [`SimBus`] after its failure budget is spent, or by a
/// [`SimPin`] whose line was failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimError;

impl spi::Error for SimError {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

impl digital::Error for SimError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

/// Recording SPI bus.
pub struct SimBus {
    wire: Wire,
}

impl spi::ErrorType for SimBus {
    type Error = SimError;
}

impl SpiBus<u8> for SimBus {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.wire.record_write(words)
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        read.fill(0);
        self.wire.record_write(write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.wire.record_write(words)?;
        words.fill(0);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Recording output pin.
pub struct SimPin {
    wire: Wire,
    line: Line,
}

impl digital::ErrorType for SimPin {
    type Error = SimError;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.wire.record_level(self.line, false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.wire.record_level(self.line, true)
    }
}

/// Recording delay; never sleeps.
pub struct SimDelay {
    wire: Wire,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.wire.record(WireEvent::Delay { ns: ns as u64 });
    }

    fn delay_us(&mut self, us: u32) {
        self.wire.record(WireEvent::Delay {
            ns: us as u64 * 1_000,
        });
    }

    fn delay_ms(&mut self, ms: u32) {
        self.wire.record(WireEvent::Delay {
            ns: ms as u64 * 1_000_000,
        });
    }
}
