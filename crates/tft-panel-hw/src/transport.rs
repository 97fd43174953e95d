//! Byte-packing SPI transport.
//!
//! Logical words are serialized little-endian into one reusable buffer and
//! sent in chunks no larger than the buffer. Only whole words are ever sent,
//! and only the bytes written for the current chunk.

use crate::{Error, Result};
use embedded_hal::spi::SpiBus;
use tracing::trace;

/// Default transport buffer size in bytes.
pub const DEFAULT_CAPACITY: usize = 64;

/// Width of one logical word on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WordWidth {
    /// 8-bit word.
    U8 = 1,
    /// 16-bit word.
    U16 = 2,
    /// 24-bit word (one RGB888 pixel).
    U24 = 3,
}

impl WordWidth {
    /// Converts a byte count to a word width.
    pub fn from_bytes(bytes: usize) -> Result<Self> {
        match bytes {
            1 => Ok(WordWidth::U8),
            2 => Ok(WordWidth::U16),
            3 => Ok(WordWidth::U24),
            _ => Err(Error::WordWidth(bytes)),
        }
    }

    /// Number of bytes per word.
    pub fn bytes(&self) -> usize {
        *self as usize
    }

    fn encode(&self, word: u32, out: &mut [u8]) {
        for (i, byte) in out[..self.bytes()].iter_mut().enumerate() {
            *byte = (word >> (8 * i)) as u8;
        }
    }
}

/// SPI transport with a fixed-capacity reusable buffer.
pub struct TransportChannel<SPI> {
    spi: SPI,
    buf: Box<[u8]>,
}

impl<SPI: SpiBus<u8>> TransportChannel<SPI> {
    /// Creates a transport with the default 64-byte buffer.
    pub fn new(spi: SPI) -> Self {
        Self {
            spi,
            buf: vec![0; DEFAULT_CAPACITY].into_boxed_slice(),
        }
    }

    /// Creates a transport with a custom buffer size.
    ///
    /// The buffer must hold at least one 24-bit word.
    pub fn with_capacity(spi: SPI, capacity: usize) -> Result<Self> {
        if capacity < WordWidth::U24.bytes() {
            return Err(Error::BufferCapacity(capacity));
        }
        Ok(Self {
            spi,
            buf: vec![0; capacity].into_boxed_slice(),
        })
    }

    /// Buffer size in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Releases the underlying bus.
    pub fn release(self) -> SPI {
        self.spi
    }

    /// Sends one word.
    pub fn write_scalar(&mut self, word: u32, width: WordWidth) -> Result<()> {
        width.encode(word, &mut self.buf);
        let len = width.bytes();
        self.transmit(len)?;
        self.flush()
    }

    /// Sends `count` copies of one word.
    pub fn write_repeated(&mut self, word: u32, width: WordWidth, count: usize) -> Result<()> {
        if count == 0 {
            return Ok(());
        }

        let per_chunk = self.words_per_chunk(width);
        let staged = per_chunk.min(count);
        for slot in self.buf.chunks_exact_mut(width.bytes()).take(staged) {
            width.encode(word, slot);
        }

        let full = count / per_chunk;
        let remainder = count % per_chunk;
        trace!(count, per_chunk, full, remainder, "repeated write");

        for _ in 0..full {
            self.transmit(per_chunk * width.bytes())?;
        }
        if remainder > 0 {
            self.transmit(remainder * width.bytes())?;
        }
        self.flush()
    }

    /// Sends distinct words in order.
    pub fn write_slice<W: Copy + Into<u32>>(&mut self, words: &[W], width: WordWidth) -> Result<()> {
        if words.is_empty() {
            return Ok(());
        }

        let per_chunk = self.words_per_chunk(width);
        trace!(words = words.len(), per_chunk, "slice write");

        for chunk in words.chunks(per_chunk) {
            for (slot, &word) in self.buf.chunks_exact_mut(width.bytes()).zip(chunk) {
                width.encode(word.into(), slot);
            }
            self.transmit(chunk.len() * width.bytes())?;
        }
        self.flush()
    }

    /// Sends already-serialized bytes as they are.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.spi.write(bytes).map_err(Error::spi)?;
        self.flush()
    }

    fn words_per_chunk(&self, width: WordWidth) -> usize {
        self.buf.len() / width.bytes()
    }

    fn transmit(&mut self, len: usize) -> Result<()> {
        self.spi.write(&self.buf[..len]).map_err(Error::spi)
    }

    fn flush(&mut self) -> Result<()> {
        self.spi.flush().map_err(Error::spi)
    }
}
