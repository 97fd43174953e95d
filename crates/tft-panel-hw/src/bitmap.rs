//! Streaming of uncompressed bitmap pixel data.
//!
//! Only the 14-byte file header is interpreted: the magic and the offset of
//! the pixel array. Pixel bytes are forwarded to the panel as they are read,
//! one row-sized chunk at a time, without buffering the frame.

use crate::panel::TftPanel;
use crate::{Error, Result};
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use std::io::{self, Read};
use tracing::debug;

/// Size of the bitmap file header.
pub const HEADER_LEN: usize = 14;

/// File header magic.
pub const MAGIC: [u8; 2] = *b"BM";

/// The part of the bitmap file header the streamer needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Byte offset of the pixel array from the start of the file.
    pub pixel_offset: u32,
}

impl FileHeader {
    /// Parses and validates a raw file header.
    pub fn parse(bytes: &[u8; HEADER_LEN]) -> Result<Self> {
        if bytes[..2] != MAGIC {
            return Err(Error::Bitmap(format!(
                "bad magic {:02X} {:02X}",
                bytes[0], bytes[1]
            )));
        }

        let pixel_offset = u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]);
        if (pixel_offset as usize) < HEADER_LEN {
            return Err(Error::Bitmap(format!(
                "pixel data offset {} lies inside the file header",
                pixel_offset
            )));
        }
        Ok(Self { pixel_offset })
    }
}

/// Reads the file header and skips forward to the pixel array.
///
/// The skip reuses the header buffer: the header read counts as the first of
/// `offset / 14` full reads, followed by one read of `offset % 14` bytes.
pub fn seek_pixel_data<R: Read>(source: &mut R) -> Result<FileHeader> {
    let mut buf = [0u8; HEADER_LEN];
    read_full(source, &mut buf)?;
    let header = FileHeader::parse(&buf)?;

    let offset = header.pixel_offset as usize;
    for _ in 1..offset / HEADER_LEN {
        read_full(source, &mut buf)?;
    }
    read_full(source, &mut buf[..offset % HEADER_LEN])?;
    Ok(header)
}

fn read_full<R: Read>(source: &mut R, buf: &mut [u8]) -> Result<()> {
    source.read_exact(buf).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::Bitmap("source ends before the pixel data".to_string())
        } else {
            Error::Source(e)
        }
    })
}

impl<SPI, DC, CS, RST, BL> TftPanel<SPI, DC, CS, RST, BL>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
{
    /// Streams the pixel array of a bitmap into a rectangle.
    ///
    /// Reads happen in chunks of `width * (bits_per_pixel / 3)` bytes and each
    /// chunk goes out as its own burst. Streaming stops at end of input; a
    /// short source leaves the rest of the rectangle untouched. Bounds and
    /// header problems are reported before anything is sent.
    ///
    /// Returns the number of pixel bytes forwarded.
    pub fn stream_bitmap<R: Read>(
        &mut self,
        mut source: R,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        bits_per_pixel: u8,
    ) -> Result<usize> {
        self.check_bounds(x, y, width, height)?;
        let chunk_len = width as usize * (bits_per_pixel / 3) as usize;
        if chunk_len == 0 {
            return Err(Error::Bitmap(format!(
                "zero-length read chunk for width {} at {} bits per pixel",
                width, bits_per_pixel
            )));
        }

        let header = seek_pixel_data(&mut source)?;
        debug!(
            "Streaming bitmap into {}x{} at ({}, {}), pixel data at offset {}",
            width, height, x, y, header.pixel_offset
        );

        self.begin_memory_write(x, y, width, height)?;

        let mut chunk = vec![0u8; chunk_len];
        let mut forwarded = 0;
        loop {
            let n = match source.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            self.write_memory_bytes(&chunk[..n])?;
            forwarded += n;
        }

        debug!("Forwarded {} bitmap bytes", forwarded);
        Ok(forwarded)
    }
}
