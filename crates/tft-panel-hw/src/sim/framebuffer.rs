//! Controller memory model.
//!
//! Replays decoded frames the way the controller would: address window,
//! memory access control and 3-byte pixel writes into native-orientation
//! memory.

use super::Frame;
use crate::color;
use crate::panel::protocol::{madctl, opcode};

/// Native-orientation pixel memory of a simulated controller.
#[derive(Clone)]
pub struct Framebuffer {
    /// Pixel data as 0xRRGGBB.
    data: Vec<u32>,
    width: u16,
    height: u16,
    control: u8,
    columns: (u16, u16),
    pages: (u16, u16),
    /// Pixel index inside the window while a memory write is open.
    cursor: Option<usize>,
    partial: Vec<u8>,
}

impl Framebuffer {
    /// Creates a black framebuffer with the given native size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            data: vec![color::BLACK; width as usize * height as usize],
            width,
            height,
            control: 0,
            columns: (0, width.saturating_sub(1)),
            pages: (0, height.saturating_sub(1)),
            cursor: None,
            partial: Vec::with_capacity(3),
        }
    }

    /// Returns the native width.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Returns the native height.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Returns the last memory access control byte received.
    pub fn control_byte(&self) -> u8 {
        self.control
    }

    /// Returns the raw pixel data.
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Gets a pixel at native coordinates.
    pub fn get_pixel(&self, x: u16, y: u16) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.data[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Applies a sequence of frames.
    pub fn replay<'a>(&mut self, frames: impl IntoIterator<Item = &'a Frame>) {
        for frame in frames {
            self.apply(frame);
        }
    }

    /// Applies one frame.
    pub fn apply(&mut self, frame: &Frame) {
        match frame {
            Frame::Command { opcode, data } => {
                self.cursor = None;
                self.partial.clear();
                match *opcode {
                    opcode::SWRESET => self.reset_registers(),
                    opcode::CASET => {
                        if let Some(range) = decode_range(data) {
                            self.columns = range;
                        }
                    }
                    opcode::PASET => {
                        if let Some(range) = decode_range(data) {
                            self.pages = range;
                        }
                    }
                    opcode::MADCTL => {
                        if let Some(&byte) = data.first() {
                            self.control = byte;
                        }
                    }
                    opcode::RAMWR => {
                        self.cursor = Some(0);
                        self.write_bytes(data);
                    }
                    _ => {}
                }
            }
            Frame::Burst(bytes) => self.write_bytes(bytes),
        }
    }

    /// Converts the framebuffer to RGBA8 bytes for PNG encoding.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.data.len() * 4);
        for &pixel in &self.data {
            let (r, g, b) = color::to_rgb(pixel);
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
        rgba
    }

    fn reset_registers(&mut self) {
        self.control = 0;
        self.columns = (0, self.width.saturating_sub(1));
        self.pages = (0, self.height.saturating_sub(1));
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        if self.cursor.is_none() {
            return;
        }
        for &byte in bytes {
            self.partial.push(byte);
            if self.partial.len() == 3 {
                let word = u32::from_le_bytes([self.partial[0], self.partial[1], self.partial[2], 0]);
                self.partial.clear();
                self.store(word);
            }
        }
    }

    fn store(&mut self, word: u32) {
        let Some(cursor) = self.cursor else {
            return;
        };
        let (c0, c1) = self.columns;
        let (p0, p1) = self.pages;
        if c1 < c0 || p1 < p0 {
            return;
        }

        let window_width = (c1 - c0) as usize + 1;
        let window_height = (p1 - p0) as usize + 1;
        if cursor >= window_width * window_height {
            return;
        }
        self.cursor = Some(cursor + 1);

        let column = c0 as usize + cursor % window_width;
        let page = p0 as usize + cursor / window_width;
        if let Some((x, y)) = self.to_native(column, page) {
            let pixel = if self.control & madctl::BGR != 0 {
                color::swap_red_blue(word)
            } else {
                word
            };
            self.data[y * self.width as usize + x] = pixel;
        }
    }

    fn to_native(&self, column: usize, page: usize) -> Option<(usize, usize)> {
        let exchanged = self.control & madctl::MV != 0;
        let (columns, pages) = if exchanged {
            (self.height as usize, self.width as usize)
        } else {
            (self.width as usize, self.height as usize)
        };
        if column >= columns || page >= pages {
            return None;
        }

        let column = if self.control & madctl::MX != 0 {
            columns - 1 - column
        } else {
            column
        };
        let page = if self.control & madctl::MY != 0 {
            pages - 1 - page
        } else {
            page
        };

        Some(if exchanged { (page, column) } else { (column, page) })
    }
}

fn decode_range(data: &[u8]) -> Option<(u16, u16)> {
    match data {
        [s_hi, s_lo, e_hi, e_lo, ..] => Some((
            u16::from_be_bytes([*s_hi, *s_lo]),
            u16::from_be_bytes([*e_hi, *e_lo]),
        )),
        _ => None,
    }
}
