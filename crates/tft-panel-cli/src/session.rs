//! A panel driven over the simulated wire.

use crate::config::Config;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tft_panel_hw::panel::protocol::opcode;
use tft_panel_hw::sim::{Frame, Framebuffer, Line, SimBus, SimPin, Wire};
use tft_panel_hw::{PanelPins, ResetStrategy, TftPanel};
use tracing::debug;

pub type SimPanel = TftPanel<SimBus, SimPin, SimPin, SimPin, SimPin>;

/// Powered-on panel plus the wire it talks over.
pub struct Session {
    wire: Wire,
    pub panel: SimPanel,
}

impl Session {
    /// Powers a panel on as described by the configuration.
    pub fn open(config: &Config) -> Result<Self> {
        let wire = Wire::new();
        let pins = PanelPins {
            dc: wire.pin(Line::DataCommand),
            cs: config
                .wiring
                .chip_select
                .then(|| wire.pin(Line::ChipSelect)),
            reset: if config.wiring.hardware_reset {
                ResetStrategy::Hardware(wire.pin(Line::Reset))
            } else {
                ResetStrategy::Software
            },
            backlight: config.wiring.backlight.then(|| wire.pin(Line::Backlight)),
        };

        let mut panel = TftPanel::new(
            wire.bus(),
            pins,
            config.panel_config()?,
            &mut wire.delay(),
        )
        .context("Panel power-on failed")?;
        panel.set_orientation(config.orientation()?)?;

        debug!("Session open: {} frames on the wire", wire.frames().len());
        Ok(Self { wire, panel })
    }

    /// Returns every frame sent since power-on.
    pub fn frames(&self) -> Vec<Frame> {
        self.wire.frames()
    }

    /// Replays the wire into controller memory.
    pub fn framebuffer(&self) -> Framebuffer {
        let (width, height) = self.panel.native_size();
        let mut fb = Framebuffer::new(width, height);
        fb.replay(&self.frames());
        fb
    }

    /// Writes controller memory as a PNG.
    pub fn save_screenshot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let fb = self.framebuffer();
        let file = File::create(path.as_ref()).context("Failed to create screenshot file")?;

        let mut encoder =
            png::Encoder::new(BufWriter::new(file), fb.width() as u32, fb.height() as u32);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&fb.to_rgba8())?;
        writer.finish()?;
        Ok(())
    }

    pub fn info(&self) -> PanelInfo {
        let panel = &self.panel;
        let config = panel.config();
        let (width, height) = panel.size();
        let (native_width, native_height) = panel.native_size();
        PanelInfo {
            controller: panel.controller().to_string(),
            native_width,
            native_height,
            width,
            height,
            rotation: panel.rotation().degrees(),
            mirror: panel.mirror(),
            color_order: panel.color_order().to_string(),
            control_byte: format!("0x{:02X}", panel.control_byte()),
            buffer_capacity: config.buffer_capacity,
            init_commands: config.controller.init_sequence().len(),
            backlight: panel.has_backlight(),
            frames: self.wire.frames().len(),
        }
    }
}

/// Panel state as reported by `info`.
#[derive(Debug, Serialize)]
pub struct PanelInfo {
    pub controller: String,
    pub native_width: u16,
    pub native_height: u16,
    pub width: u16,
    pub height: u16,
    pub rotation: u16,
    pub mirror: bool,
    pub color_order: String,
    pub control_byte: String,
    pub buffer_capacity: usize,
    pub init_commands: usize,
    pub backlight: bool,
    pub frames: usize,
}

/// Formats a frame as one line: mnemonic or opcode, then the payload.
pub fn describe_frame(frame: &Frame) -> String {
    match frame {
        Frame::Command { opcode: op, data } => {
            let name = opcode::name(*op)
                .map(str::to_string)
                .unwrap_or_else(|| format!("0x{:02X}", op));
            if data.is_empty() {
                name
            } else {
                let bytes: Vec<String> = data.iter().map(|b| format!("{:02X}", b)).collect();
                format!("{} [{}]", name, bytes.join(" "))
            }
        }
        Frame::Burst(bytes) => format!("burst {} bytes ({} pixels)", bytes.len(), bytes.len() / 3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_applies_orientation() {
        let mut config = Config::default();
        config.orientation.rotation = 90;
        let session = Session::open(&config).unwrap();

        assert_eq!(session.panel.size(), (480, 320));
        let info = session.info();
        assert_eq!(info.control_byte, "0x64");
        assert_eq!(info.rotation, 90);
        assert!(info.backlight);
    }

    #[test]
    fn test_screenshot_reflects_fill() {
        let mut session = Session::open(&Config::default()).unwrap();
        session.panel.fill_rectangle(0, 0, 2, 2, 0xFF8000).unwrap();

        let fb = session.framebuffer();
        assert_eq!(fb.get_pixel(1, 1), Some(0xFF8000));
        assert_eq!(fb.get_pixel(2, 2), Some(tft_panel_hw::color::BLACK));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        session.save_screenshot(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_without_chip_select() {
        let mut config = Config::default();
        config.wiring.chip_select = false;
        let mut session = Session::open(&config).unwrap();
        session.panel.draw_pixel(3, 4, 0x00FF00).unwrap();
        assert_eq!(session.framebuffer().get_pixel(3, 4), Some(0x00FF00));
    }

    #[test]
    fn test_describe_frame() {
        let caset = Frame::Command {
            opcode: opcode::CASET,
            data: vec![0, 0, 1, 0x3F],
        };
        assert_eq!(describe_frame(&caset), "CASET [00 00 01 3F]");
        let gamma = Frame::Command {
            opcode: opcode::GAMCTRLP,
            data: vec![],
        };
        assert_eq!(describe_frame(&gamma), "0xE0");
        assert_eq!(
            describe_frame(&Frame::Burst(vec![0; 9])),
            "burst 9 bytes (3 pixels)"
        );
    }
}
