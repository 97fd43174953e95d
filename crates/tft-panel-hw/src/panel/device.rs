//! Panel state machine on top of the command framer.

use super::controller::{PanelConfig, SLEEP_OUT_DELAY_MS};
use super::protocol::{encode_range, encode_scroll_definition, encode_scroll_start, opcode};
use super::Controller;
use crate::framer::CommandFramer;
use crate::lines::{ControlLines, NoPin, PanelPins};
use crate::orientation::{ColorOrder, Orientation, Rotation};
use crate::transport::{TransportChannel, WordWidth};
use crate::{Error, Result};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use tracing::{debug, info};

/// Inclusive address window last sent to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressWindow {
    pub x0: u16,
    pub x1: u16,
    pub y0: u16,
    pub y1: u16,
}

/// A TFT panel behind an ILI9341/ILI948x controller.
///
/// Construction runs the full power-on sequence. Every operation blocks until
/// its bus transfers are done; the `&mut self` receivers are the only
/// serialization the bus gets.
pub struct TftPanel<SPI, DC, CS = NoPin, RST = NoPin, BL = NoPin> {
    framer: CommandFramer<SPI, DC, CS>,
    lines: ControlLines<RST, BL>,
    config: PanelConfig,
    orientation: Orientation,
    /// Column range last sent with CASET.
    columns: Option<(u16, u16)>,
    /// Row range last sent with PASET.
    rows: Option<(u16, u16)>,
}

impl<SPI, DC, CS, RST, BL> TftPanel<SPI, DC, CS, RST, BL>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
{
    /// Takes ownership of the bus and lines and powers the panel on.
    pub fn new(
        spi: SPI,
        pins: PanelPins<DC, CS, RST, BL>,
        config: PanelConfig,
        delay: &mut impl DelayNs,
    ) -> Result<Self> {
        let transport = TransportChannel::with_capacity(spi, config.buffer_capacity)?;
        let framer = CommandFramer::new(transport, pins.dc, pins.cs)?;
        let lines = ControlLines::new(pins.reset, pins.backlight);

        let mut panel = Self {
            framer,
            lines,
            config,
            orientation: Orientation::default(),
            columns: None,
            rows: None,
        };
        panel.power_on(delay)?;
        Ok(panel)
    }

    /// Hands the bus and lines back, leaving the panel in its current state.
    pub fn release(self) -> (SPI, PanelPins<DC, CS, RST, BL>) {
        let (transport, dc, cs) = self.framer.release();
        let (reset, backlight) = self.lines.release();
        let pins = PanelPins {
            dc,
            cs,
            reset,
            backlight,
        };
        (transport.release(), pins)
    }

    /// Reruns the power-on sequence, keeping the current orientation.
    pub fn reinitialize(&mut self, delay: &mut impl DelayNs) -> Result<()> {
        self.columns = None;
        self.rows = None;
        self.power_on(delay)
    }

    fn power_on(&mut self, delay: &mut impl DelayNs) -> Result<()> {
        let controller = self.config.controller;
        info!(
            "Initializing {} panel ({}x{})",
            controller, self.config.width, self.config.height
        );

        self.lines.idle()?;
        self.reset(delay)?;

        for step in controller.init_sequence() {
            self.framer.send_command(step.opcode, step.data)?;
        }
        self.push_control_byte()?;

        self.framer.send_command(opcode::SLPOUT, &[])?;
        delay.delay_ms(SLEEP_OUT_DELAY_MS);
        for step in controller.display_on_sequence() {
            self.framer.send_command(step.opcode, step.data)?;
        }
        if controller.display_on_delay_ms() > 0 {
            delay.delay_ms(controller.display_on_delay_ms());
        }

        self.lines.set_backlight(true)?;
        info!("Panel ready ({})", self.orientation);
        Ok(())
    }

    fn reset(&mut self, delay: &mut impl DelayNs) -> Result<()> {
        let timing = self.config.controller.reset_timing();
        if self.lines.hardware_reset(delay, timing)? {
            debug!("Hardware reset done");
        } else {
            self.framer.send_command(opcode::SWRESET, &[])?;
            delay.delay_ms(timing.software_wake_ms);
            debug!("Software reset done");
        }
        Ok(())
    }

    /// Returns the controller type.
    pub fn controller(&self) -> Controller {
        self.config.controller
    }

    /// Returns the configuration the panel was built with.
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Returns the native size at rotation 0.
    pub fn native_size(&self) -> (u16, u16) {
        (self.config.width, self.config.height)
    }

    /// Returns the logical size for the current rotation.
    pub fn size(&self) -> (u16, u16) {
        self.orientation
            .rotation
            .dimensions(self.config.width, self.config.height)
    }

    /// Returns rotation, mirroring and color order together.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns the clockwise rotation.
    pub fn rotation(&self) -> Rotation {
        self.orientation.rotation
    }

    /// Returns true when output is mirrored.
    pub fn mirror(&self) -> bool {
        self.orientation.mirror
    }

    /// Returns the sub-pixel order.
    pub fn color_order(&self) -> ColorOrder {
        self.orientation.color_order
    }

    /// Returns the memory access control byte for the current orientation.
    pub fn control_byte(&self) -> u8 {
        self.orientation.control_byte()
    }

    /// Returns the cached address window, if both ranges have been sent.
    pub fn window(&self) -> Option<AddressWindow> {
        let (x0, x1) = self.columns?;
        let (y0, y1) = self.rows?;
        Some(AddressWindow { x0, x1, y0, y1 })
    }

    /// Returns true when a backlight line is wired.
    pub fn has_backlight(&self) -> bool {
        self.lines.has_backlight()
    }

    /// Sets the clockwise rotation.
    pub fn set_rotation(&mut self, rotation: Rotation) -> Result<()> {
        self.orientation.rotation = rotation;
        debug!("Set rotation to {}°", rotation);
        self.push_control_byte()
    }

    /// Switches between mirrored and non-mirrored output.
    pub fn set_mirror(&mut self, mirror: bool) -> Result<()> {
        self.orientation.mirror = mirror;
        debug!("Set mirror to {}", mirror);
        self.push_control_byte()
    }

    /// Switches between RGB and BGR sub-pixel order.
    pub fn set_color_order(&mut self, color_order: ColorOrder) -> Result<()> {
        self.orientation.color_order = color_order;
        debug!("Set color order to {}", color_order);
        self.push_control_byte()
    }

    /// Sets rotation, mirroring and color order with a single register write.
    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<()> {
        self.orientation = orientation;
        debug!("Set orientation to {}", orientation);
        self.push_control_byte()
    }

    /// Always resent, even when unchanged: the register may have been
    /// rewritten behind our back.
    fn push_control_byte(&mut self) -> Result<()> {
        let control = self.orientation.control_byte();
        self.framer.send_command(opcode::MADCTL, &[control])
    }

    /// Turns the backlight on or off. Does nothing without a backlight line.
    pub fn set_backlight(&mut self, on: bool) -> Result<()> {
        debug!("Set backlight {}", if on { "on" } else { "off" });
        self.lines.set_backlight(on)
    }

    /// Switches the controller output on or off. Memory content is kept.
    pub fn set_display_on(&mut self, on: bool) -> Result<()> {
        debug!("Set display {}", if on { "on" } else { "off" });
        let op = if on { opcode::DISON } else { opcode::DISOFF };
        self.framer.send_command(op, &[])
    }

    /// Defines the output area for subsequent memory writes.
    ///
    /// Each range is only sent when it differs from the cached one. The cache
    /// holds controller coordinates and survives rotation changes. A zero
    /// width or height leaves the window untouched.
    pub fn set_window(&mut self, x: u16, y: u16, width: u16, height: u16) -> Result<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }

        let columns = (x, x.saturating_add(width - 1));
        if self.columns != Some(columns) {
            self.framer
                .send_command(opcode::CASET, &encode_range(columns.0, columns.1))?;
            self.columns = Some(columns);
        }

        let rows = (y, y.saturating_add(height - 1));
        if self.rows != Some(rows) {
            self.framer
                .send_command(opcode::PASET, &encode_range(rows.0, rows.1))?;
            self.rows = Some(rows);
        }
        Ok(())
    }

    /// Fills a rectangle with a 0xRRGGBB color.
    pub fn fill_rectangle(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        color: u32,
    ) -> Result<()> {
        self.check_bounds(x, y, width, height)?;
        if width == 0 || height == 0 {
            return Ok(());
        }

        debug!("Fill {}x{} at ({}, {}) with #{:06X}", width, height, x, y, color);
        self.begin_memory_write(x, y, width, height)?;
        self.framer
            .burst_repeated(color, WordWidth::U24, width as usize * height as usize)
    }

    /// Fills the whole logical area.
    pub fn fill_screen(&mut self, color: u32) -> Result<()> {
        let (width, height) = self.size();
        self.fill_rectangle(0, 0, width, height, color)
    }

    pub fn draw_pixel(&mut self, x: u16, y: u16, color: u32) -> Result<()> {
        self.fill_rectangle(x, y, 1, 1, color)
    }

    /// Draws a horizontal line between two columns, inclusive, in either order.
    pub fn draw_hline(&mut self, x0: u16, x1: u16, y: u16, color: u32) -> Result<()> {
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        self.fill_rectangle(x0, y, (x1 - x0).saturating_add(1), 1, color)
    }

    /// Draws a vertical line between two rows, inclusive, in either order.
    pub fn draw_vline(&mut self, x: u16, y0: u16, y1: u16, color: u32) -> Result<()> {
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        self.fill_rectangle(x, y0, 1, (y1 - y0).saturating_add(1), color)
    }

    /// Writes distinct 0xRRGGBB pixels row by row into a rectangle.
    pub fn draw_image(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        pixels: &[u32],
    ) -> Result<()> {
        self.check_bounds(x, y, width, height)?;
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(Error::PixelCount {
                expected,
                actual: pixels.len(),
            });
        }
        if expected == 0 {
            return Ok(());
        }

        debug!("Draw {}x{} image at ({}, {})", width, height, x, y);
        self.begin_memory_write(x, y, width, height)?;
        self.framer.burst_slice(pixels, WordWidth::U24)
    }

    /// Defines fixed top and bottom areas; the rest of the panel scrolls.
    pub fn set_scroll_area(&mut self, top_fixed: u16, bottom_fixed: u16) -> Result<()> {
        let height = self.config.height;
        let band = height
            .checked_sub(top_fixed)
            .and_then(|rest| rest.checked_sub(bottom_fixed))
            .ok_or(Error::ScrollArea {
                top: top_fixed,
                bottom: bottom_fixed,
                height,
            })?;

        debug!(
            "Set scroll area: top {}, band {}, bottom {}",
            top_fixed, band, bottom_fixed
        );
        self.framer.send_command(
            opcode::VSCRDEF,
            &encode_scroll_definition(top_fixed, band, bottom_fixed),
        )
    }

    /// Sets the first line of the scrolling band.
    pub fn set_scroll(&mut self, line: u16) -> Result<()> {
        self.framer
            .send_command(opcode::VSCRSADD, &encode_scroll_start(line))
    }

    /// Returns the display to normal (non-scrolled) mode.
    pub fn stop_scroll(&mut self) -> Result<()> {
        debug!("Stop scroll");
        self.framer.send_command(opcode::NORON, &[])
    }

    pub(crate) fn check_bounds(&self, x: u16, y: u16, width: u16, height: u16) -> Result<()> {
        let (limit_width, limit_height) = self.size();
        let fits = x < limit_width
            && y < limit_height
            && x as u32 + width as u32 <= limit_width as u32
            && y as u32 + height as u32 <= limit_height as u32;

        if fits {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                x,
                y,
                width,
                height,
                limit_width,
                limit_height,
            })
        }
    }

    /// Sets the window and opens a memory write. Pixel bursts follow.
    pub(crate) fn begin_memory_write(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<()> {
        self.set_window(x, y, width, height)?;
        self.framer.send_command(opcode::RAMWR, &[])
    }

    /// Forwards raw bytes into an open memory write.
    pub(crate) fn write_memory_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.framer.burst_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Frame, Framebuffer, Line, SimBus, SimPin, Wire};

    type SimPanel = TftPanel<SimBus, SimPin, SimPin, SimPin, SimPin>;

    fn panel_with(wire: &Wire, config: PanelConfig, hardware_reset: bool) -> SimPanel {
        let pins = PanelPins::new(wire.pin(Line::DataCommand))
            .with_chip_select(wire.pin(Line::ChipSelect))
            .with_backlight(wire.pin(Line::Backlight));
        let pins = if hardware_reset {
            pins.with_reset(wire.pin(Line::Reset))
        } else {
            PanelPins {
                dc: pins.dc,
                cs: pins.cs,
                reset: crate::lines::ResetStrategy::Software,
                backlight: pins.backlight,
            }
        };
        TftPanel::new(wire.bus(), pins, config, &mut wire.delay()).unwrap()
    }

    fn panel(wire: &Wire) -> SimPanel {
        let panel = panel_with(wire, PanelConfig::new(Controller::Ili9488), false);
        wire.clear();
        panel
    }

    fn command(opcode: u8, data: &[u8]) -> Frame {
        Frame::Command {
            opcode,
            data: data.to_vec(),
        }
    }

    #[test]
    fn test_software_power_on_sequence() {
        let wire = Wire::new();
        let panel = panel_with(&wire, PanelConfig::new(Controller::Ili9488), false);

        let opcodes = wire.opcodes();
        assert_eq!(opcodes.first(), Some(&opcode::SWRESET));
        let init: Vec<u8> = Controller::Ili9488
            .init_sequence()
            .iter()
            .map(|s| s.opcode)
            .collect();
        assert_eq!(&opcodes[1..1 + init.len()], init.as_slice());
        assert_eq!(
            &opcodes[1 + init.len()..],
            &[opcode::MADCTL, opcode::SLPOUT, opcode::IDMOFF, opcode::DISON]
        );

        // software wake, sleep-out wait, display-on settle
        assert_eq!(wire.delays_ms(), vec![150, 120, 100]);
        assert_eq!(wire.levels(Line::Backlight), vec![false, true]);
        assert_eq!(panel.control_byte(), 0);
        assert_eq!(panel.window(), None);
    }

    #[test]
    fn test_hardware_power_on_sequence() {
        let wire = Wire::new();
        panel_with(&wire, PanelConfig::new(Controller::Ili9341), true);

        let opcodes = wire.opcodes();
        assert!(!opcodes.contains(&opcode::SWRESET));
        assert_eq!(opcodes.first(), Some(&opcode::PWCTRL1));
        assert_eq!(&opcodes[opcodes.len() - 3..], &[opcode::MADCTL, opcode::SLPOUT, opcode::DISON]);
        assert_eq!(wire.levels(Line::Reset), vec![true, false, true]);
        assert_eq!(wire.delays_ms(), vec![64, 140, 120]);

        // the reset pulse completes before the first register write
        let events = wire.events();
        let released = events
            .iter()
            .rposition(|e| matches!(e, crate::sim::WireEvent::Level { line: Line::Reset, high: true }))
            .unwrap();
        let first_transfer = events
            .iter()
            .position(|e| matches!(e, crate::sim::WireEvent::Transfer(_)))
            .unwrap();
        assert!(released < first_transfer);
    }

    #[test]
    fn test_initial_window_is_unset() {
        let wire = Wire::new();
        let mut panel = panel(&wire);
        panel.draw_pixel(0, 0, 0xFFFFFF).unwrap();

        let opcodes = wire.opcodes();
        assert_eq!(opcodes, vec![opcode::CASET, opcode::PASET, opcode::RAMWR]);
    }

    #[test]
    fn test_size_follows_rotation() {
        for (w, h) in [(320u16, 480u16), (240, 320), (100, 50)] {
            let wire = Wire::new();
            let config = PanelConfig::new(Controller::Ili9488).with_size(w, h);
            let mut panel = panel_with(&wire, config, false);
            for rotation in Rotation::ALL {
                panel.set_rotation(rotation).unwrap();
                let expected = if rotation.swaps_axes() { (h, w) } else { (w, h) };
                assert_eq!(panel.size(), expected);
            }
        }
    }

    #[test]
    fn test_rotation_round_trip() {
        let wire = Wire::new();
        let mut panel = panel(&wire);
        panel.set_mirror(true).unwrap();
        panel.set_color_order(ColorOrder::Bgr).unwrap();
        let start = panel.control_byte();

        for rotation in [Rotation::Deg90, Rotation::Deg180, Rotation::Deg270, Rotation::Deg0] {
            panel.set_rotation(rotation).unwrap();
        }
        assert_eq!(panel.control_byte(), start);

        let sent: Vec<Frame> = wire.frames();
        assert_eq!(sent.last(), Some(&command(opcode::MADCTL, &[start])));
    }

    #[test]
    fn test_setters_always_resend() {
        let wire = Wire::new();
        let mut panel = panel(&wire);
        panel.set_rotation(Rotation::Deg0).unwrap();
        panel.set_mirror(false).unwrap();
        panel.set_color_order(ColorOrder::Rgb).unwrap();

        assert_eq!(
            wire.frames(),
            vec![command(opcode::MADCTL, &[0]); 3]
        );
    }

    #[test]
    fn test_window_cache() {
        let wire = Wire::new();
        let mut panel = panel(&wire);

        panel.set_window(10, 20, 30, 40).unwrap();
        assert_eq!(
            wire.frames(),
            vec![
                command(opcode::CASET, &[0, 10, 0, 39]),
                command(opcode::PASET, &[0, 20, 0, 59]),
            ]
        );

        wire.clear();
        panel.set_window(10, 20, 30, 40).unwrap();
        assert!(wire.events().is_empty());

        // same columns, new rows
        panel.set_window(10, 60, 30, 40).unwrap();
        assert_eq!(wire.opcodes(), vec![opcode::PASET]);

        // new columns, same rows
        wire.clear();
        panel.set_window(11, 60, 29, 40).unwrap();
        assert_eq!(wire.opcodes(), vec![opcode::CASET]);

        assert_eq!(
            panel.window(),
            Some(AddressWindow {
                x0: 11,
                x1: 39,
                y0: 60,
                y1: 99
            })
        );
    }

    #[test]
    fn test_window_cache_survives_rotation() {
        let wire = Wire::new();
        let mut panel = panel(&wire);
        panel.fill_rectangle(0, 0, 10, 10, 0xFF0000).unwrap();
        panel.set_rotation(Rotation::Deg90).unwrap();
        wire.clear();

        panel.fill_rectangle(0, 0, 10, 10, 0xFF0000).unwrap();
        assert_eq!(wire.opcodes(), vec![opcode::RAMWR]);
    }

    #[test]
    fn test_out_of_bounds_sends_nothing() {
        let wire = Wire::new();
        let mut panel = panel(&wire);
        let (width, _) = panel.size();

        let result = panel.fill_rectangle(width - 1, 0, 2, 1, 0xFFFFFF);
        assert!(matches!(result, Err(Error::OutOfBounds { .. })));
        assert!(wire.events().is_empty());

        assert!(panel.draw_pixel(width, 0, 0).is_err());
        assert!(panel.draw_vline(0, 0, 480, 0).is_err());
        assert!(panel.fill_rectangle(0, 0, u16::MAX, u16::MAX, 0).is_err());
        assert!(wire.events().is_empty());
        assert_eq!(panel.window(), None);
    }

    #[test]
    fn test_bounds_follow_rotation() {
        let wire = Wire::new();
        let mut panel = panel(&wire);
        assert!(panel.fill_rectangle(0, 0, 480, 1, 0).is_err());
        panel.set_rotation(Rotation::Deg270).unwrap();
        assert!(panel.fill_rectangle(0, 0, 480, 1, 0).is_ok());
        assert!(panel.fill_rectangle(0, 0, 1, 480, 0).is_err());
    }

    #[test]
    fn test_lines_are_rectangles() {
        let wire = Wire::new();
        let mut panel = panel(&wire);

        panel.draw_hline(20, 5, 7, 0x123456).unwrap();
        assert_eq!(panel.window(), Some(AddressWindow { x0: 5, x1: 20, y0: 7, y1: 7 }));

        panel.draw_vline(3, 9, 2, 0x123456).unwrap();
        assert_eq!(panel.window(), Some(AddressWindow { x0: 3, x1: 3, y0: 2, y1: 9 }));

        let bursts: Vec<usize> = wire
            .frames()
            .iter()
            .filter_map(|f| match f {
                Frame::Burst(bytes) => Some(bytes.len() / 3),
                _ => None,
            })
            .collect();
        assert_eq!(bursts, vec![16, 8]);
    }

    #[test]
    fn test_zero_area_fill_is_noop() {
        let wire = Wire::new();
        let mut panel = panel(&wire);
        panel.fill_rectangle(5, 5, 0, 10, 0xFFFFFF).unwrap();
        panel.fill_rectangle(5, 5, 10, 0, 0xFFFFFF).unwrap();
        assert!(wire.events().is_empty());
    }

    #[test]
    fn test_fill_screen_then_rectangle() {
        let wire = Wire::new();
        let mut panel = panel(&wire);
        assert_eq!(panel.size(), (320, 480));

        panel.fill_screen(0x00FF00).unwrap();
        panel.fill_rectangle(10, 10, 50, 50, 0x0000FF).unwrap();

        let frames = wire.frames();
        assert_eq!(frames.len(), 8);
        assert_eq!(frames[0], command(opcode::CASET, &[0x00, 0x00, 0x01, 0x3F]));
        assert_eq!(frames[1], command(opcode::PASET, &[0x00, 0x00, 0x01, 0xDF]));
        assert_eq!(frames[2], command(opcode::RAMWR, &[]));
        assert_eq!(frames[4], command(opcode::CASET, &[0x00, 0x0A, 0x00, 0x3B]));
        assert_eq!(frames[5], command(opcode::PASET, &[0x00, 0x0A, 0x00, 0x3B]));
        assert_eq!(frames[6], command(opcode::RAMWR, &[]));

        let Frame::Burst(screen) = &frames[3] else {
            panic!("expected burst, got {:?}", frames[3]);
        };
        assert_eq!(screen.len(), 320 * 480 * 3);
        assert!(screen.chunks(3).all(|px| px == [0x00, 0xFF, 0x00]));

        let Frame::Burst(rect) = &frames[7] else {
            panic!("expected burst, got {:?}", frames[7]);
        };
        assert_eq!(rect.len(), 50 * 50 * 3);
        assert!(rect.chunks(3).all(|px| px == [0xFF, 0x00, 0x00]));

        let mut fb = Framebuffer::new(320, 480);
        fb.replay(&frames);
        assert_eq!(fb.get_pixel(0, 0), Some(0x00FF00));
        assert_eq!(fb.get_pixel(10, 10), Some(0x0000FF));
        assert_eq!(fb.get_pixel(59, 59), Some(0x0000FF));
        assert_eq!(fb.get_pixel(60, 60), Some(0x00FF00));
    }

    #[test]
    fn test_draw_image() {
        let wire = Wire::new();
        let mut panel = panel(&wire);
        let pixels = [0x010203, 0x040506, 0x070809, 0x0A0B0C];

        assert!(matches!(
            panel.draw_image(0, 0, 2, 3, &pixels),
            Err(Error::PixelCount { expected: 6, actual: 4 })
        ));
        assert!(wire.events().is_empty());

        panel.draw_image(1, 1, 2, 2, &pixels).unwrap();
        let frames = wire.frames();
        assert_eq!(
            frames.last(),
            Some(&Frame::Burst(vec![3, 2, 1, 6, 5, 4, 9, 8, 7, 12, 11, 10]))
        );
    }

    #[test]
    fn test_scroll_commands() {
        let wire = Wire::new();
        let mut panel = panel(&wire);

        panel.set_scroll_area(16, 32).unwrap();
        panel.set_scroll(100).unwrap();
        panel.stop_scroll().unwrap();
        assert_eq!(
            wire.frames(),
            vec![
                command(opcode::VSCRDEF, &[0, 16, 0x01, 0xB0, 0, 32]),
                command(opcode::VSCRSADD, &[0, 100]),
                command(opcode::NORON, &[]),
            ]
        );

        assert!(matches!(
            panel.set_scroll_area(400, 100),
            Err(Error::ScrollArea { .. })
        ));
    }

    #[test]
    fn test_transport_error_propagates() {
        let wire = Wire::new();
        let mut panel = panel(&wire);
        wire.fail_after(0);

        assert!(matches!(
            panel.fill_screen(0xFFFFFF),
            Err(Error::Spi(_))
        ));
        assert_eq!(panel.window(), None);
    }

    #[test]
    fn test_reinitialize_drops_window() {
        let wire = Wire::new();
        let mut panel = panel(&wire);
        panel.set_rotation(Rotation::Deg180).unwrap();
        panel.fill_rectangle(0, 0, 4, 4, 0).unwrap();
        assert!(panel.window().is_some());

        wire.clear();
        panel.reinitialize(&mut wire.delay()).unwrap();
        assert_eq!(panel.window(), None);
        assert!(wire
            .frames()
            .contains(&command(opcode::MADCTL, &[Orientation {
                rotation: Rotation::Deg180,
                ..Orientation::default()
            }
            .control_byte()])));
    }

    #[test]
    fn test_backlight() {
        let wire = Wire::new();
        let mut panel = panel(&wire);
        assert!(panel.has_backlight());
        panel.set_backlight(false).unwrap();
        assert_eq!(wire.levels(Line::Backlight), vec![false]);
    }

    #[test]
    fn test_backlight_pin_failure() {
        let wire = Wire::new();
        let mut panel = panel(&wire);
        wire.fail_line(Line::Backlight);
        assert!(matches!(panel.set_backlight(false), Err(Error::Pin(_))));
        assert!(wire.events().is_empty());
    }

    #[test]
    fn test_display_on_off() {
        let wire = Wire::new();
        let mut panel = panel(&wire);
        panel.fill_rectangle(0, 0, 2, 2, 0x00FF00).unwrap();
        panel.set_display_on(false).unwrap();
        panel.set_display_on(true).unwrap();

        let opcodes = wire.opcodes();
        assert_eq!(&opcodes[opcodes.len() - 2..], &[opcode::DISOFF, opcode::DISON]);

        let mut fb = Framebuffer::new(320, 480);
        fb.replay(&wire.frames());
        assert_eq!(fb.get_pixel(1, 1), Some(0x00FF00));
    }

    #[test]
    fn test_release_hands_back_lines() {
        let wire = Wire::new();
        let panel = panel(&wire);
        let (spi, pins) = panel.release();
        assert!(wire.events().is_empty());
        assert!(pins.cs.is_some());
        assert!(pins.backlight.is_some());

        let rebuilt = TftPanel::new(
            spi,
            pins,
            PanelConfig::new(Controller::Ili9341),
            &mut wire.delay(),
        )
        .unwrap();
        assert_eq!(rebuilt.controller(), Controller::Ili9341);
        assert_eq!(wire.opcodes().first(), Some(&opcode::SWRESET));
    }
}
