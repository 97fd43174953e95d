//! Demo patterns.

use crate::session::SimPanel;
use anyhow::Result;
use tft_panel_hw::Rotation;
use tracing::info;

// CMY color wheel
pub const CMY_CYAN: u32 = 0x00FFFF;
pub const CMY_CBLUE: u32 = 0x0080FF;
pub const CMY_BLUE: u32 = 0x0000FF;
pub const CMY_PURPLE: u32 = 0x8000FF;
pub const CMY_MAGENTA: u32 = 0xFF00FF;
pub const CMY_MRED: u32 = 0xFF0080;
pub const CMY_RED: u32 = 0xFF0000;
pub const CMY_ORANGE: u32 = 0xFF8000;
pub const CMY_YELLOW: u32 = 0xFFFF00;
pub const CMY_YGREEN: u32 = 0x80FF00;
pub const CMY_GREEN: u32 = 0x00FF00;
pub const CMY_CGREEN: u32 = 0x00FF80;

// RYB (Itten) color wheel
pub const RYB_RED: u32 = 0xFE2712;
pub const RYB_RORANGE: u32 = 0xFC600A;
pub const RYB_ORANGE: u32 = 0xFB9902;
pub const RYB_YORANGE: u32 = 0xFCCC1A;
pub const RYB_YELLOW: u32 = 0xFEFE33;
pub const RYB_YGREEN: u32 = 0xB2D732;
pub const RYB_GREEN: u32 = 0x66B032;
pub const RYB_BGREEN: u32 = 0x347C98;
pub const RYB_BLUE: u32 = 0x0247FE;
pub const RYB_BPURPLE: u32 = 0x4424D6;
pub const RYB_PURPLE: u32 = 0x8601AF;
pub const RYB_RPURPLE: u32 = 0xC21460;

pub const CMY_WHEEL: [u32; 12] = [
    CMY_CYAN, CMY_CBLUE, CMY_BLUE, CMY_PURPLE, CMY_MAGENTA, CMY_MRED, CMY_RED, CMY_ORANGE,
    CMY_YELLOW, CMY_YGREEN, CMY_GREEN, CMY_CGREEN,
];

pub const RYB_WHEEL: [u32; 12] = [
    RYB_RED, RYB_RORANGE, RYB_ORANGE, RYB_YORANGE, RYB_YELLOW, RYB_YGREEN, RYB_GREEN, RYB_BGREEN,
    RYB_BLUE, RYB_BPURPLE, RYB_PURPLE, RYB_RPURPLE,
];

/// Ten shades each of ten hues, light to dark.
const BLOCK_PALETTE: [[u32; 10]; 10] = [
    // reds
    [0xfdedec, 0xfadbd8, 0xf5b7b1, 0xf1948a, 0xec7063, 0xe74c3c, 0xcb4335, 0xb03a2e, 0x943126, 0x78281f],
    // purples
    [0xf4ecf7, 0xe8daef, 0xd2b4de, 0xbb8fce, 0xa569bd, 0x8e44ad, 0x7d3c98, 0x6c3483, 0x5b2c6f, 0x4a235a],
    // blues
    [0xebf5fb, 0xd6eaf8, 0xaed6f1, 0x85c1e9, 0x5dade2, 0x3498db, 0x2e86c1, 0x2874a6, 0x21618c, 0x1b4f72],
    // dark greens
    [0xe8f6f3, 0xd0ece7, 0xa2d9ce, 0x73c6b6, 0x45b39d, 0x16a085, 0x138d75, 0x117a65, 0x0e6655, 0x0b5345],
    // light greens
    [0xeafaf1, 0xd5f5e3, 0xabebc6, 0x82e0aa, 0x58d68d, 0x2ecc71, 0x28b463, 0x239b56, 0x1d8348, 0x186a3b],
    // yellows
    [0xfef9e7, 0xfcf3cf, 0xf9e79f, 0xf7dc6f, 0xf4d03f, 0xf1c40f, 0xd4ac0d, 0xb7950b, 0x9a7d0a, 0x7d6608],
    // oranges
    [0xfef5e7, 0xfdebd0, 0xfad7a0, 0xf8c471, 0xf5b041, 0xf39c12, 0xd68910, 0xb9770e, 0x9c640c, 0x7e5109],
    // browns
    [0xfbeee6, 0xf6ddcc, 0xedbb99, 0xe59866, 0xdc7633, 0xd35400, 0xba4a00, 0xa04000, 0x873600, 0x6e2c00],
    // grays
    [0xf8f9f9, 0xf2f3f4, 0xe5e7e9, 0xd7dbdd, 0xcacfd2, 0xbdc3c7, 0xa6acaf, 0x909497, 0x797d7f, 0x626567],
    // steel
    [0xeaecee, 0xd5d8dc, 0xabb2b9, 0x808b96, 0x566573, 0x2c3e50, 0x273746, 0x212f3d, 0x1c2833, 0x17202a],
];

/// Demo patterns.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum Demo {
    /// Fill the screen with each color of a wheel in turn
    Palette,
    /// Background, square, and a cross of lines; colors alternate with rotation
    Quadrant,
    /// 10x10 grid of color shades
    Blocks,
    /// Four quadrants with an overlapping center rectangle
    Stacked,
}

/// Color wheel for the palette demo.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum Wheel {
    #[default]
    Cmy,
    Ryb,
}

impl Wheel {
    pub fn colors(&self) -> &'static [u32] {
        match self {
            Wheel::Cmy => &CMY_WHEEL,
            Wheel::Ryb => &RYB_WHEEL,
        }
    }
}

impl Demo {
    /// Draws the pattern once at the current orientation.
    pub fn draw(&self, panel: &mut SimPanel, wheel: Wheel) -> Result<()> {
        match self {
            Demo::Palette => screen_fill(panel, wheel.colors()),
            Demo::Quadrant => quadrant(panel),
            Demo::Blocks => color_blocks(panel),
            Demo::Stacked => stacked_rectangles(panel),
        }
    }
}

/// Redraws a pattern once per rotation step, clockwise from native.
pub fn rotation_sweep(panel: &mut SimPanel, demo: Demo, wheel: Wheel, steps: usize) -> Result<()> {
    for step in 0..steps {
        let rotation = Rotation::from_index(step);
        panel.set_rotation(rotation)?;
        info!("Sweep step {}: {:?} at {}°", step + 1, demo, rotation);
        demo.draw(panel, wheel)?;
    }
    Ok(())
}

pub fn screen_fill(panel: &mut SimPanel, palette: &[u32]) -> Result<()> {
    for &color in palette {
        panel.fill_screen(color)?;
    }
    Ok(())
}

pub fn quadrant(panel: &mut SimPanel) -> Result<()> {
    const FOREGROUND: [u32; 2] = [RYB_BGREEN, RYB_BPURPLE];
    const BACKGROUND: [u32; 2] = [RYB_YORANGE, RYB_YGREEN];

    let i = (panel.rotation().degrees() / 90) as usize % 2;
    let (width, height) = panel.size();
    panel.fill_screen(BACKGROUND[i])?;
    panel.fill_rectangle(10, 10, 50, 50, FOREGROUND[i])?;
    panel.draw_hline(10, width - 20, height / 3, FOREGROUND[i])?;
    panel.draw_vline(width / 2, 10, height - 20, FOREGROUND[i])?;
    Ok(())
}

pub fn color_blocks(panel: &mut SimPanel) -> Result<()> {
    let (width, height) = panel.size();
    let (bw, bh) = (width / 10, height / 10);
    for (x, column) in BLOCK_PALETTE.iter().enumerate() {
        for (y, &color) in column.iter().enumerate() {
            panel.fill_rectangle(x as u16 * bw, y as u16 * bh, bw, bh, color)?;
        }
    }
    Ok(())
}

pub fn stacked_rectangles(panel: &mut SimPanel) -> Result<()> {
    const G_RED: u32 = 0xEA4335;

    let (width, height) = panel.size();
    let (hw, hh) = (width / 2, height / 2);
    panel.fill_rectangle(0, 0, hw, hh, CMY_BLUE)?;
    panel.fill_rectangle(hw, 0, hw, hh, G_RED)?;
    panel.fill_rectangle(0, hh, hw, hh, RYB_GREEN)?;
    panel.fill_rectangle(hw, hh, hw, hh, RYB_YORANGE)?;
    panel.fill_rectangle(width / 4, height / 4, hw, hh, CMY_ORANGE)?;
    Ok(())
}
