//! Supported controllers, their power-on tables and panel configuration.

use super::protocol::opcode::*;
use crate::transport::DEFAULT_CAPACITY;
use crate::{Error, Result};
use std::str::FromStr;

/// One framed command of a fixed register sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitStep {
    pub opcode: u8,
    pub data: &'static [u8],
}

const fn step(opcode: u8, data: &'static [u8]) -> InitStep {
    InitStep { opcode, data }
}

/// Reset and wake timing in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetTiming {
    /// Time the reset line is held high before the pulse (0 = no pre-settle).
    pub settle_ms: u32,
    /// Time the reset line is held low.
    pub hold_ms: u32,
    /// Wake interval after a hardware reset.
    pub wake_ms: u32,
    /// Wake interval after a software reset.
    pub software_wake_ms: u32,
}

/// Minimum wait after sleep-out before the display may be switched on.
pub const SLEEP_OUT_DELAY_MS: u32 = 120;

/// ILI9341 power, voltage, gamma and timing registers.
static ILI9341_INIT: &[InitStep] = &[
    step(PWCTRL1, &[0x23]),                   // 4.80V
    step(PWCTRL2, &[0x10]),                   // DDVDH: VCIx2
    step(PWCTRLB, &[0x00, 0xC1, 0x30]),       // DRV_ena
    step(PWSEQCTRL, &[0x64, 0x03, 0x12, 0x81]),
    step(VMCTRL1, &[0x3E, 0x28]),             // VMH: 5.850V, VML: -1.500V
    step(VMCTRL2, &[0x86]),                   // VMF: VMH-58, VML-58
    step(TIMCTRLA, &[0x85, 0x00, 0x78]),
    step(PUMPRATIO, &[0x20]),                 // DDVDH=2xVCI
    step(TIMCTRLB, &[0x00, 0x00]),
    step(PIXFMT, &[0x66]),                    // 18 bits / pixel
    step(INVON, &[]),
    step(GAM3CTRL, &[0x00]),
    step(GAMSET, &[0x01]),                    // gamma curve 1
    step(
        GAMCTRLP,
        &[0x0F, 0x31, 0x2B, 0x0C, 0x0E, 0x08, 0x4E, 0xF1, 0x37, 0x07, 0x10, 0x03, 0x0E, 0x09, 0x00],
    ),
    step(
        GAMCTRLN,
        &[0x00, 0x0E, 0x14, 0x03, 0x11, 0x07, 0x31, 0xC1, 0x48, 0x08, 0x0F, 0x0C, 0x31, 0x36, 0x0F],
    ),
    step(DISCTRL, &[0x08, 0xC2, 0x27]),
];

static ILI9341_DISPLAY_ON: &[InitStep] = &[step(DISON, &[])];

/// ILI9488 power, voltage and timing registers.
static ILI9488_INIT: &[InitStep] = &[
    step(PWCTRL1, &[0x17, 0x15]),             // VREG1OUT 5.0V, VREG2OUT -4.875V
    step(PWCTRL2, &[0x41]),                   // VGH: VCI x 6, VGL: -VCI x 4
    step(VMCTRL1, &[0x00, 0x12, 0x80, 0x40]), // VCM_REG -1.71875, VCM_REG_EN
    step(PIXFMT, &[0x76]),
    step(FRMCTRL1, &[0xA0, 0x11]),            // 60.76Hz, 17 clocks
    step(INVCTRL, &[0x02]),                   // 2 dot inversion
    step(DISCTRL, &[0x02, 0x22, 0x3B]),       // 480 lines
    step(ETMOD, &[0xC6]),
    step(ADJCTRL3, &[0xA9, 0x51, 0x2C, 0x82]),
];

static ILI9488_DISPLAY_ON: &[InitStep] = &[step(IDMOFF, &[]), step(DISON, &[])];

/// Supported panel controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Controller {
    /// ILI9341, 240x320.
    Ili9341,
    /// ILI9488 (ILI948x family), 320x480.
    #[default]
    Ili9488,
}

impl Controller {
    /// Native size at rotation 0.
    pub fn default_size(&self) -> (u16, u16) {
        match self {
            Controller::Ili9341 => (240, 320),
            Controller::Ili9488 => (320, 480),
        }
    }

    /// Vendor register sequence sent after reset.
    pub fn init_sequence(&self) -> &'static [InitStep] {
        match self {
            Controller::Ili9341 => ILI9341_INIT,
            Controller::Ili9488 => ILI9488_INIT,
        }
    }

    /// Commands sent once the sleep-out wait has elapsed.
    pub fn display_on_sequence(&self) -> &'static [InitStep] {
        match self {
            Controller::Ili9341 => ILI9341_DISPLAY_ON,
            Controller::Ili9488 => ILI9488_DISPLAY_ON,
        }
    }

    /// Settle time after display-on.
    pub fn display_on_delay_ms(&self) -> u32 {
        match self {
            Controller::Ili9341 => 0,
            Controller::Ili9488 => 100,
        }
    }

    pub fn reset_timing(&self) -> ResetTiming {
        match self {
            // datasheet: 10ms hold, 120ms wake
            Controller::Ili9341 => ResetTiming {
                settle_ms: 0,
                hold_ms: 64,
                wake_ms: 140,
                software_wake_ms: 140,
            },
            Controller::Ili9488 => ResetTiming {
                settle_ms: 100,
                hold_ms: 100,
                wake_ms: 200,
                software_wake_ms: 150,
            },
        }
    }
}

impl FromStr for Controller {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ili9341" => Ok(Controller::Ili9341),
            "ili9488" | "ili948x" => Ok(Controller::Ili9488),
            _ => Err(Error::InvalidController(s.to_string())),
        }
    }
}

impl std::fmt::Display for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Controller::Ili9341 => write!(f, "ili9341"),
            Controller::Ili9488 => write!(f, "ili9488"),
        }
    }
}

/// Static panel configuration passed to the constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    pub controller: Controller,
    /// Native width at rotation 0.
    pub width: u16,
    /// Native height at rotation 0.
    pub height: u16,
    /// Transport buffer size in bytes.
    pub buffer_capacity: usize,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::new(Controller::default())
    }
}

impl PanelConfig {
    /// Creates a configuration with the controller's native size.
    pub fn new(controller: Controller) -> Self {
        let (width, height) = controller.default_size();
        Self {
            controller,
            width,
            height,
            buffer_capacity: DEFAULT_CAPACITY,
        }
    }

    /// Overrides the native size. A zero dimension keeps the controller default.
    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        let (default_width, default_height) = self.controller.default_size();
        self.width = if width == 0 { default_width } else { width };
        self.height = if height == 0 { default_height } else { height };
        self
    }

    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sizes() {
        assert_eq!(PanelConfig::new(Controller::Ili9341).width, 240);
        assert_eq!(PanelConfig::new(Controller::Ili9488).height, 480);
    }

    #[test]
    fn test_zero_size_keeps_default() {
        let config = PanelConfig::new(Controller::Ili9341).with_size(0, 400);
        assert_eq!((config.width, config.height), (240, 400));
    }

    #[test]
    fn test_init_tables_end_before_sleep_out() {
        for controller in [Controller::Ili9341, Controller::Ili9488] {
            let init = controller.init_sequence();
            assert!(!init.is_empty());
            assert!(init.iter().all(|s| s.opcode != SLPOUT && s.opcode != DISON));
            assert_eq!(controller.display_on_sequence().last().unwrap().opcode, DISON);
        }
    }

    #[test]
    fn test_reset_hold_within_safe_margin() {
        for controller in [Controller::Ili9341, Controller::Ili9488] {
            let timing = controller.reset_timing();
            assert!((64..=100).contains(&timing.hold_ms));
            assert!(timing.wake_ms >= 120);
            assert!(timing.software_wake_ms >= 120);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("ILI9341".parse::<Controller>().unwrap(), Controller::Ili9341);
        assert_eq!("ili948x".parse::<Controller>().unwrap(), Controller::Ili9488);
        assert!("st7789".parse::<Controller>().is_err());
    }
}
