//! Control lines around the bus: chip-select, data/command, reset, backlight.

use crate::panel::ResetTiming;
use crate::{Error, Result};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use std::convert::Infallible;

/// Placeholder for a line that is not wired.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPin;

impl digital::ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> std::result::Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> std::result::Result<(), Self::Error> {
        Ok(())
    }
}

/// How the controller is reset at power-on.
#[derive(Debug)]
pub enum ResetStrategy<RST> {
    /// Pulse a dedicated reset line low.
    Hardware(RST),
    /// Send the software-reset opcode.
    Software,
}

/// Lines the constructor needs besides the SPI bus.
pub struct PanelPins<DC, CS = NoPin, RST = NoPin, BL = NoPin> {
    /// Data/command select.
    pub dc: DC,
    /// Chip-select; `None` when the bus selects the device itself.
    pub cs: Option<CS>,
    pub reset: ResetStrategy<RST>,
    pub backlight: Option<BL>,
}

impl<DC> PanelPins<DC> {
    /// Data/command line only: software reset, no chip-select, no backlight.
    pub fn new(dc: DC) -> Self {
        Self {
            dc,
            cs: None,
            reset: ResetStrategy::Software,
            backlight: None,
        }
    }
}

impl<DC, CS, RST, BL> PanelPins<DC, CS, RST, BL> {
    pub fn with_chip_select<C>(self, cs: C) -> PanelPins<DC, C, RST, BL> {
        PanelPins {
            dc: self.dc,
            cs: Some(cs),
            reset: self.reset,
            backlight: self.backlight,
        }
    }

    /// Uses a hardware reset line instead of the software-reset opcode.
    pub fn with_reset<R>(self, reset: R) -> PanelPins<DC, CS, R, BL> {
        PanelPins {
            dc: self.dc,
            cs: self.cs,
            reset: ResetStrategy::Hardware(reset),
            backlight: self.backlight,
        }
    }

    pub fn with_backlight<B>(self, backlight: B) -> PanelPins<DC, CS, RST, B> {
        PanelPins {
            dc: self.dc,
            cs: self.cs,
            reset: self.reset,
            backlight: Some(backlight),
        }
    }
}

/// Reset and backlight lines owned by the panel.
pub(crate) struct ControlLines<RST, BL> {
    reset: ResetStrategy<RST>,
    backlight: Option<BL>,
}

impl<RST: OutputPin, BL: OutputPin> ControlLines<RST, BL> {
    pub(crate) fn new(reset: ResetStrategy<RST>, backlight: Option<BL>) -> Self {
        Self { reset, backlight }
    }

    /// Drives the lines to their safe idle levels: backlight off, reset released.
    pub(crate) fn idle(&mut self) -> Result<()> {
        self.set_backlight(false)?;
        if let ResetStrategy::Hardware(pin) = &mut self.reset {
            pin.set_high().map_err(Error::pin)?;
        }
        Ok(())
    }

    /// Pulses the reset line and waits for the controller to wake.
    ///
    /// Returns false without touching anything when no reset line is wired.
    pub(crate) fn hardware_reset(
        &mut self,
        delay: &mut impl DelayNs,
        timing: ResetTiming,
    ) -> Result<bool> {
        let ResetStrategy::Hardware(pin) = &mut self.reset else {
            return Ok(false);
        };

        if timing.settle_ms > 0 {
            pin.set_high().map_err(Error::pin)?;
            delay.delay_ms(timing.settle_ms);
        }
        pin.set_low().map_err(Error::pin)?;
        delay.delay_ms(timing.hold_ms);
        pin.set_high().map_err(Error::pin)?;
        delay.delay_ms(timing.wake_ms);
        Ok(true)
    }

    pub(crate) fn release(self) -> (ResetStrategy<RST>, Option<BL>) {
        (self.reset, self.backlight)
    }

    pub(crate) fn has_backlight(&self) -> bool {
        self.backlight.is_some()
    }

    pub(crate) fn set_backlight(&mut self, on: bool) -> Result<()> {
        match self.backlight.as_mut() {
            Some(pin) if on => pin.set_high().map_err(Error::pin),
            Some(pin) => pin.set_low().map_err(Error::pin),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::Controller;
    use crate::sim::{Line, SimPin, Wire};

    #[test]
    fn test_hardware_reset_pulse() {
        let wire = Wire::new();
        let mut lines: ControlLines<SimPin, SimPin> =
            ControlLines::new(ResetStrategy::Hardware(wire.pin(Line::Reset)), None);

        let done = lines
            .hardware_reset(&mut wire.delay(), Controller::Ili9341.reset_timing())
            .unwrap();
        assert!(done);
        assert_eq!(wire.levels(Line::Reset), vec![false, true]);
        assert_eq!(wire.delays_ms(), vec![64, 140]);
    }

    #[test]
    fn test_software_strategy_skips_pulse() {
        let wire = Wire::new();
        let mut lines: ControlLines<SimPin, SimPin> =
            ControlLines::new(ResetStrategy::Software, Some(wire.pin(Line::Backlight)));

        let done = lines
            .hardware_reset(&mut wire.delay(), Controller::Ili9488.reset_timing())
            .unwrap();
        assert!(!done);
        assert!(wire.events().is_empty());

        lines.idle().unwrap();
        lines.set_backlight(true).unwrap();
        assert_eq!(wire.levels(Line::Backlight), vec![false, true]);
    }

    #[test]
    fn test_builder_types() {
        let wire = Wire::new();
        let pins = PanelPins::new(wire.pin(Line::DataCommand))
            .with_chip_select(wire.pin(Line::ChipSelect))
            .with_reset(wire.pin(Line::Reset));
        assert!(pins.cs.is_some());
        assert!(matches!(pins.reset, ResetStrategy::Hardware(_)));
        assert!(pins.backlight.is_none());
    }
}
