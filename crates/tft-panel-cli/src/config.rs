//! Configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tft_panel_hw::{ColorOrder, Controller, Orientation, PanelConfig, Rotation};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Screenshot written after drawing commands
    #[serde(default = "default_output")]
    pub output: String,

    /// Controller and geometry
    #[serde(default)]
    pub panel: PanelSection,

    /// Which control lines are wired
    #[serde(default)]
    pub wiring: WiringConfig,

    /// Orientation applied after power-on
    #[serde(default)]
    pub orientation: OrientationConfig,
}

/// Panel controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSection {
    /// Controller type: "ili9341" or "ili9488"
    #[serde(default = "default_controller")]
    pub controller: String,

    /// Native width (0 for the controller default)
    #[serde(default)]
    pub width: u16,

    /// Native height (0 for the controller default)
    #[serde(default)]
    pub height: u16,

    /// Transport buffer size in bytes
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for PanelSection {
    fn default() -> Self {
        Self {
            controller: default_controller(),
            width: 0,
            height: 0,
            buffer_size: default_buffer_size(),
        }
    }
}

/// Control line wiring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WiringConfig {
    #[serde(default = "default_true")]
    pub chip_select: bool,

    /// Pulse a reset line instead of sending a software reset
    #[serde(default)]
    pub hardware_reset: bool,

    #[serde(default = "default_true")]
    pub backlight: bool,
}

impl Default for WiringConfig {
    fn default() -> Self {
        Self {
            chip_select: true,
            hardware_reset: false,
            backlight: true,
        }
    }
}

/// Orientation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrientationConfig {
    /// Clockwise rotation in degrees (0, 90, 180, 270)
    #[serde(default)]
    pub rotation: u16,

    #[serde(default)]
    pub mirror: bool,

    /// Sub-pixel order: "rgb" or "bgr"
    #[serde(default = "default_color_order")]
    pub color_order: String,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            rotation: 0,
            mirror: false,
            color_order: default_color_order(),
        }
    }
}

// Default value functions
fn default_output() -> String {
    "panel.png".to_string()
}

fn default_controller() -> String {
    "ili9488".to_string()
}

fn default_buffer_size() -> usize {
    tft_panel_hw::transport::DEFAULT_CAPACITY
}

fn default_color_order() -> String {
    "rgb".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path.as_ref(), content).context("Failed to write configuration file")?;
        Ok(())
    }

    /// Builds the driver configuration.
    pub fn panel_config(&self) -> Result<PanelConfig> {
        let controller: Controller = self.panel.controller.parse()?;
        Ok(PanelConfig::new(controller)
            .with_size(self.panel.width, self.panel.height)
            .with_buffer_capacity(self.panel.buffer_size))
    }

    /// Builds the initial orientation.
    pub fn orientation(&self) -> Result<Orientation> {
        let rotation: Rotation = self.orientation.rotation.to_string().parse()?;
        let color_order: ColorOrder = self.orientation.color_order.parse()?;
        Ok(Orientation {
            rotation,
            mirror: self.orientation.mirror,
            color_order,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: default_output(),
            panel: PanelSection::default(),
            wiring: WiringConfig::default(),
            orientation: OrientationConfig::default(),
        }
    }
}
