//! Display orientation support.
//!
//! Rotation, mirroring and color order all land in one controller register
//! (memory access control). The register value is always derived from the
//! three attributes and never stored on its own.

use crate::panel::protocol::madctl;
use crate::{Error, Result};
use std::str::FromStr;

/// Clockwise display rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    /// Native orientation (e.g. 320x480).
    #[default]
    Deg0,
    /// Rotated 90° clockwise (e.g. 480x320).
    Deg90,
    /// Rotated 180° (e.g. 320x480).
    Deg180,
    /// Rotated 270° clockwise (e.g. 480x320).
    Deg270,
}

impl Rotation {
    /// All rotations in clockwise order starting from native.
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Returns the rotation at `index` in clockwise order, wrapping every four steps.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// Returns the rotation in degrees.
    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Returns true if rows and columns are exchanged (90° and 270°).
    pub fn swaps_axes(&self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Returns the logical dimensions for a panel of the given native size.
    pub fn dimensions(&self, width: u16, height: u16) -> (u16, u16) {
        if self.swaps_axes() {
            (height, width)
        } else {
            (width, height)
        }
    }
}

impl FromStr for Rotation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_end_matches('°') {
            "0" => Ok(Rotation::Deg0),
            "90" => Ok(Rotation::Deg90),
            "180" => Ok(Rotation::Deg180),
            "270" => Ok(Rotation::Deg270),
            _ => Err(Error::InvalidRotation(s.to_string())),
        }
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// Sub-pixel color order of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorOrder {
    #[default]
    Rgb,
    Bgr,
}

impl FromStr for ColorOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "rgb" => Ok(ColorOrder::Rgb),
            "bgr" => Ok(ColorOrder::Bgr),
            _ => Err(Error::InvalidColorOrder(s.to_string())),
        }
    }
}

impl std::fmt::Display for ColorOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorOrder::Rgb => write!(f, "rgb"),
            ColorOrder::Bgr => write!(f, "bgr"),
        }
    }
}

/// Rotation, mirroring and color order as one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Orientation {
    pub rotation: Rotation,
    pub mirror: bool,
    pub color_order: ColorOrder,
}

impl Orientation {
    /// Computes the memory access control byte.
    ///
    /// The mirrored column is taken from the controller's own addressing
    /// table; it is not the non-mirrored column with one axis flipped.
    pub fn control_byte(&self) -> u8 {
        use madctl::{MH, ML, MV, MX, MY};

        let base = match (self.mirror, self.rotation) {
            (false, Rotation::Deg0) => 0,
            (false, Rotation::Deg90) => MV | MX | MH,
            (false, Rotation::Deg180) => MX | MH | MY | ML,
            (false, Rotation::Deg270) => MV | MY | ML,
            (true, Rotation::Deg0) => MX | MH,
            (true, Rotation::Deg90) => MX | MH | MY | ML | MV,
            (true, Rotation::Deg180) => MY | ML,
            (true, Rotation::Deg270) => MV,
        };

        match self.color_order {
            ColorOrder::Rgb => base,
            ColorOrder::Bgr => base | madctl::BGR,
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.rotation)?;
        if self.mirror {
            write!(f, " mirrored")?;
        }
        write!(f, " {}", self.color_order)
    }
}
