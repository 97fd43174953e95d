//! Controller opcodes and command payload encoding.
//!
//! Wire format of a framed command:
//! - 1 opcode byte, sent with the data/command line low
//! - 0..N data bytes, sent with the data/command line high
//!
//! Multi-byte register arguments are big-endian.

/// Opcodes shared by the ILI9341 and ILI948x register maps.
pub mod opcode {
    /// No Operation.
    pub const NOP: u8 = 0x00;
    /// Software Reset.
    pub const SWRESET: u8 = 0x01;
    /// Sleep Out.
    pub const SLPOUT: u8 = 0x11;
    /// Normal Display Mode ON.
    pub const NORON: u8 = 0x13;
    /// Display Inversion ON.
    pub const INVON: u8 = 0x21;
    /// Gamma Set.
    pub const GAMSET: u8 = 0x26;
    /// Display OFF.
    pub const DISOFF: u8 = 0x28;
    /// Display ON.
    pub const DISON: u8 = 0x29;
    /// Column Address Set.
    pub const CASET: u8 = 0x2A;
    /// Page (row) Address Set.
    pub const PASET: u8 = 0x2B;
    /// Memory Write.
    pub const RAMWR: u8 = 0x2C;
    /// Vertical Scrolling Definition.
    pub const VSCRDEF: u8 = 0x33;
    /// Memory Access Control.
    pub const MADCTL: u8 = 0x36;
    /// Vertical Scrolling Start Address.
    pub const VSCRSADD: u8 = 0x37;
    /// Idle Mode OFF.
    pub const IDMOFF: u8 = 0x38;
    /// Interface Pixel Format.
    pub const PIXFMT: u8 = 0x3A;
    /// Frame Rate Control (normal mode).
    pub const FRMCTRL1: u8 = 0xB1;
    /// Display Inversion Control.
    pub const INVCTRL: u8 = 0xB4;
    /// Display Function Control.
    pub const DISCTRL: u8 = 0xB6;
    /// Entry Mode Set.
    pub const ETMOD: u8 = 0xB7;
    /// Power Control 1.
    pub const PWCTRL1: u8 = 0xC0;
    /// Power Control 2.
    pub const PWCTRL2: u8 = 0xC1;
    /// VCOM Control 1.
    pub const VMCTRL1: u8 = 0xC5;
    /// VCOM Control 2 (ILI9341).
    pub const VMCTRL2: u8 = 0xC7;
    /// Power Control B (ILI9341).
    pub const PWCTRLB: u8 = 0xCF;
    /// Positive Gamma Control.
    pub const GAMCTRLP: u8 = 0xE0;
    /// Negative Gamma Control.
    pub const GAMCTRLN: u8 = 0xE1;
    /// Driver Timing Control A (ILI9341).
    pub const TIMCTRLA: u8 = 0xE8;
    /// Driver Timing Control B (ILI9341).
    pub const TIMCTRLB: u8 = 0xEA;
    /// Power On Sequence Control (ILI9341).
    pub const PWSEQCTRL: u8 = 0xED;
    /// Enable 3 Gamma Control (ILI9341).
    pub const GAM3CTRL: u8 = 0xF2;
    /// Pump Ratio Control (ILI9341).
    pub const PUMPRATIO: u8 = 0xF7;
    /// Adjust Control 3 (ILI9488, same address as the ILI9341 pump ratio).
    pub const ADJCTRL3: u8 = 0xF7;

    /// Returns the mnemonic for the opcodes the driver itself issues.
    pub fn name(opcode: u8) -> Option<&'static str> {
        Some(match opcode {
            NOP => "NOP",
            SWRESET => "SWRESET",
            SLPOUT => "SLPOUT",
            NORON => "NORON",
            DISOFF => "DISOFF",
            DISON => "DISON",
            CASET => "CASET",
            PASET => "PASET",
            RAMWR => "RAMWR",
            VSCRDEF => "VSCRDEF",
            MADCTL => "MADCTL",
            VSCRSADD => "VSCRSADD",
            IDMOFF => "IDMOFF",
            PIXFMT => "PIXFMT",
            _ => return None,
        })
    }
}

/// Memory access control bits.
pub mod madctl {
    /// Row address order: bottom to top.
    pub const MY: u8 = 0x80;
    /// Column address order: right to left.
    pub const MX: u8 = 0x40;
    /// Row/column exchange.
    pub const MV: u8 = 0x20;
    /// Vertical refresh order: bottom to top.
    pub const ML: u8 = 0x10;
    /// Blue-green-red sub-pixel order.
    pub const BGR: u8 = 0x08;
    /// Horizontal refresh order: right to left.
    pub const MH: u8 = 0x04;
}

/// Encodes an inclusive address range for CASET/PASET.
pub fn encode_range(start: u16, end: u16) -> [u8; 4] {
    let [s_hi, s_lo] = start.to_be_bytes();
    let [e_hi, e_lo] = end.to_be_bytes();
    [s_hi, s_lo, e_hi, e_lo]
}

/// Encodes the vertical scrolling definition (top fixed, scroll band, bottom fixed).
pub fn encode_scroll_definition(top_fixed: u16, band: u16, bottom_fixed: u16) -> [u8; 6] {
    let [t_hi, t_lo] = top_fixed.to_be_bytes();
    let [v_hi, v_lo] = band.to_be_bytes();
    let [b_hi, b_lo] = bottom_fixed.to_be_bytes();
    [t_hi, t_lo, v_hi, v_lo, b_hi, b_lo]
}

/// Encodes the vertical scrolling start address.
pub fn encode_scroll_start(line: u16) -> [u8; 2] {
    line.to_be_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_range() {
        assert_eq!(encode_range(0, 319), [0x00, 0x00, 0x01, 0x3F]);
        assert_eq!(encode_range(10, 59), [0x00, 0x0A, 0x00, 0x3B]);
    }

    #[test]
    fn test_encode_scroll() {
        assert_eq!(
            encode_scroll_definition(16, 448, 16),
            [0x00, 0x10, 0x01, 0xC0, 0x00, 0x10]
        );
        assert_eq!(encode_scroll_start(0x0123), [0x01, 0x23]);
    }

    #[test]
    fn test_opcode_names() {
        assert_eq!(opcode::name(opcode::RAMWR), Some("RAMWR"));
        assert_eq!(opcode::name(opcode::MADCTL), Some("MADCTL"));
        assert_eq!(opcode::name(opcode::GAMCTRLP), None);
    }
}
