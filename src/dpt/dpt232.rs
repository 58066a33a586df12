//! DPT 232.600 - RGB Color (3 bytes)
//!
//! Represents an RGB color value as three 8-bit channels.
//!
//! ## Format
//!
//! - Byte 0: Red (0-255)
//! - Byte 1: Green (0-255)
//! - Byte 2: Blue (0-255)
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_pico::dpt::{Dpt232, DptEncode, DptDecode, RgbColor};
//!
//! let mut buf = [0u8; 3];
//! let len = Dpt232::Rgb.encode(RgbColor { r: 255, g: 128, b: 0 }, &mut buf)?;
//! let color = Dpt232::Rgb.decode(&buf[..len])?;
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 232.xxx RGB color types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt232 {
    /// DPT 232.600 - RGB color
    Rgb,
}

/// An RGB color value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RgbColor {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Dpt232 {
    /// Get the DPT identifier string (e.g., "232.600")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt232::Rgb => "232.600",
        }
    }
}

impl DptEncode<RgbColor> for Dpt232 {
    fn encode(&self, value: RgbColor, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < 3 {
            return Err(KnxError::buffer_too_small());
        }

        buf[0] = value.r;
        buf[1] = value.g;
        buf[2] = value.b;
        Ok(3)
    }
}

impl DptDecode<RgbColor> for Dpt232 {
    fn decode(&self, data: &[u8]) -> Result<RgbColor> {
        if data.len() < 3 {
            return Err(KnxError::invalid_dpt_data());
        }

        Ok(RgbColor { r: data[0], g: data[1], b: data[2] })
    }
}
