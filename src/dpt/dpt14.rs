//! DPT 14.xxx - 4-byte Float (IEEE 754 single precision)
//!
//! 32-bit floating point datapoint types used for high-precision
//! physical quantities.
//!
//! ## Format
//!
//! - 32 bits: IEEE 754 single-precision float, big-endian
//!
//! ## Common Subtypes
//!
//! - **14.019** - Electric current (A)
//! - **14.027** - Electric potential (V)
//! - **14.033** - Frequency (Hz)
//! - **14.056** - Power (W)
//! - **14.068** - Temperature (°C)
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_pico::dpt::{Dpt14, DptEncode, DptDecode};
//!
//! let mut buf = [0u8; 4];
//! let len = Dpt14::Power.encode(1250.5, &mut buf)?;
//! let value = Dpt14::Power.decode(&buf[..len])?;
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 14.xxx 4-byte IEEE 754 float types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt14 {
    /// DPT 14.019 - Electric current (A)
    Current,
    /// DPT 14.027 - Electric potential (V)
    Voltage,
    /// DPT 14.033 - Frequency (Hz)
    Frequency,
    /// DPT 14.056 - Power (W)
    Power,
    /// DPT 14.068 - Temperature (°C)
    Temperature,
}

impl Dpt14 {
    /// Get the DPT identifier string (e.g., "14.056")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt14::Current => "14.019",
            Dpt14::Voltage => "14.027",
            Dpt14::Frequency => "14.033",
            Dpt14::Power => "14.056",
            Dpt14::Temperature => "14.068",
        }
    }

    /// Get the unit string for this DPT
    pub const fn unit(&self) -> &'static str {
        match self {
            Dpt14::Current => "A",
            Dpt14::Voltage => "V",
            Dpt14::Frequency => "Hz",
            Dpt14::Power => "W",
            Dpt14::Temperature => "°C",
        }
    }

    #[inline]
    fn decode_raw(&self, data: &[u8]) -> Result<f32> {
        if data.len() < 4 {
            return Err(KnxError::invalid_dpt_data());
        }

        let bytes = unsafe {
            [
                *data.get_unchecked(0),
                *data.get_unchecked(1),
                *data.get_unchecked(2),
                *data.get_unchecked(3),
            ]
        };
        Ok(f32::from_be_bytes(bytes))
    }
}

impl DptEncode<f32> for Dpt14 {
    fn encode(&self, value: f32, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < 4 {
            return Err(KnxError::buffer_too_small());
        }

        buf[..4].copy_from_slice(&value.to_be_bytes());
        Ok(4)
    }
}

impl DptDecode<f32> for Dpt14 {
    fn decode(&self, data: &[u8]) -> Result<f32> {
        self.decode_raw(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_float_eq(a: f32, b: f32, epsilon: f32) {
        assert!((a - b).abs() < epsilon, "Expected {} ≈ {}", a, b);
    }

    #[test]
    fn test_round_trip() {
        let mut buf = [0u8; 4];
        for value in [0.0f32, 1250.5, -40.0, 3.14159, 1.0e6] {
            let len = Dpt14::Power.encode(value, &mut buf).unwrap();
            assert_eq!(len, 4);
            let decoded = Dpt14::Power.decode(&buf[..len]).unwrap();
            assert_float_eq(decoded, value, 0.01);
        }
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut buf = [0u8; 3];
        assert!(Dpt14::Power.encode(1.0, &mut buf).is_err());
    }

    #[test]
    fn test_decode_invalid_length() {
        let result = Dpt14::Power.decode(&[0x00, 0x00]);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), KnxError::Dpt(_)));
    }

    #[test]
    fn test_identifier() {
        assert_eq!(Dpt14::Power.identifier(), "14.056");
        assert_eq!(Dpt14::Temperature.identifier(), "14.068");
    }

    #[test]
    fn test_unit() {
        assert_eq!(Dpt14::Voltage.unit(), "V");
        assert_eq!(Dpt14::Frequency.unit(), "Hz");
    }
}
