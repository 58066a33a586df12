//! DPT 12.xxx - 4-byte Unsigned Value (4 bytes)
//!
//! 32-bit unsigned datapoint types represent values from 0 to 4294967295.
//!
//! ## Format
//!
//! - 32 bits: unsigned value, big-endian
//!
//! ## Common Subtypes
//!
//! - **12.001** - Pulses (counter, unsigned)
//! - **12.100** - Time period (s)
//! - **12.101** - Time period (min)
//! - **12.102** - Time period (h)
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_pico::dpt::{Dpt12, DptEncode, DptDecode};
//!
//! let mut buf = [0u8; 4];
//! let len = Dpt12::Pulses.encode(123456, &mut buf)?;
//! let value = Dpt12::Pulses.decode(&buf[..len])?;
//! assert_eq!(value, 123456);
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 12.xxx 32-bit unsigned types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt12 {
    /// DPT 12.001 - Pulses (counter, unsigned)
    Pulses,
    /// DPT 12.100 - Time period (s)
    TimePeriodSec,
    /// DPT 12.101 - Time period (min)
    TimePeriodMin,
    /// DPT 12.102 - Time period (h)
    TimePeriodHr,
}

impl Dpt12 {
    /// Get the DPT identifier string (e.g., "12.001")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt12::Pulses => "12.001",
            Dpt12::TimePeriodSec => "12.100",
            Dpt12::TimePeriodMin => "12.101",
            Dpt12::TimePeriodHr => "12.102",
        }
    }

    /// Get the unit string for this DPT
    pub const fn unit(&self) -> &'static str {
        match self {
            Dpt12::Pulses => "pulses",
            Dpt12::TimePeriodSec => "s",
            Dpt12::TimePeriodMin => "min",
            Dpt12::TimePeriodHr => "h",
        }
    }

    #[inline]
    fn decode_raw(&self, data: &[u8]) -> Result<u32> {
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
        Ok(u32::from_be_bytes(bytes))
    }
}

impl DptEncode<u32> for Dpt12 {
    fn encode(&self, value: u32, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < 4 {
            return Err(KnxError::buffer_too_small());
        }

        buf[..4].copy_from_slice(&value.to_be_bytes());
        Ok(4)
    }
}

impl DptDecode<u32> for Dpt12 {
    fn decode(&self, data: &[u8]) -> Result<u32> {
        self.decode_raw(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let mut buf = [0u8; 4];
        let len = Dpt12::Pulses.encode(123456, &mut buf).unwrap();
        assert_eq!(len, 4);
        assert_eq!(&buf[..len], &[0x00, 0x01, 0xE2, 0x40]);
    }

    #[test]
    fn test_encode_max() {
        let mut buf = [0u8; 4];
        let len = Dpt12::Pulses.encode(u32::MAX, &mut buf).unwrap();
        assert_eq!(len, 4);
        assert_eq!(&buf[..len], &[0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut buf = [0u8; 3];
        assert!(Dpt12::Pulses.encode(1, &mut buf).is_err());
    }

    #[test]
    fn test_decode() {
        assert_eq!(
            Dpt12::Pulses.decode(&[0x00, 0x01, 0xE2, 0x40]).unwrap(),
            123456
        );
    }

    #[test]
    fn test_decode_invalid_length() {
        let result = Dpt12::Pulses.decode(&[0x00, 0x01]);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), KnxError::Dpt(_)));
    }

    #[test]
    fn test_round_trip() {
        let mut buf = [0u8; 4];
        for value in [0u32, 1, 123456, 4_000_000_000, u32::MAX] {
            let len = Dpt12::TimePeriodSec.encode(value, &mut buf).unwrap();
            let decoded = Dpt12::TimePeriodSec.decode(&buf[..len]).unwrap();
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn test_identifier() {
        assert_eq!(Dpt12::Pulses.identifier(), "12.001");
        assert_eq!(Dpt12::TimePeriodHr.identifier(), "12.102");
    }
}
