//! DPT 8.xxx - 2-byte Signed Value (2 bytes)
//!
//! 16-bit signed datapoint types represent values from -32768 to 32767.
//!
//! ## Format
//!
//! - 16 bits: signed value (two's complement), big-endian
//!
//! ## Common Subtypes
//!
//! - **8.001** - Pulses difference
//! - **8.002** - Time period (ms)
//! - **8.010** - Percentage difference (%)
//! - **8.011** - Rotation angle (°)
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_pico::dpt::{Dpt8, DptEncode, DptDecode};
//!
//! let mut buf = [0u8; 2];
//! let len = Dpt8::PulsesDifference.encode(-1234, &mut buf)?;
//! let value = Dpt8::PulsesDifference.decode(&buf[..len])?;
//! assert_eq!(value, -1234);
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 8.xxx 16-bit signed types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt8 {
    /// DPT 8.001 - Pulses difference
    PulsesDifference,
    /// DPT 8.002 - Time period (ms)
    TimePeriodMs,
    /// DPT 8.010 - Percentage difference (%)
    PercentageDifference,
    /// DPT 8.011 - Rotation angle (°)
    RotationAngle,
}

impl Dpt8 {
    /// Get the DPT identifier string (e.g., "8.001")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt8::PulsesDifference => "8.001",
            Dpt8::TimePeriodMs => "8.002",
            Dpt8::PercentageDifference => "8.010",
            Dpt8::RotationAngle => "8.011",
        }
    }

    /// Get the unit string for this DPT
    pub const fn unit(&self) -> &'static str {
        match self {
            Dpt8::PulsesDifference => "pulses",
            Dpt8::TimePeriodMs => "ms",
            Dpt8::PercentageDifference => "%",
            Dpt8::RotationAngle => "°",
        }
    }

    /// Get the valid range for this DPT (min, max)
    pub const fn range(&self) -> (i16, i16) {
        (i16::MIN, i16::MAX)
    }

    #[inline]
    fn decode_raw(&self, data: &[u8]) -> Result<i16> {
        if data.len() < 2 {
            return Err(KnxError::invalid_dpt_data());
        }

        let bytes = unsafe { [*data.get_unchecked(0), *data.get_unchecked(1)] };
        Ok(i16::from_be_bytes(bytes))
    }
}

impl DptEncode<i16> for Dpt8 {
    fn encode(&self, value: i16, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < 2 {
            return Err(KnxError::buffer_too_small());
        }

        let bytes = value.to_be_bytes();
        buf[0] = bytes[0];
        buf[1] = bytes[1];
        Ok(2)
    }
}

impl DptDecode<i16> for Dpt8 {
    fn decode(&self, data: &[u8]) -> Result<i16> {
        self.decode_raw(data)
    }
}
