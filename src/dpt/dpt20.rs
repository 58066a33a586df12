//! DPT 20.xxx - 1-byte Enumeration
//!
//! 8-bit enumerated datapoint types used for HVAC modes, priority levels
//! and similar small closed value sets.
//!
//! ## Format
//!
//! - 8 bits: enumerated value
//!
//! ## Common Subtypes
//!
//! - **20.102** - HVAC mode (Auto/Comfort/Standby/Economy/Protection)
//! - **20.105** - HVAC control mode
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_pico::dpt::{Dpt20, DptEncode, DptDecode, HvacMode};
//!
//! let mut buf = [0u8; 1];
//! let len = Dpt20::HvacMode.encode(HvacMode::Comfort, &mut buf)?;
//! let mode = Dpt20::HvacMode.decode(&buf[..len])?;
//! assert_eq!(mode, HvacMode::Comfort);
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 20.xxx 1-byte enumeration types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt20 {
    /// DPT 20.102 - HVAC mode
    HvacMode,
}

/// HVAC operating mode, per DPT 20.102
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HvacMode {
    /// Automatic mode
    Auto = 0,
    /// Comfort mode
    Comfort = 1,
    /// Standby mode
    Standby = 2,
    /// Economy / night mode
    Economy = 3,
    /// Frost/heat protection
    Protection = 4,
}

impl HvacMode {
    fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(HvacMode::Auto),
            1 => Ok(HvacMode::Comfort),
            2 => Ok(HvacMode::Standby),
            3 => Ok(HvacMode::Economy),
            4 => Ok(HvacMode::Protection),
            _ => Err(KnxError::invalid_dpt_data()),
        }
    }
}

impl Dpt20 {
    /// Get the DPT identifier string (e.g., "20.102")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt20::HvacMode => "20.102",
        }
    }
}

impl DptEncode<HvacMode> for Dpt20 {
    fn encode(&self, value: HvacMode, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Err(KnxError::buffer_too_small());
        }

        buf[0] = value as u8;
        Ok(1)
    }
}

impl DptDecode<HvacMode> for Dpt20 {
    fn decode(&self, data: &[u8]) -> Result<HvacMode> {
        if data.is_empty() {
            return Err(KnxError::invalid_dpt_data());
        }

        HvacMode::from_u8(data[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let mut buf = [0u8; 1];
        let len = Dpt20::HvacMode.encode(HvacMode::Comfort, &mut buf).unwrap();
        assert_eq!(len, 1);
        assert_eq!(buf[0], 1);
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut buf = [0u8; 0];
        assert!(Dpt20::HvacMode.encode(HvacMode::Auto, &mut buf).is_err());
    }

    #[test]
    fn test_decode_all() {
        assert_eq!(Dpt20::HvacMode.decode(&[0]).unwrap(), HvacMode::Auto);
        assert_eq!(Dpt20::HvacMode.decode(&[1]).unwrap(), HvacMode::Comfort);
        assert_eq!(Dpt20::HvacMode.decode(&[2]).unwrap(), HvacMode::Standby);
        assert_eq!(Dpt20::HvacMode.decode(&[3]).unwrap(), HvacMode::Economy);
        assert_eq!(Dpt20::HvacMode.decode(&[4]).unwrap(), HvacMode::Protection);
    }

    #[test]
    fn test_decode_invalid_value() {
        let result = Dpt20::HvacMode.decode(&[5]);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), KnxError::Dpt(_)));
    }

    #[test]
    fn test_decode_empty_data() {
        let result = Dpt20::HvacMode.decode(&[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_round_trip() {
        let mut buf = [0u8; 1];
        for mode in [
            HvacMode::Auto,
            HvacMode::Comfort,
            HvacMode::Standby,
            HvacMode::Economy,
            HvacMode::Protection,
        ] {
            let len = Dpt20::HvacMode.encode(mode, &mut buf).unwrap();
            let decoded = Dpt20::HvacMode.decode(&buf[..len]).unwrap();
            assert_eq!(decoded, mode);
        }
    }

    #[test]
    fn test_identifier() {
        assert_eq!(Dpt20::HvacMode.identifier(), "20.102");
    }
}
