//! DPT 11.xxx - Date (3 bytes)
//!
//! Represents a calendar date.
//!
//! ## Format
//!
//! ```text
//! Byte 0: 000D DDDD  (D = day of month 1-31)
//! Byte 1: 000M MMMM  (M = month 1-12)
//! Byte 2: 0YYY YYYY  (Y = year, 0-99, offset from 1900 or 2000)
//! ```
//!
//! Years 0-89 map to 2000-2089, years 90-99 map to 1990-1999.
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_pico::dpt::{Dpt11, DptEncode, DptDecode, KnxDate};
//!
//! let mut buf = [0u8; 3];
//! let d = KnxDate { day: 28, month: 7, year: 2026 };
//! let len = Dpt11::Date.encode(d, &mut buf)?;
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 11.xxx date types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt11 {
    /// DPT 11.001 - Date
    Date,
}

/// A calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnxDate {
    /// Day of month (1-31)
    pub day: u8,
    /// Month (1-12)
    pub month: u8,
    /// Full year (1990-2089)
    pub year: u16,
}

impl Dpt11 {
    /// Get the DPT identifier string (e.g., "11.001")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt11::Date => "11.001",
        }
    }
}

impl DptEncode<KnxDate> for Dpt11 {
    fn encode(&self, value: KnxDate, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < 3 {
            return Err(KnxError::buffer_too_small());
        }

        if !(1..=31).contains(&value.day) || !(1..=12).contains(&value.month) {
            return Err(KnxError::dpt_value_out_of_range());
        }

        let year_byte = match value.year {
            1990..=1999 => (value.year - 1900) as u8,
            2000..=2089 => (value.year - 2000) as u8,
            _ => return Err(KnxError::dpt_value_out_of_range()),
        };

        buf[0] = value.day & 0x1F;
        buf[1] = value.month & 0x0F;
        buf[2] = year_byte & 0x7F;
        Ok(3)
    }
}

impl DptDecode<KnxDate> for Dpt11 {
    fn decode(&self, data: &[u8]) -> Result<KnxDate> {
        if data.len() < 3 {
            return Err(KnxError::invalid_dpt_data());
        }

        let day = data[0] & 0x1F;
        let month = data[1] & 0x0F;
        let year_byte = data[2] & 0x7F;

        let year = if year_byte >= 90 {
            1900 + u16::from(year_byte)
        } else {
            2000 + u16::from(year_byte)
        };

        Ok(KnxDate { day, month, year })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let mut buf = [0u8; 3];
        let d = KnxDate { day: 28, month: 7, year: 2026 };
        let len = Dpt11::Date.encode(d, &mut buf).unwrap();
        assert_eq!(len, 3);
        assert_eq!(&buf[..len], &[28, 7, 26]);
    }

    #[test]
    fn test_encode_1990s_year() {
        let mut buf = [0u8; 3];
        let d = KnxDate { day: 1, month: 1, year: 1999 };
        let len = Dpt11::Date.encode(d, &mut buf).unwrap();
        assert_eq!(&buf[..len], &[1, 1, 99]);
    }

    #[test]
    fn test_encode_invalid_day() {
        let mut buf = [0u8; 3];
        let d = KnxDate { day: 32, month: 1, year: 2020 };
        assert!(Dpt11::Date.encode(d, &mut buf).is_err());
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut buf = [0u8; 2];
        let d = KnxDate { day: 1, month: 1, year: 2020 };
        assert!(Dpt11::Date.encode(d, &mut buf).is_err());
    }

    #[test]
    fn test_decode() {
        let d = Dpt11::Date.decode(&[28, 7, 26]).unwrap();
        assert_eq!(d, KnxDate { day: 28, month: 7, year: 2026 });

        let d = Dpt11::Date.decode(&[1, 1, 99]).unwrap();
        assert_eq!(d, KnxDate { day: 1, month: 1, year: 1999 });
    }

    #[test]
    fn test_decode_invalid_length() {
        let result = Dpt11::Date.decode(&[1, 1]);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), KnxError::Dpt(_)));
    }

    #[test]
    fn test_round_trip() {
        let mut buf = [0u8; 3];
        let cases = [
            KnxDate { day: 1, month: 1, year: 2000 },
            KnxDate { day: 31, month: 12, year: 2089 },
            KnxDate { day: 15, month: 6, year: 1995 },
        ];

        for d in cases {
            let len = Dpt11::Date.encode(d, &mut buf).unwrap();
            let decoded = Dpt11::Date.decode(&buf[..len]).unwrap();
            assert_eq!(decoded, d);
        }
    }

    #[test]
    fn test_identifier() {
        assert_eq!(Dpt11::Date.identifier(), "11.001");
    }
}
