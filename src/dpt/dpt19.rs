//! DPT 19.xxx - Date and Time (8 bytes)
//!
//! Combines a calendar date and time of day with additional status flags.
//!
//! ## Format
//!
//! ```text
//! Byte 0:   Year (0 = 1900)
//! Byte 1:   000M MMMM  (Month 1-12)
//! Byte 2:   000D DDDD  (Day of month 1-31)
//! Byte 3:   DDDH HHHH  (Day of week 0-7, Hour 0-23)
//! Byte 4:   00MM MMMM  (Minute 0-59)
//! Byte 5:   00SS SSSS  (Second 0-59)
//! Byte 6:   status flags (fault, working day, no WD, no year, no date, no day of week, no time, invalid)
//! Byte 7:   reserved (0)
//! ```
//!
//! This implementation only encodes/decodes the date/time fields; the
//! status byte is carried through as raw flags.
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_pico::dpt::{Dpt19, DptEncode, DptDecode, DateTime};
//! use knx_pico::dpt::{KnxDate, TimeOfDay, Weekday};
//!
//! let mut buf = [0u8; 8];
//! let dt = DateTime {
//!     date: KnxDate { day: 28, month: 7, year: 2026 },
//!     time: TimeOfDay { weekday: Weekday::Tuesday, hour: 10, minute: 0, second: 0 },
//!     flags: 0,
//! };
//! let len = Dpt19::DateTime.encode(dt, &mut buf)?;
//! ```

use crate::dpt::dpt10::{TimeOfDay, Weekday};
use crate::dpt::dpt11::KnxDate;
use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 19.xxx date+time types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt19 {
    /// DPT 19.001 - Date and time
    DateTime,
}

/// A combined date and time value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    /// Calendar date
    pub date: KnxDate,
    /// Time of day
    pub time: TimeOfDay,
    /// Raw status flags byte (fault/working day/clock sync bits)
    pub flags: u8,
}

impl Dpt19 {
    /// Get the DPT identifier string (e.g., "19.001")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt19::DateTime => "19.001",
        }
    }
}

impl DptEncode<DateTime> for Dpt19 {
    fn encode(&self, value: DateTime, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < 8 {
            return Err(KnxError::buffer_too_small());
        }

        if !(1900..=2155).contains(&value.date.year) {
            return Err(KnxError::dpt_value_out_of_range());
        }
        if value.time.hour > 23 || value.time.minute > 59 || value.time.second > 59 {
            return Err(KnxError::dpt_value_out_of_range());
        }

        buf[0] = (value.date.year - 1900) as u8;
        buf[1] = value.date.month & 0x0F;
        buf[2] = value.date.day & 0x1F;
        buf[3] = ((value.time.weekday as u8) << 5) | value.time.hour;
        buf[4] = value.time.minute & 0x3F;
        buf[5] = value.time.second & 0x3F;
        buf[6] = value.flags;
        buf[7] = 0;
        Ok(8)
    }
}

impl DptDecode<DateTime> for Dpt19 {
    fn decode(&self, data: &[u8]) -> Result<DateTime> {
        if data.len() < 8 {
            return Err(KnxError::invalid_dpt_data());
        }

        let year = 1900 + u16::from(data[0]);
        let month = data[1] & 0x0F;
        let day = data[2] & 0x1F;
        let weekday = Weekday::from_u8((data[3] >> 5) & 0x07).unwrap_or(Weekday::None);
        let hour = data[3] & 0x1F;
        let minute = data[4] & 0x3F;
        let second = data[5] & 0x3F;
        let flags = data[6];

        Ok(DateTime {
            date: KnxDate { day, month, year },
            time: TimeOfDay { weekday, hour, minute, second },
            flags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut buf = [0u8; 8];
        let dt = DateTime {
            date: KnxDate { day: 28, month: 7, year: 2026 },
            time: TimeOfDay { weekday: Weekday::Tuesday, hour: 10, minute: 30, second: 15 },
            flags: 0,
        };

        let len = Dpt19::DateTime.encode(dt, &mut buf).unwrap();
        assert_eq!(len, 8);
        let decoded = Dpt19::DateTime.decode(&buf[..len]).unwrap();
        assert_eq!(decoded, dt);
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut buf = [0u8; 7];
        let dt = DateTime {
            date: KnxDate { day: 1, month: 1, year: 2000 },
            time: TimeOfDay { weekday: Weekday::None, hour: 0, minute: 0, second: 0 },
            flags: 0,
        };
        assert!(Dpt19::DateTime.encode(dt, &mut buf).is_err());
    }

    #[test]
    fn test_decode_invalid_length() {
        let result = Dpt19::DateTime.decode(&[0u8; 7]);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), KnxError::Dpt(_)));
    }

    #[test]
    fn test_year_out_of_range() {
        let mut buf = [0u8; 8];
        let dt = DateTime {
            date: KnxDate { day: 1, month: 1, year: 1800 },
            time: TimeOfDay { weekday: Weekday::None, hour: 0, minute: 0, second: 0 },
            flags: 0,
        };
        assert!(Dpt19::DateTime.encode(dt, &mut buf).is_err());
    }

    #[test]
    fn test_identifier() {
        assert_eq!(Dpt19::DateTime.identifier(), "19.001");
    }
}
