//! DPT 10.xxx - Time of Day (3 bytes)
//!
//! Represents a day-of-week and time-of-day value.
//!
//! ## Format
//!
//! ```text
//! Byte 0: DDDH HHHH  (D = day of week 0-7, H = hour 0-23)
//! Byte 1: 00MM MMMM  (M = minute 0-59)
//! Byte 2: 00SS SSSS  (S = second 0-59)
//! ```
//!
//! Day of week: 0 = no day, 1 = Monday, ... 7 = Sunday (ISO 8601 style).
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_pico::dpt::{Dpt10, DptEncode, DptDecode, TimeOfDay, Weekday};
//!
//! let mut buf = [0u8; 3];
//! let t = TimeOfDay { weekday: Weekday::Wednesday, hour: 14, minute: 30, second: 0 };
//! let len = Dpt10::TimeOfDay.encode(t, &mut buf)?;
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 10.xxx time-of-day types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt10 {
    /// DPT 10.001 - Time of day
    TimeOfDay,
}

/// Day of the week, per the DPT 10 encoding (0 = no day given)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Weekday {
    /// No day specified
    None = 0,
    /// Monday
    Monday = 1,
    /// Tuesday
    Tuesday = 2,
    /// Wednesday
    Wednesday = 3,
    /// Thursday
    Thursday = 4,
    /// Friday
    Friday = 5,
    /// Saturday
    Saturday = 6,
    /// Sunday
    Sunday = 7,
}

impl Weekday {
    pub(crate) fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Weekday::None),
            1 => Ok(Weekday::Monday),
            2 => Ok(Weekday::Tuesday),
            3 => Ok(Weekday::Wednesday),
            4 => Ok(Weekday::Thursday),
            5 => Ok(Weekday::Friday),
            6 => Ok(Weekday::Saturday),
            7 => Ok(Weekday::Sunday),
            _ => Err(KnxError::invalid_dpt_data()),
        }
    }
}

/// A time-of-day value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    /// Day of week (or `Weekday::None`)
    pub weekday: Weekday,
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Second (0-59)
    pub second: u8,
}

impl Dpt10 {
    /// Get the DPT identifier string (e.g., "10.001")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt10::TimeOfDay => "10.001",
        }
    }
}

impl DptEncode<TimeOfDay> for Dpt10 {
    fn encode(&self, value: TimeOfDay, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < 3 {
            return Err(KnxError::buffer_too_small());
        }

        if value.hour > 23 || value.minute > 59 || value.second > 59 {
            return Err(KnxError::dpt_value_out_of_range());
        }

        buf[0] = ((value.weekday as u8) << 5) | value.hour;
        buf[1] = value.minute & 0x3F;
        buf[2] = value.second & 0x3F;
        Ok(3)
    }
}

impl DptDecode<TimeOfDay> for Dpt10 {
    fn decode(&self, data: &[u8]) -> Result<TimeOfDay> {
        if data.len() < 3 {
            return Err(KnxError::invalid_dpt_data());
        }

        let weekday = Weekday::from_u8((data[0] >> 5) & 0x07)?;
        let hour = data[0] & 0x1F;
        let minute = data[1] & 0x3F;
        let second = data[2] & 0x3F;

        if hour > 23 || minute > 59 || second > 59 {
            return Err(KnxError::invalid_dpt_data());
        }

        Ok(TimeOfDay { weekday, hour, minute, second })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let mut buf = [0u8; 3];
        let t = TimeOfDay { weekday: Weekday::Wednesday, hour: 14, minute: 30, second: 45 };
        let len = Dpt10::TimeOfDay.encode(t, &mut buf).unwrap();
        assert_eq!(len, 3);
        assert_eq!(buf[0], (3 << 5) | 14);
        assert_eq!(buf[1], 30);
        assert_eq!(buf[2], 45);
    }

    #[test]
    fn test_encode_invalid_hour() {
        let mut buf = [0u8; 3];
        let t = TimeOfDay { weekday: Weekday::None, hour: 24, minute: 0, second: 0 };
        let result = Dpt10::TimeOfDay.encode(t, &mut buf);
        assert!(result.is_err());
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut buf = [0u8; 2];
        let t = TimeOfDay { weekday: Weekday::None, hour: 0, minute: 0, second: 0 };
        assert!(Dpt10::TimeOfDay.encode(t, &mut buf).is_err());
    }

    #[test]
    fn test_decode() {
        let t = Dpt10::TimeOfDay.decode(&[(3 << 5) | 14, 30, 45]).unwrap();
        assert_eq!(t.weekday, Weekday::Wednesday);
        assert_eq!(t.hour, 14);
        assert_eq!(t.minute, 30);
        assert_eq!(t.second, 45);
    }

    #[test]
    fn test_decode_invalid_length() {
        let result = Dpt10::TimeOfDay.decode(&[0, 0]);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), KnxError::Dpt(_)));
    }

    #[test]
    fn test_round_trip() {
        let mut buf = [0u8; 3];
        let cases = [
            TimeOfDay { weekday: Weekday::None, hour: 0, minute: 0, second: 0 },
            TimeOfDay { weekday: Weekday::Sunday, hour: 23, minute: 59, second: 59 },
            TimeOfDay { weekday: Weekday::Monday, hour: 9, minute: 15, second: 0 },
        ];

        for t in cases {
            let len = Dpt10::TimeOfDay.encode(t, &mut buf).unwrap();
            let decoded = Dpt10::TimeOfDay.decode(&buf[..len]).unwrap();
            assert_eq!(decoded, t);
        }
    }

    #[test]
    fn test_identifier() {
        assert_eq!(Dpt10::TimeOfDay.identifier(), "10.001");
    }
}
