//! DPT 15.xxx - Access Data (4 bytes)
//!
//! Carries an access code (e.g. from a keypad or card reader) together
//! with status flags describing how it was entered.
//!
//! ## Format
//!
//! ```text
//! Bytes 0-2: access code (6 BCD digits, one nibble each, 3 bytes)
//! Byte 3:    E D C P PPP  (Error, Direction, enCrypted, Permission, index 0-15... see below)
//! ```
//!
//! Byte 3 bit layout:
//! - Bit 7: detection error
//! - Bit 6: permission (accepted/denied)
//! - Bit 5: direction (0 = in, 1 = out)
//! - Bit 4: encrypted
//! - Bits 3-0: index of the access identification (0-15)
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_pico::dpt::{Dpt15, DptEncode, DptDecode, AccessData};
//!
//! let mut buf = [0u8; 4];
//! let a = AccessData { code: 123456, error: false, permission: true, direction: false, encrypted: false, index: 2 };
//! let len = Dpt15::Access.encode(a, &mut buf)?;
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 15.xxx access data types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt15 {
    /// DPT 15.000 - Access data
    Access,
}

/// A decoded access-control telegram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessData {
    /// 6-digit BCD access code (0-999999)
    pub code: u32,
    /// Detection error flag
    pub error: bool,
    /// Access granted (true) or denied (false)
    pub permission: bool,
    /// Direction: false = in, true = out
    pub direction: bool,
    /// Whether the code was transmitted encrypted
    pub encrypted: bool,
    /// Index of the access identification used (0-15)
    pub index: u8,
}

impl Dpt15 {
    /// Get the DPT identifier string (e.g., "15.000")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt15::Access => "15.000",
        }
    }
}

impl DptEncode<AccessData> for Dpt15 {
    fn encode(&self, value: AccessData, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < 4 {
            return Err(KnxError::buffer_too_small());
        }
        if value.code > 999_999 || value.index > 15 {
            return Err(KnxError::dpt_value_out_of_range());
        }

        let mut code = value.code;
        let mut digits = [0u8; 6];
        for d in digits.iter_mut().rev() {
            *d = (code % 10) as u8;
            code /= 10;
        }

        buf[0] = (digits[0] << 4) | digits[1];
        buf[1] = (digits[2] << 4) | digits[3];
        buf[2] = (digits[4] << 4) | digits[5];

        let mut flags = value.index & 0x0F;
        if value.encrypted {
            flags |= 0x10;
        }
        if value.direction {
            flags |= 0x20;
        }
        if value.permission {
            flags |= 0x40;
        }
        if value.error {
            flags |= 0x80;
        }
        buf[3] = flags;

        Ok(4)
    }
}

impl DptDecode<AccessData> for Dpt15 {
    fn decode(&self, data: &[u8]) -> Result<AccessData> {
        if data.len() < 4 {
            return Err(KnxError::invalid_dpt_data());
        }

        let digits = [
            data[0] >> 4,
            data[0] & 0x0F,
            data[1] >> 4,
            data[1] & 0x0F,
            data[2] >> 4,
            data[2] & 0x0F,
        ];

        if digits.iter().any(|&d| d > 9) {
            return Err(KnxError::invalid_dpt_data());
        }

        let code = digits.iter().fold(0u32, |acc, &d| acc * 10 + u32::from(d));

        Ok(AccessData {
            code,
            error: data[3] & 0x80 != 0,
            permission: data[3] & 0x40 != 0,
            direction: data[3] & 0x20 != 0,
            encrypted: data[3] & 0x10 != 0,
            index: data[3] & 0x0F,
        })
    }
}
