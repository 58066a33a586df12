//! DPT 16.xxx - Character String (14 bytes)
//!
//! Fixed-length 14-byte string, null-padded.
//!
//! ## Format
//!
//! - 14 bytes: ASCII (16.000) or ISO-8859-1 (16.001) characters,
//!   null-terminated/padded
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_pico::dpt::{Dpt16, DptEncode, DptDecode};
//!
//! let mut buf = [0u8; 14];
//! let len = Dpt16::Ascii.encode("hello", &mut buf)?;
//! let text: heapless::String<14> = Dpt16::Ascii.decode(&buf[..len])?;
//! assert_eq!(text.as_str(), "hello");
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};
use heapless::String;

/// Maximum payload length for DPT 16.xxx
pub const DPT16_LEN: usize = 14;

/// DPT 16.xxx character string types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt16 {
    /// DPT 16.000 - ASCII string
    Ascii,
    /// DPT 16.001 - ISO-8859-1 (Latin-1) string
    Latin1,
}

impl Dpt16 {
    /// Get the DPT identifier string (e.g., "16.000")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt16::Ascii => "16.000",
            Dpt16::Latin1 => "16.001",
        }
    }
}

impl<'a> DptEncode<&'a str> for Dpt16 {
    fn encode(&self, value: &'a str, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < DPT16_LEN {
            return Err(KnxError::buffer_too_small());
        }

        let bytes = value.as_bytes();
        if bytes.len() > DPT16_LEN {
            return Err(KnxError::dpt_value_out_of_range());
        }
        if *self == Dpt16::Ascii && !value.is_ascii() {
            return Err(KnxError::dpt_value_out_of_range());
        }

        buf[..DPT16_LEN].fill(0);
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(DPT16_LEN)
    }
}

impl DptDecode<String<DPT16_LEN>> for Dpt16 {
    fn decode(&self, data: &[u8]) -> Result<String<DPT16_LEN>> {
        if data.len() < DPT16_LEN {
            return Err(KnxError::invalid_dpt_data());
        }

        let end = data[..DPT16_LEN]
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(DPT16_LEN);

        let text = core::str::from_utf8(&data[..end]).map_err(|_| KnxError::invalid_dpt_data())?;
        let mut out = String::new();
        out.push_str(text).map_err(|()| KnxError::invalid_dpt_data())?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let mut buf = [0xAAu8; 14];
        let len = Dpt16::Ascii.encode("hello", &mut buf).unwrap();
        assert_eq!(len, 14);
        assert_eq!(&buf[..5], b"hello");
        assert!(buf[5..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_encode_full_length() {
        let mut buf = [0u8; 14];
        let s = "12345678901234";
        let len = Dpt16::Ascii.encode(s, &mut buf).unwrap();
        assert_eq!(len, 14);
        assert_eq!(&buf, s.as_bytes());
    }

    #[test]
    fn test_encode_too_long() {
        let mut buf = [0u8; 14];
        let result = Dpt16::Ascii.encode("123456789012345", &mut buf);
        assert!(result.is_err());
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut buf = [0u8; 10];
        let result = Dpt16::Ascii.encode("hello", &mut buf);
        assert!(result.is_err());
    }

    #[test]
    fn test_encode_non_ascii_rejected() {
        let mut buf = [0u8; 14];
        let result = Dpt16::Ascii.encode("café", &mut buf);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode() {
        let mut buf = [0u8; 14];
        buf[..5].copy_from_slice(b"hello");
        let text = Dpt16::Ascii.decode(&buf).unwrap();
        assert_eq!(text.as_str(), "hello");
    }

    #[test]
    fn test_decode_invalid_length() {
        let result = Dpt16::Ascii.decode(&[0u8; 10]);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), KnxError::Dpt(_)));
    }

    #[test]
    fn test_round_trip() {
        let mut buf = [0u8; 14];
        let len = Dpt16::Ascii.encode("knx test", &mut buf).unwrap();
        let decoded = Dpt16::Ascii.decode(&buf[..len]).unwrap();
        assert_eq!(decoded.as_str(), "knx test");
    }

    #[test]
    fn test_identifier() {
        assert_eq!(Dpt16::Ascii.identifier(), "16.000");
        assert_eq!(Dpt16::Latin1.identifier(), "16.001");
    }
}
