//! DPT 18.xxx - Scene Control (1 byte)
//!
//! Triggers activation or learning of a scene.
//!
//! ## Format
//!
//! ```text
//! Bit 7:   learn (0 = activate, 1 = learn)
//! Bits 0-5: scene number (0-63)
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use knx_pico::dpt::{Dpt18, DptEncode, DptDecode, SceneCommand};
//!
//! let mut buf = [0u8; 1];
//! let len = Dpt18::Scene.encode(SceneCommand { learn: false, scene_number: 4 }, &mut buf)?;
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 18.xxx scene control types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpt18 {
    /// DPT 18.001 - Scene control
    Scene,
}

/// A scene activate/learn command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneCommand {
    /// false = activate the scene, true = learn (store) the current state into it
    pub learn: bool,
    /// Scene number (0-63)
    pub scene_number: u8,
}

impl Dpt18 {
    /// Get the DPT identifier string (e.g., "18.001")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt18::Scene => "18.001",
        }
    }
}

impl DptEncode<SceneCommand> for Dpt18 {
    fn encode(&self, value: SceneCommand, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Err(KnxError::buffer_too_small());
        }
        if value.scene_number > 63 {
            return Err(KnxError::dpt_value_out_of_range());
        }

        let learn_bit = if value.learn { 0x80 } else { 0x00 };
        buf[0] = learn_bit | (value.scene_number & 0x3F);
        Ok(1)
    }
}

impl DptDecode<SceneCommand> for Dpt18 {
    fn decode(&self, data: &[u8]) -> Result<SceneCommand> {
        if data.is_empty() {
            return Err(KnxError::invalid_dpt_data());
        }

        let byte = data[0];
        Ok(SceneCommand {
            learn: (byte & 0x80) != 0,
            scene_number: byte & 0x3F,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_activate() {
        let mut buf = [0u8; 1];
        let len = Dpt18::Scene
            .encode(SceneCommand { learn: false, scene_number: 4 }, &mut buf)
            .unwrap();
        assert_eq!(len, 1);
        assert_eq!(buf[0], 0x04);
    }

    #[test]
    fn test_encode_learn() {
        let mut buf = [0u8; 1];
        let len = Dpt18::Scene
            .encode(SceneCommand { learn: true, scene_number: 10 }, &mut buf)
            .unwrap();
        assert_eq!(len, 1);
        assert_eq!(buf[0], 0x8A);
    }

    #[test]
    fn test_encode_scene_out_of_range() {
        let mut buf = [0u8; 1];
        let result = Dpt18::Scene.encode(SceneCommand { learn: false, scene_number: 64 }, &mut buf);
        assert!(result.is_err());
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut buf = [0u8; 0];
        let result = Dpt18::Scene.encode(SceneCommand { learn: false, scene_number: 0 }, &mut buf);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode() {
        let cmd = Dpt18::Scene.decode(&[0x8A]).unwrap();
        assert_eq!(cmd, SceneCommand { learn: true, scene_number: 10 });

        let cmd = Dpt18::Scene.decode(&[0x04]).unwrap();
        assert_eq!(cmd, SceneCommand { learn: false, scene_number: 4 });
    }

    #[test]
    fn test_decode_empty_data() {
        let result = Dpt18::Scene.decode(&[]);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), KnxError::Dpt(_)));
    }

    #[test]
    fn test_round_trip() {
        let mut buf = [0u8; 1];
        for (learn, scene_number) in [(false, 0u8), (true, 63), (false, 32)] {
            let len = Dpt18::Scene
                .encode(SceneCommand { learn, scene_number }, &mut buf)
                .unwrap();
            let decoded = Dpt18::Scene.decode(&buf[..len]).unwrap();
            assert_eq!(decoded, SceneCommand { learn, scene_number });
        }
    }

    #[test]
    fn test_identifier() {
        assert_eq!(Dpt18::Scene.identifier(), "18.001");
    }
}
