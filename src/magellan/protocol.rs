//! # Magellan Protocol Constants and Types
//!
//! Core definitions for the Magellan RS-232 wire protocol.
//!
//! Frames are ASCII: a single kind identifier byte, a fixed-width payload of
//! printable nibble characters, and a CR terminator. Outbound commands mirror
//! the inbound format.

/// Frame terminator byte (carriage return)
pub const FRAME_TERMINATOR: u8 = b'\r';

/// Transformation (translation + rotation) frame identifier
pub const KIND_TRANSFORMATION: u8 = b'd';

/// Key/button frame identifier
pub const KIND_KEY: u8 = b'k';

/// Mode/status frame identifier
pub const KIND_MODE: u8 = b'm';

/// Quality (sensitivity) frame identifier
pub const KIND_QUALITY: u8 = b'q';

/// Null-radius frame identifier
pub const KIND_NULL_RADIUS: u8 = b'n';

/// Data-rate command identifier (outbound only; the device echoes it)
pub const CMD_DATA_RATE: u8 = b'p';

/// Beep command identifier (outbound only; the device echoes it)
pub const CMD_BEEP: u8 = b'b';

/// Zero-reference command identifier (outbound only; the device echoes it)
pub const CMD_ZERO: u8 = b'z';

/// Transformation payload: six 16-bit fields, four nibble chars each
pub const TRANSFORMATION_PAYLOAD_LEN: usize = 24;

/// Key payload: three nibble chars carrying a 12-bit button mask
pub const KEY_PAYLOAD_LEN: usize = 3;

/// Mode payload: one nibble char of flag bits
pub const MODE_PAYLOAD_LEN: usize = 1;

/// Quality payload: rotation quality char, then translation quality char
pub const QUALITY_PAYLOAD_LEN: usize = 2;

/// Null-radius payload: one nibble char
pub const NULL_RADIUS_PAYLOAD_LEN: usize = 1;

/// Axis fields are unsigned with this centre offset; signed value = raw - 32768
pub const AXIS_OFFSET: i32 = 32768;

/// Mode flag bit: translation reporting enabled
pub const MODE_TRANSLATION_BIT: u8 = 0x01;

/// Mode flag bit: rotation reporting enabled
pub const MODE_ROTATION_BIT: u8 = 0x02;

/// Mode flag bit: dominant mode (translation-or-rotation, not both)
pub const MODE_DOMINANT_BIT: u8 = 0x04;

/// Quality level range (nibble-encodable)
pub const QUALITY_MIN: u8 = 0;
pub const QUALITY_MAX: u8 = 15;

/// Null radius range (nibble-encodable)
pub const NULL_RADIUS_MAX: u8 = 15;

/// Beep duration range, device units (nibble-encodable)
pub const BEEP_DURATION_MAX: u8 = 15;

/// Data rate min/max range, device units (nibble-encodable)
pub const DATA_RATE_MAX: u8 = 15;

/// Base factor applied to decoded translation axes; the configured
/// translation multiplier scales this.
pub const TRANS_SCALE_BASE: f32 = 1.0 / 512.0;

/// Base factor applied to decoded rotation axes; the configured rotation
/// multiplier scales this.
pub const ROT_SCALE_BASE: f32 = 1.0 / 512.0;

/// Inbound frame kinds the decoders understand.
///
/// Anything else on the wire (version banner, command echoes) is skipped by
/// the parser without desynchronising the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// `d` - six axis values
    Transformation,
    /// `k` - button bitmask
    Key,
    /// `m` - mode flags
    Mode,
    /// `q` - rotation + translation quality
    Quality,
    /// `n` - null radius
    NullRadius,
}

impl FrameKind {
    /// Classify a kind identifier byte.
    ///
    /// Returns `None` for identifiers without a decoder.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            KIND_TRANSFORMATION => Some(Self::Transformation),
            KIND_KEY => Some(Self::Key),
            KIND_MODE => Some(Self::Mode),
            KIND_QUALITY => Some(Self::Quality),
            KIND_NULL_RADIUS => Some(Self::NullRadius),
            _ => None,
        }
    }

    /// The identifier byte for this kind
    pub fn id(self) -> u8 {
        match self {
            Self::Transformation => KIND_TRANSFORMATION,
            Self::Key => KIND_KEY,
            Self::Mode => KIND_MODE,
            Self::Quality => KIND_QUALITY,
            Self::NullRadius => KIND_NULL_RADIUS,
        }
    }
}

/// One complete protocol unit: kind + payload, terminator already stripped.
///
/// Constructed by the parser, consumed immediately by the matching decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame kind
    pub kind: FrameKind,

    /// Payload bytes between the identifier and the terminator
    pub payload: Vec<u8>,
}

/// Decoded mode/status flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeFlags {
    /// Translation reporting enabled
    pub translation: bool,

    /// Rotation reporting enabled
    pub rotation: bool,

    /// Dominant mode active
    pub dominant: bool,
}

/// One translation + rotation sample, scaled by the configured multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    /// Translation along X
    pub tx: f32,

    /// Translation along Y
    pub ty: f32,

    /// Translation along Z
    pub tz: f32,

    /// Rotation about X
    pub rx: f32,

    /// Rotation about Y
    pub ry: f32,

    /// Rotation about Z
    pub rz: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_identifiers() {
        assert_eq!(KIND_TRANSFORMATION, b'd');
        assert_eq!(KIND_KEY, b'k');
        assert_eq!(KIND_MODE, b'm');
        assert_eq!(KIND_QUALITY, b'q');
        assert_eq!(KIND_NULL_RADIUS, b'n');
        assert_eq!(FRAME_TERMINATOR, b'\r');
    }

    #[test]
    fn test_frame_kind_round_trip() {
        for kind in [
            FrameKind::Transformation,
            FrameKind::Key,
            FrameKind::Mode,
            FrameKind::Quality,
            FrameKind::NullRadius,
        ] {
            assert_eq!(FrameKind::from_id(kind.id()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_identifiers_not_classified() {
        // Version banner and command echoes have no decoder
        assert_eq!(FrameKind::from_id(b'v'), None);
        assert_eq!(FrameKind::from_id(b'z'), None);
        assert_eq!(FrameKind::from_id(b'b'), None);
        assert_eq!(FrameKind::from_id(b'p'), None);
        assert_eq!(FrameKind::from_id(0x00), None);
    }

    #[test]
    fn test_mode_bits_disjoint() {
        assert_eq!(MODE_TRANSLATION_BIT & MODE_ROTATION_BIT, 0);
        assert_eq!(MODE_TRANSLATION_BIT & MODE_DOMINANT_BIT, 0);
        assert_eq!(MODE_ROTATION_BIT & MODE_DOMINANT_BIT, 0);
    }

    #[test]
    fn test_ranges_nibble_encodable() {
        assert!(QUALITY_MAX < 16);
        assert!(NULL_RADIUS_MAX < 16);
        assert!(BEEP_DURATION_MAX < 16);
        assert!(DATA_RATE_MAX < 16);
    }
}
