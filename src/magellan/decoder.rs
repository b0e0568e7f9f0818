//! # Magellan Frame Decoders
//!
//! One decode function per frame kind. Each validates the payload width
//! first, then the character set; a failure drops the frame and leaves
//! device state untouched.

use crate::error::{MagellanError, Result};

use super::encoding::{decode_nibble, decode_u16};
use super::protocol::*;

fn check_len(kind: &str, payload: &[u8], expected: usize) -> Result<()> {
    if payload.len() != expected {
        return Err(MagellanError::FieldDecode(format!(
            "{} payload: expected {} bytes, got {}",
            kind,
            expected,
            payload.len()
        )));
    }
    Ok(())
}

/// Decode a mode/status frame payload into its three flags.
pub fn decode_mode(payload: &[u8]) -> Result<ModeFlags> {
    check_len("mode", payload, MODE_PAYLOAD_LEN)?;
    let bits = decode_nibble(payload[0])?;

    Ok(ModeFlags {
        translation: bits & MODE_TRANSLATION_BIT != 0,
        rotation: bits & MODE_ROTATION_BIT != 0,
        dominant: bits & MODE_DOMINANT_BIT != 0,
    })
}

/// Decode a quality frame payload into `(rotation, translation)` levels.
pub fn decode_quality(payload: &[u8]) -> Result<(u8, u8)> {
    check_len("quality", payload, QUALITY_PAYLOAD_LEN)?;
    let rotation = decode_nibble(payload[0])?;
    let translation = decode_nibble(payload[1])?;
    Ok((rotation, translation))
}

/// Decode a null-radius frame payload.
pub fn decode_null_radius(payload: &[u8]) -> Result<u8> {
    check_len("null radius", payload, NULL_RADIUS_PAYLOAD_LEN)?;
    decode_nibble(payload[0])
}

/// Decode a key frame payload into a button bitmask.
///
/// Nibble 0 carries buttons 1-4, nibble 1 buttons 5-8, nibble 2 the
/// remaining keys, giving a 12-bit mask.
pub fn decode_keys(payload: &[u8]) -> Result<u16> {
    check_len("key", payload, KEY_PAYLOAD_LEN)?;

    let low = u16::from(decode_nibble(payload[0])?);
    let mid = u16::from(decode_nibble(payload[1])?);
    let high = u16::from(decode_nibble(payload[2])?);
    Ok(low | (mid << 4) | (high << 8))
}

/// Decode a transformation frame payload into six raw centred axis values,
/// order tx ty tz rx ry rz.
///
/// Values are unscaled; the caller applies the configured translation and
/// rotation multipliers.
pub fn decode_transformation(payload: &[u8]) -> Result<[i32; 6]> {
    check_len("transformation", payload, TRANSFORMATION_PAYLOAD_LEN)?;

    let mut axes = [0i32; 6];
    for (i, field) in payload.chunks_exact(4).enumerate() {
        axes[i] = i32::from(decode_u16(field)?) - AXIS_OFFSET;
    }
    Ok(axes)
}
