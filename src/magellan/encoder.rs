//! # Magellan Command Encoder
//!
//! Builders for outbound configuration frames. Each validates its numeric
//! arguments against the device's documented range before encoding and
//! performs no I/O; the encoded bytes are handed to the transport by the
//! caller. Out-of-range arguments are rejected, never clamped.

use crate::error::{MagellanError, Result};

use super::encoding::encode_nibble;
use super::protocol::*;

fn check_range(name: &str, value: u8, max: u8) -> Result<()> {
    if value > max {
        return Err(MagellanError::Configuration(format!(
            "{} {} out of range (0-{})",
            name, value, max
        )));
    }
    Ok(())
}

/// Build a set-mode command.
///
/// Mode flags are booleans, so every combination is valid and this builder
/// cannot fail.
pub fn set_mode(dominant: bool, translation: bool, rotation: bool) -> Vec<u8> {
    let mut bits = 0u8;
    if translation {
        bits |= MODE_TRANSLATION_BIT;
    }
    if rotation {
        bits |= MODE_ROTATION_BIT;
    }
    if dominant {
        bits |= MODE_DOMINANT_BIT;
    }

    vec![KIND_MODE, encode_nibble(bits), FRAME_TERMINATOR]
}

/// Build a set-quality command, rotation level first.
///
/// # Errors
///
/// Returns [`MagellanError::Configuration`] if either level exceeds
/// [`QUALITY_MAX`].
pub fn set_quality(rotation: u8, translation: u8) -> Result<Vec<u8>> {
    check_range("rotation quality", rotation, QUALITY_MAX)?;
    check_range("translation quality", translation, QUALITY_MAX)?;

    Ok(vec![
        KIND_QUALITY,
        encode_nibble(rotation),
        encode_nibble(translation),
        FRAME_TERMINATOR,
    ])
}

/// Build a set-data-rate command carrying minimum and maximum report rates.
///
/// # Errors
///
/// Returns [`MagellanError::Configuration`] if either rate exceeds
/// [`DATA_RATE_MAX`] or `min > max`.
pub fn set_data_rate(min: u8, max: u8) -> Result<Vec<u8>> {
    check_range("minimum data rate", min, DATA_RATE_MAX)?;
    check_range("maximum data rate", max, DATA_RATE_MAX)?;
    if min > max {
        return Err(MagellanError::Configuration(format!(
            "minimum data rate {} exceeds maximum {}",
            min, max
        )));
    }

    Ok(vec![
        CMD_DATA_RATE,
        encode_nibble(min),
        encode_nibble(max),
        FRAME_TERMINATOR,
    ])
}

/// Build a set-null-radius command.
///
/// # Errors
///
/// Returns [`MagellanError::Configuration`] if the radius exceeds
/// [`NULL_RADIUS_MAX`].
pub fn set_null_radius(radius: u8) -> Result<Vec<u8>> {
    check_range("null radius", radius, NULL_RADIUS_MAX)?;

    Ok(vec![
        KIND_NULL_RADIUS,
        encode_nibble(radius),
        FRAME_TERMINATOR,
    ])
}

/// Build a beep command for the given duration in device units.
///
/// # Errors
///
/// Returns [`MagellanError::Configuration`] if the duration exceeds
/// [`BEEP_DURATION_MAX`].
pub fn beep(duration: u8) -> Result<Vec<u8>> {
    check_range("beep duration", duration, BEEP_DURATION_MAX)?;

    Ok(vec![CMD_BEEP, encode_nibble(duration), FRAME_TERMINATOR])
}

/// Build a zero command, establishing the current pose as the reference.
pub fn zero() -> Vec<u8> {
    vec![CMD_ZERO, FRAME_TERMINATOR]
}
