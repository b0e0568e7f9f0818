//! # Magellan Protocol Module
//!
//! Implementation of the Magellan space-controller RS-232 protocol.
//!
//! This module handles:
//! - Frame assembly from an arbitrary byte stream (CR-delimited)
//! - Printable-nibble field encoding/decoding
//! - Per-kind frame decoding (mode, quality, null radius, keys, transformation)
//! - Outbound command encoding with range validation

pub mod decoder;
pub mod encoder;
pub mod encoding;
pub mod parser;
pub mod protocol;
