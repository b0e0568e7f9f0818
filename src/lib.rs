//! # Magellan Bridge Library
//!
//! Bridge a Magellan-class 6DOF space controller to 3D applications over
//! RS-232.
//!
//! This library decodes the device's serial byte stream into motion and
//! button events and encodes configuration commands (mode, sensitivity,
//! null radius, data rate, beep, zeroing) back to the device.

pub mod config;
pub mod delivery;
pub mod device;
pub mod error;
pub mod magellan;
pub mod serial;
