//! Last-known decoded device state.
//!
//! Each field reflects the most recent frame of its kind; a new frame
//! overwrites, never merges. The scale factors are host-side and change only
//! through their setters.

use crate::magellan::protocol::ModeFlags;

/// Decoded status fields plus the host-configured scale factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceState {
    trans_on: bool,
    rot_on: bool,
    dom_mode_on: bool,
    rot_quality: u8,
    trans_quality: u8,
    null_radius: u8,
    rot_scale: f32,
    trans_scale: f32,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            trans_on: false,
            rot_on: false,
            dom_mode_on: false,
            rot_quality: 0,
            trans_quality: 0,
            null_radius: 0,
            rot_scale: 1.0,
            trans_scale: 1.0,
        }
    }
}

impl DeviceState {
    /// Translation reporting enabled, per the last mode frame
    pub fn trans_on(&self) -> bool {
        self.trans_on
    }

    /// Rotation reporting enabled, per the last mode frame
    pub fn rot_on(&self) -> bool {
        self.rot_on
    }

    /// Dominant mode active, per the last mode frame
    pub fn dom_mode_on(&self) -> bool {
        self.dom_mode_on
    }

    /// Rotation quality level, per the last quality frame
    pub fn rot_quality(&self) -> u8 {
        self.rot_quality
    }

    /// Translation quality level, per the last quality frame
    pub fn trans_quality(&self) -> u8 {
        self.trans_quality
    }

    /// Null-zone radius, per the last null-radius frame
    pub fn null_radius(&self) -> u8 {
        self.null_radius
    }

    /// Scale factor applied to decoded rotation axes
    pub fn rot_scale(&self) -> f32 {
        self.rot_scale
    }

    /// Scale factor applied to decoded translation axes
    pub fn trans_scale(&self) -> f32 {
        self.trans_scale
    }

    pub fn set_rot_scale(&mut self, scale: f32) {
        self.rot_scale = scale;
    }

    pub fn set_trans_scale(&mut self, scale: f32) {
        self.trans_scale = scale;
    }

    pub(crate) fn apply_mode(&mut self, flags: ModeFlags) {
        self.trans_on = flags.translation;
        self.rot_on = flags.rotation;
        self.dom_mode_on = flags.dominant;
    }

    pub(crate) fn apply_quality(&mut self, rotation: u8, translation: u8) {
        self.rot_quality = rotation;
        self.trans_quality = translation;
    }

    pub(crate) fn apply_null_radius(&mut self, radius: u8) {
        self.null_radius = radius;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = DeviceState::default();
        assert!(!state.trans_on());
        assert!(!state.rot_on());
        assert!(!state.dom_mode_on());
        assert_eq!(state.rot_quality(), 0);
        assert_eq!(state.trans_quality(), 0);
        assert_eq!(state.null_radius(), 0);
        assert_eq!(state.rot_scale(), 1.0);
        assert_eq!(state.trans_scale(), 1.0);
    }

    #[test]
    fn test_latest_frame_wins() {
        let mut state = DeviceState::default();

        state.apply_quality(5, 3);
        state.apply_quality(7, 1);
        assert_eq!(state.rot_quality(), 7);
        assert_eq!(state.trans_quality(), 1);

        state.apply_null_radius(4);
        state.apply_null_radius(9);
        assert_eq!(state.null_radius(), 9);
    }

    #[test]
    fn test_mode_overwrites_all_flags() {
        let mut state = DeviceState::default();
        state.apply_mode(ModeFlags {
            translation: true,
            rotation: true,
            dominant: true,
        });
        state.apply_mode(ModeFlags {
            translation: true,
            rotation: false,
            dominant: false,
        });

        assert!(state.trans_on());
        assert!(!state.rot_on());
        assert!(!state.dom_mode_on());
    }
}
