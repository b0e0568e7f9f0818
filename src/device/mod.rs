//! # Device Module
//!
//! Ties the frame parser, the decoded device state and the delivery adapter
//! into one driver. Raw bytes go in, state mutations and motion/button
//! events come out; a malformed frame is logged and dropped without
//! disturbing anything that follows it.

pub mod state;

use tracing::warn;

use crate::delivery::{DeliveryAdapter, MotionConsumer};
use crate::magellan::decoder;
use crate::magellan::parser::FrameParser;
use crate::magellan::protocol::{Frame, FrameKind, MotionSample};

pub use state::DeviceState;

/// Driver for one Magellan device session.
///
/// Owns the inbound buffer, the last-known device state and the delivery
/// adapter. All processing is synchronous with respect to byte arrival;
/// there is no internal locking or task spawning.
pub struct MagellanDevice<C: MotionConsumer> {
    state: DeviceState,
    parser: FrameParser,
    delivery: DeliveryAdapter<C>,
}

impl<C: MotionConsumer> MagellanDevice<C> {
    /// Create a driver delivering events to the given consumer.
    pub fn new(consumer: C) -> Self {
        Self {
            state: DeviceState::default(),
            parser: FrameParser::new(),
            delivery: DeliveryAdapter::new(consumer),
        }
    }

    /// Feed a chunk of newly received bytes.
    ///
    /// Every complete frame in the chunk (plus whatever was buffered from
    /// earlier reads) is decoded and applied. Decode failures are contained
    /// to their frame.
    pub fn handle_bytes(&mut self, chunk: &[u8]) {
        for frame in self.parser.feed(chunk) {
            self.apply_frame(frame);
        }
    }

    fn apply_frame(&mut self, frame: Frame) {
        let result = match frame.kind {
            FrameKind::Mode => decoder::decode_mode(&frame.payload).map(|flags| {
                self.state.apply_mode(flags);
            }),
            FrameKind::Quality => decoder::decode_quality(&frame.payload).map(|(rot, trans)| {
                self.state.apply_quality(rot, trans);
            }),
            FrameKind::NullRadius => decoder::decode_null_radius(&frame.payload).map(|radius| {
                self.state.apply_null_radius(radius);
            }),
            FrameKind::Key => decoder::decode_keys(&frame.payload)
                .and_then(|keys| self.delivery.forward_keys(keys)),
            FrameKind::Transformation => {
                decoder::decode_transformation(&frame.payload).and_then(|axes| {
                    let sample = self.scale_sample(axes);
                    self.delivery.forward_motion(&sample)
                })
            }
        };

        if let Err(e) = result {
            warn!("dropping {:?} frame: {}", frame.kind, e);
        }
    }

    fn scale_sample(&self, axes: [i32; 6]) -> MotionSample {
        let ts = self.state.trans_scale();
        let rs = self.state.rot_scale();
        MotionSample {
            tx: axes[0] as f32 * ts,
            ty: axes[1] as f32 * ts,
            tz: axes[2] as f32 * ts,
            rx: axes[3] as f32 * rs,
            ry: axes[4] as f32 * rs,
            rz: axes[5] as f32 * rs,
        }
    }

    /// Discard any partially received frame. Called when a connection is
    /// (re)established; decoded state survives, buffered bytes do not.
    pub fn reset(&mut self) {
        self.parser.reset();
    }

    /// Last-known decoded device state
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Set the rotation and translation scale factors directly.
    pub fn set_scales(&mut self, rot_scale: f32, trans_scale: f32) {
        self.state.set_rot_scale(rot_scale);
        self.state.set_trans_scale(trans_scale);
    }

    /// Bytes currently buffered awaiting a frame terminator
    pub fn pending_bytes(&self) -> usize {
        self.parser.pending()
    }

    /// Events the downstream consumer has rejected
    pub fn dropped_deliveries(&self) -> u64 {
        self.delivery.dropped()
    }

    /// Access the delivery consumer
    pub fn consumer(&self) -> &C {
        self.delivery.consumer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::mocks::RecordingConsumer;
    use crate::magellan::encoder;
    use crate::magellan::encoding::encode_u16;
    use crate::magellan::protocol::AXIS_OFFSET;

    fn device() -> MagellanDevice<RecordingConsumer> {
        MagellanDevice::new(RecordingConsumer::default())
    }

    fn transformation_frame(axes: [i32; 6]) -> Vec<u8> {
        let mut frame = vec![b'd'];
        for v in axes {
            encode_u16((v + AXIS_OFFSET) as u16, &mut frame);
        }
        frame.push(b'\r');
        frame
    }

    #[test]
    fn test_key_frame_delivers_exactly_one_event() {
        let mut dev = device();
        // bitmask 0b0000101 -> nibbles 5, 0, 0
        dev.handle_bytes(b"k500\r");

        assert_eq!(dev.consumer().keys, vec![0b101]);
        assert!(dev.consumer().motions.is_empty());
    }

    #[test]
    fn test_mode_frame_updates_state() {
        let mut dev = device();
        dev.handle_bytes(b"m3\r");

        assert!(dev.state().trans_on());
        assert!(dev.state().rot_on());
        assert!(!dev.state().dom_mode_on());
    }

    #[test]
    fn test_quality_and_null_radius_update_state() {
        let mut dev = device();
        dev.handle_bytes(b"q53\r");
        dev.handle_bytes(b"n9\r");

        assert_eq!(dev.state().rot_quality(), 5);
        assert_eq!(dev.state().trans_quality(), 3);
        assert_eq!(dev.state().null_radius(), 9);
    }

    #[test]
    fn test_transformation_scaled_by_multipliers() {
        let mut dev = device();
        dev.set_scales(0.5, 2.0);
        dev.handle_bytes(&transformation_frame([10, -20, 30, 40, -50, 60]));

        let motions = &dev.consumer().motions;
        assert_eq!(motions.len(), 1);
        let m = motions[0];
        assert_eq!(m.tx, 20.0);
        assert_eq!(m.ty, -40.0);
        assert_eq!(m.tz, 60.0);
        assert_eq!(m.rx, 20.0);
        assert_eq!(m.ry, -25.0);
        assert_eq!(m.rz, 30.0);
    }

    #[test]
    fn test_split_chunks_equal_single_chunk() {
        let frame = transformation_frame([100, 200, -300, 5, -5, 0]);

        let mut whole = device();
        whole.handle_bytes(&frame);

        let mut split = device();
        let (a, b) = frame.split_at(7);
        split.handle_bytes(a);
        assert!(split.consumer().motions.is_empty());
        split.handle_bytes(b);

        assert_eq!(whole.consumer().motions, split.consumer().motions);
        assert_eq!(split.consumer().motions.len(), 1);
    }

    #[test]
    fn test_malformed_frame_does_not_affect_next() {
        let mut dev = device();
        // Truncated transformation frame, then a valid null-radius frame
        dev.handle_bytes(b"d00H0\rn5\r");

        assert!(dev.consumer().motions.is_empty());
        assert_eq!(dev.state().null_radius(), 5);
    }

    #[test]
    fn test_bad_frame_leaves_state_unchanged() {
        let mut dev = device();
        dev.handle_bytes(b"q53\r");
        // Quality frame with an invalid character must not disturb state
        dev.handle_bytes(b"qx3\r");

        assert_eq!(dev.state().rot_quality(), 5);
        assert_eq!(dev.state().trans_quality(), 3);
    }

    #[test]
    fn test_command_status_round_trip() {
        let mut dev = device();
        // Encode a set-null-radius command, then play back the device's
        // matching status frame
        let cmd = encoder::set_null_radius(5).unwrap();
        dev.handle_bytes(&cmd);

        assert_eq!(dev.state().null_radius(), 5);
    }

    #[test]
    fn test_mode_command_round_trip() {
        let mut dev = device();
        let cmd = encoder::set_mode(true, true, false);
        dev.handle_bytes(&cmd);

        assert!(dev.state().dom_mode_on());
        assert!(dev.state().trans_on());
        assert!(!dev.state().rot_on());
    }

    #[test]
    fn test_quality_command_round_trip() {
        let mut dev = device();
        let cmd = encoder::set_quality(7, 2).unwrap();
        dev.handle_bytes(&cmd);

        assert_eq!(dev.state().rot_quality(), 7);
        assert_eq!(dev.state().trans_quality(), 2);
    }

    #[test]
    fn test_reset_clears_pending_but_keeps_state() {
        let mut dev = device();
        dev.handle_bytes(b"n5\r");
        dev.handle_bytes(b"d00");
        assert!(dev.pending_bytes() > 0);

        dev.reset();
        assert_eq!(dev.pending_bytes(), 0);
        assert_eq!(dev.state().null_radius(), 5);

        // Post-reset frames decode normally
        dev.handle_bytes(b"n3\r");
        assert_eq!(dev.state().null_radius(), 3);
    }

    #[test]
    fn test_rejected_delivery_does_not_stop_parsing() {
        let mut dev = MagellanDevice::new(RecordingConsumer {
            reject: true,
            ..Default::default()
        });

        dev.handle_bytes(b"k500\rk000\rn5\r");

        assert_eq!(dev.dropped_deliveries(), 2);
        assert_eq!(dev.consumer().keys.len(), 2);
        assert_eq!(dev.state().null_radius(), 5);
    }
}
