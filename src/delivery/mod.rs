//! # Motion Delivery Module
//!
//! Narrow forwarding boundary between the decode pipeline and the host
//! application. Two operations: deliver a translation+rotation sample and
//! deliver a button bitmask, each returning whether the consumer accepted
//! the event. A rejection is reported upward and counted; the link matters
//! more than any single lost sample, so parsing never stalls on it.

use tracing::debug;

use crate::error::{MagellanError, Result};
use crate::magellan::protocol::MotionSample;

/// Downstream consumer of decoded events.
///
/// Implemented by whatever sits at the 3D-application boundary. Returning
/// `false` rejects the event.
pub trait MotionConsumer: Send {
    /// Deliver one translation+rotation sample. Returns acceptance.
    fn deliver_motion(&mut self, sample: &MotionSample) -> bool;

    /// Deliver a button-press bitmask. Returns acceptance.
    fn deliver_keys(&mut self, keys: u16) -> bool;
}

/// Forwards events to a consumer, tracking rejected deliveries.
#[derive(Debug)]
pub struct DeliveryAdapter<C> {
    consumer: C,
    dropped: u64,
}

impl<C: MotionConsumer> DeliveryAdapter<C> {
    pub fn new(consumer: C) -> Self {
        Self {
            consumer,
            dropped: 0,
        }
    }

    /// Forward a motion sample.
    ///
    /// # Errors
    ///
    /// Returns [`MagellanError::Delivery`] if the consumer rejected the
    /// sample. Non-fatal; the caller logs it and moves on.
    pub fn forward_motion(&mut self, sample: &MotionSample) -> Result<()> {
        if self.consumer.deliver_motion(sample) {
            Ok(())
        } else {
            self.dropped += 1;
            Err(MagellanError::Delivery(format!(
                "motion sample (total dropped: {})",
                self.dropped
            )))
        }
    }

    /// Forward a button bitmask.
    ///
    /// # Errors
    ///
    /// Returns [`MagellanError::Delivery`] if the consumer rejected the
    /// event. Non-fatal.
    pub fn forward_keys(&mut self, keys: u16) -> Result<()> {
        if self.consumer.deliver_keys(keys) {
            Ok(())
        } else {
            self.dropped += 1;
            Err(MagellanError::Delivery(format!(
                "key event 0x{:03X} (total dropped: {})",
                keys, self.dropped
            )))
        }
    }

    /// Number of events the consumer has rejected
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Access the wrapped consumer
    pub fn consumer(&self) -> &C {
        &self.consumer
    }
}

/// Consumer that logs every event through `tracing`. Used by the binary
/// until a real 3D application is attached.
#[derive(Debug, Default)]
pub struct TraceConsumer;

impl MotionConsumer for TraceConsumer {
    fn deliver_motion(&mut self, sample: &MotionSample) -> bool {
        debug!(
            "motion t=({:.3}, {:.3}, {:.3}) r=({:.3}, {:.3}, {:.3})",
            sample.tx, sample.ty, sample.tz, sample.rx, sample.ry, sample.rz
        );
        true
    }

    fn deliver_keys(&mut self, keys: u16) -> bool {
        debug!("keys 0x{:03X}", keys);
        true
    }
}
