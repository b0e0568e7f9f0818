//! # Magellan Bridge
//!
//! Bridge a Magellan-class 6DOF space controller to 3D applications over
//! RS-232.
//!
//! The binary opens the configured serial port, pushes the device
//! configuration (mode, quality, null radius, data rate), then decodes the
//! inbound byte stream into motion and button events until interrupted.

use anyhow::Result;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

use magellan_bridge::config::Config;
use magellan_bridge::delivery::TraceConsumer;
use magellan_bridge::device::MagellanDevice;
use magellan_bridge::error::Result as MagellanResult;
use magellan_bridge::magellan::encoder;
use magellan_bridge::magellan::protocol::{ROT_SCALE_BASE, TRANS_SCALE_BASE};
use magellan_bridge::serial::MagellanLink;

/// Configuration file used when none is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Serial read buffer size; frames are tiny, this covers a burst
const READ_BUFFER_SIZE: usize = 256;

/// Push the configured device setup through the command encoder.
///
/// Order follows the device's expectations: mode and sensitivity first,
/// then the reference pose, then an audible confirmation.
async fn apply_device_config(link: &mut MagellanLink, config: &Config) -> MagellanResult<()> {
    let dev = &config.device;

    link.send_command(&encoder::set_mode(
        dev.dominant_mode,
        dev.translation_enabled,
        dev.rotation_enabled,
    ))
    .await?;
    link.send_command(&encoder::set_quality(dev.rot_quality, dev.trans_quality)?)
        .await?;
    link.send_command(&encoder::set_null_radius(dev.null_radius)?)
        .await?;
    link.send_command(&encoder::set_data_rate(dev.data_rate_min, dev.data_rate_max)?)
        .await?;
    link.send_command(&encoder::zero()).await?;
    link.send_command(&encoder::beep(dev.beep_duration)?).await?;

    Ok(())
}

/// Tear down after a transport failure and try to bring the link back.
async fn reconnect(
    link: &mut MagellanLink,
    device: &mut MagellanDevice<TraceConsumer>,
    config: &Config,
    interval: Duration,
) {
    link.disconnect();
    device.reset();
    sleep(interval).await;

    match link.connect().await {
        Ok(()) => {
            if let Err(e) = apply_device_config(link, config).await {
                warn!("reconfiguration failed: {}; dropping link", e);
                link.disconnect();
            } else {
                info!("link re-established");
            }
        }
        Err(e) => warn!("reconnect failed: {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Magellan Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)?;
    info!("loaded configuration from {}", config_path);

    let mut device = MagellanDevice::new(TraceConsumer);
    device.set_scales(
        config.device.rot_multiplier * ROT_SCALE_BASE,
        config.device.trans_multiplier * TRANS_SCALE_BASE,
    );

    let mut link = MagellanLink::new(config.resolved_port());
    link.connect().await?;
    device.reset();
    apply_device_config(&mut link, &config).await?;
    info!("device configured; decoding motion events");
    info!("Press Ctrl+C to exit");

    let reconnect_interval = Duration::from_millis(config.serial.reconnect_interval_ms);
    let mut buf = [0u8; READ_BUFFER_SIZE];

    // Main loop: byte arrival is the only wake point; parsing, decoding and
    // delivery all run synchronously on it.
    loop {
        tokio::select! {
            result = link.read_bytes(&mut buf) => {
                match result {
                    Ok(0) => {
                        warn!("serial link closed by peer; reconnecting");
                        reconnect(&mut link, &mut device, &config, reconnect_interval).await;
                    }
                    Ok(n) => device.handle_bytes(&buf[..n]),
                    Err(e) => {
                        warn!("transport error: {}; reconnecting", e);
                        reconnect(&mut link, &mut device, &config, reconnect_interval).await;
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    if device.dropped_deliveries() > 0 {
        warn!(
            "{} events were rejected downstream this session",
            device.dropped_deliveries()
        );
    }
    link.disconnect();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        assert_eq!(DEFAULT_CONFIG_PATH, "config/default.toml");
    }

    #[test]
    fn test_read_buffer_holds_a_burst() {
        // Largest frame is a transformation: 1 + 24 + 1 bytes; the buffer
        // must hold several without truncation pressure.
        assert!(READ_BUFFER_SIZE >= 8 * 26);
    }
}
