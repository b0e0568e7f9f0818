//! # Error Types
//!
//! Custom error types for Magellan Bridge using `thiserror`.
//!
//! The variants follow the failure domains of the link: transport failures
//! are fatal to the current connection, everything else is contained within
//! a single frame or command.

use thiserror::Error;

/// Main error type for Magellan Bridge
#[derive(Debug, Error)]
pub enum MagellanError {
    /// Serial transport failure (open/configure/read/write). Fatal to the
    /// current connection; forces the disconnect transition.
    #[error("transport error: {0}")]
    Transport(String),

    /// Lost or unrecognised framing (unknown kind identifier, oversized
    /// segment). Recoverable; the frame is dropped and parsing resumes.
    #[error("frame sync error: {0}")]
    FrameSync(String),

    /// Payload field does not match the expected width or character set.
    /// Recoverable; the frame is dropped and parsing resumes.
    #[error("field decode error: {0}")]
    FieldDecode(String),

    /// Command argument outside the device's valid range. Rejected before
    /// transmission; nothing is written to the port.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Downstream consumer rejected an event. Logged, non-fatal.
    #[error("delivery rejected: {0}")]
    Delivery(String),

    /// Configuration file errors
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Magellan Bridge
pub type Result<T> = std::result::Result<T, MagellanError>;
