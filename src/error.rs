//! Error types for the remote input core
//!
//! Nothing on the input-delivery path surfaces these to the platform: decode
//! failures drop the packet, an unusable connection skips the send, and stale
//! window handles fall back to the display frame.

use thiserror::Error;

/// Failure to turn a named payload back into an input event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unknown message: {0}")]
    UnknownMessage(String),

    #[error("{message} payload truncated: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        message: &'static str,
        needed: usize,
        remaining: usize,
    },

    #[error("{message} payload has {extra} trailing bytes")]
    TrailingBytes { message: &'static str, extra: usize },

    #[error("Invalid character code point: {0:#x}")]
    InvalidCharacter(u32),

    #[error("Invalid bool byte: {0}")]
    InvalidBool(u8),
}

/// Failure to express a location relative to a reference frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("Degenerate reference frame: {width}x{height}")]
    DegenerateFrame { width: f32, height: f32 },
}

/// Errors raised by channel wiring, transports and recorded sessions
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("Connection is no longer valid")]
    InvalidConnection,

    #[error("Stale reference: {0}")]
    StaleReference(String),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for channel operations
pub type ChannelResult<T> = Result<T, ChannelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_converts_into_channel_error() {
        let err: ChannelError = DecodeError::UnknownMessage("OnMouseMove".to_string()).into();
        assert!(matches!(err, ChannelError::Decode(DecodeError::UnknownMessage(_))));
        assert_eq!(err.to_string(), "Decode error: Unknown message: OnMouseMove");
    }

    #[test]
    fn test_truncated_message_display() {
        let err = DecodeError::Truncated {
            message: "OnKeyDown",
            needed: 4,
            remaining: 1,
        };
        assert_eq!(
            err.to_string(),
            "OnKeyDown payload truncated: needed 4 bytes, 1 remaining"
        );
    }
}
