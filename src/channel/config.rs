use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ChannelError, ChannelResult};

/// How a receiving channel hands inbound packets to its playback handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Replay inside the transport callback. Only correct when the transport
    /// delivers on the UI thread.
    #[default]
    Immediate,
    /// Queue packets and replay them on `InputChannel::tick`.
    Deferred,
}

/// Default cap on messages a deferred receiver holds between ticks
pub const DEFAULT_MAX_PENDING_MESSAGES: usize = 4096;

/// Input channel configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputChannelConfig {
    /// Report every captured event as consumed to the platform
    pub consume_input: bool,
    pub dispatch: DispatchMode,
    /// Deferred inbox capacity. The oldest message is dropped when full; 0 means unbounded.
    pub max_pending_messages: usize,
}

impl Default for InputChannelConfig {
    fn default() -> Self {
        Self {
            consume_input: false,
            dispatch: DispatchMode::default(),
            max_pending_messages: DEFAULT_MAX_PENDING_MESSAGES,
        }
    }
}

impl InputChannelConfig {
    pub fn from_json_str(json: &str) -> ChannelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> ChannelResult<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            ChannelError::Configuration(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = InputChannelConfig::from_json_str("{}").unwrap();
        assert_eq!(config, InputChannelConfig::default());
        assert!(!config.consume_input);
        assert_eq!(config.dispatch, DispatchMode::Immediate);
        assert_eq!(config.max_pending_messages, DEFAULT_MAX_PENDING_MESSAGES);
    }

    #[test]
    fn test_max_pending_messages_field() {
        let config = InputChannelConfig::from_json_str(r#"{"maxPendingMessages": 8}"#).unwrap();
        assert_eq!(config.max_pending_messages, 8);
        assert_eq!(config.dispatch, DispatchMode::Immediate);
    }

    #[test]
    fn test_camel_case_fields() {
        let config =
            InputChannelConfig::from_json_str(r#"{"consumeInput": true, "dispatch": "deferred"}"#)
                .unwrap();
        assert!(config.consume_input);
        assert_eq!(config.dispatch, DispatchMode::Deferred);
    }

    #[test]
    fn test_bad_dispatch_mode_is_an_error() {
        let err = InputChannelConfig::from_json_str(r#"{"dispatch": "later"}"#).unwrap_err();
        assert!(matches!(err, ChannelError::Json(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"consumeInput": true}}"#).unwrap();

        let config = InputChannelConfig::from_json_file(file.path()).unwrap();
        assert!(config.consume_input);
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = InputChannelConfig::from_json_file(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ChannelError::Configuration(_)));
    }
}
