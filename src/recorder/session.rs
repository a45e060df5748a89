use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ChannelResult;
use crate::handler::{PlaybackMessageHandler, RecordingWriter};

/// One recorded message, exactly as it would travel on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedMessage {
    pub name: String,
    pub data: Vec<u8>,
}

/// Outcome of replaying a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySummary {
    pub played: usize,
    pub dropped: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFile {
    messages: Vec<RecordedMessage>,
}

/// Keeps recorded messages in memory so they can be saved and replayed later.
#[derive(Debug, Default)]
pub struct RecordedSession {
    messages: Mutex<Vec<RecordedMessage>>,
}

impl RecordedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<RecordedMessage>) -> Self {
        Self {
            messages: Mutex::new(messages),
        }
    }

    pub fn messages(&self) -> Vec<RecordedMessage> {
        self.messages.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }

    pub fn save_json(&self, path: &Path) -> ChannelResult<()> {
        let file = SessionFile {
            messages: self.messages(),
        };
        let data = serde_json::to_vec_pretty(&file)?;
        std::fs::write(path, data)?;

        tracing::info!("Saved {} recorded messages to {}", file.messages.len(), path.display());
        Ok(())
    }

    pub fn load_json(path: &Path) -> ChannelResult<Self> {
        let data = std::fs::read(path)?;
        let file: SessionFile = serde_json::from_slice(&data)?;

        tracing::info!("Loaded {} recorded messages from {}", file.messages.len(), path.display());
        Ok(Self::from_messages(file.messages))
    }

    /// Play every message, in recording order, through `handler`.
    pub fn replay(&self, handler: &PlaybackMessageHandler) -> ReplaySummary {
        let mut summary = ReplaySummary::default();
        for message in self.messages() {
            if handler.play_message(&message.name, &message.data) {
                summary.played += 1;
            } else {
                summary.dropped += 1;
            }
        }
        summary
    }
}

impl RecordingWriter for RecordedSession {
    fn record_message(&self, name: &str, data: &[u8]) {
        self.messages.lock().push(RecordedMessage {
            name: name.to_string(),
            data: data.to_vec(),
        });
    }
}
