//! Playback-mode handler
//!
//! Turns named payloads back into calls on a target handler as if the
//! platform had produced them. Must be driven from the UI thread.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::DecodeError;
use crate::handler::dispatch::DispatchTable;
use crate::handler::{forward_event, MessageHandler};
use crate::input::{codec, denormalize, InputEvent, MessageKind, NormalizedLocation};
use crate::platform::{ScreenRegistry, ViewportHandle, WindowHandle};

pub struct PlaybackMessageHandler {
    target: Arc<dyn MessageHandler>,
    screen: Arc<ScreenRegistry>,
    playback_target: RwLock<Option<(WindowHandle, ViewportHandle)>>,
    dispatch_table: DispatchTable<PlaybackMessageHandler>,
}

impl PlaybackMessageHandler {
    pub fn new(target: Arc<dyn MessageHandler>, screen: Arc<ScreenRegistry>) -> Self {
        Self {
            target,
            screen,
            playback_target: RwLock::new(None),
            dispatch_table: Self::build_dispatch_table(),
        }
    }

    fn build_dispatch_table() -> DispatchTable<Self> {
        let mut table = DispatchTable::new();
        table.register(MessageKind::KeyChar.as_str(), Self::play_on_key_char);
        table.register(MessageKind::KeyDown.as_str(), Self::play_on_key_down);
        table.register(MessageKind::KeyUp.as_str(), Self::play_on_key_up);
        table.register(MessageKind::TouchStarted.as_str(), Self::play_on_touch_started);
        table.register(MessageKind::TouchMoved.as_str(), Self::play_on_touch_moved);
        table.register(MessageKind::TouchEnded.as_str(), Self::play_on_touch_ended);
        table
    }

    /// Window and viewport that replayed touches are expanded against.
    ///
    /// Only handles are kept. If either is destroyed later, touches fall back
    /// to the display frame.
    pub fn set_playback_window(&self, window: WindowHandle, viewport: ViewportHandle) {
        *self.playback_target.write() = Some((window, viewport));
    }

    pub fn target(&self) -> &Arc<dyn MessageHandler> {
        &self.target
    }

    pub fn dispatch_table(&self) -> &DispatchTable<Self> {
        &self.dispatch_table
    }

    /// Replay the message `name`. Returns false, without touching the
    /// target, when the name is unknown or the payload does not decode.
    pub fn play_message(&self, name: &str, data: &[u8]) -> bool {
        match self.try_play_message(name, data) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Dropping {} message: {}", name, e);
                false
            }
        }
    }

    pub fn try_play_message(&self, name: &str, data: &[u8]) -> Result<(), DecodeError> {
        let play = self
            .dispatch_table
            .get(name)
            .ok_or_else(|| DecodeError::UnknownMessage(name.to_string()))?;
        play(self, data)
    }

    fn play_on_key_char(&self, data: &[u8]) -> Result<(), DecodeError> {
        self.play(MessageKind::KeyChar, data)
    }

    fn play_on_key_down(&self, data: &[u8]) -> Result<(), DecodeError> {
        self.play(MessageKind::KeyDown, data)
    }

    fn play_on_key_up(&self, data: &[u8]) -> Result<(), DecodeError> {
        self.play(MessageKind::KeyUp, data)
    }

    fn play_on_touch_started(&self, data: &[u8]) -> Result<(), DecodeError> {
        self.play(MessageKind::TouchStarted, data)
    }

    fn play_on_touch_moved(&self, data: &[u8]) -> Result<(), DecodeError> {
        self.play(MessageKind::TouchMoved, data)
    }

    fn play_on_touch_ended(&self, data: &[u8]) -> Result<(), DecodeError> {
        self.play(MessageKind::TouchEnded, data)
    }

    fn play(&self, kind: MessageKind, data: &[u8]) -> Result<(), DecodeError> {
        let event = codec::decode_kind(kind, data)?;
        self.replay(event);
        Ok(())
    }

    fn replay(&self, event: InputEvent) {
        if !event.kind().is_touch() {
            tracing::trace!("Replaying {}", event.kind());
            forward_event(self.target.as_ref(), &event, None);
            return;
        }

        // The window is only attached when its frame is the one used for expansion.
        let playback_target = *self.playback_target.read();
        let (window, frame) = match playback_target {
            Some((window, viewport)) => match self.screen.frame(window, viewport) {
                Ok(frame) => (Some(window), frame),
                Err(e) => {
                    tracing::debug!("{}, using display frame", e);
                    (None, self.screen.display_frame())
                }
            },
            None => (None, self.screen.display_frame()),
        };
        let event = event.map_location(|wire| denormalize(NormalizedLocation::new(wire.x, wire.y), &frame));

        tracing::trace!("Replaying {}", event.kind());
        forward_event(self.target.as_ref(), &event, window);
    }
}
