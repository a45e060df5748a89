//! Input handlers
//!
//! `MessageHandler` is the callback surface the platform drives with raw
//! input. The capture handler sits in front of the application's handler and
//! records what passes through; the playback handler turns recorded messages
//! back into calls on a target handler.

pub mod dispatch;
pub mod playback;
pub mod recording;

pub use dispatch::DispatchTable;
pub use playback::PlaybackMessageHandler;
pub use recording::{RecordingMessageHandler, RecordingWriter};

use crate::input::{InputEvent, Location};
use crate::platform::WindowHandle;

/// Receives input events from the platform.
///
/// Each callback returns whether the event was consumed. The defaults leave
/// every event unhandled.
pub trait MessageHandler: Send + Sync {
    /// Text input. Replayed characters are Unicode scalar values only: a
    /// packet carrying a lone UTF-16 surrogate is rejected by the decoder.
    fn on_key_char(&self, _character: char, _is_repeat: bool) -> bool {
        false
    }

    fn on_key_down(&self, _key_code: i32, _character_code: u32, _is_repeat: bool) -> bool {
        false
    }

    fn on_key_up(&self, _key_code: i32, _character_code: u32, _is_repeat: bool) -> bool {
        false
    }

    fn on_touch_started(
        &self,
        _window: Option<WindowHandle>,
        _location: Location,
        _touch_index: i32,
        _controller_id: i32,
    ) -> bool {
        false
    }

    fn on_touch_moved(&self, _location: Location, _touch_index: i32, _controller_id: i32) -> bool {
        false
    }

    fn on_touch_ended(&self, _location: Location, _touch_index: i32, _controller_id: i32) -> bool {
        false
    }
}

/// A handler that ignores everything, used as the platform's initial handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMessageHandler;

impl MessageHandler for NullMessageHandler {}

/// Issue `event` to `handler` through the matching callback.
pub fn forward_event(
    handler: &dyn MessageHandler,
    event: &InputEvent,
    window: Option<WindowHandle>,
) -> bool {
    match *event {
        InputEvent::KeyChar {
            character,
            is_repeat,
        } => handler.on_key_char(character, is_repeat),
        InputEvent::KeyDown {
            key_code,
            character_code,
            is_repeat,
        } => handler.on_key_down(key_code, character_code, is_repeat),
        InputEvent::KeyUp {
            key_code,
            character_code,
            is_repeat,
        } => handler.on_key_up(key_code, character_code, is_repeat),
        InputEvent::TouchStarted {
            location,
            touch_index,
            controller_id,
        } => handler.on_touch_started(window, location, touch_index, controller_id),
        InputEvent::TouchMoved {
            location,
            touch_index,
            controller_id,
        } => handler.on_touch_moved(location, touch_index, controller_id),
        InputEvent::TouchEnded {
            location,
            touch_index,
            controller_id,
        } => handler.on_touch_ended(location, touch_index, controller_id),
    }
}
