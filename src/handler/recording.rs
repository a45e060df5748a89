//! Capture-mode handler
//!
//! Sits between the platform and the application's handler. Every event is
//! forwarded; while a writer is attached each event is also encoded and
//! handed to the writer.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use crate::handler::{forward_event, MessageHandler};
use crate::input::{codec, normalize, InputEvent, Location};
use crate::platform::{ScreenRegistry, ViewportHandle, WindowHandle};

/// Destination for recorded messages.
pub trait RecordingWriter: Send + Sync {
    fn record_message(&self, name: &str, data: &[u8]);
}

pub struct RecordingMessageHandler {
    target: Arc<dyn MessageHandler>,
    screen: Arc<ScreenRegistry>,
    writer: RwLock<Option<Weak<dyn RecordingWriter>>>,
    consume_input: AtomicBool,
    capture_target: RwLock<Option<(WindowHandle, ViewportHandle)>>,
}

impl RecordingMessageHandler {
    pub fn new(target: Arc<dyn MessageHandler>, screen: Arc<ScreenRegistry>) -> Self {
        Self {
            target,
            screen,
            writer: RwLock::new(None),
            consume_input: AtomicBool::new(false),
            capture_target: RwLock::new(None),
        }
    }

    /// Attach a writer, or detach with `None`. Detaching twice is fine.
    pub fn set_recording_handler(&self, writer: Option<Weak<dyn RecordingWriter>>) {
        *self.writer.write() = writer;
    }

    /// When set, every event is reported as consumed to the platform.
    pub fn set_consume_input(&self, consume: bool) {
        self.consume_input.store(consume, Ordering::Relaxed);
    }

    pub fn consume_input(&self) -> bool {
        self.consume_input.load(Ordering::Relaxed)
    }

    /// True while an attached writer is still alive
    pub fn is_recording(&self) -> bool {
        self.writer
            .read()
            .as_ref()
            .is_some_and(|writer| writer.strong_count() > 0)
    }

    /// Frame outgoing touches are normalized against.
    /// Without one the display frame is used.
    pub fn set_capture_window(&self, window: WindowHandle, viewport: ViewportHandle) {
        *self.capture_target.write() = Some((window, viewport));
    }

    pub fn target(&self) -> &Arc<dyn MessageHandler> {
        &self.target
    }

    fn handle(&self, event: InputEvent, window: Option<WindowHandle>) -> bool {
        self.record(&event);
        let handled = forward_event(self.target.as_ref(), &event, window);
        self.consume_input() || handled
    }

    fn record(&self, event: &InputEvent) {
        let Some(writer) = self.writer.read().as_ref().and_then(Weak::upgrade) else {
            return;
        };

        let frame = self.screen.frame_or_display(*self.capture_target.read());
        let wire = match event.try_map_location(|location| {
            normalize(location, &frame).map(|n| Location::new(n.x, n.y))
        }) {
            Ok(wire) => wire,
            Err(e) => {
                tracing::warn!("Not recording {}: {}", event.kind(), e);
                return;
            }
        };

        let payload = codec::encode(&wire);
        tracing::trace!("Recording {} ({} bytes)", event.kind(), payload.len());
        writer.record_message(event.kind().as_str(), &payload);
    }
}

impl MessageHandler for RecordingMessageHandler {
    fn on_key_char(&self, character: char, is_repeat: bool) -> bool {
        self.handle(
            InputEvent::KeyChar {
                character,
                is_repeat,
            },
            None,
        )
    }

    fn on_key_down(&self, key_code: i32, character_code: u32, is_repeat: bool) -> bool {
        self.handle(
            InputEvent::KeyDown {
                key_code,
                character_code,
                is_repeat,
            },
            None,
        )
    }

    fn on_key_up(&self, key_code: i32, character_code: u32, is_repeat: bool) -> bool {
        self.handle(
            InputEvent::KeyUp {
                key_code,
                character_code,
                is_repeat,
            },
            None,
        )
    }

    fn on_touch_started(
        &self,
        window: Option<WindowHandle>,
        location: Location,
        touch_index: i32,
        controller_id: i32,
    ) -> bool {
        self.handle(
            InputEvent::TouchStarted {
                location,
                touch_index,
                controller_id,
            },
            window,
        )
    }

    fn on_touch_moved(&self, location: Location, touch_index: i32, controller_id: i32) -> bool {
        self.handle(
            InputEvent::TouchMoved {
                location,
                touch_index,
                controller_id,
            },
            None,
        )
    }

    fn on_touch_ended(&self, location: Location, touch_index: i32, controller_id: i32) -> bool {
        self.handle(
            InputEvent::TouchEnded {
                location,
                touch_index,
                controller_id,
            },
            None,
        )
    }
}
