//! Loopback demo: a sender and a receiver in one process.
//!
//! Usage: `remote-input-demo [receiver-config.json]`

use anyhow::Context;
use parking_lot::Mutex;
use remote_input::{
    DispatchMode, InputChannel, InputChannelConfig, InputEvent, Location, LoopbackConnection,
    MessageHandler, PlatformApplication, Size, WindowHandle,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Stands in for the receiving application
#[derive(Default)]
struct Observer {
    events: Mutex<Vec<InputEvent>>,
}

impl MessageHandler for Observer {
    fn on_key_char(&self, character: char, is_repeat: bool) -> bool {
        self.events.lock().push(InputEvent::KeyChar {
            character,
            is_repeat,
        });
        true
    }

    fn on_touch_started(
        &self,
        _window: Option<WindowHandle>,
        location: Location,
        touch_index: i32,
        controller_id: i32,
    ) -> bool {
        self.events.lock().push(InputEvent::TouchStarted {
            location,
            touch_index,
            controller_id,
        });
        true
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    remote_input::init_tracing();

    let mut receiver_config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => InputChannelConfig::from_json_file(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => InputChannelConfig::default(),
    };
    receiver_config.dispatch = DispatchMode::Deferred;

    let connection = Arc::new(LoopbackConnection::new());

    let sender_platform = Arc::new(PlatformApplication::new(Size::new(1000.0, 1000.0)));
    let observer = Arc::new(Observer::default());
    let receiver_platform = Arc::new(PlatformApplication::with_handler(
        Size::new(1920.0, 1080.0),
        observer.clone(),
    ));
    let window = receiver_platform.screen().create_window(Location::new(0.0, 0.0));
    let viewport = receiver_platform.screen().create_viewport(Size::new(2000.0, 400.0));

    let receiver = InputChannel::receiver(connection.clone(), receiver_platform, receiver_config);
    receiver.set_playback_window(window, viewport);
    let sender = InputChannel::sender(
        connection.clone(),
        sender_platform.clone(),
        InputChannelConfig::default(),
    );

    let input = sender_platform.message_handler();
    for character in "hello".chars() {
        input.on_key_char(character, false);
    }
    input.on_touch_started(None, Location::new(500.0, 250.0), 0, 0);

    let mut ticker = tokio::time::interval(Duration::from_millis(16));
    while receiver.pending_messages() > 0 {
        ticker.tick().await;
        let played = receiver.tick();
        tracing::info!("Replayed {} messages", played);
    }

    for event in observer.events.lock().iter() {
        tracing::info!("Receiver saw {:?}", event);
    }

    drop(sender);
    drop(receiver);
    Ok(())
}
