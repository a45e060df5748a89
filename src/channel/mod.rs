//! Input channel
//!
//! Wires the recording and playback handlers to a connection. A sending
//! channel swaps a capture handler in as the platform's active handler and
//! ships every recorded message to `/MessageHandler/<name>`. A receiving
//! channel subscribes to that prefix and replays what arrives into the
//! handler that was active when it was created.

pub mod config;

pub use config::{DispatchMode, InputChannelConfig};

use bytes::Bytes;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::handler::{MessageHandler, PlaybackMessageHandler, RecordingMessageHandler, RecordingWriter};
use crate::platform::{PlatformApplication, ViewportHandle, WindowHandle};
use crate::transport::{Connection, PacketCallback, SubscriptionId};

/// Address prefix shared by every input message
pub const MESSAGE_ADDRESS_PREFIX: &str = "/MessageHandler/";

/// Channel type identifier used during session negotiation
pub const CHANNEL_TYPE: &str = "rv.input";

/// Which end of the session this channel is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Send,
    Receive,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Send => write!(f, "send"),
            Role::Receive => write!(f, "receive"),
        }
    }
}

/// Address for the message called `name`
pub fn message_address(name: &str) -> String {
    format!("{}{}", MESSAGE_ADDRESS_PREFIX, name)
}

#[derive(Debug, Clone)]
struct InboundMessage {
    name: String,
    data: Bytes,
}

type Inbox = Mutex<VecDeque<InboundMessage>>;

pub struct InputChannel {
    role: Role,
    connection: Arc<dyn Connection>,
    platform: Arc<PlatformApplication>,
    config: InputChannelConfig,

    default_handler: Option<Arc<dyn MessageHandler>>,
    recording_handler: Option<Arc<RecordingMessageHandler>>,
    playback_handler: Option<Arc<PlaybackMessageHandler>>,

    subscription: Option<SubscriptionId>,
    inbox: Arc<Inbox>,
}

impl InputChannel {
    pub fn new(
        role: Role,
        connection: Arc<dyn Connection>,
        platform: Arc<PlatformApplication>,
        config: InputChannelConfig,
    ) -> Arc<Self> {
        match role {
            Role::Send => Self::sender(connection, platform, config),
            Role::Receive => Self::receiver(connection, platform, config),
        }
    }

    /// Capture the platform's input and forward it over `connection`.
    pub fn sender(
        connection: Arc<dyn Connection>,
        platform: Arc<PlatformApplication>,
        config: InputChannelConfig,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this: &Weak<Self>| {
            let recording = Arc::new(RecordingMessageHandler::new(
                platform.message_handler(),
                platform.screen().clone(),
            ));
            recording.set_consume_input(config.consume_input);

            let writer: Weak<dyn RecordingWriter> = Weak::<Self>::clone(this);
            recording.set_recording_handler(Some(writer));

            let previous = platform.install_message_handler(recording.clone());

            tracing::info!(
                "Input channel created (role=send, consume_input={})",
                config.consume_input
            );

            Self {
                role: Role::Send,
                connection,
                platform,
                config,
                default_handler: Some(previous),
                recording_handler: Some(recording),
                playback_handler: None,
                subscription: None,
                inbox: Arc::new(Mutex::new(VecDeque::new())),
            }
        })
    }

    /// Replay input arriving on `connection` into the platform's current handler.
    pub fn receiver(
        connection: Arc<dyn Connection>,
        platform: Arc<PlatformApplication>,
        config: InputChannelConfig,
    ) -> Arc<Self> {
        let playback = Arc::new(PlaybackMessageHandler::new(
            platform.message_handler(),
            platform.screen().clone(),
        ));
        let inbox: Arc<Inbox> = Arc::new(Mutex::new(VecDeque::new()));

        let callback: PacketCallback = match config.dispatch {
            DispatchMode::Immediate => {
                let handler = Arc::downgrade(&playback);
                Box::new(move |address, payload| {
                    if let Some(handler) = handler.upgrade() {
                        handler.play_message(message_name(address), payload);
                    }
                })
            }
            DispatchMode::Deferred => {
                let inbox = Arc::downgrade(&inbox);
                let capacity = config.max_pending_messages;
                Box::new(move |address, payload| {
                    if let Some(inbox) = inbox.upgrade() {
                        enqueue(
                            &inbox,
                            capacity,
                            InboundMessage {
                                name: message_name(address).to_string(),
                                data: Bytes::copy_from_slice(payload),
                            },
                        );
                    }
                })
            }
        };

        let subscription = connection.subscribe(MESSAGE_ADDRESS_PREFIX, callback);

        tracing::info!("Input channel created (role=receive, dispatch={:?})", config.dispatch);

        Arc::new(Self {
            role: Role::Receive,
            connection,
            platform,
            config,
            default_handler: None,
            recording_handler: None,
            playback_handler: Some(playback),
            subscription: Some(subscription),
            inbox,
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn channel_type(&self) -> &'static str {
        CHANNEL_TYPE
    }

    pub fn config(&self) -> &InputChannelConfig {
        &self.config
    }

    pub fn recording_handler(&self) -> Option<&Arc<RecordingMessageHandler>> {
        self.recording_handler.as_ref()
    }

    pub fn playback_handler(&self) -> Option<&Arc<PlaybackMessageHandler>> {
        self.playback_handler.as_ref()
    }

    pub fn set_playback_window(&self, window: WindowHandle, viewport: ViewportHandle) {
        match &self.playback_handler {
            Some(handler) => handler.set_playback_window(window, viewport),
            None => tracing::debug!("Ignoring playback window on a {} channel", self.role),
        }
    }

    /// Messages queued for the next `tick`
    pub fn pending_messages(&self) -> usize {
        self.inbox.lock().len()
    }

    /// Replay queued messages in arrival order. Call from the UI thread.
    ///
    /// Deferred channels must be ticked regularly: once
    /// `max_pending_messages` are queued, the oldest are dropped.
    /// Returns how many messages were replayed.
    pub fn tick(&self) -> usize {
        let Some(handler) = &self.playback_handler else {
            return 0;
        };

        let pending = std::mem::take(&mut *self.inbox.lock());
        pending
            .into_iter()
            .filter(|message| handler.play_message(&message.name, &message.data))
            .count()
    }
}

impl RecordingWriter for InputChannel {
    fn record_message(&self, name: &str, data: &[u8]) {
        if !self.connection.is_valid() {
            tracing::debug!("Connection unusable, not sending {}", name);
            return;
        }

        if let Err(e) = self.connection.send(&message_address(name), data) {
            tracing::warn!("Failed to send {}: {}", name, e);
        }
    }
}

impl Drop for InputChannel {
    fn drop(&mut self) {
        // Restores whatever was active at construction, even if a third party
        // has installed its own handler since.
        if let Some(default_handler) = self.default_handler.take() {
            self.platform.restore_message_handler(default_handler);
        }

        if let Some(recording) = &self.recording_handler {
            recording.set_recording_handler(None);
        }

        if let Some(subscription) = self.subscription.take() {
            self.connection.unsubscribe(subscription);
        }

        tracing::info!("Input channel closed (role={})", self.role);
    }
}

fn enqueue(inbox: &Inbox, capacity: usize, message: InboundMessage) {
    let mut queue = inbox.lock();
    while capacity > 0 && queue.len() >= capacity {
        if let Some(dropped) = queue.pop_front() {
            tracing::warn!("Input inbox full ({}), dropping {}", capacity, dropped.name);
        }
    }
    queue.push_back(message);
}

fn message_name(address: &str) -> &str {
    address.strip_prefix(MESSAGE_ADDRESS_PREFIX).unwrap_or(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::testing::EventLog;
    use crate::input::{codec, InputEvent, Location, Size};
    use crate::transport::LoopbackConnection;

    fn platform_with(log: Arc<EventLog>, size: Size) -> Arc<PlatformApplication> {
        Arc::new(PlatformApplication::with_handler(size, log))
    }

    #[test]
    fn test_message_name_strips_prefix() {
        assert_eq!(message_name("/MessageHandler/OnKeyUp"), "OnKeyUp");
        assert_eq!(message_name("OnKeyUp"), "OnKeyUp");
        assert_eq!(message_address("OnTouchMoved"), "/MessageHandler/OnTouchMoved");
    }

    #[test]
    fn test_sender_installs_capture_handler_and_restores_on_drop() {
        let log = Arc::new(EventLog::default());
        let platform = platform_with(log.clone(), Size::new(100.0, 100.0));
        let original = platform.message_handler();
        let connection = Arc::new(LoopbackConnection::new());

        let channel = InputChannel::sender(connection, platform.clone(), InputChannelConfig::default());
        assert_eq!(channel.role(), Role::Send);
        assert_eq!(channel.channel_type(), "rv.input");
        assert!(!Arc::ptr_eq(&platform.message_handler(), &original));
        assert!(channel.recording_handler().unwrap().is_recording());

        drop(channel);
        assert!(Arc::ptr_eq(&platform.message_handler(), &original));
    }

    #[test]
    fn test_sender_sends_addressed_packets() {
        let platform = platform_with(Arc::new(EventLog::default()), Size::new(100.0, 100.0));
        let connection = Arc::new(LoopbackConnection::new());
        let _channel =
            InputChannel::sender(connection.clone(), platform.clone(), InputChannelConfig::default());

        platform.message_handler().on_key_char('h', false);

        let sent = connection.sent_packets();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "/MessageHandler/OnKeyChar");
        assert_eq!(
            codec::decode("OnKeyChar", &sent[0].1).unwrap(),
            InputEvent::KeyChar {
                character: 'h',
                is_repeat: false,
            }
        );
    }

    #[test]
    fn test_invalid_connection_still_delivers_locally() {
        let log = Arc::new(EventLog::default());
        let platform = platform_with(log.clone(), Size::new(100.0, 100.0));
        let connection = Arc::new(LoopbackConnection::new());
        let _channel =
            InputChannel::sender(connection.clone(), platform.clone(), InputChannelConfig::default());

        connection.close();
        platform.message_handler().on_key_down(1, 2, false);

        assert!(connection.sent_packets().is_empty());
        assert_eq!(log.events().len(), 1);
    }

    #[test]
    fn test_sender_consume_flag_from_config() {
        let platform = platform_with(Arc::new(EventLog::default()), Size::new(100.0, 100.0));
        let config = InputChannelConfig {
            consume_input: true,
            ..Default::default()
        };
        let _channel = InputChannel::sender(Arc::new(LoopbackConnection::new()), platform.clone(), config);

        assert!(platform.message_handler().on_key_up(1, 1, false));
    }

    #[test]
    fn test_receiver_unsubscribes_on_drop() {
        let platform = platform_with(Arc::new(EventLog::default()), Size::new(100.0, 100.0));
        let connection = Arc::new(LoopbackConnection::new());
        let channel =
            InputChannel::receiver(connection.clone(), platform.clone(), InputChannelConfig::default());
        assert_eq!(connection.subscription_count(), 1);
        assert_eq!(channel.tick(), 0);

        drop(channel);
        assert_eq!(connection.subscription_count(), 0);
    }

    #[test]
    fn test_deferred_receiver_replays_on_tick() {
        let log = Arc::new(EventLog::default());
        let platform = platform_with(log.clone(), Size::new(100.0, 100.0));
        let connection = Arc::new(LoopbackConnection::new());
        let config = InputChannelConfig {
            dispatch: DispatchMode::Deferred,
            ..Default::default()
        };
        let channel = InputChannel::receiver(connection.clone(), platform, config);

        let event = InputEvent::KeyChar {
            character: 'd',
            is_repeat: false,
        };
        connection
            .send("/MessageHandler/OnKeyChar", &codec::encode(&event))
            .unwrap();
        connection.send("/MessageHandler/OnBogus", &[]).unwrap();

        assert!(log.events().is_empty());
        assert_eq!(channel.pending_messages(), 2);
        assert_eq!(channel.tick(), 1);
        assert_eq!(channel.pending_messages(), 0);
        assert_eq!(log.events(), vec![event]);
    }

    #[test]
    fn test_new_with_send_role_builds_sender() {
        let log = Arc::new(EventLog::default());
        let platform = platform_with(log.clone(), Size::new(100.0, 100.0));
        let original = platform.message_handler();
        let connection = Arc::new(LoopbackConnection::new());

        let channel = InputChannel::new(
            Role::Send,
            connection.clone(),
            platform.clone(),
            InputChannelConfig::default(),
        );
        assert_eq!(channel.role(), Role::Send);
        assert!(channel.playback_handler().is_none());

        platform.message_handler().on_key_up(9, 9, false);
        assert_eq!(connection.sent_packets()[0].0, "/MessageHandler/OnKeyUp");
        assert_eq!(log.events().len(), 1);

        drop(channel);
        assert!(Arc::ptr_eq(&platform.message_handler(), &original));
    }

    #[test]
    fn test_new_with_receive_role_falls_back_when_viewport_destroyed() {
        let log = Arc::new(EventLog::default());
        let platform = platform_with(log.clone(), Size::new(100.0, 50.0));
        let window = platform.screen().create_window(Location::new(0.0, 0.0));
        let viewport = platform.screen().create_viewport(Size::new(2000.0, 400.0));
        let connection = Arc::new(LoopbackConnection::new());

        let channel = InputChannel::new(
            Role::Receive,
            connection.clone(),
            platform.clone(),
            InputChannelConfig::default(),
        );
        assert_eq!(channel.role(), Role::Receive);
        assert!(channel.recording_handler().is_none());
        channel.set_playback_window(window, viewport);
        platform.screen().destroy_viewport(viewport);

        let payload = codec::encode(&InputEvent::TouchStarted {
            location: Location::new(0.5, 0.5),
            touch_index: 0,
            controller_id: 0,
        });
        connection.send("/MessageHandler/OnTouchStarted", &payload).unwrap();

        assert_eq!(log.events()[0].location(), Some(Location::new(50.0, 25.0)));
        assert_eq!(log.windows.lock()[0], None);
    }

    #[test]
    fn test_deferred_inbox_drops_oldest_when_full() {
        let log = Arc::new(EventLog::default());
        let platform = platform_with(log.clone(), Size::new(100.0, 100.0));
        let connection = Arc::new(LoopbackConnection::new());
        let config = InputChannelConfig {
            dispatch: DispatchMode::Deferred,
            max_pending_messages: 2,
            ..Default::default()
        };
        let channel = InputChannel::receiver(connection.clone(), platform, config);

        for character in ['a', 'b', 'c'] {
            let payload = codec::encode(&InputEvent::KeyChar {
                character,
                is_repeat: false,
            });
            connection.send("/MessageHandler/OnKeyChar", &payload).unwrap();
        }

        assert_eq!(channel.pending_messages(), 2);
        assert_eq!(channel.tick(), 2);
        assert_eq!(
            log.events(),
            vec![
                InputEvent::KeyChar {
                    character: 'b',
                    is_repeat: false,
                },
                InputEvent::KeyChar {
                    character: 'c',
                    is_repeat: false,
                },
            ]
        );
    }

    #[test]
    fn test_playback_window_forwarded_to_handler() {
        let log = Arc::new(EventLog::default());
        let platform = platform_with(log.clone(), Size::new(10.0, 10.0));
        let window = platform.screen().create_window(Location::new(0.0, 0.0));
        let viewport = platform.screen().create_viewport(Size::new(2000.0, 400.0));
        let connection = Arc::new(LoopbackConnection::new());
        let channel =
            InputChannel::receiver(connection.clone(), platform, InputChannelConfig::default());
        channel.set_playback_window(window, viewport);

        let payload = codec::encode(&InputEvent::TouchMoved {
            location: Location::new(0.5, 0.25),
            touch_index: 0,
            controller_id: 0,
        });
        connection.send("/MessageHandler/OnTouchMoved", &payload).unwrap();

        assert_eq!(log.events()[0].location(), Some(Location::new(1000.0, 100.0)));
    }
}
