//! Remote Input - record live input, ship it, replay it somewhere else.
//!
//! A sending process swaps a capture handler in front of its application's
//! input handler and forwards every key and touch event over an
//! address-routed connection. A receiving process decodes those messages and
//! replays them into its own handler, rescaling touches to its viewport.

pub mod channel;
pub mod error;
pub mod handler;
pub mod input;
pub mod platform;
pub mod recorder;
pub mod transport;

pub use channel::{DispatchMode, InputChannel, InputChannelConfig, Role};
pub use error::{ChannelError, ChannelResult, DecodeError, NormalizeError};
pub use handler::{MessageHandler, PlaybackMessageHandler, RecordingMessageHandler, RecordingWriter};
pub use input::{InputEvent, Location, MessageKind, NormalizedLocation, ScreenFrame, Size};
pub use platform::{PlatformApplication, ScreenRegistry, ViewportHandle, WindowHandle};
pub use recorder::RecordedSession;
pub use transport::{Connection, LoopbackConnection};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install a tracing subscriber honouring `RUST_LOG`.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "remote_input=debug,remote_input_demo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
