//! The platform side of input delivery
//!
//! `PlatformApplication` owns the single active message handler that raw
//! input is delivered to, along with the screen registry used to resolve
//! window handles.
//!
//! Installing and restoring the handler is a plain swap. Nothing stops a
//! third party from replacing the handler between a channel's install and its
//! restore; in that case the restore silently overwrites the third party's
//! handler. Callers are expected to install and restore from the UI thread.

pub mod screen;

pub use screen::{ScreenRegistry, ViewportHandle, WindowHandle};

use parking_lot::RwLock;
use std::sync::Arc;

use crate::handler::{MessageHandler, NullMessageHandler};
use crate::input::Size;

pub struct PlatformApplication {
    handler: RwLock<Arc<dyn MessageHandler>>,
    screen: Arc<ScreenRegistry>,
}

impl PlatformApplication {
    pub fn new(display_size: Size) -> Self {
        Self::with_handler(display_size, Arc::new(NullMessageHandler))
    }

    pub fn with_handler(display_size: Size, handler: Arc<dyn MessageHandler>) -> Self {
        Self {
            handler: RwLock::new(handler),
            screen: Arc::new(ScreenRegistry::new(display_size)),
        }
    }

    /// The handler raw input is currently delivered to
    pub fn message_handler(&self) -> Arc<dyn MessageHandler> {
        self.handler.read().clone()
    }

    pub fn set_message_handler(&self, handler: Arc<dyn MessageHandler>) {
        *self.handler.write() = handler;
    }

    /// Make `handler` the active handler and hand back the one it replaced.
    pub fn install_message_handler(&self, handler: Arc<dyn MessageHandler>) -> Arc<dyn MessageHandler> {
        std::mem::replace(&mut *self.handler.write(), handler)
    }

    /// Put back a handler previously returned by `install_message_handler`.
    pub fn restore_message_handler(&self, previous: Arc<dyn MessageHandler>) {
        self.set_message_handler(previous);
    }

    pub fn screen(&self) -> &Arc<ScreenRegistry> {
        &self.screen
    }
}
