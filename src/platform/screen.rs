//! Window and viewport registry
//!
//! Handlers never own windows. They hold handles and resolve them here at the
//! moment a frame is needed; a handle whose window or viewport has been
//! destroyed resolves to the display frame instead.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{ChannelError, ChannelResult};
use crate::input::{Location, ScreenFrame, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowHandle(Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewportHandle(Uuid);

pub struct ScreenRegistry {
    display_size: RwLock<Size>,
    windows: RwLock<HashMap<WindowHandle, Location>>,
    viewports: RwLock<HashMap<ViewportHandle, Size>>,
}

impl ScreenRegistry {
    pub fn new(display_size: Size) -> Self {
        Self {
            display_size: RwLock::new(display_size),
            windows: RwLock::new(HashMap::new()),
            viewports: RwLock::new(HashMap::new()),
        }
    }

    /// The whole display, used whenever a window handle no longer resolves
    pub fn display_frame(&self) -> ScreenFrame {
        ScreenFrame::at_origin(*self.display_size.read())
    }

    pub fn set_display_size(&self, size: Size) {
        *self.display_size.write() = size;
    }

    pub fn create_window(&self, origin: Location) -> WindowHandle {
        let handle = WindowHandle(Uuid::new_v4());
        self.windows.write().insert(handle, origin);
        handle
    }

    pub fn move_window(&self, window: WindowHandle, origin: Location) -> ChannelResult<()> {
        let mut windows = self.windows.write();
        let slot = windows
            .get_mut(&window)
            .ok_or_else(|| ChannelError::StaleReference(format!("window {:?}", window)))?;
        *slot = origin;
        Ok(())
    }

    pub fn destroy_window(&self, window: WindowHandle) {
        self.windows.write().remove(&window);
    }

    pub fn is_window_alive(&self, window: WindowHandle) -> bool {
        self.windows.read().contains_key(&window)
    }

    pub fn create_viewport(&self, size: Size) -> ViewportHandle {
        let handle = ViewportHandle(Uuid::new_v4());
        self.viewports.write().insert(handle, size);
        handle
    }

    pub fn resize_viewport(&self, viewport: ViewportHandle, size: Size) -> ChannelResult<()> {
        let mut viewports = self.viewports.write();
        let slot = viewports
            .get_mut(&viewport)
            .ok_or_else(|| ChannelError::StaleReference(format!("viewport {:?}", viewport)))?;
        *slot = size;
        Ok(())
    }

    pub fn destroy_viewport(&self, viewport: ViewportHandle) {
        self.viewports.write().remove(&viewport);
    }

    /// Screen frame of `viewport` rendered inside `window`.
    pub fn frame(&self, window: WindowHandle, viewport: ViewportHandle) -> ChannelResult<ScreenFrame> {
        let origin = *self
            .windows
            .read()
            .get(&window)
            .ok_or_else(|| ChannelError::StaleReference(format!("window {:?}", window)))?;
        let size = *self
            .viewports
            .read()
            .get(&viewport)
            .ok_or_else(|| ChannelError::StaleReference(format!("viewport {:?}", viewport)))?;
        Ok(ScreenFrame::new(origin, size))
    }

    /// Like [`ScreenRegistry::frame`], falling back to the display frame when
    /// nothing is set or the handles have gone stale.
    pub fn frame_or_display(&self, target: Option<(WindowHandle, ViewportHandle)>) -> ScreenFrame {
        let Some((window, viewport)) = target else {
            return self.display_frame();
        };

        match self.frame(window, viewport) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!("{}, using display frame", e);
                self.display_frame()
            }
        }
    }
}
