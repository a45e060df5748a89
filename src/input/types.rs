use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;

/// A point in screen space, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: f32,
    pub y: f32,
}

impl Location {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A point expressed as a fraction of a reference frame's width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedLocation {
    pub x: f32,
    pub y: f32,
}

impl NormalizedLocation {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when both dimensions are finite and strictly positive
    pub fn has_area(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Where a viewport sits on screen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenFrame {
    pub origin: Location,
    pub size: Size,
}

impl ScreenFrame {
    pub const fn new(origin: Location, size: Size) -> Self {
        Self { origin, size }
    }

    /// A frame anchored at the screen origin
    pub const fn at_origin(size: Size) -> Self {
        Self {
            origin: Location::new(0.0, 0.0),
            size,
        }
    }
}

/// The six message names carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    KeyChar,
    KeyDown,
    KeyUp,
    TouchStarted,
    TouchMoved,
    TouchEnded,
}

impl MessageKind {
    pub const ALL: [MessageKind; 6] = [
        MessageKind::KeyChar,
        MessageKind::KeyDown,
        MessageKind::KeyUp,
        MessageKind::TouchStarted,
        MessageKind::TouchMoved,
        MessageKind::TouchEnded,
    ];

    /// Wire literal, also used as the last address segment
    pub const fn as_str(&self) -> &'static str {
        match self {
            MessageKind::KeyChar => "OnKeyChar",
            MessageKind::KeyDown => "OnKeyDown",
            MessageKind::KeyUp => "OnKeyUp",
            MessageKind::TouchStarted => "OnTouchStarted",
            MessageKind::TouchMoved => "OnTouchMoved",
            MessageKind::TouchEnded => "OnTouchEnded",
        }
    }

    pub const fn is_touch(&self) -> bool {
        matches!(
            self,
            MessageKind::TouchStarted | MessageKind::TouchMoved | MessageKind::TouchEnded
        )
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DecodeError::UnknownMessage(s.to_string()))
    }
}

/// A single input event as produced by the platform.
///
/// Touch variants carry whatever coordinate space the holder is working in:
/// pixels when delivered to a handler, normalized fractions while on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    #[serde(rename_all = "camelCase")]
    KeyChar { character: char, is_repeat: bool },
    #[serde(rename_all = "camelCase")]
    KeyDown {
        key_code: i32,
        character_code: u32,
        is_repeat: bool,
    },
    #[serde(rename_all = "camelCase")]
    KeyUp {
        key_code: i32,
        character_code: u32,
        is_repeat: bool,
    },
    #[serde(rename_all = "camelCase")]
    TouchStarted {
        location: Location,
        touch_index: i32,
        controller_id: i32,
    },
    #[serde(rename_all = "camelCase")]
    TouchMoved {
        location: Location,
        touch_index: i32,
        controller_id: i32,
    },
    #[serde(rename_all = "camelCase")]
    TouchEnded {
        location: Location,
        touch_index: i32,
        controller_id: i32,
    },
}

impl InputEvent {
    pub const fn kind(&self) -> MessageKind {
        match self {
            InputEvent::KeyChar { .. } => MessageKind::KeyChar,
            InputEvent::KeyDown { .. } => MessageKind::KeyDown,
            InputEvent::KeyUp { .. } => MessageKind::KeyUp,
            InputEvent::TouchStarted { .. } => MessageKind::TouchStarted,
            InputEvent::TouchMoved { .. } => MessageKind::TouchMoved,
            InputEvent::TouchEnded { .. } => MessageKind::TouchEnded,
        }
    }

    pub fn location(&self) -> Option<Location> {
        match self {
            InputEvent::TouchStarted { location, .. }
            | InputEvent::TouchMoved { location, .. }
            | InputEvent::TouchEnded { location, .. } => Some(*location),
            _ => None,
        }
    }

    /// Rewrite the location of a touch event; key events pass through untouched.
    pub fn map_location(self, f: impl FnOnce(Location) -> Location) -> Self {
        match self.try_map_location(|location| Ok::<_, std::convert::Infallible>(f(location))) {
            Ok(event) => event,
            Err(never) => match never {},
        }
    }

    pub fn try_map_location<E>(
        self,
        f: impl FnOnce(Location) -> Result<Location, E>,
    ) -> Result<Self, E> {
        Ok(match self {
            InputEvent::TouchStarted {
                location,
                touch_index,
                controller_id,
            } => InputEvent::TouchStarted {
                location: f(location)?,
                touch_index,
                controller_id,
            },
            InputEvent::TouchMoved {
                location,
                touch_index,
                controller_id,
            } => InputEvent::TouchMoved {
                location: f(location)?,
                touch_index,
                controller_id,
            },
            InputEvent::TouchEnded {
                location,
                touch_index,
                controller_id,
            } => InputEvent::TouchEnded {
                location: f(location)?,
                touch_index,
                controller_id,
            },
            other => other,
        })
    }
}
