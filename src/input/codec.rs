//! Wire codec for input events
//!
//! Every payload is a fixed-width little-endian record whose field order
//! matches the event's declaration order:
//!
//! | message          | layout                                          | bytes |
//! |------------------|-------------------------------------------------|-------|
//! | `OnKeyChar`      | `u32 character, u8 is_repeat`                   | 5     |
//! | `OnKeyDown/Up`   | `i32 key_code, u32 character_code, u8 is_repeat`| 9     |
//! | `OnTouch*`       | `f32 x, f32 y, i32 touch_index, i32 controller` | 16    |
//!
//! Touch coordinates are written as given. Handlers normalize before
//! encoding and denormalize after decoding.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::DecodeError;
use crate::input::types::{InputEvent, Location, MessageKind};

/// Size in bytes of the payload for a message kind
pub const fn payload_len(kind: MessageKind) -> usize {
    match kind {
        MessageKind::KeyChar => 4 + 1,
        MessageKind::KeyDown | MessageKind::KeyUp => 4 + 4 + 1,
        MessageKind::TouchStarted | MessageKind::TouchMoved | MessageKind::TouchEnded => 4 * 4,
    }
}

/// Encode an event into its wire payload.
pub fn encode(event: &InputEvent) -> Bytes {
    let mut buf = BytesMut::with_capacity(payload_len(event.kind()));

    match *event {
        InputEvent::KeyChar {
            character,
            is_repeat,
        } => {
            buf.put_u32_le(character as u32);
            put_bool(&mut buf, is_repeat);
        }
        InputEvent::KeyDown {
            key_code,
            character_code,
            is_repeat,
        }
        | InputEvent::KeyUp {
            key_code,
            character_code,
            is_repeat,
        } => {
            buf.put_i32_le(key_code);
            buf.put_u32_le(character_code);
            put_bool(&mut buf, is_repeat);
        }
        InputEvent::TouchStarted {
            location,
            touch_index,
            controller_id,
        }
        | InputEvent::TouchMoved {
            location,
            touch_index,
            controller_id,
        }
        | InputEvent::TouchEnded {
            location,
            touch_index,
            controller_id,
        } => {
            buf.put_f32_le(location.x);
            buf.put_f32_le(location.y);
            buf.put_i32_le(touch_index);
            buf.put_i32_le(controller_id);
        }
    }

    buf.freeze()
}

/// Decode the payload of the message called `name`.
pub fn decode(name: &str, payload: &[u8]) -> Result<InputEvent, DecodeError> {
    decode_kind(name.parse()?, payload)
}

/// Decode a payload whose kind is already known.
pub fn decode_kind(kind: MessageKind, payload: &[u8]) -> Result<InputEvent, DecodeError> {
    let mut reader = PayloadReader {
        message: kind.as_str(),
        buf: payload,
    };

    let event = match kind {
        MessageKind::KeyChar => {
            let code = reader.u32()?;
            let character = char::from_u32(code).ok_or(DecodeError::InvalidCharacter(code))?;
            InputEvent::KeyChar {
                character,
                is_repeat: reader.bool()?,
            }
        }
        MessageKind::KeyDown => InputEvent::KeyDown {
            key_code: reader.i32()?,
            character_code: reader.u32()?,
            is_repeat: reader.bool()?,
        },
        MessageKind::KeyUp => InputEvent::KeyUp {
            key_code: reader.i32()?,
            character_code: reader.u32()?,
            is_repeat: reader.bool()?,
        },
        MessageKind::TouchStarted => InputEvent::TouchStarted {
            location: reader.location()?,
            touch_index: reader.i32()?,
            controller_id: reader.i32()?,
        },
        MessageKind::TouchMoved => InputEvent::TouchMoved {
            location: reader.location()?,
            touch_index: reader.i32()?,
            controller_id: reader.i32()?,
        },
        MessageKind::TouchEnded => InputEvent::TouchEnded {
            location: reader.location()?,
            touch_index: reader.i32()?,
            controller_id: reader.i32()?,
        },
    };

    reader.finish()?;
    Ok(event)
}

fn put_bool(buf: &mut BytesMut, value: bool) {
    buf.put_u8(u8::from(value));
}

struct PayloadReader<'a> {
    message: &'static str,
    buf: &'a [u8],
}

impl PayloadReader<'_> {
    fn need(&self, needed: usize) -> Result<(), DecodeError> {
        if self.buf.remaining() < needed {
            return Err(DecodeError::Truncated {
                message: self.message,
                needed,
                remaining: self.buf.remaining(),
            });
        }
        Ok(())
    }

    fn u32(&mut self) -> Result<u32, DecodeError> {
        self.need(4)?;
        Ok(self.buf.get_u32_le())
    }

    fn i32(&mut self) -> Result<i32, DecodeError> {
        self.need(4)?;
        Ok(self.buf.get_i32_le())
    }

    fn f32(&mut self) -> Result<f32, DecodeError> {
        self.need(4)?;
        Ok(self.buf.get_f32_le())
    }

    fn bool(&mut self) -> Result<bool, DecodeError> {
        self.need(1)?;
        match self.buf.get_u8() {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DecodeError::InvalidBool(other)),
        }
    }

    fn location(&mut self) -> Result<Location, DecodeError> {
        Ok(Location::new(self.f32()?, self.f32()?))
    }

    fn finish(self) -> Result<(), DecodeError> {
        if self.buf.has_remaining() {
            return Err(DecodeError::TrailingBytes {
                message: self.message,
                extra: self.buf.remaining(),
            });
        }
        Ok(())
    }
}
