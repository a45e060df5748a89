//! Input events and their wire form
//!
//! Event types, the fixed-width codec used on the wire, and the coordinate
//! normalization that lets touches replay across differently sized windows.

pub mod codec;
pub mod normalize;
pub mod types;

pub use codec::{decode, decode_kind, encode, payload_len};
pub use normalize::{denormalize, normalize};
pub use types::{InputEvent, Location, MessageKind, NormalizedLocation, ScreenFrame, Size};
