//! Coordinate normalization
//!
//! Touches travel as fractions of the sender's reference frame so that the
//! receiver can re-expand them against a viewport of a different size.

use crate::error::NormalizeError;
use crate::input::types::{Location, NormalizedLocation, ScreenFrame};

/// Express `location` as a fraction of `frame`.
///
/// Locations outside the frame are not clamped and map outside `[0, 1]`.
pub fn normalize(location: Location, frame: &ScreenFrame) -> Result<NormalizedLocation, NormalizeError> {
    if !frame.size.has_area() {
        return Err(NormalizeError::DegenerateFrame {
            width: frame.size.width,
            height: frame.size.height,
        });
    }

    Ok(NormalizedLocation::new(
        (location.x - frame.origin.x) / frame.size.width,
        (location.y - frame.origin.y) / frame.size.height,
    ))
}

/// Re-expand a normalized location against `frame`.
pub fn denormalize(normalized: NormalizedLocation, frame: &ScreenFrame) -> Location {
    Location::new(
        frame.origin.x + normalized.x * frame.size.width,
        frame.origin.y + normalized.y * frame.size.height,
    )
}
