//! Hand angles for the steampunk face.
//!
//! The artwork is drawn with its hands pointing left and the dial itself is slightly skewed, so
//! every hand carries a fixed phase shift and a small degree offset. The offsets are part of
//! the look and are kept as-is.

use chrono::Timelike;

use crate::foundation::time::TimeInstant;

/// Hour hand angle in radians.
///
/// `((hour + 6) mod 12) * 30° - 10°`, plus 0.5° per elapsed minute.
pub fn hour_angle(hour: u32, minute: u32) -> f64 {
    let fh = f64::from((hour + 6) % 12);
    let fm = f64::from(minute % 60);
    ((fh * 30.0 - 10.0) + fm * 0.5).to_radians()
}

/// Minute hand angle in radians.
///
/// `((minute + 28) mod 60) * 6° + 2°`, plus 0.1° per elapsed second.
pub fn minute_angle(minute: u32, second: u32) -> f64 {
    let fm = f64::from((minute + 28) % 60);
    let fs = f64::from(second % 60);
    ((fm * 6.0 + 2.0) + fs * 0.1).to_radians()
}

/// Second hand angle in radians: `((second + 30) mod 60) * 6° - 10°`.
pub fn second_angle(second: u32) -> f64 {
    let fs = f64::from((second + 30) % 60);
    (fs * 6.0 - 10.0).to_radians()
}

/// All three hand angles for one instant, in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

impl HandAngles {
    pub fn from_components(hour: u32, minute: u32, second: u32) -> Self {
        Self {
            hour: hour_angle(hour, minute),
            minute: minute_angle(minute, second),
            second: second_angle(second),
        }
    }

    pub fn at(instant: &TimeInstant) -> Self {
        // Leap seconds surface as second == 59 with an oversized nanosecond field, so the
        // component is already in range.
        Self::from_components(instant.hour(), instant.minute(), instant.second())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/angle/hands.rs"]
mod tests;
