//! Countdown display model: the `HH:MM:SS` text and the warning color ramp

use serde::{Serialize, Serializer};

/// Remaining seconds at which the display starts shifting toward alarm red.
pub const WARNING_THRESHOLD_SECONDS: u64 = 20;

/// RGB color of the countdown display, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Resting display color.
pub const NEUTRAL: Color = Color { r: 0, g: 0, b: 0 };
/// Full-alarm color shown at expiry and during the blink alert.
pub const ALARM: Color = Color { r: 255, g: 0, b: 0 };

impl Color {
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Color for a given remaining time: neutral above the warning threshold,
/// then a linear ramp that reaches full alarm red exactly at zero.
pub fn warning_ramp(remaining_seconds: u64) -> Color {
    if remaining_seconds >= WARNING_THRESHOLD_SECONDS {
        return NEUTRAL;
    }
    let t = (WARNING_THRESHOLD_SECONDS - remaining_seconds) as f32
        / WARNING_THRESHOLD_SECONDS as f32;
    lerp(NEUTRAL, ALARM, t)
}

fn lerp(from: Color, to: Color, t: f32) -> Color {
    let channel = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
    Color {
        r: channel(from.r, to.r),
        g: channel(from.g, to.g),
        b: channel(from.b, to.b),
    }
}

/// Format a duration in seconds as zero-padded `HH:MM:SS`.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// What the front end should render: formatted text plus its color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    pub text: String,
    pub color: Color,
}

impl DisplayState {
    /// Display for an active countdown at `remaining_seconds`.
    pub fn counting(remaining_seconds: u64) -> Self {
        Self {
            text: format_hms(remaining_seconds),
            color: warning_ramp(remaining_seconds),
        }
    }

    /// Zeroed display in the given color, used at expiry and after reset.
    pub fn zero(color: Color) -> Self {
        Self {
            text: format_hms(0),
            color,
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::zero(NEUTRAL)
    }
}
