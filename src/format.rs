//! Time formatting shared by the transport bar and the track lists.
//!
//! Both helpers render `M:SS`: minutes without padding, seconds padded to two
//! digits, fractional seconds truncated.

/// Format a playback position in seconds as `M:SS`.
///
/// Negative, NaN and infinite inputs render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Format a catalog duration in milliseconds as `M:SS`.
pub fn format_duration(millis: u64) -> String {
    let minutes = millis / 60_000;
    let seconds = (millis % 60_000) / 1_000;
    format!("{}:{:02}", minutes, seconds)
}
