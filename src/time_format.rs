//! `M:SS` formatting for elapsed/total playback time.

use std::time::Duration;

/// Format `seconds` as `M:SS`.
///
/// Fractions are truncated, minutes are never padded and never roll over
/// into hours. NaN and negative inputs come out as `0:00` because the
/// float-to-int cast saturates.
pub fn format_time(seconds: f64) -> String {
    let whole = seconds as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Same as [`format_time`] for a `Duration`.
pub fn format_duration(d: Duration) -> String {
    format_time(d.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(3725.0), "62:05");
    }

    #[test]
    fn truncates_instead_of_rounding() {
        assert_eq!(format_time(59.99), "0:59");
        assert_eq!(format_duration(Duration::from_millis(61_900)), "1:01");
    }

    #[test]
    fn nan_and_negative_collapse_to_zero() {
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(-12.0), "0:00");
    }
}
