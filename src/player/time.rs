use std::time::Duration;

/// Format `seconds` as `M:SS`.
///
/// Values that are not a real, non-negative time (NaN, infinities,
/// negatives) render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// [`format_time`] for an optional duration; unknown renders as `0:00`.
pub fn format_duration(d: Option<Duration>) -> String {
    d.map_or_else(|| format_time(f64::NAN), |d| format_time(d.as_secs_f64()))
}
