use chrono::{DateTime, Utc};

use study_core::timer::format_clock;

#[must_use]
pub fn format_started_at(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Countdown label for the quiz footer.
#[must_use]
pub fn format_remaining(secs: u32) -> String {
    format!("Time: {}", format_clock(secs))
}

/// "1m 05s" style duration for reports.
#[must_use]
pub fn format_elapsed(secs: u32) -> String {
    let minutes = secs / 60;
    let seconds = secs % 60;
    if minutes == 0 {
        format!("{seconds}s")
    } else {
        format!("{minutes}m {seconds:02}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::time::fixed_now;

    #[test]
    fn formats_labels() {
        assert_eq!(format_remaining(65), "Time: 1:05");
        assert_eq!(format_elapsed(42), "42s");
        assert_eq!(format_elapsed(125), "2m 05s");
        assert_eq!(format_started_at(fixed_now()), "2023-11-14 22:13 UTC");
    }
}
