//! Human-readable sizes and durations for chat messages.

use std::time::Duration;

const SIZE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Format a byte count with 1024-based units, rounded to two decimals.
///
/// Whole values keep one decimal (`2.0GB`); counts below 1 KB stay integral.
#[allow(clippy::cast_precision_loss)]
pub fn readable_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes}B");
    }

    let mut value = bytes as f64;
    let mut index = 0;
    while value >= 1024.0 {
        value /= 1024.0;
        index += 1;
    }

    let Some(unit) = SIZE_UNITS.get(index) else {
        return "File too large".to_string();
    };

    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.1}{unit}")
    } else {
        format!("{rounded}{unit}")
    }
}

/// Format a duration as `1d2h3m4s`, omitting leading zero units.
pub fn readable_time(duration: Duration) -> String {
    let mut secs = duration.as_secs();
    let mut out = String::new();

    for (unit_secs, suffix) in [(86_400, 'd'), (3_600, 'h'), (60, 'm')] {
        let count = secs / unit_secs;
        if count > 0 {
            out.push_str(&count.to_string());
            out.push(suffix);
            secs %= unit_secs;
        }
    }
    out.push_str(&secs.to_string());
    out.push('s');
    out
}
