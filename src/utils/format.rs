use chrono::{DateTime, Local};

/// Format an instant as "h:mm AM"
pub fn format_time(t: DateTime<Local>) -> String {
    t.format("%-I:%M %p").to_string()
}

/// Format a minute offset as "+2m" / "-5m"; empty when zero
pub fn format_offset(minutes: i32) -> String {
    if minutes == 0 {
        String::new()
    } else {
        format!("{:+}m", minutes)
    }
}

/// Remaining popup time: whole minutes (rounded up) above a minute, seconds below
pub fn format_remaining(secs: i64) -> String {
    if secs >= 60 {
        format!("{}m", (secs + 59) / 60)
    } else {
        format!("{}s", secs.max(0))
    }
}

/// Format a duration in seconds to "Xh Ym" or "Ym" string
pub fn format_duration_secs(secs: i64) -> String {
    if secs <= 0 {
        return "now".to_string();
    }
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
