//! Pure decisions shared by the foreground engine and the background scheduler.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Timelike};

use crate::models::{CountdownState, PrayerKey, PrayerTimeEntry};

/// How long after a prayer's instant a poll may still alert for it. Twice the
/// 30 s foreground poll, so no prayer falls between two polls.
pub const ALERT_WINDOW_SECS: i64 = 60;

/// The reschedule wake-up lands a minute after midnight.
pub const RESCHEDULE_AFTER_MIDNIGHT_MINS: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextPrayer {
    pub target: DateTime<Local>,
    pub label: String,
    pub target_prayer: String,
}

pub fn countdown_label(entry: &PrayerTimeEntry) -> String {
    match entry.key {
        PrayerKey::Fajr => "Until Suhoor Ends".to_string(),
        PrayerKey::Maghrib => "Until Iftar".to_string(),
        _ => format!("Until {}", entry.name),
    }
}

/// The first prayer strictly after `now`, or tomorrow's Fajr at today's
/// time-of-day once every prayer has passed.
pub fn select_next_prayer(prayers: &[PrayerTimeEntry], now: DateTime<Local>) -> Option<NextPrayer> {
    if let Some(next) = prayers.iter().find(|p| p.time > now) {
        return Some(NextPrayer {
            target: next.time,
            label: countdown_label(next),
            target_prayer: next.name.clone(),
        });
    }

    let fajr = prayers.iter().find(|p| p.key == PrayerKey::Fajr)?;
    let tomorrow = now.date_naive().succ_opt()?;
    let time_of_day = NaiveTime::from_hms_opt(fajr.time.hour(), fajr.time.minute(), 0)?;
    let target = local_instant(tomorrow, time_of_day).unwrap_or(fajr.time + Duration::days(1));

    Some(NextPrayer {
        target,
        label: "Until Suhoor Ends".to_string(),
        target_prayer: PrayerKey::Fajr.display_name().to_string(),
    })
}

/// Countdown for this tick. `None` means "leave the previous state alone":
/// no prayers, or the target is not in the future.
pub fn countdown(prayers: &[PrayerTimeEntry], now: DateTime<Local>) -> Option<CountdownState> {
    let next = select_next_prayer(prayers, now)?;
    let diff_ms = (next.target - now).num_milliseconds();
    if diff_ms <= 0 {
        return None;
    }
    Some(CountdownState::from_total_seconds(
        (diff_ms / 1000) as u64,
        next.label,
        next.target_prayer,
    ))
}

/// `now ∈ [time, time + 60s)`
pub fn is_within_alert_window(time: DateTime<Local>, now: DateTime<Local>) -> bool {
    now >= time && now < time + Duration::seconds(ALERT_WINDOW_SECS)
}

/// First instant of the next local day.
pub fn next_local_midnight<Tz: TimeZone>(now: DateTime<Tz>) -> DateTime<Tz> {
    next_day_at(now, NaiveTime::default())
}

/// When the background scheduler re-runs for the new day: 00:01 tomorrow,
/// or the first minute after a DST gap that swallows it.
pub fn daily_reschedule_at<Tz: TimeZone>(now: DateTime<Tz>) -> DateTime<Tz> {
    let at = NaiveTime::from_hms_opt(0, RESCHEDULE_AFTER_MIDNIGHT_MINS, 0).unwrap_or_default();
    next_day_at(now, at)
}

fn next_day_at<Tz: TimeZone>(now: DateTime<Tz>, time: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    now.date_naive()
        .succ_opt()
        .and_then(|tomorrow| resolve_local(&tz, tomorrow, time))
        .unwrap_or_else(|| now + Duration::days(1))
}

/// Longest DST gap stepped over when resolving a wall-clock time.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Resolves a wall-clock time in `tz`. Ambiguous times take the earlier
/// instant; a time skipped by a DST jump moves to the first valid minute
/// after the gap.
pub fn resolve_local<Tz: TimeZone>(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Tz>> {
    let wall = date.and_time(time);
    (0..=MAX_GAP_MINUTES)
        .find_map(|step| tz.from_local_datetime(&(wall + Duration::minutes(step))).earliest())
}

pub fn local_instant(date: NaiveDate, time: NaiveTime) -> Option<DateTime<Local>> {
    resolve_local(&Local, date, time)
}
