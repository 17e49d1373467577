use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDate};
use log::{debug, info};

use crate::alerts::{AlertEvent, AlertPrefs, OsNotification, PopupAlert};
use crate::models::{CountdownState, PrayerKey, PrayerTimeEntry};
use crate::schedule::decision::{countdown, is_within_alert_window, next_local_midnight};

/// Prayers already alerted for on one local day.
#[derive(Debug, Clone, Default)]
pub struct NotifiedSet {
    day: Option<NaiveDate>,
    keys: HashSet<PrayerKey>,
}

impl NotifiedSet {
    /// Clears the set once `now` is on a later local day than the one it was
    /// filled on. Returns whether it was cleared.
    pub fn roll_over(&mut self, now: DateTime<Local>) -> bool {
        let today = now.date_naive();
        match self.day {
            Some(day) if day == today => false,
            Some(_) => {
                self.keys.clear();
                self.day = Some(today);
                true
            }
            None => {
                self.day = Some(today);
                false
            }
        }
    }

    pub fn contains(&self, key: PrayerKey) -> bool {
        self.keys.contains(&key)
    }

    pub fn insert(&mut self, key: PrayerKey) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Foreground state machine: today's prayers plus the alerts already raised.
///
/// Callers drive it with the wall clock: [`CountdownEngine::tick`] every second,
/// [`CountdownEngine::check_notifications`] every 30 seconds and whenever the
/// prayer list or alert toggles change.
#[derive(Debug, Clone, Default)]
pub struct CountdownEngine {
    prayers: Vec<PrayerTimeEntry>,
    notified: NotifiedSet,
}

impl CountdownEngine {
    pub fn new(prayers: Vec<PrayerTimeEntry>) -> Self {
        let mut engine = Self::default();
        engine.set_prayers(prayers);
        engine
    }

    pub fn set_prayers(&mut self, mut prayers: Vec<PrayerTimeEntry>) {
        prayers.sort_by_key(|p| p.time);
        self.prayers = prayers;
    }

    pub fn prayers(&self) -> &[PrayerTimeEntry] {
        &self.prayers
    }

    pub fn notified(&self) -> &NotifiedSet {
        &self.notified
    }

    pub fn tick(&self, now: DateTime<Local>) -> Option<CountdownState> {
        countdown(&self.prayers, now)
    }

    pub fn reset_if_new_day(&mut self, now: DateTime<Local>) -> bool {
        let cleared = self.notified.roll_over(now);
        if cleared {
            info!("new day, alert history cleared");
        }
        cleared
    }

    /// When the alert history is next due to be cleared.
    pub fn next_reset_at(&self, now: DateTime<Local>) -> DateTime<Local> {
        next_local_midnight(now)
    }

    /// Alerts due at `now`. Each prayer alerts at most once per local day,
    /// whichever channels are enabled.
    pub fn check_notifications(
        &mut self,
        now: DateTime<Local>,
        prefs: &AlertPrefs,
    ) -> Vec<AlertEvent> {
        self.reset_if_new_day(now);

        let mut events = Vec::new();
        for prayer in &self.prayers {
            if !is_within_alert_window(prayer.time, now) || self.notified.contains(prayer.key) {
                continue;
            }
            self.notified.insert(prayer.key);
            debug!("{} reached at {}", prayer.name, prayer.time);

            if prefs.popup {
                events.push(AlertEvent::Popup(PopupAlert {
                    prayer: prayer.clone(),
                    duration_minutes: prefs.popup_duration_minutes,
                    raised_at: now,
                }));
                events.push(AlertEvent::Chime);
            }
            if prefs.os {
                events.push(AlertEvent::Os(OsNotification::prayer_time(prayer)));
            }
        }
        events
    }
}
