use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Local};
use log::{debug, info};

use crate::alerts::OsNotification;
use crate::config::SettingsStore;
use crate::models::PrayerKey;
use crate::prayer_times::{PrayerTimeProvider, prayer_entries};
use crate::schedule::decision::daily_reschedule_at;

/// Name of a platform wake-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WakeupId {
    Prayer(PrayerKey),
    DailyReschedule,
}

impl std::fmt::Display for WakeupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WakeupId::Prayer(key) => write!(f, "prayer-{}", key.as_str()),
            WakeupId::DailyReschedule => f.write_str("daily-reschedule"),
        }
    }
}

impl FromStr for WakeupId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "daily-reschedule" {
            return Ok(WakeupId::DailyReschedule);
        }
        match s.strip_prefix("prayer-") {
            Some(key) => Ok(WakeupId::Prayer(key.parse()?)),
            None => Err(anyhow::anyhow!("Unknown wake-up: {}", s)),
        }
    }
}

/// Platform service that owns one-shot timers.
pub trait WakeupRegistrar: Send {
    fn create(&mut self, id: WakeupId, when: DateTime<Local>);
    fn clear_all(&mut self);
}

/// In-process wake-up table; the daemon sleeps until its earliest entry.
#[derive(Debug, Clone, Default)]
pub struct WakeupTable {
    entries: BTreeMap<WakeupId, DateTime<Local>>,
}

impl WakeupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: WakeupId) -> Option<DateTime<Local>> {
        self.entries.get(&id).copied()
    }

    /// Pending wake-ups, soonest first.
    pub fn pending(&self) -> Vec<(WakeupId, DateTime<Local>)> {
        let mut pending: Vec<_> = self.entries.iter().map(|(id, when)| (*id, *when)).collect();
        pending.sort_by_key(|(_, when)| *when);
        pending
    }

    pub fn next_due(&self) -> Option<DateTime<Local>> {
        self.entries.values().min().copied()
    }

    /// Removes and returns every wake-up due at `now`, soonest first. A taken
    /// wake-up is gone for good; only a scheduling pass creates it again.
    pub fn take_due(&mut self, now: DateTime<Local>) -> Vec<WakeupId> {
        let mut due: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, when)| **when <= now)
            .map(|(id, when)| (*id, *when))
            .collect();
        due.sort_by_key(|(_, when)| *when);
        for (id, _) in &due {
            self.entries.remove(id);
        }
        due.into_iter().map(|(id, _)| id).collect()
    }
}

impl WakeupRegistrar for WakeupTable {
    fn create(&mut self, id: WakeupId, when: DateTime<Local>) {
        self.entries.insert(id, when);
    }

    fn clear_all(&mut self) {
        self.entries.clear();
    }
}

/// Result of one scheduling pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulePass {
    /// No location or notifications off; nothing registered.
    Disabled,
    Scheduled {
        prayers: Vec<PrayerKey>,
        reschedule_at: DateTime<Local>,
    },
}

/// What to do when a wake-up elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FiredAction {
    Reschedule,
    Notify(OsNotification),
}

/// Background state machine. It keeps no state of its own between passes:
/// the registrar's table is the only record of what is still due.
pub struct AlarmScheduler {
    store: Arc<dyn SettingsStore>,
    provider: Arc<dyn PrayerTimeProvider>,
}

impl AlarmScheduler {
    pub fn new(store: Arc<dyn SettingsStore>, provider: Arc<dyn PrayerTimeProvider>) -> Self {
        Self { store, provider }
    }

    /// Replaces every registered wake-up with today's remaining prayers plus
    /// the 00:01 reschedule. All awaiting happens before the table is touched,
    /// so the clear-then-create is never observed half done.
    pub async fn schedule_prayer_alarms(
        &self,
        now: DateTime<Local>,
        registrar: &mut dyn WakeupRegistrar,
    ) -> SchedulePass {
        let settings = self.store.get().await;

        if !settings.has_location() || !settings.notifications {
            debug!(
                "alarms disabled (location set: {}, notifications: {})",
                settings.has_location(),
                settings.notifications
            );
            registrar.clear_all();
            return SchedulePass::Disabled;
        }

        let today = now.date_naive();
        let entries =
            prayer_entries(self.provider.as_ref(), &settings, today, &PrayerKey::ALERTING).await;

        registrar.clear_all();
        let mut prayers = Vec::new();
        for entry in entries.iter().filter(|e| e.time > now) {
            registrar.create(WakeupId::Prayer(entry.key), entry.time);
            prayers.push(entry.key);
        }
        let reschedule_at = daily_reschedule_at(now);
        registrar.create(WakeupId::DailyReschedule, reschedule_at);

        info!(
            "scheduled {} prayer alarm(s) for {}, next resync at {}",
            prayers.len(),
            today,
            reschedule_at.format("%Y-%m-%d %H:%M")
        );
        SchedulePass::Scheduled {
            prayers,
            reschedule_at,
        }
    }

    pub fn on_wakeup_fired(id: WakeupId) -> FiredAction {
        match id {
            WakeupId::DailyReschedule => FiredAction::Reschedule,
            WakeupId::Prayer(key) => FiredAction::Notify(OsNotification::wakeup(key)),
        }
    }
}
