//! Background alarm loop: OS notifications with no dashboard open.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use log::info;

use crate::alerts::{OsNotifier, notify_in_background};
use crate::config::SettingsStore;
use crate::prayer_times::PrayerTimeProvider;
use crate::schedule::{AlarmScheduler, FiredAction, WakeupTable};

/// Longest single sleep. Wake-ups are wall-clock instants, so after a
/// suspend the loop must look at the clock again rather than trust a timer.
const MAX_SLEEP: Duration = Duration::from_secs(60);

/// How often the store is asked to pick up edits made by other processes.
const SETTINGS_POLL: Duration = Duration::from_secs(5);

/// Wall-clock source for the loop.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

pub struct Daemon {
    store: Arc<dyn SettingsStore>,
    scheduler: AlarmScheduler,
    notifier: Arc<dyn OsNotifier>,
    clock: Arc<dyn Clock>,
}

impl Daemon {
    pub fn new(
        store: Arc<dyn SettingsStore>,
        provider: Arc<dyn PrayerTimeProvider>,
        notifier: Arc<dyn OsNotifier>,
    ) -> Self {
        Self {
            scheduler: AlarmScheduler::new(store.clone(), provider),
            store,
            notifier,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Runs until `shutdown` resolves.
    pub async fn run(self, shutdown: impl Future<Output = ()>) {
        let mut wakeups = WakeupTable::new();
        let mut changes = self.store.subscribe();
        changes.borrow_and_update();

        self.scheduler
            .schedule_prayer_alarms(self.clock.now(), &mut wakeups)
            .await;

        let mut poll = tokio::time::interval(SETTINGS_POLL);
        tokio::pin!(shutdown);

        loop {
            let sleep_for = wakeups
                .next_due()
                .map(|when| (when - self.clock.now()).to_std().unwrap_or(Duration::ZERO))
                .unwrap_or(MAX_SLEEP)
                .min(MAX_SLEEP);

            tokio::select! {
                _ = tokio::time::sleep(sleep_for) => {
                    for id in wakeups.take_due(self.clock.now()) {
                        info!("wake-up {} fired", id);
                        match AlarmScheduler::on_wakeup_fired(id) {
                            FiredAction::Reschedule => {
                                self.scheduler
                                    .schedule_prayer_alarms(self.clock.now(), &mut wakeups)
                                    .await;
                            }
                            FiredAction::Notify(notification) => {
                                notify_in_background(self.notifier.clone(), notification).await;
                            }
                        }
                    }
                }
                Ok(()) = changes.changed() => {
                    info!("settings changed, rescheduling");
                    self.scheduler
                        .schedule_prayer_alarms(self.clock.now(), &mut wakeups)
                        .await;
                }
                _ = poll.tick() => {
                    self.store.refresh().await;
                }
                _ = &mut shutdown => {
                    info!("shutting down; {} wake-up(s) dropped", wakeups.len());
                    break;
                }
            }
        }
    }
}
