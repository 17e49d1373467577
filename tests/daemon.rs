mod common;

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate};
use tokio::sync::oneshot;

use common::{FixedProvider, MemoryStore, RecordingNotifier, TokioClock, at, london, on};
use ramadan_time::config::{Settings, update_settings};
use ramadan_time::daemon::{Clock, Daemon};

async fn sleep_until(clock: &TokioClock, when: DateTime<Local>) {
    let wait = (when - clock.now()).to_std().unwrap();
    tokio::time::sleep(wait).await;
}

#[tokio::test(start_paused = true)]
async fn daemon_notifies_reschedules_and_follows_settings() {
    let store = Arc::new(MemoryStore::new(london()));
    let provider = Arc::new(FixedProvider::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let clock = Arc::new(TokioClock::starting_at(at(11, 0, 0)));

    let daemon = Daemon::new(store.clone(), provider.clone(), notifier.clone())
        .with_clock(clock.clone());
    let (stop, stopped) = oneshot::channel::<()>();
    let handle = tokio::spawn(daemon.run(async {
        stopped.await.ok();
    }));

    // Dhuhr at 12:15 reaches the notifier
    sleep_until(&clock, at(13, 0, 0)).await;
    assert_eq!(notifier.titles(), vec!["🕌 Dhuhr Time"]);

    // Turning alarms off clears the table, so Asr at 15:30 stays silent
    update_settings(store.as_ref(), |s| s.notifications = false)
        .await
        .unwrap();
    sleep_until(&clock, at(16, 0, 0)).await;
    assert_eq!(notifier.titles(), vec!["🕌 Dhuhr Time"]);

    // Back on: the rest of today, then the 00:01 pass builds tomorrow's table
    update_settings(store.as_ref(), |s| s.notifications = true)
        .await
        .unwrap();
    let tomorrow = NaiveDate::from_ymd_opt(2026, 2, 21).unwrap();
    sleep_until(&clock, on(tomorrow, 5, 10)).await;

    stop.send(()).unwrap();
    handle.await.unwrap();

    assert_eq!(
        notifier.titles(),
        vec![
            "🕌 Dhuhr Time",
            "🕌 Maghrib Time",
            "🕌 Isha Time",
            "🕌 Fajr Time",
        ]
    );
    // Start, re-enable and the daily pass each compute one day
    assert_eq!(provider.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn daemon_without_a_location_stays_idle_until_shutdown() {
    let store = Arc::new(MemoryStore::new(Settings::default()));
    let provider = Arc::new(FixedProvider::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let clock = Arc::new(TokioClock::starting_at(at(4, 0, 0)));

    let daemon = Daemon::new(store, provider.clone(), notifier.clone()).with_clock(clock.clone());
    let (stop, stopped) = oneshot::channel::<()>();
    let handle = tokio::spawn(daemon.run(async {
        stopped.await.ok();
    }));

    sleep_until(&clock, at(23, 0, 0)).await;
    stop.send(()).unwrap();
    handle.await.unwrap();

    assert!(notifier.titles().is_empty());
    assert_eq!(provider.calls(), 0);
}
