mod common;

use chrono::Duration;
use common::{FixedProvider, at, london};
use ramadan_time::alerts::{AlertEvent, AlertPrefs};
use ramadan_time::models::PrayerKey;
use ramadan_time::prayer_times::prayer_entries;
use ramadan_time::schedule::CountdownEngine;

fn popup_only() -> AlertPrefs {
    AlertPrefs {
        popup: true,
        os: false,
        popup_duration_minutes: 15,
    }
}

async fn london_engine(fajr_adjustment: i32) -> CountdownEngine {
    let mut settings = london();
    settings.adjustments.set(PrayerKey::Fajr, fajr_adjustment);
    let prayers =
        prayer_entries(&FixedProvider::default(), &settings, at(0, 0, 0).date_naive(), &PrayerKey::ALL)
            .await;
    CountdownEngine::new(prayers)
}

#[tokio::test]
async fn adjusted_fajr_drives_both_countdown_and_alert() {
    let mut engine = london_engine(2).await;

    let fajr = &engine.prayers()[0];
    assert_eq!(fajr.key, PrayerKey::Fajr);
    assert_eq!(fajr.time, at(5, 2, 0));

    let state = engine.tick(at(5, 1, 0)).unwrap();
    assert_eq!(state.target_prayer, "Fajr");
    assert_eq!(state.label, "Until Suhoor Ends");
    assert_eq!(state.to_string(), "00:01:00");

    assert!(engine.check_notifications(at(5, 1, 30), &popup_only()).is_empty());

    let events = engine.check_notifications(at(5, 2, 30), &popup_only());
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], AlertEvent::Popup(p) if p.prayer.key == PrayerKey::Fajr));
    assert_eq!(events[1], AlertEvent::Chime);
}

#[tokio::test]
async fn the_alert_window_closes_after_a_minute() {
    let mut engine = london_engine(0).await;

    assert!(engine.check_notifications(at(12, 16, 0), &popup_only()).is_empty());
    assert!(!engine.notified().contains(PrayerKey::Dhuhr));
}

#[tokio::test]
async fn repeated_checks_alert_once() {
    let mut engine = london_engine(0).await;
    let prefs = AlertPrefs {
        popup: true,
        os: true,
        popup_duration_minutes: 5,
    };

    let first = engine.check_notifications(at(18, 5, 0), &prefs);
    assert_eq!(first.len(), 3);
    assert!(engine.check_notifications(at(18, 5, 0), &prefs).is_empty());
    assert!(engine.check_notifications(at(18, 5, 30), &prefs).is_empty());
}

#[tokio::test]
async fn after_isha_counts_down_to_tomorrows_fajr() {
    let engine = london_engine(0).await;

    let state = engine.tick(at(22, 0, 0)).unwrap();
    assert_eq!(state.target_prayer, "Fajr");
    assert_eq!(state.to_string(), "07:00:00");
}

#[tokio::test]
async fn midnight_clears_the_alert_history() {
    let mut engine = london_engine(0).await;
    engine.check_notifications(at(19, 30, 10), &popup_only());
    assert!(engine.notified().contains(PrayerKey::Isha));

    let tomorrow = at(0, 0, 5) + Duration::days(1);
    assert_eq!(engine.next_reset_at(at(19, 30, 10)), at(0, 0, 0) + Duration::days(1));
    assert!(engine.reset_if_new_day(tomorrow));
    assert!(engine.notified().is_empty());

    let next_day_prayers = prayer_entries(
        &FixedProvider::default(),
        &london(),
        tomorrow.date_naive(),
        &PrayerKey::ALL,
    )
    .await;
    engine.set_prayers(next_day_prayers);
    let events = engine.check_notifications(at(19, 30, 10) + Duration::days(1), &popup_only());
    assert_eq!(events.len(), 2);
}

#[tokio::test]
async fn provider_failure_leaves_no_countdown() {
    let prayers = prayer_entries(
        &FixedProvider::failing(),
        &london(),
        at(0, 0, 0).date_naive(),
        &PrayerKey::ALL,
    )
    .await;
    let engine = CountdownEngine::new(prayers);

    assert!(engine.prayers().is_empty());
    assert!(engine.tick(at(9, 0, 0)).is_none());
}
