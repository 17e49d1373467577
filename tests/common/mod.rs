#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use tokio::sync::watch;

use ramadan_time::alerts::{OsNotification, OsNotifier};
use ramadan_time::config::{Settings, SettingsStore};
use ramadan_time::daemon::Clock;
use ramadan_time::error::{AlertError, ProviderError, StoreError};
use ramadan_time::models::{CalculationMethod, Madhab};
use ramadan_time::prayer_times::{DailyTimes, PrayerTimeProvider};

pub const DAY: (i32, u32, u32) = (2026, 2, 20);

pub fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(DAY.0, DAY.1, DAY.2, h, m, s).unwrap()
}

pub fn on(date: NaiveDate, h: u32, m: u32) -> DateTime<Local> {
    Local
        .from_local_datetime(&date.and_hms_opt(h, m, 0).unwrap())
        .earliest()
        .unwrap()
}

/// London with background alarms on, as saved by onboarding.
pub fn london() -> Settings {
    let mut settings = Settings::default();
    settings.location_name = "London".to_string();
    settings.latitude = 51.5;
    settings.longitude = -0.12;
    settings
}

/// In-memory store that publishes saves like the file store does.
pub struct MemoryStore {
    settings: Mutex<Settings>,
    tx: watch::Sender<Settings>,
    pub broken: bool,
}

impl MemoryStore {
    pub fn new(settings: Settings) -> Self {
        let (tx, _rx) = watch::channel(settings.clone());
        Self {
            settings: Mutex::new(settings),
            tx,
            broken: false,
        }
    }

    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::new(london())
        }
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn load(&self) -> Result<Settings, StoreError> {
        if self.broken {
            return Err(StoreError::NoConfigDir);
        }
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        *self.settings.lock().unwrap() = settings.clone();
        self.tx.send_replace(settings.clone());
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }
}

/// Same wall-clock times every day: 05:00, 06:30, 12:15, 15:30, 18:05, 19:30.
#[derive(Default)]
pub struct FixedProvider {
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FixedProvider {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PrayerTimeProvider for FixedProvider {
    async fn compute(
        &self,
        _latitude: f64,
        _longitude: f64,
        _method: CalculationMethod,
        _madhab: Madhab,
        date: NaiveDate,
    ) -> Result<DailyTimes, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::Calculation("polar night".to_string()));
        }
        Ok(DailyTimes {
            fajr: on(date, 5, 0),
            sunrise: on(date, 6, 30),
            dhuhr: on(date, 12, 15),
            asr: on(date, 15, 30),
            maghrib: on(date, 18, 5),
            isha: on(date, 19, 30),
        })
    }
}

/// Local time that moves with tokio's clock, so paused tests can jump hours.
pub struct TokioClock {
    base: DateTime<Local>,
    start: tokio::time::Instant,
}

impl TokioClock {
    pub fn starting_at(base: DateTime<Local>) -> Self {
        Self {
            base,
            start: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Local> {
        let elapsed = tokio::time::Instant::now() - self.start;
        self.base + chrono::Duration::from_std(elapsed).unwrap()
    }
}

/// Keeps the title of every notification it is handed.
#[derive(Default)]
pub struct RecordingNotifier {
    pub titles: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn titles(&self) -> Vec<String> {
        self.titles.lock().unwrap().clone()
    }
}

impl OsNotifier for RecordingNotifier {
    fn notify(&self, notification: &OsNotification) -> Result<(), AlertError> {
        self.titles.lock().unwrap().push(notification.title.clone());
        Ok(())
    }
}
