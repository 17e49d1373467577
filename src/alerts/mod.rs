//! Alert payloads and the surfaces they are delivered to.
//!
//! The scheduling code only produces [`AlertEvent`]s; [`dispatch`] hands them
//! to whatever surfaces the running context injected. A failing surface is
//! logged and skipped so the other channel still fires.

pub mod desktop;

use std::sync::Arc;

use chrono::{DateTime, Local};
use log::{debug, warn};

use crate::config::Settings;
use crate::error::AlertError;
use crate::models::{PrayerKey, PrayerTimeEntry};
use crate::utils::format::format_time;

pub use desktop::{DesktopNotifier, TerminalBell};

/// The foreground alert toggles, snapshotted from [`Settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertPrefs {
    pub popup: bool,
    pub os: bool,
    pub popup_duration_minutes: u32,
}

impl From<&Settings> for AlertPrefs {
    fn from(settings: &Settings) -> Self {
        Self {
            popup: settings.popup_notifications,
            os: settings.os_notifications,
            popup_duration_minutes: settings.popup_duration_minutes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupAlert {
    pub prayer: PrayerTimeEntry,
    pub duration_minutes: u32,
    /// The check instant that raised it; expiry counts from here.
    pub raised_at: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsNotification {
    pub title: String,
    pub body: String,
    /// Same tag means "replace", not "stack".
    pub tag: Option<String>,
}

impl OsNotification {
    /// In-app alert raised by the dashboard while it is open.
    pub fn prayer_time(entry: &PrayerTimeEntry) -> Self {
        let title = match entry.key {
            PrayerKey::Sunrise => "Sunrise 🌅".to_string(),
            key => format!("Time for {} prayer {}", key.display_name(), key.icon()),
        };
        Self {
            title,
            body: format_time(entry.time),
            tag: Some(format!("prayer-{}", entry.key.as_str())),
        }
    }

    /// Alert raised by the background daemon when a wake-up elapses.
    pub fn wakeup(key: PrayerKey) -> Self {
        let name = key.display_name();
        Self {
            title: format!("🕌 {} Time", name),
            body: format!("It's time for {} prayer.", name),
            tag: Some(format!("prayer-{}", key.as_str())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertEvent {
    Popup(PopupAlert),
    Chime,
    Os(OsNotification),
}

pub trait ChimePlayer: Send + Sync {
    fn play(&self) -> Result<(), AlertError>;
}

pub trait OsNotifier: Send + Sync {
    fn notify(&self, notification: &OsNotification) -> Result<(), AlertError>;
}

pub trait PopupSurface {
    fn show(&mut self, popup: PopupAlert);
}

/// Delivers each event to its surface, in order.
pub fn dispatch(
    events: Vec<AlertEvent>,
    popup: &mut dyn PopupSurface,
    chime: &dyn ChimePlayer,
    notifier: &dyn OsNotifier,
) {
    for event in events {
        match event {
            AlertEvent::Popup(alert) => {
                debug!("popup for {}", alert.prayer.name);
                popup.show(alert);
            }
            AlertEvent::Chime => {
                if let Err(e) = chime.play() {
                    debug!("chime skipped: {}", e);
                }
            }
            AlertEvent::Os(notification) => {
                if let Err(e) = notifier.notify(&notification) {
                    warn!("OS notification skipped: {}", e);
                }
            }
        }
    }
}

/// Runs a notifier on the blocking pool and waits for it. Desktop
/// notification servers answer over D-Bus and may stall.
pub async fn notify_in_background(notifier: Arc<dyn OsNotifier>, notification: OsNotification) {
    let sent = tokio::task::spawn_blocking(move || notifier.notify(&notification)).await;
    match sent {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("OS notification skipped: {}", e),
        Err(e) => warn!("notification task failed: {}", e),
    }
}

/// Hands each notification to [`notify_in_background`] and returns at once,
/// for callers that must not wait on the notification server.
pub struct BackgroundNotifier {
    inner: Arc<dyn OsNotifier>,
}

impl BackgroundNotifier {
    pub fn new(inner: Arc<dyn OsNotifier>) -> Self {
        Self { inner }
    }
}

impl OsNotifier for BackgroundNotifier {
    fn notify(&self, notification: &OsNotification) -> Result<(), AlertError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| AlertError::Notification(e.to_string()))?;
        runtime.spawn(notify_in_background(self.inner.clone(), notification.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Popups(Vec<PopupAlert>);

    impl PopupSurface for Popups {
        fn show(&mut self, popup: PopupAlert) {
            self.0.push(popup);
        }
    }

    struct MutedChime;

    impl ChimePlayer for MutedChime {
        fn play(&self) -> Result<(), AlertError> {
            Err(AlertError::Chime(std::io::Error::other("audio blocked")))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier(Mutex<Vec<OsNotification>>);

    impl OsNotifier for RecordingNotifier {
        fn notify(&self, notification: &OsNotification) -> Result<(), AlertError> {
            self.0.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    fn maghrib() -> PrayerTimeEntry {
        PrayerTimeEntry::new(
            PrayerKey::Maghrib,
            Local.with_ymd_and_hms(2026, 2, 20, 17, 45, 0).unwrap(),
        )
    }

    #[test]
    fn failing_chime_does_not_block_os_notification() {
        let mut popups = Popups::default();
        let notifier = RecordingNotifier::default();
        let events = vec![
            AlertEvent::Popup(PopupAlert {
                prayer: maghrib(),
                duration_minutes: 15,
                raised_at: maghrib().time,
            }),
            AlertEvent::Chime,
            AlertEvent::Os(OsNotification::prayer_time(&maghrib())),
        ];

        dispatch(events, &mut popups, &MutedChime, &notifier);

        assert_eq!(popups.0.len(), 1);
        assert_eq!(notifier.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn foreground_notification_carries_time_and_tag() {
        let n = OsNotification::prayer_time(&maghrib());
        assert_eq!(n.title, "Time for Maghrib prayer 🌇");
        assert_eq!(n.body, "5:45 PM");
        assert_eq!(n.tag.as_deref(), Some("prayer-maghrib"));
    }

    #[test]
    fn background_notification_is_keyed_by_name() {
        let n = OsNotification::wakeup(PrayerKey::Isha);
        assert_eq!(n.title, "🕌 Isha Time");
        assert_eq!(n.body, "It's time for Isha prayer.");
    }

    /// Blocks inside `notify` until the test opens the gate.
    struct GatedNotifier {
        gate: Mutex<std::sync::mpsc::Receiver<()>>,
        seen: Mutex<Vec<String>>,
    }

    impl OsNotifier for GatedNotifier {
        fn notify(&self, notification: &OsNotification) -> Result<(), AlertError> {
            let _ = self
                .gate
                .lock()
                .unwrap()
                .recv_timeout(std::time::Duration::from_secs(5));
            self.seen.lock().unwrap().push(notification.title.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn background_notifier_returns_before_delivery() {
        let (open, gate) = std::sync::mpsc::channel();
        let inner = Arc::new(GatedNotifier {
            gate: Mutex::new(gate),
            seen: Mutex::new(Vec::new()),
        });
        let notifier = BackgroundNotifier::new(inner.clone());

        notifier
            .notify(&OsNotification::prayer_time(&maghrib()))
            .unwrap();
        assert!(inner.seen.lock().unwrap().is_empty());

        open.send(()).unwrap();
        for _ in 0..200 {
            if !inner.seen.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(
            inner.seen.lock().unwrap().as_slice(),
            ["Time for Maghrib prayer 🌇".to_string()]
        );
    }

    #[test]
    fn background_notifier_outside_a_runtime_reports_failure() {
        let notifier = BackgroundNotifier::new(Arc::new(RecordingNotifier::default()));
        assert!(notifier.notify(&OsNotification::wakeup(PrayerKey::Asr)).is_err());
    }
}
