use std::io::Write;

use notify_rust::Notification;

use crate::alerts::{ChimePlayer, OsNotification, OsNotifier};
use crate::error::AlertError;

/// Desktop notification center via `notify-rust`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

impl OsNotifier for DesktopNotifier {
    fn notify(&self, notification: &OsNotification) -> Result<(), AlertError> {
        // notify-rust has no portable replace-by-tag, the tag is only logged.
        log::debug!(
            "desktop notification {:?}: {}",
            notification.tag,
            notification.title
        );
        Notification::new()
            .summary(&notification.title)
            .body(&notification.body)
            .appname("Ramadan Time")
            .show()
            .map(|_| ())
            .map_err(|e| AlertError::Notification(e.to_string()))
    }
}

/// Rings the terminal bell.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl ChimePlayer for TerminalBell {
    fn play(&self) -> Result<(), AlertError> {
        let mut out = std::io::stdout();
        out.write_all(b"\x07")?;
        out.flush()?;
        Ok(())
    }
}
