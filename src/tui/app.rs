use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Duration, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEventKind};
use log::{debug, info};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    DefaultTerminal, Frame,
};

use ramadan_time::alerts::{
    self, AlertPrefs, BackgroundNotifier, DesktopNotifier, OsNotifier, PopupAlert, PopupSurface,
    TerminalBell,
};
use ramadan_time::config::{FileSettingsStore, Settings, SettingsStore};
use ramadan_time::models::{CountdownState, PrayerKey};
use ramadan_time::prayer_times::{PrayerTimeProvider, prayer_entries};
use ramadan_time::schedule::CountdownEngine;
use ramadan_time::utils::hijri::hijri_string;

use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{fasting, header, next_prayer, popup, prayers, statusbar};

const TICK_MS: u64 = 1000;
/// 30 one-second ticks between notification checks.
const CHECK_EVERY_TICKS: u32 = 30;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Help,
}

/// The popup currently on screen.
#[derive(Debug, Default)]
pub struct PopupSlot {
    current: Option<PopupAlert>,
}

impl PopupSlot {
    pub fn current(&self) -> Option<&PopupAlert> {
        self.current.as_ref()
    }

    /// Counted from the check that raised the alert.
    pub fn remaining_secs(&self, now: DateTime<Local>) -> Option<i64> {
        self.current.as_ref().map(|alert| {
            let ends = alert.raised_at + Duration::minutes(alert.duration_minutes as i64);
            (ends - now).num_seconds()
        })
    }

    /// Auto-dismiss once the configured duration has run out.
    pub fn expire(&mut self, now: DateTime<Local>) -> bool {
        match self.remaining_secs(now) {
            Some(secs) if secs <= 0 => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

impl PopupSurface for PopupSlot {
    fn show(&mut self, popup: PopupAlert) {
        self.current = Some(popup);
    }
}

pub struct App {
    pub view: View,
    pub should_quit: bool,
    pub settings: Settings,
    pub engine: CountdownEngine,
    pub countdown: Option<CountdownState>,
    pub popup: PopupSlot,
    pub today: NaiveDate,
    pub hijri_str: Option<String>,
    ticks_since_check: u32,
    chime: TerminalBell,
    notifier: Arc<dyn OsNotifier>,
}

impl App {
    pub fn new(settings: Settings, notifier: Arc<dyn OsNotifier>) -> Self {
        let today = Local::now().date_naive();
        App {
            view: View::Dashboard,
            should_quit: false,
            settings,
            engine: CountdownEngine::default(),
            countdown: None,
            popup: PopupSlot::default(),
            today,
            hijri_str: hijri_string(today),
            ticks_since_check: 0,
            chime: TerminalBell,
            notifier,
        }
    }

    /// Recompute today's prayers, then check alerts straight away.
    pub async fn load(&mut self, provider: &dyn PrayerTimeProvider, now: DateTime<Local>) {
        self.today = now.date_naive();
        self.hijri_str = hijri_string(self.today);

        let prayers = prayer_entries(provider, &self.settings, self.today, &PrayerKey::ALL).await;
        self.engine.set_prayers(prayers);
        self.countdown = self.engine.tick(now);
        self.check_notifications(now);
    }

    pub fn is_new_day(&self, now: DateTime<Local>) -> bool {
        now.date_naive() != self.today
    }

    pub fn tick(&mut self, now: DateTime<Local>) {
        self.engine.reset_if_new_day(now);

        // a None countdown keeps the last one on screen
        if let Some(state) = self.engine.tick(now) {
            self.countdown = Some(state);
        }

        if self.popup.expire(now) {
            debug!("popup dismissed after its duration");
        }

        self.ticks_since_check += 1;
        if self.ticks_since_check >= CHECK_EVERY_TICKS {
            self.check_notifications(now);
        }
    }

    pub fn check_notifications(&mut self, now: DateTime<Local>) {
        self.ticks_since_check = 0;
        let prefs = AlertPrefs::from(&self.settings);
        let events = self.engine.check_notifications(now, &prefs);
        if !events.is_empty() {
            info!("raising {} alert(s)", events.len());
        }
        alerts::dispatch(events, &mut self.popup, &self.chime, self.notifier.as_ref());
    }

    /// Returns true when the key asks for a reload.
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> bool {
        // Some terminals also report release and repeat events
        if key.kind != KeyEventKind::Press {
            return false;
        }

        if self.view == View::Help {
            self.view = View::Dashboard;
            return false;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.view = View::Help,
            KeyCode::Char('x') => self.popup.dismiss(),
            KeyCode::Char('r') => return true,
            _ => {}
        }
        false
    }

    pub fn draw(&self, frame: &mut Frame, now: DateTime<Local>) {
        self.draw_dashboard(frame, now);

        if self.view == View::Help {
            self.draw_help_overlay(frame);
        }

        if let (Some(alert), Some(secs)) = (self.popup.current(), self.popup.remaining_secs(now)) {
            popup::render(frame, alert, secs);
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame, now: DateTime<Local>) {
        let area = frame.area();

        // Clear background
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(
            frame,
            outer_chunks[0],
            &self.settings.location_name,
            now,
            self.hijri_str.as_deref(),
        );
        statusbar::render(frame, outer_chunks[2], self.popup.current().is_some());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(outer_chunks[1]);

        let left_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8), // prayer list
                Constraint::Min(0),
            ])
            .split(columns[0]);

        prayers::render(
            frame,
            left_chunks[0],
            self.engine.prayers(),
            &self.settings.adjustments,
            now,
        );

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8), // countdown
                Constraint::Length(3), // suhoor / iftar
                Constraint::Min(0),
            ])
            .split(columns[1]);

        next_prayer::render(frame, right_chunks[0], self.countdown.as_ref());
        fasting::render(frame, right_chunks[1], self.engine.prayers());
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();

        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: (area.height / 2).min(14),
        };

        frame.render_widget(Clear, popup_area);

        let alerts_line = match (self.settings.popup_notifications, self.settings.os_notifications) {
            (true, true) => "popup + chime, OS notifications",
            (true, false) => "popup + chime",
            (false, true) => "OS notifications",
            (false, false) => "off",
        };

        let help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::gold().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  [r]      ", theme::gold()),
                Span::styled("Reload settings and prayer times", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [x]      ", theme::gold()),
                Span::styled("Dismiss the prayer popup", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [?]      ", theme::gold()),
                Span::styled("Toggle help", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [Esc]    ", theme::gold()),
                Span::styled("Quit", theme::dim()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Method   ", theme::dim()),
                Span::styled(self.settings.method.as_str(), theme::bold()),
            ]),
            Line::from(vec![
                Span::styled("  Alerts   ", theme::dim()),
                Span::styled(alerts_line, theme::bold()),
            ]),
            Line::from(Span::styled(
                "  Change settings with `ramadan-time config`",
                theme::dim(),
            )),
        ];

        let block = Block::default()
            .title(Span::styled(" Help ", theme::gold()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::gold())
            .style(theme::surface());

        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, popup_area);
    }
}

/// Run the dashboard until the user quits.
pub async fn run(store: Arc<FileSettingsStore>, provider: Arc<dyn PrayerTimeProvider>) -> Result<()> {
    let mut changes = store.subscribe();
    changes.borrow_and_update();

    let notifier = BackgroundNotifier::new(Arc::new(DesktopNotifier));
    let mut app = App::new(store.get().await, Arc::new(notifier));
    app.load(provider.as_ref(), Local::now()).await;

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app, &store, provider.as_ref(), &mut changes).await;
    ratatui::restore();
    result
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    store: &FileSettingsStore,
    provider: &dyn PrayerTimeProvider,
    changes: &mut tokio::sync::watch::Receiver<Settings>,
) -> Result<()> {
    let mut events = EventHandler::new(TICK_MS);

    loop {
        terminal.draw(|frame| app.draw(frame, Local::now()))?;

        let Some(event) = events.next().await else {
            break;
        };

        match event {
            Event::Key(key) => {
                if app.handle_key(key) {
                    app.settings = store.get().await;
                    app.load(provider, Local::now()).await;
                }
                if app.should_quit {
                    break;
                }
            }
            Event::Tick => {
                let now = Local::now();
                store.refresh().await;
                if changes.has_changed().unwrap_or(false) {
                    app.settings = changes.borrow_and_update().clone();
                    info!("settings changed, recomputing prayer times");
                    app.load(provider, now).await;
                } else if app.is_new_day(now) {
                    app.load(provider, now).await;
                }
                app.tick(now);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ramadan_time::error::AlertError;
    use ramadan_time::models::PrayerTimeEntry;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier(Mutex<Vec<String>>);

    impl OsNotifier for RecordingNotifier {
        fn notify(&self, n: &alerts::OsNotification) -> Result<(), AlertError> {
            self.0.lock().unwrap().push(n.title.clone());
            Ok(())
        }
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 2, 20, h, m, s).unwrap()
    }

    fn alert(minutes: u32) -> PopupAlert {
        PopupAlert {
            prayer: PrayerTimeEntry::new(PrayerKey::Asr, at(15, 0, 0)),
            duration_minutes: minutes,
            raised_at: at(15, 0, 0),
        }
    }

    #[test]
    fn popup_expires_after_its_duration() {
        let mut slot = PopupSlot::default();
        slot.show(alert(2));

        assert_eq!(slot.remaining_secs(at(15, 1, 0)), Some(60));
        assert!(!slot.expire(at(15, 1, 59)));
        assert!(slot.expire(at(15, 2, 0)));
        assert!(slot.current().is_none());
    }

    #[test]
    fn thirtieth_tick_runs_the_notification_check() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut settings = Settings::default();
        settings.os_notifications = true;

        let mut app = App::new(settings, notifier.clone());
        app.engine
            .set_prayers(vec![PrayerTimeEntry::new(PrayerKey::Asr, at(15, 0, 0))]);

        for s in 0..29 {
            app.tick(at(15, 0, 0) + Duration::seconds(s));
        }
        assert!(notifier.0.lock().unwrap().is_empty());

        app.tick(at(15, 0, 29));
        assert_eq!(
            notifier.0.lock().unwrap().as_slice(),
            ["Time for Asr prayer 🌤️".to_string()]
        );
    }

    #[test]
    fn popup_duration_runs_from_the_check_instant() {
        let mut settings = Settings::default();
        settings.popup_notifications = true;

        let mut app = App::new(settings, Arc::new(RecordingNotifier::default()));
        app.engine
            .set_prayers(vec![PrayerTimeEntry::new(PrayerKey::Asr, at(15, 0, 0))]);

        let checked = at(15, 0, 40);
        app.check_notifications(checked);

        assert_eq!(app.popup.current().map(|p| p.prayer.key), Some(PrayerKey::Asr));
        assert_eq!(app.popup.remaining_secs(checked), Some(15 * 60));
        assert!(!app.popup.expire(checked + Duration::seconds(15 * 60 - 1)));
        assert!(app.popup.expire(checked + Duration::seconds(15 * 60)));
    }

    #[test]
    fn help_view_swallows_next_key() {
        use crossterm::event::{KeyEvent, KeyModifiers};

        let mut app = App::new(Settings::default(), Arc::new(RecordingNotifier::default()));
        app.handle_key(KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE));
        assert_eq!(app.view, View::Help);

        app.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(app.view, View::Dashboard);
        assert!(!app.should_quit);
    }
}
