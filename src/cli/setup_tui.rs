use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEventKind};
use log::info;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use ramadan_time::config::settings::check_coordinate;
use ramadan_time::config::{FileSettingsStore, Settings, SettingsStore};
use ramadan_time::models::{CalculationMethod, Madhab};

use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;

// ─── Wizard steps ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Welcome,
    LocationName,
    Latitude,
    Longitude,
    CalcMethod,
    Madhab,
    Alerts,
    Confirm,
}

/// Alert presets offered by the wizard, in display order.
const ALERT_PRESETS: [(&str, bool, bool, bool); 4] = [
    ("Background alarms only", true, false, false),
    ("Alarms + in-app popup and chime", true, true, false),
    ("Alarms + popup + desktop notifications", true, true, true),
    ("No alerts", false, false, false),
];

// ─── Wizard state ─────────────────────────────────────────────────────────────

struct SetupWizard {
    step: Step,
    input: String,
    error: Option<String>,
    list_state: ListState,

    // Collected values
    location_name: String,
    latitude: f64,
    longitude: f64,
    method_idx: usize,
    madhab: Madhab,
    alerts_idx: usize,

    should_quit: bool,
    confirmed: bool,
}

impl SetupWizard {
    fn new(existing: &Settings) -> Self {
        let method_idx = CalculationMethod::ALL
            .iter()
            .position(|m| *m == existing.method)
            .unwrap_or(0);
        let alerts_idx = ALERT_PRESETS
            .iter()
            .position(|(_, n, p, o)| {
                *n == existing.notifications
                    && *p == existing.popup_notifications
                    && *o == existing.os_notifications
            })
            .unwrap_or(0);

        let mut list_state = ListState::default();
        list_state.select(Some(method_idx));

        Self {
            step: Step::Welcome,
            input: String::new(),
            error: None,
            list_state,

            location_name: existing.location_name.clone(),
            latitude: existing.latitude,
            longitude: existing.longitude,
            method_idx,
            madhab: existing.madhab,
            alerts_idx,

            should_quit: false,
            confirmed: false,
        }
    }

    fn step_number(&self) -> usize {
        match self.step {
            Step::Welcome => 0,
            Step::LocationName => 1,
            Step::Latitude => 2,
            Step::Longitude => 3,
            Step::CalcMethod => 4,
            Step::Madhab => 5,
            Step::Alerts => 6,
            Step::Confirm => 7,
        }
    }

    const TOTAL_STEPS: usize = 7;

    fn advance(&mut self) {
        self.error = None;
        self.step = match self.step {
            Step::Welcome => Step::LocationName,
            Step::LocationName => Step::Latitude,
            Step::Latitude => Step::Longitude,
            Step::Longitude => Step::CalcMethod,
            Step::CalcMethod => Step::Madhab,
            Step::Madhab => Step::Alerts,
            Step::Alerts | Step::Confirm => Step::Confirm,
        };
        self.prefill();
    }

    fn go_back(&mut self) {
        self.error = None;
        self.step = match self.step {
            Step::Welcome => {
                self.should_quit = true;
                Step::Welcome
            }
            Step::LocationName => Step::Welcome,
            Step::Latitude => Step::LocationName,
            Step::Longitude => Step::Latitude,
            Step::CalcMethod => Step::Longitude,
            Step::Madhab => Step::CalcMethod,
            Step::Alerts => Step::Madhab,
            Step::Confirm => Step::Alerts,
        };
        self.prefill();
    }

    /// Text steps start from the value collected so far.
    fn prefill(&mut self) {
        self.input = match self.step {
            Step::LocationName => self.location_name.clone(),
            Step::Latitude => format!("{}", self.latitude),
            Step::Longitude => format!("{}", self.longitude),
            _ => String::new(),
        };
    }

    fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.step {
            Step::Welcome => {
                if key.code == KeyCode::Esc {
                    self.should_quit = true;
                } else {
                    self.advance();
                }
            }

            // the number is ignored for the name step
            Step::LocationName => self.handle_text_input(key, |s| {
                if s.trim().is_empty() {
                    Err("Please enter a city name".to_string())
                } else {
                    Ok(0.0)
                }
            }),

            Step::Latitude => self.handle_text_input(key, |s| parse_coordinate(s, 90.0, "latitude")),

            Step::Longitude => {
                self.handle_text_input(key, |s| parse_coordinate(s, 180.0, "longitude"))
            }

            Step::CalcMethod => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    if self.method_idx > 0 {
                        self.method_idx -= 1;
                        self.list_state.select(Some(self.method_idx));
                    }
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if self.method_idx + 1 < CalculationMethod::ALL.len() {
                        self.method_idx += 1;
                        self.list_state.select(Some(self.method_idx));
                    }
                }
                KeyCode::Enter => self.advance(),
                KeyCode::Esc => self.go_back(),
                _ => {}
            },

            Step::Madhab => match key.code {
                KeyCode::Left | KeyCode::Char('1') | KeyCode::Char('h') => {
                    self.madhab = Madhab::Shafi;
                }
                KeyCode::Right | KeyCode::Char('2') | KeyCode::Char('l') => {
                    self.madhab = Madhab::Hanafi;
                }
                KeyCode::Enter => self.advance(),
                KeyCode::Esc => self.go_back(),
                _ => {}
            },

            Step::Alerts => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.alerts_idx = self.alerts_idx.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if self.alerts_idx + 1 < ALERT_PRESETS.len() {
                        self.alerts_idx += 1;
                    }
                }
                KeyCode::Enter => self.advance(),
                KeyCode::Esc => self.go_back(),
                _ => {}
            },

            Step::Confirm => match key.code {
                KeyCode::Enter | KeyCode::Char('y') => {
                    self.confirmed = true;
                }
                KeyCode::Esc | KeyCode::Char('n') => self.go_back(),
                _ => {}
            },
        }
    }

    fn handle_text_input<F>(&mut self, key: crossterm::event::KeyEvent, validate: F)
    where
        F: Fn(&str) -> std::result::Result<f64, String>,
    {
        match key.code {
            KeyCode::Esc => self.go_back(),
            KeyCode::Enter => {
                let val = self.input.trim().to_string();
                match validate(&val) {
                    Ok(number) => {
                        match self.step {
                            Step::LocationName => self.location_name = val,
                            Step::Latitude => self.latitude = number,
                            Step::Longitude => self.longitude = number,
                            _ => {}
                        }
                        self.advance();
                    }
                    Err(e) => {
                        self.error = Some(e);
                    }
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.error = None;
            }
            KeyCode::Tab => {
                // Reset to Makkah
                self.input = match self.step {
                    Step::LocationName => "Makkah".to_string(),
                    Step::Latitude => "21.4225".to_string(),
                    Step::Longitude => "39.8262".to_string(),
                    _ => self.input.clone(),
                };
                self.error = None;
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.error = None;
            }
            _ => {}
        }
    }

    fn method(&self) -> CalculationMethod {
        CalculationMethod::ALL[self.method_idx]
    }

    fn build_settings(&self, existing: &Settings) -> Settings {
        let (_, notifications, popup, os) = ALERT_PRESETS[self.alerts_idx];
        let mut settings = existing.clone();
        settings.location_name = self.location_name.trim().to_string();
        settings.latitude = self.latitude;
        settings.longitude = self.longitude;
        settings.method = self.method();
        settings.madhab = self.madhab;
        settings.notifications = notifications;
        settings.popup_notifications = popup;
        settings.os_notifications = os;
        settings
    }
}

fn parse_coordinate(s: &str, bound: f64, what: &str) -> std::result::Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("Enter a valid {what} (e.g. 21.4225)"))?;
    check_coordinate(value, bound, what)
}

// ─── Rendering ────────────────────────────────────────────────────────────────

fn draw(frame: &mut Frame, wizard: &mut SetupWizard) {
    let area = frame.area();

    // Dark background
    frame.render_widget(Block::default().style(theme::base()), area);

    // Center the wizard box
    let vchunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(24),
            Constraint::Min(0),
        ])
        .split(area);

    let hchunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(64),
            Constraint::Min(0),
        ])
        .split(vchunks[1]);

    let box_area = hchunks[1];
    frame.render_widget(Clear, box_area);

    let outer_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold())
        .style(theme::surface())
        .title(Span::styled(
            "  🌙 ramadan-time · Setup  ",
            theme::gold().add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    frame.render_widget(outer_block, box_area);

    let inner = Rect {
        x: box_area.x + 2,
        y: box_area.y + 1,
        width: box_area.width.saturating_sub(4),
        height: box_area.height.saturating_sub(2),
    };

    match wizard.step {
        Step::Welcome => draw_welcome(frame, inner),
        Step::CalcMethod => draw_method_list(frame, inner, wizard),
        Step::Madhab => draw_choice(
            frame,
            inner,
            "Madhab",
            "Only changes the Asr time",
            &["Shafi  (earlier Asr)", "Hanafi  (later Asr)"],
            if wizard.madhab == Madhab::Shafi { 0 } else { 1 },
            "←→  or  1 2  choose   ·   Enter  confirm   ·   Esc  back",
        ),
        Step::Alerts => {
            let options: Vec<&str> = ALERT_PRESETS.iter().map(|(label, ..)| *label).collect();
            draw_choice(
                frame,
                inner,
                "Alerts",
                "How should prayer times reach you?",
                &options,
                wizard.alerts_idx,
                "↑↓  choose   ·   Enter  confirm   ·   Esc  back",
            )
        }
        Step::Confirm => draw_confirm(frame, inner, wizard),
        _ => draw_text_step(frame, inner, wizard),
    }

    // Progress dots at the top of inner
    draw_progress(frame, inner, wizard.step_number(), SetupWizard::TOTAL_STEPS);
}

fn draw_progress(frame: &mut Frame, area: Rect, current: usize, total: usize) {
    let mut spans = vec![Span::styled("  ", theme::dim())];
    for i in 1..=total {
        if i < current {
            spans.push(Span::styled("● ", theme::green()));
        } else if i == current {
            spans.push(Span::styled("◉ ", theme::gold()));
        } else {
            spans.push(Span::styled("○ ", theme::dim()));
        }
    }
    let progress_area = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: 1,
    };
    frame.render_widget(Paragraph::new(Line::from(spans)), progress_area);
}

fn content_area(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + 2,
        width: area.width,
        height: area.height.saturating_sub(2),
    }
}

fn draw_welcome(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "Ramadan Mubarak",
            theme::gold().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "A live countdown to every prayer, with alerts when it is time.",
            theme::dim(),
        )),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled("This wizard will configure:", theme::dim())),
        Line::from(vec![
            Span::styled("  ●  ", theme::gold()),
            Span::styled("Your location for accurate prayer times", theme::dim()),
        ]),
        Line::from(vec![
            Span::styled("  ●  ", theme::gold()),
            Span::styled("Calculation method and madhab", theme::dim()),
        ]),
        Line::from(vec![
            Span::styled("  ●  ", theme::gold()),
            Span::styled("How you want to be alerted", theme::dim()),
        ]),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "Press  Enter  to begin  ·  Esc  to cancel",
            theme::dim(),
        )),
    ];

    let para = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(para, content_area(area));
}

fn draw_text_step(frame: &mut Frame, area: Rect, wizard: &SetupWizard) {
    let (title, subtitle, hint) = match wizard.step {
        Step::LocationName => (
            "City Name",
            "Shown in the dashboard header",
            "e.g.  Makkah,  Istanbul,  London",
        ),
        Step::Latitude => (
            "Latitude",
            "North is positive, south is negative",
            "e.g.  21.4225  for Makkah  ·  [Tab] to reset",
        ),
        Step::Longitude => (
            "Longitude",
            "East is positive, west is negative",
            "e.g.  39.8262  for Makkah  ·  [Tab] to reset",
        ),
        _ => ("", "", ""),
    };

    let cursor = if wizard.input.len() < 40 { "█" } else { "" };

    let mut lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(title, theme::gold().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(subtitle, theme::dim())),
        Line::from(""),
        Line::from(""),
    ];

    let input_display = format!("  {}{}  ", wizard.input, cursor);
    let input_width = area.width.saturating_sub(8) as usize;
    let padded = format!("{:<width$}", input_display, width = input_width);

    let input_style = if wizard.error.is_some() {
        theme::red()
    } else {
        theme::amber()
    };

    lines.push(Line::from(Span::styled(padded, input_style.add_modifier(Modifier::BOLD))));
    lines.push(Line::from(""));

    if let Some(err) = &wizard.error {
        lines.push(Line::from(Span::styled(format!("  ✗  {}", err), theme::red())));
    } else {
        lines.push(Line::from(Span::styled(hint, theme::dim())));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter  confirm   ·   Esc  back",
        theme::dim(),
    )));

    let para = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(para, content_area(area));
}

fn draw_method_list(frame: &mut Frame, area: Rect, wizard: &mut SetupWizard) {
    let header_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Calculation Method",
            theme::gold().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Choose the authority whose angles you follow",
            theme::dim(),
        )),
    ];

    let header_area = Rect {
        x: area.x,
        y: area.y + 2,
        width: area.width,
        height: 4,
    };
    frame.render_widget(
        Paragraph::new(header_lines).alignment(Alignment::Center),
        header_area,
    );

    let list_area = Rect {
        x: area.x + 2,
        y: area.y + 7,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(10),
    };

    let items: Vec<ListItem> = CalculationMethod::ALL
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let (marker, style) = if i == wizard.method_idx {
                ("  ◉  ", theme::gold().add_modifier(Modifier::BOLD))
            } else {
                ("  ○  ", theme::dim())
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(m.as_str(), style),
            ]))
        })
        .collect();

    let list = List::new(items).style(theme::surface());
    frame.render_stateful_widget(list, list_area, &mut wizard.list_state);

    let footer = Paragraph::new(Line::from(Span::styled(
        "↑↓  navigate   ·   Enter  select   ·   Esc  back",
        theme::dim(),
    )))
    .alignment(Alignment::Center);
    let footer_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(2),
        width: area.width,
        height: 1,
    };
    frame.render_widget(footer, footer_area);
}

fn draw_choice(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    subtitle: &str,
    options: &[&str],
    selected: usize,
    footer: &str,
) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(title, theme::gold().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(subtitle, theme::dim())),
        Line::from(""),
        Line::from(""),
    ];

    for (i, opt) in options.iter().enumerate() {
        if i == selected {
            lines.push(Line::from(vec![
                Span::styled("  ◉  ", theme::gold()),
                Span::styled(*opt, theme::gold().add_modifier(Modifier::BOLD)),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::styled("  ○  ", theme::dim()),
                Span::styled(*opt, theme::dim()),
            ]));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(footer, theme::dim())));

    let para = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(para, content_area(area));
}

fn draw_confirm(frame: &mut Frame, area: Rect, wizard: &SetupWizard) {
    let (alerts, ..) = ALERT_PRESETS[wizard.alerts_idx];

    let row = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, theme::dim()),
            Span::styled(value, theme::bold()),
        ])
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Confirm Settings", theme::gold().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled("Review your configuration:", theme::dim())),
        Line::from(""),
        row("  Location    ", wizard.location_name.clone()),
        row(
            "  Coordinates ",
            format!("{:.4},  {:.4}", wizard.latitude, wizard.longitude),
        ),
        row("  Method      ", wizard.method().to_string()),
        row("  Madhab      ", wizard.madhab.to_string()),
        row("  Alerts      ", alerts.to_string()),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "Enter  save   ·   Esc  go back",
            theme::dim(),
        )),
    ];

    let para = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(para, content_area(area));
}

// ─── Public entry point ──────────────────────────────────────────────────────

/// Runs the wizard and saves through the store. Returns false if cancelled.
pub async fn run_setup_tui(store: &FileSettingsStore, existing: Settings) -> Result<bool> {
    let mut wizard = SetupWizard::new(&existing);
    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(250);

    let outcome: Result<Option<Settings>> = loop {
        if let Err(e) = terminal.draw(|frame| draw(frame, &mut wizard)) {
            break Err(e.into());
        }

        match events.next().await {
            Some(Event::Key(key)) => {
                wizard.handle_key(key);
                if wizard.should_quit {
                    break Ok(None);
                }
                if wizard.confirmed {
                    break Ok(Some(wizard.build_settings(&existing)));
                }
            }
            Some(Event::Tick) => {}
            None => break Ok(None),
        }
    };

    ratatui::restore();

    match outcome? {
        Some(settings) => {
            store.save(&settings).await.context("Saving settings")?;
            info!(
                "setup saved for {} ({}, {})",
                settings.location_name, settings.latitude, settings.longitude
            );
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn press(wizard: &mut SetupWizard, code: KeyCode) {
        wizard.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(wizard: &mut SetupWizard, text: &str) {
        for _ in 0..wizard.input.len() {
            press(wizard, KeyCode::Backspace);
        }
        for c in text.chars() {
            press(wizard, KeyCode::Char(c));
        }
        press(wizard, KeyCode::Enter);
    }

    #[test]
    fn walks_through_every_step() {
        let mut wizard = SetupWizard::new(&Settings::default());
        press(&mut wizard, KeyCode::Enter);
        type_text(&mut wizard, "London");
        type_text(&mut wizard, "51.5");
        type_text(&mut wizard, "-0.12");
        press(&mut wizard, KeyCode::Down);
        press(&mut wizard, KeyCode::Enter);
        press(&mut wizard, KeyCode::Right);
        press(&mut wizard, KeyCode::Enter);
        press(&mut wizard, KeyCode::Down);
        press(&mut wizard, KeyCode::Enter);
        assert_eq!(wizard.step, Step::Confirm);
        press(&mut wizard, KeyCode::Enter);
        assert!(wizard.confirmed);

        let settings = wizard.build_settings(&Settings::default());
        assert_eq!(settings.location_name, "London");
        assert_eq!(settings.latitude, 51.5);
        assert_eq!(settings.longitude, -0.12);
        assert_eq!(settings.method, CalculationMethod::ALL[1]);
        assert_eq!(settings.madhab, Madhab::Hanafi);
        assert!(settings.notifications);
        assert!(settings.popup_notifications);
        assert!(!settings.os_notifications);
        assert!(settings.has_location());
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let mut wizard = SetupWizard::new(&Settings::default());
        press(&mut wizard, KeyCode::Enter);
        type_text(&mut wizard, "Somewhere");
        type_text(&mut wizard, "91");
        assert_eq!(wizard.step, Step::Latitude);
        assert!(wizard.error.is_some());
    }

    #[test]
    fn esc_on_welcome_cancels() {
        let mut wizard = SetupWizard::new(&Settings::default());
        press(&mut wizard, KeyCode::Esc);
        assert!(wizard.should_quit);
        assert!(!wizard.confirmed);
    }
}
