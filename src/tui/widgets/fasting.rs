use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use ramadan_time::models::{PrayerKey, PrayerTimeEntry};
use ramadan_time::utils::format::format_time;

use crate::tui::theme;

/// Suhoor ends at Fajr, Iftar is at Maghrib.
pub fn render(frame: &mut Frame, area: Rect, prayers: &[PrayerTimeEntry]) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    card(frame, columns[0], " Suhoor ", find(prayers, PrayerKey::Fajr));
    card(frame, columns[1], " Iftar ", find(prayers, PrayerKey::Maghrib));
}

fn find(prayers: &[PrayerTimeEntry], key: PrayerKey) -> String {
    prayers
        .iter()
        .find(|p| p.key == key)
        .map(|p| format_time(p.time))
        .unwrap_or_else(|| "--".to_string())
}

fn card(frame: &mut Frame, area: Rect, title: &str, time: String) {
    let block = Block::default()
        .title(Span::styled(title, theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let paragraph = Paragraph::new(Line::from(Span::styled(
        time,
        theme::bold().add_modifier(Modifier::BOLD),
    )))
    .block(block)
    .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
