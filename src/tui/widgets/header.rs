use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, location: &str, now: DateTime<Local>, hijri: Option<&str>) {
    let title_line = Line::from(vec![
        Span::styled("  رمضان  ", theme::gold().add_modifier(Modifier::BOLD)),
        Span::styled(location, theme::bold()),
    ]);

    let mut date_spans = vec![Span::styled(now.format("%A, %-d %B").to_string(), theme::dim())];
    if let Some(hijri) = hijri {
        date_spans.push(Span::styled("  ·  ", theme::dim()));
        date_spans.push(Span::styled(hijri.to_string(), theme::moon()));
    }

    let text = vec![title_line, Line::from(""), Line::from(date_spans)];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold())
        .style(theme::base());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
