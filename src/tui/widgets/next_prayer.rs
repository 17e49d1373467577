use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use ramadan_time::models::CountdownState;

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, countdown: Option<&CountdownState>) {
    let block = Block::default()
        .title(Span::styled(" Next Prayer ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let content: Vec<Line> = match countdown {
        None => vec![
            Line::from(""),
            Line::from(Span::styled("UPCOMING PRAYER", theme::dim())),
            Line::from(""),
            Line::from(Span::styled("--:--:--", theme::dim())),
        ],
        Some(state) => vec![
            Line::from(""),
            Line::from(Span::styled(
                state.label.to_uppercase(),
                theme::moon().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                state.to_string(),
                theme::gold().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("next  ", theme::dim()),
                Span::styled(state.target_prayer.as_str(), theme::bold()),
            ]),
        ],
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
