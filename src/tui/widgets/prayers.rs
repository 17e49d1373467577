use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use ramadan_time::config::Adjustments;
use ramadan_time::models::PrayerTimeEntry;
use ramadan_time::utils::format::{format_offset, format_time};

use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    prayers: &[PrayerTimeEntry],
    adjustments: &Adjustments,
    now: DateTime<Local>,
) {
    let block = Block::default()
        .title(Span::styled(" Prayer Times ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    if prayers.is_empty() {
        let list = List::new(vec![ListItem::new(Line::from(Span::styled(
            "  Prayer times unavailable",
            theme::dim(),
        )))])
        .block(block);
        frame.render_widget(list, area);
        return;
    }

    let next_idx = prayers.iter().position(|p| p.time > now);

    let items: Vec<ListItem> = prayers
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let is_next = Some(i) == next_idx;
            let is_past = p.time <= now;

            let (marker, name_style, time_style) = if is_next {
                (
                    "▸ ",
                    theme::gold().add_modifier(Modifier::BOLD),
                    theme::gold().add_modifier(Modifier::BOLD),
                )
            } else if is_past {
                ("  ", theme::dim(), theme::dim())
            } else {
                ("  ", theme::bold(), theme::bold())
            };

            let line = Line::from(vec![
                Span::styled(format!(" {}{} ", marker, p.key.icon()), name_style),
                Span::styled(format!("{:<9}", p.name), name_style),
                Span::styled(format!("{:>9}", format_time(p.time)), time_style),
                Span::styled(format!("  {}", format_offset(adjustments.get(p.key))), theme::amber()),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
