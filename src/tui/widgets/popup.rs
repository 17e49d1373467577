use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use ramadan_time::alerts::PopupAlert;
use ramadan_time::utils::format::{format_remaining, format_time};

use crate::tui::theme;

const WIDTH: u16 = 34;
const HEIGHT: u16 = 3;

/// Toast in the bottom-right corner, like the prayer popup in a browser tab.
pub fn render(frame: &mut Frame, alert: &PopupAlert, remaining_secs: i64) {
    let area = frame.area();
    if area.width < WIDTH + 2 || area.height < HEIGHT + 2 {
        return;
    }
    let popup_area = Rect {
        x: area.width - WIDTH - 1,
        y: area.height - HEIGHT - 1,
        width: WIDTH,
        height: HEIGHT,
    };

    frame.render_widget(Clear, popup_area);

    let line = Line::from(vec![
        Span::styled(format!(" {} ", alert.prayer.key.icon()), theme::gold()),
        Span::styled(
            alert.prayer.name.as_str(),
            theme::bold().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", format_time(alert.prayer.time)), theme::dim()),
        Span::styled(format!("  {}", format_remaining(remaining_secs)), theme::amber()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold())
        .style(theme::surface());

    frame.render_widget(Paragraph::new(line).block(block), popup_area);
}
