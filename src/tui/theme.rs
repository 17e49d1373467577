use ratatui::style::{Color, Modifier, Style};

pub const BG: Color = Color::Rgb(14, 16, 24);
pub const SURFACE: Color = Color::Rgb(22, 25, 38);
pub const BORDER: Color = Color::Rgb(48, 54, 78);
pub const TEXT: Color = Color::Rgb(226, 228, 240);
pub const TEXT_DIM: Color = Color::Rgb(120, 126, 150);
pub const GOLD: Color = Color::Rgb(214, 178, 92);
pub const MOON: Color = Color::Rgb(168, 186, 255);
pub const AMBER: Color = Color::Rgb(226, 146, 72);
pub const RED: Color = Color::Rgb(196, 86, 80);
pub const GREEN: Color = Color::Rgb(104, 170, 120);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn gold() -> Style {
    Style::default().fg(GOLD)
}

pub fn moon() -> Style {
    Style::default().fg(MOON)
}

pub fn amber() -> Style {
    Style::default().fg(AMBER)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn border() -> Style {
    Style::default().fg(BORDER)
}
