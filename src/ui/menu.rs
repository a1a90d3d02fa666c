use crate::host::MenuItem;
use crate::ui::key_style;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

fn shortcut(item: MenuItem) -> &'static str {
    match item {
        MenuItem::OpenSettings => "s",
        MenuItem::ResetQuiz => "r",
    }
}

pub fn draw_menu_bar(f: &mut Frame, area: Rect, items: &[MenuItem]) {
    let mut spans = Vec::new();
    for item in items {
        spans.push(Span::styled(shortcut(*item), key_style()));
        spans.push(Span::from(format!(" {}  ", item.label())));
    }

    let bar = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("Flag Quiz"));
    f.render_widget(bar, area);
}
