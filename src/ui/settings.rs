use crate::models::{SettingsRow, UiState};
use crate::terminal::App;
use crate::ui::key_style;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

/// Number of choices plus one checkbox per region. `focused` decides
/// whether the cursor is drawn.
pub fn draw_settings(f: &mut Frame, area: Rect, app: &App, ui: &UiState, focused: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let quiz = app.quiz();
    let catalog = quiz.catalog();
    let rows = SettingsRow::all();
    let cursor = ui.settings_cursor.min(rows.len() - 1);

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let text = match row {
                SettingsRow::Choices => format!(
                    "Number of Choices: < {} >  ({}-{})",
                    quiz.choice_count(),
                    crate::quiz::MIN_CHOICES,
                    quiz.max_choices()
                ),
                SettingsRow::Region(region) => {
                    let mark = if quiz.enabled_regions().contains(region) {
                        "[x]"
                    } else {
                        "[ ]"
                    };
                    format!(
                        "{} {} ({} flags)",
                        mark,
                        region.display_name(),
                        catalog.count_in(*region)
                    )
                }
            };
            let style = if focused && i == cursor {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(text, style)))
        })
        .collect();

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Settings"),
    );
    f.render_widget(list, chunks[0]);

    let help = if focused {
        Line::from(vec![
            Span::styled("←/→", key_style()),
            Span::from(" Choices  "),
            Span::styled("Space", key_style()),
            Span::from(" Toggle  "),
            Span::styled("Esc", key_style()),
            Span::from(" Back"),
        ])
    } else {
        Line::from(Span::styled(
            "Tab to edit settings",
            Style::default().fg(Color::DarkGray),
        ))
    };
    let help = Paragraph::new(help)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[1]);
}
