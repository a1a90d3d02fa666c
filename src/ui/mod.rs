pub mod layout;
mod menu;
mod quiz;
mod settings;
mod summary;

pub use layout::{calculate_pane_chunks, calculate_quiz_chunks, calculate_screen_chunks};
pub use menu::draw_menu_bar;
pub use quiz::{draw_quit_confirmation, draw_quiz};
pub use settings::draw_settings;
pub use summary::draw_summary;

use crate::models::{AppState, UiState};
use crate::quiz::QuizState;
use crate::terminal::App;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::time::Instant;

pub(crate) fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Renders one frame for the current host and UI state.
pub fn draw(f: &mut Frame, app: &App, ui: &UiState, now: Instant) {
    if ui.app_state == AppState::QuizQuitConfirm {
        draw_quit_confirmation(f);
        return;
    }

    let menu = app.build_menu();
    let screen = calculate_screen_chunks(f.area(), menu.is_some());
    if let (Some(area), Some(items)) = (screen.menu_area, menu) {
        draw_menu_bar(f, area, &items);
    }

    match ui.app_state {
        AppState::Settings => draw_settings(f, screen.body_area, app, ui, true),
        _ if app.shows_settings_pane() => {
            let (quiz_area, settings_area) = calculate_pane_chunks(screen.body_area);
            draw_quiz_body(f, quiz_area, app, ui, now);
            draw_settings(f, settings_area, app, ui, ui.settings_focused);
        }
        _ => draw_quiz_body(f, screen.body_area, app, ui, now),
    }

    if let Some(notice) = app.platform().active_toast(now) {
        draw_toast(f, &notice.to_string());
    }
}

fn draw_quiz_body(f: &mut Frame, area: Rect, app: &App, ui: &UiState, now: Instant) {
    match app.quiz().state() {
        QuizState::Complete => draw_summary(f, area, app),
        _ => draw_quiz(f, area, app, ui, now),
    }
}

fn draw_toast(f: &mut Frame, message: &str) {
    let area = layout::toast_area(f.area(), 70, 3);
    let toast = Paragraph::new(message)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(Clear, area);
    f.render_widget(toast, area);
}
