use crate::error::Result;
use crate::host::MenuItem;
use crate::models::{AppState, Feedback, SettingsRow, UiState};
use crate::quiz::{GuessOutcome, MIN_CHOICES, QuizState};
use crate::terminal::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Routes one key press. Returns true when the app should exit.
pub fn handle_input(app: &mut App, ui: &mut UiState, key: KeyEvent) -> Result<bool> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match ui.app_state {
        AppState::Quiz if ui.settings_focused && app.shows_settings_pane() => {
            handle_settings_input(app, ui, key)?
        }
        AppState::Quiz => handle_quiz_input(app, ui, key)?,
        AppState::Settings => handle_settings_input(app, ui, key)?,
        AppState::QuizQuitConfirm => return Ok(handle_quit_confirm_input(ui, key)),
    }

    if app.platform_mut().take_settings_request() {
        if app.shows_settings_pane() {
            ui.settings_focused = true;
        } else {
            ui.app_state = AppState::Settings;
        }
    }
    sync_layout(app, ui);
    Ok(false)
}

/// Keeps the UI state consistent with the current layout after a resize.
pub fn sync_layout(app: &App, ui: &mut UiState) {
    if app.shows_settings_pane() {
        if ui.app_state == AppState::Settings {
            ui.app_state = AppState::Quiz;
            ui.settings_focused = true;
        }
    } else {
        ui.settings_focused = false;
    }
}

pub fn handle_quiz_input(app: &mut App, ui: &mut UiState, key: KeyEvent) -> Result<()> {
    if app.quiz().state() == QuizState::Complete {
        match key.code {
            KeyCode::Enter => {
                app.play_again()?;
                ui.clear_question();
            }
            KeyCode::Char('s') => menu_action(app, ui, MenuItem::OpenSettings)?,
            KeyCode::Char('r') => menu_action(app, ui, MenuItem::ResetQuiz)?,
            KeyCode::Tab if app.shows_settings_pane() => ui.settings_focused = true,
            KeyCode::Esc => ui.app_state = AppState::QuizQuitConfirm,
            _ => {}
        }
        return Ok(());
    }

    let option_count = app.quiz().guess_options().len();
    match key.code {
        KeyCode::Esc => ui.app_state = AppState::QuizQuitConfirm,
        KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => {
            ui.selected_option = ui.selected_option.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => {
            if ui.selected_option + 1 < option_count {
                ui.selected_option += 1;
            }
        }
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            if index < option_count {
                ui.selected_option = index;
                submit_selected(app, ui)?;
            }
        }
        KeyCode::Enter => submit_selected(app, ui)?,
        KeyCode::Char('s') => menu_action(app, ui, MenuItem::OpenSettings)?,
        KeyCode::Char('r') => menu_action(app, ui, MenuItem::ResetQuiz)?,
        KeyCode::Tab if app.shows_settings_pane() => ui.settings_focused = true,
        _ => {}
    }
    Ok(())
}

/// Menu shortcuts only work while the menu is shown.
fn menu_action(app: &mut App, ui: &mut UiState, item: MenuItem) -> Result<()> {
    let Some(menu) = app.build_menu() else {
        return Ok(());
    };
    if menu.contains(&item) {
        app.on_menu_item(item)?;
        if item == MenuItem::ResetQuiz {
            ui.clear_question();
        }
    }
    Ok(())
}

fn submit_selected(app: &mut App, ui: &mut UiState) -> Result<()> {
    let Some(label) = app.quiz().guess_options().get(ui.selected_option).cloned() else {
        return Ok(());
    };
    if app.quiz().is_eliminated(&label) {
        return Ok(());
    }

    match app.submit_guess(&label)? {
        GuessOutcome::Correct => {
            ui.selected_option = 0;
            ui.feedback = Some(Feedback::Correct(label));
        }
        GuessOutcome::Incorrect => {
            ui.feedback = Some(Feedback::Incorrect(label));
        }
    }
    Ok(())
}

pub fn handle_settings_input(app: &mut App, ui: &mut UiState, key: KeyEvent) -> Result<()> {
    let row_count = SettingsRow::all().len();
    match key.code {
        KeyCode::Esc | KeyCode::Tab | KeyCode::Char('q') | KeyCode::Char('s') => {
            ui.app_state = AppState::Quiz;
            ui.settings_focused = false;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            ui.settings_cursor = ui.settings_cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if ui.settings_cursor + 1 < row_count {
                ui.settings_cursor += 1;
            }
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-') => {
            if ui.settings_row() == SettingsRow::Choices {
                let current = app.quiz().choice_count();
                if current > MIN_CHOICES {
                    app.update_choices(current - 1)?;
                    ui.clear_question();
                }
            }
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+') => {
            if ui.settings_row() == SettingsRow::Choices {
                let current = app.quiz().choice_count();
                if current < app.quiz().max_choices() {
                    app.update_choices(current + 1)?;
                    ui.clear_question();
                }
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let SettingsRow::Region(region) = ui.settings_row() {
                app.toggle_region(region)?;
                ui.clear_question();
            }
        }
        _ => {}
    }
    Ok(())
}

/// Returns true when the player confirmed quitting.
pub fn handle_quit_confirm_input(ui: &mut UiState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => true,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            ui.app_state = AppState::Quiz;
            false
        }
        _ => false,
    }
}
