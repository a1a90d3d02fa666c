use crate::catalog::RegionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Quiz,
    Settings,
    QuizQuitConfirm,
}

/// Result of the last guess, shown under the answer buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Correct(String),
    Incorrect(String),
}

/// One line of the settings list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    Choices,
    Region(RegionId),
}

impl SettingsRow {
    pub fn all() -> Vec<SettingsRow> {
        std::iter::once(SettingsRow::Choices)
            .chain(RegionId::ALL.into_iter().map(SettingsRow::Region))
            .collect()
    }
}

#[derive(Debug)]
pub struct UiState {
    pub app_state: AppState,
    pub selected_option: usize,
    pub settings_cursor: usize,
    /// In the two-pane layout, whether keys go to the settings pane.
    pub settings_focused: bool,
    pub feedback: Option<Feedback>,
}

impl Default for UiState {
    fn default() -> Self {
        UiState {
            app_state: AppState::Quiz,
            selected_option: 0,
            settings_cursor: 0,
            settings_focused: false,
            feedback: None,
        }
    }
}

impl UiState {
    /// Forget per-question selection after the question set changed.
    pub fn clear_question(&mut self) {
        self.selected_option = 0;
        self.feedback = None;
    }

    pub fn settings_row(&self) -> SettingsRow {
        let rows = SettingsRow::all();
        rows[self.settings_cursor.min(rows.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_rows_start_with_choices() {
        let rows = SettingsRow::all();
        assert_eq!(rows.len(), 1 + RegionId::ALL.len());
        assert_eq!(rows[0], SettingsRow::Choices);
        assert_eq!(rows[4], SettingsRow::Region(RegionId::NorthAmerica));
    }

    #[test]
    fn test_settings_row_clamps_cursor() {
        let ui = UiState {
            settings_cursor: 99,
            ..UiState::default()
        };
        assert_eq!(ui.settings_row(), SettingsRow::Region(RegionId::SouthAmerica));
    }

    #[test]
    fn test_clear_question() {
        let mut ui = UiState {
            selected_option: 3,
            feedback: Some(Feedback::Incorrect("Peru".to_string())),
            ..UiState::default()
        };
        ui.clear_question();
        assert_eq!(ui.selected_option, 0);
        assert!(ui.feedback.is_none());
        assert_eq!(ui.app_state, AppState::Quiz);
    }
}
