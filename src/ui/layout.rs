use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct QuizLayout {
    pub header_area: Rect,
    pub flag_area: Rect,
    pub options_area: Rect,
    pub feedback_area: Rect,
    pub help_area: Rect,
}

pub struct ScreenLayout {
    /// Present only while the options menu is shown.
    pub menu_area: Option<Rect>,
    pub body_area: Rect,
}

pub fn calculate_screen_chunks(area: Rect, with_menu: bool) -> ScreenLayout {
    if !with_menu {
        return ScreenLayout {
            menu_area: None,
            body_area: area,
        };
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    ScreenLayout {
        menu_area: Some(chunks[0]),
        body_area: chunks[1],
    }
}

/// Quiz on the left, settings on the right.
pub fn calculate_pane_chunks(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    (chunks[0], chunks[1])
}

pub fn calculate_quiz_chunks(area: Rect, option_count: usize) -> QuizLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(option_count as u16 + 2),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    QuizLayout {
        header_area: chunks[0],
        flag_area: chunks[1],
        options_area: chunks[2],
        feedback_area: chunks[3],
        help_area: chunks[4],
    }
}

/// A box of at most `width` x `height` anchored near the bottom of `area`.
pub fn toast_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + area.height.saturating_sub(height + 1);
    Rect::new(x, y.max(area.y), width, height)
}
