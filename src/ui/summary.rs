use crate::quiz::QuizState;
use crate::terminal::App;
use crate::ui::key_style;
use crate::utils::format_score;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn draw_summary(f: &mut Frame, area: Rect, app: &App) {
    let quiz = app.quiz();
    if quiz.state() != QuizState::Complete {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    let title = Paragraph::new("Quiz Complete")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let mut text = Text::default();
    text.push_line(Line::from(""));
    if quiz.pool_len() == 0 {
        text.push_line(Line::from(Span::styled(
            "No flags in the selected regions.",
            Style::default().fg(Color::Yellow),
        )));
        text.push_line(Line::from(""));
        text.push_line(Line::from("Open the settings to pick other regions."));
    } else {
        text.push_line(Line::from(Span::styled(
            format_score(&quiz.score()),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )));
        text.push_line(Line::from(""));
        text.push_line(Line::from(format!("Flags identified: {}", quiz.pool_len())));
    }
    let summary = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Results"));
    f.render_widget(summary, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled("Enter", key_style()),
        Span::from(" Play Again  "),
        Span::styled("Esc", key_style()),
        Span::from(" Quit"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
