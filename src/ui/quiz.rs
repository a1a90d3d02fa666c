use crate::models::{Feedback, UiState};
use crate::terminal::App;
use crate::ui::key_style;
use crate::ui::layout::calculate_quiz_chunks;
use crate::utils::truncate_string;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use std::time::Instant;

pub fn draw_quiz(f: &mut Frame, area: Rect, app: &App, ui: &UiState, now: Instant) {
    let quiz = app.quiz();
    let Some(flag) = quiz.current_flag() else {
        return;
    };
    let options = quiz.guess_options();
    let layout = calculate_quiz_chunks(area, options.len());

    let progress = format!(
        "Question {} of {} - {}/{} correct",
        quiz.question_number(),
        quiz.pool_len(),
        quiz.correct_count(),
        quiz.total_answered()
    );
    let header = Paragraph::new(progress)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let border_style = if app.platform().is_pulsing(now) {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let mut flag_text = Text::default();
    flag_text.push_line(Line::from(""));
    flag_text.push_line(Line::from(Span::styled(
        flag.image.emoji(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    flag_text.push_line(Line::from(""));
    flag_text.push_line(Line::from(Span::styled(
        format!("[{}]", flag.image.code()),
        Style::default().fg(Color::DarkGray),
    )));
    flag_text.push_line(Line::from(flag.region.display_name()));
    let flag_block = Paragraph::new(flag_text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("Guess the Country"),
        );
    f.render_widget(flag_block, layout.flag_area);

    let label_width = (layout.options_area.width as usize).saturating_sub(8);
    let selected = ui.selected_option.min(options.len().saturating_sub(1));
    let items: Vec<ListItem> = options
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let text = format!("{}. {}", i + 1, truncate_string(label, label_width));
            let style = if quiz.is_eliminated(label) {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else if i == selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let marker = if i == selected { "> " } else { "  " };
            ListItem::new(Line::from(vec![Span::raw(marker), Span::styled(text, style)]))
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Choices"));
    f.render_widget(list, layout.options_area);

    let feedback = match &ui.feedback {
        Some(Feedback::Correct(label)) => Line::from(Span::styled(
            format!("Correct! {}", label),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Some(Feedback::Incorrect(label)) => Line::from(Span::styled(
            format!("Incorrect! {} is not the answer", label),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            "Pick the country this flag belongs to",
            Style::default().fg(Color::DarkGray),
        )),
    };
    let feedback = Paragraph::new(feedback)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(feedback, layout.feedback_area);

    let mut spans = vec![
        Span::styled("↑/↓", key_style()),
        Span::from(" Select  "),
        Span::styled("Enter", key_style()),
        Span::from(" Guess  "),
        Span::styled("1-9", key_style()),
        Span::from(" Quick Guess  "),
    ];
    if app.shows_settings_pane() {
        spans.extend([Span::styled("Tab", key_style()), Span::from(" Settings  ")]);
    }
    spans.extend([Span::styled("Esc", key_style()), Span::from(" Quit")]);
    let help = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Quit Flag Quiz")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new("Leave the quiz? Your settings are kept.")
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Yes (Quit)  "),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::from(" No (Continue Quiz)  "),
        Span::styled("Ctrl+C", key_style()),
        Span::from(" Exit App"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
