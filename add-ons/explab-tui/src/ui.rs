//! Frame rendering.

use crate::app::{App, Focus, FormField};
use explab_core::{ExperimentId, StatusKind, ViewState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

fn status_style(status: &str) -> Style {
    let color = match StatusKind::classify(status) {
        StatusKind::Succeeded => Color::Green,
        StatusKind::Running => Color::Cyan,
        StatusKind::Pending => Color::Yellow,
        StatusKind::Failed => Color::Red,
        StatusKind::Other => Color::White,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn focused_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

pub fn draw(f: &mut Frame, app: &App, state: &ViewState, selected: Option<ExperimentId>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[0]);

    draw_list(f, app, state, selected, panes[0]);
    draw_detail(f, state, selected, panes[1]);
    draw_form(f, app, rows[1]);

    let help = match app.focus {
        Focus::List => "↑/↓ move  Enter select  r refresh  n new experiment  q quit",
        Focus::Form => "Tab next field  Enter on Model / Ctrl-S submit  Esc back",
    };
    f.render_widget(Paragraph::new(help), rows[2]);
}

fn draw_list(f: &mut Frame, app: &App, state: &ViewState, selected: Option<ExperimentId>, area: Rect) {
    let items: Vec<ListItem> = state
        .list
        .iter()
        .map(|entry| {
            let marker = if Some(entry.id) == selected { "● " } else { "  " };
            ListItem::new(format!("{}{}", marker, entry.label))
        })
        .collect();

    let list = List::new(items)
        .block(focused_block(" Experiments ", app.focus == Focus::List))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("› ");

    let mut list_state = ListState::default();
    if !state.list.is_empty() {
        list_state.select(Some(app.cursor));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_detail(f: &mut Frame, state: &ViewState, selected: Option<ExperimentId>, area: Rect) {
    let title = match selected {
        Some(id) => format!(" Experiment #{} ", id),
        None => " Experiment ".to_string(),
    };

    if !state.detail_visible {
        let mut lines = vec![Line::from(
            "Select an experiment with Enter, or press n to start one.",
        )];
        if let Some(err) = &state.error {
            lines.push(Line::from(""));
            lines.push(Line::styled(
                format!("{} failed: {}", err.operation, err.message),
                Style::default().fg(Color::Red),
            ));
        }
        let hint = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(hint, area);
        return;
    }

    let error_height = if state.error.is_some() { 3 } else { 0 };
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(error_height),
        ])
        .split(area);

    let status = state.status.as_deref().unwrap_or("loading…");
    let status_line = Line::from(vec![
        Span::styled("Status: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(status.to_string(), status_style(status)),
    ]);
    f.render_widget(
        Paragraph::new(status_line).block(Block::default().borders(Borders::ALL).title(title)),
        parts[0],
    );

    // Tail the transcript; wrapped lines may push the very end slightly off-screen.
    let visible = parts[1].height.saturating_sub(2) as usize;
    let total = state.transcript.lines().count();
    let scroll = total.saturating_sub(visible).min(u16::MAX as usize) as u16;
    let transcript = Paragraph::new(state.transcript.as_str())
        .block(Block::default().borders(Borders::ALL).title(" Conversation "))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(transcript, parts[1]);

    if let Some(err) = &state.error {
        let text = format!("{} failed: {}", err.operation, err.message);
        let error = Paragraph::new(text)
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL).title(" Error "));
        f.render_widget(error, parts[2]);
    }
}

fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Form;
    let lines: Vec<Line> = [FormField::Prompt, FormField::AiClient, FormField::Model]
        .into_iter()
        .map(|field| {
            let active = focused && app.field == field;
            let label_style = if active {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };
            let cursor = if active { "▏" } else { "" };
            Line::from(vec![
                Span::styled(format!("{:>10}: ", field.label()), label_style),
                Span::raw(format!("{}{}", app.field_value(field), cursor)),
            ])
        })
        .collect();

    f.render_widget(
        Paragraph::new(lines).block(focused_block(" New experiment ", focused)),
        area,
    );
}
