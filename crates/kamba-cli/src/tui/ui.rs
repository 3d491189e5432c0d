//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::app::{App, ChannelIndicator, DraftField, InputMode};

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    // Create vertical layout for status bar at the bottom
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    // Split the main area into list and detail panes
    let pane_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(outer_chunks[0]);

    draw_tasks_pane(frame, app, pane_chunks[0]);
    draw_detail_pane(frame, app, pane_chunks[1]);

    // Draw channel indicator in top-right corner
    draw_channel_indicator(frame, app);

    draw_status_bar(frame, app, outer_chunks[1]);

    // Modal overlays
    match app.input_mode {
        InputMode::Draft => draw_draft_form(frame, app),
        InputMode::ConfirmDelete => draw_confirm_delete(frame, app),
        InputMode::Normal => {}
    }

    // Draw help overlay if visible
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the task list pane (left)
fn draw_tasks_pane(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .tasks
        .iter()
        .map(|task| {
            let mark = if task.completed { "[x] " } else { "[ ] " };

            // Truncate title if too long
            let max_len = area.width.saturating_sub(8) as usize;
            let title = if task.title.chars().count() > max_len {
                let cut: String = task.title.chars().take(max_len.saturating_sub(1)).collect();
                format!("{}…", cut)
            } else {
                task.title.clone()
            };

            let style = if task.completed {
                Style::default()
                    .add_modifier(Modifier::DIM)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::raw(mark),
                Span::styled(title, style),
            ]))
        })
        .collect();

    let block = Block::default()
        .title(format!(" Tasks ({}) ", app.tasks.len()))
        .borders(Borders::ALL);

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED),
    );

    let mut state = ListState::default();
    if !app.tasks.is_empty() {
        state.select(Some(app.task_index));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the detail pane (right)
fn draw_detail_pane(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title(" Detail ").borders(Borders::ALL);

    let content: Vec<Line> = if let Some(task) = app.current_task() {
        let mut lines = vec![Line::from(vec![Span::styled(
            task.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )])];

        if let Some(ref priority) = task.priority {
            lines.push(Line::from(vec![Span::styled(
                format!("({})", priority),
                Style::default().add_modifier(Modifier::DIM),
            )]));
        }

        lines.push(Line::from(""));

        if let Some(text) = task.display_text() {
            lines.push(Line::from(text.to_string()));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(vec![
            Span::styled("Status:  ", Style::default().add_modifier(Modifier::DIM)),
            Span::raw(if task.completed { "done" } else { "open" }),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Created: ", Style::default().add_modifier(Modifier::DIM)),
            Span::raw(task.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]));

        lines
    } else {
        vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "No task selected",
                Style::default().add_modifier(Modifier::DIM),
            )]),
        ]
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let content = if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        "a:add  d:delete  Space:toggle  r:refresh  ?:help  q:quit".to_string()
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Draw channel indicator in top-right corner
fn draw_channel_indicator(frame: &mut Frame, app: &App) {
    let area = frame.area();
    if area.width < 5 {
        return;
    }

    let (icon, style) = match app.channel_status {
        ChannelIndicator::Live => ("●", Style::default().fg(Color::Green)),
        ChannelIndicator::Connecting => ("↻", Style::default().fg(Color::Yellow)),
        ChannelIndicator::Offline => ("⚡", Style::default().fg(Color::DarkGray)),
    };

    let indicator = Paragraph::new(Span::styled(icon, style));
    let indicator_area = Rect::new(area.width - 2, 0, 1, 1);
    frame.render_widget(indicator, indicator_area);
}

/// Draw the new-task form as a centered popup
fn draw_draft_form(frame: &mut Frame, app: &App) {
    let popup_area = centered_popup(frame.area(), 60, 7);
    frame.render_widget(Clear, popup_area);

    let field_line = |label: &str, value: &str, active: bool| {
        let label_style = if active {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let cursor = if active { "_" } else { "" };
        Line::from(vec![
            Span::styled(format!("{:<13}", label), label_style),
            Span::raw(format!("{}{}", value, cursor)),
        ])
    };

    let lines = vec![
        field_line(
            "Title:",
            &app.draft.title,
            app.draft_field == DraftField::Title,
        ),
        field_line(
            "Description:",
            &app.draft.description,
            app.draft_field == DraftField::Description,
        ),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Enter:save  Tab:switch field  Esc:cancel",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" New Task ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}

/// Draw the delete confirmation modal
fn draw_confirm_delete(frame: &mut Frame, app: &App) {
    let popup_area = centered_popup(frame.area(), 50, 5);
    frame.render_widget(Clear, popup_area);

    let title = app.pending_delete_title().unwrap_or("this task");

    let lines = vec![
        Line::from(format!("Delete \"{}\"?", title)),
        Line::from(""),
        Line::from(vec![Span::styled(
            "y:delete  n/Esc:cancel",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Confirm ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let popup_area = centered_popup(frame.area(), 44, 15);
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  g / G       Jump to first/last"),
        Line::from(""),
        Line::from("Commands:"),
        Line::from("  a           Add task"),
        Line::from("  Space/Enter Toggle done"),
        Line::from("  d           Delete task"),
        Line::from("  r           Refresh from server"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
}

/// Calculate a centered popup area
fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}
