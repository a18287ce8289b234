use crate::{
    app::{App, Focus},
    filter::StatusFilter,
    form::FormField,
    store::TaskStore,
};
use crossterm::event::{self, Event};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{
    io,
    time::{Duration, Instant},
};

const TICK_RATE: Duration = Duration::from_millis(100);

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|f| draw(f, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
        if app.should_quit {
            return Ok(());
        }
    }
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = Paragraph::new(Line::from(Span::styled(
        "Task List Manager",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    f.render_widget(title, chunks[0]);

    draw_form(f, app, chunks[1]);
    draw_filter(f, &app.filter, &app.store, app.focus == Focus::Filter, chunks[2]);

    let grid_focused = app.focus == Focus::Grid;
    match app.grid.widget_mut() {
        Some(table) => table.draw(f, chunks[3], grid_focused),
        None => f.render_widget(Block::default().borders(Borders::ALL).title("Tasks"), chunks[3]),
    }

    let hint = if app.is_loading() {
        "Loading tasks...  Tab: switch focus  q: quit"
    } else {
        "Tab: switch focus  Enter: edit/submit  d: delete  Esc: cancel edit  q: quit"
    };
    f.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::Gray)),
        chunks[4],
    );

    draw_toasts(f, app);
    if let Some(message) = &app.alert {
        draw_alert(f, message);
    }
}

fn field_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    }
}

fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Form;
    let at = |field: FormField| focused && app.form.focus == field;
    let draft = &app.form.draft;

    let placeholder = |text: &str, hint: &'static str| -> Span<'static> {
        if text.is_empty() {
            Span::styled(hint, Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(text.to_string())
        }
    };

    let line = Line::from(vec![
        Span::raw("Title: "),
        placeholder(&draft.title, "Title").patch_style(field_style(at(FormField::Title))),
        Span::raw("  Description: "),
        placeholder(&draft.description, "Description")
            .patch_style(field_style(at(FormField::Description))),
        Span::raw("  Status: "),
        Span::styled(
            format!("< {} >", draft.status.label()),
            field_style(at(FormField::Status)),
        ),
        Span::raw("  "),
        Span::styled(
            "[ Add Task ]",
            field_style(at(FormField::Submit)).fg(Color::Blue),
        ),
    ]);

    let block = Block::default()
        .title("New Task")
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });
    f.render_widget(Paragraph::new(line).block(block), area);
}

/// Filter options with the number of stored tasks behind each one.
fn draw_filter(f: &mut Frame, filter: &StatusFilter, store: &TaskStore, focused: bool, area: Rect) {
    let mut spans = vec![Span::raw("Filter by Status: ")];
    for option in StatusFilter::OPTIONS {
        let label = match option {
            Some(status) => format!("{} ({})", status.label(), store.tasks_with_status(status).len()),
            None => format!("All ({})", store.len()),
        };
        let style = if option == filter.selected() {
            field_style(focused).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {label} "), style));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Toasts stack downward from the top-right corner.
fn draw_toasts(f: &mut Frame, app: &App) {
    let screen = f.area();
    for (i, toast) in app.notifier.active().iter().enumerate() {
        let text = format!("{} {}", toast.stamp, toast.message);
        let width = (text.len() as u16 + 4).min(screen.width);
        let y = screen.y + 1 + i as u16 * 3;
        if y + 3 > screen.bottom() {
            break;
        }
        let area = Rect::new(screen.right().saturating_sub(width + 1), y, width, 3);
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(text)
                .style(Style::default().fg(Color::White).bg(Color::Green))
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
    }
}

fn draw_alert(f: &mut Frame, message: &str) {
    let area = centered_rect(50, 20, f.area());
    f.render_widget(Clear, area);
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Press Enter to continue"),
    ];
    f.render_widget(
        Paragraph::new(text)
            .block(
                Block::default()
                    .title("Alert")
                    .borders(Borders::ALL)
                    .style(Style::default().bg(Color::Red)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
