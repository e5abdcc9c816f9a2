use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::app::{App, LineKind, Mode, TimelineItem};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_status(frame, app, chunks[0]);
    draw_timeline(frame, app, chunks[1]);
    draw_input(frame, app, chunks[2]);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let status = match (app.mode(), app.is_pending()) {
        (Mode::KeyEntry, _) => "awaiting API key",
        (Mode::Chat, true) => "waiting for reply",
        (Mode::Chat, false) => "ready",
    };
    let line = format!(
        "model: {} | turns: {} | status: {}",
        app.model(),
        app.turns(),
        status
    );
    frame.render_widget(
        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Gemini Desktop Assistant"),
        ),
        area,
    );
}

fn draw_timeline(frame: &mut Frame, app: &mut App, area: Rect) {
    let lines: Vec<Line> = app.timeline().iter().flat_map(timeline_lines).collect();

    // Rows are counted after word wrapping, without the border.
    let inner_width = area.width.saturating_sub(2).max(1);
    let inner_height = area.height.saturating_sub(2) as usize;
    let timeline = Paragraph::new(lines).wrap(Wrap { trim: false });
    let total = timeline.line_count(inner_width);
    let max_scroll = total.saturating_sub(inner_height).min(u16::MAX as usize) as u16;
    let offset = app.scroll_offset(max_scroll);

    let timeline = timeline
        .block(Block::default().borders(Borders::ALL).title("Chat"))
        .scroll((offset, 0));
    frame.render_widget(timeline, area);
}

fn timeline_lines(item: &TimelineItem) -> Vec<Line<'static>> {
    let (label, color) = match item.kind {
        LineKind::User => ("You: ", Color::Cyan),
        LineKind::Assistant => ("AI: ", Color::Green),
        LineKind::Error => ("Error: ", Color::Red),
        LineKind::System => ("", Color::Blue),
    };
    let body_style = match item.kind {
        LineKind::Error => Style::default().fg(Color::Red),
        LineKind::System => Style::default().fg(Color::Blue),
        _ => Style::default(),
    };

    let mut lines = Vec::new();
    for (i, text) in item.text.lines().enumerate() {
        let mut spans = Vec::new();
        if i == 0 && !label.is_empty() {
            spans.push(Span::styled(
                label,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        }
        spans.push(Span::styled(text.to_string(), body_style));
        lines.push(Line::from(spans));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(label, Style::default().fg(color))));
    }
    // Replies are followed by a blank line to separate exchanges.
    if item.kind == LineKind::Assistant {
        lines.push(Line::default());
    }
    lines
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let (title, shown) = match app.mode() {
        Mode::KeyEntry => (
            "Enter your Gemini API key (Enter save, Esc quit)",
            "*".repeat(app.input().chars().count()),
        ),
        Mode::Chat => (
            "Message (Enter send, Ctrl+N new chat, Esc quit)",
            app.input().to_string(),
        ),
    };

    let width = shown.chars().count();
    frame.render_widget(
        Paragraph::new(shown).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );

    let max_x = area.width.saturating_sub(2) as usize;
    let cursor_x = area.x + 1 + width.min(max_x) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
}
