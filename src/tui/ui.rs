//! UI layout and rendering logic for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use unicode_width::UnicodeWidthChar;

use super::app::App;
use crate::orchestrator::{PaneKind, PaneState, Settled};

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45), // Editor
            Constraint::Min(6),         // Result panes
            Constraint::Length(1),      // Status bar
        ])
        .split(frame.area());

    render_editor(frame, app, main_layout[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_layout[1]);
    render_pane(frame, app, PaneKind::Explanation, panes[0]);
    render_pane(frame, app, PaneKind::Execution, panes[1]);

    render_status_bar(frame, app, main_layout[2]);

    // Render help overlay if requested
    if app.show_help {
        render_help_overlay(frame);
    }
}

/// Render the code editor
fn render_editor(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        "Code Editor - {} (F3 to change)",
        app.orchestrator.language().display_name()
    );
    let rows = usize::from(area.height.saturating_sub(2)).max(1);
    let cols = usize::from(area.width.saturating_sub(2)).max(1);
    let (row, _) = app.editor.cursor();
    let cursor_col = app.editor.cursor_display_col();
    let top = (row + 1).saturating_sub(rows);
    let left = (cursor_col + 1).saturating_sub(cols);

    let lines: Vec<Line> = app
        .editor
        .lines()
        .iter()
        .skip(top)
        .take(rows)
        .map(|l| Line::from(visible_slice(l, left, cols)))
        .collect();

    let paragraph =
        Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);

    if !app.show_help {
        let x = area.x.saturating_add(1).saturating_add(clamp_u16(cursor_col - left));
        let y = area.y.saturating_add(1).saturating_add(clamp_u16(row - top));
        if x < area.right().saturating_sub(1) && y < area.bottom().saturating_sub(1) {
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Part of `line` between display columns `left` and `left + width`.
fn visible_slice(line: &str, left: usize, width: usize) -> String {
    let mut col = 0;
    let mut out = String::new();
    for c in line.chars() {
        let w = c.width().unwrap_or(0);
        if col >= left {
            if col + w > left + width {
                break;
            }
            out.push(c);
        }
        col += w;
    }
    out
}

/// Render one result pane
fn render_pane(frame: &mut Frame, app: &App, kind: PaneKind, area: Rect) {
    let pane = app.orchestrator.pane(kind);

    let (status, text_style) = match pane.state() {
        PaneState::Idle => ("", Style::default().fg(Color::DarkGray)),
        PaneState::Pending { .. } => (" (pending)", Style::default().fg(Color::Yellow)),
        PaneState::Settled(Settled::Success(_)) => match kind {
            PaneKind::Explanation => ("", Style::default().fg(Color::Cyan)),
            PaneKind::Execution => ("", Style::default().fg(Color::Green)),
        },
        PaneState::Settled(Settled::Failure(_)) => (" (failed)", Style::default().fg(Color::Red)),
    };

    let body = pane.display_text().unwrap_or(match kind {
        PaneKind::Explanation => "Press F2 to analyze the code.",
        PaneKind::Execution => "Press F5 to run the code.",
    });

    let border_style = if app.focus == kind {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default()
    };

    let paragraph = Paragraph::new(body)
        .style(text_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(format!("{}{}", kind.title(), status)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.scroll(kind), 0));

    frame.render_widget(paragraph, area);
}

fn trigger_span(label: &str, enabled: bool) -> Span<'static> {
    let style = if enabled {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    Span::styled(format!(" {label} "), style)
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        trigger_span("[F2] Analyze Code", app.orchestrator.can_trigger(PaneKind::Explanation)),
        trigger_span("[F5] Run Code", app.orchestrator.can_trigger(PaneKind::Execution)),
        Span::raw(format!("| F1 help | {} ", app.endpoint)),
    ]);

    let status_paragraph =
        Paragraph::new(line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_paragraph, area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame) {
    let popup_area = centered_rect(70, 60, frame.area());

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let help_lines = vec![
        Line::from("Code Explainer Help"),
        Line::from(""),
        Line::from("Actions:"),
        Line::from("  F2         - Analyze code (explanation pane)"),
        Line::from("  F5         - Run code (execution pane)"),
        Line::from("  F3         - Next language"),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  Tab        - Switch focused pane"),
        Line::from("  PgUp/PgDn  - Scroll focused pane"),
        Line::from("  Ctrl+L     - Clear editor"),
        Line::from("  Ctrl+C     - Quit"),
        Line::from("  F1/Esc     - Close this help"),
    ];

    let help_paragraph = Paragraph::new(Text::from(help_lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .title_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help_paragraph, popup_area);
}

/// Helper function to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render_ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn shows_panes_and_placeholders() {
        let mut app = App::new(Language::Python, String::new());
        app.edit(|e| e.insert_str("print('hi')"));
        app.begin(PaneKind::Explanation).unwrap();

        let screen = rendered(&app);
        assert!(screen.contains("AI Analysis (pending)"));
        assert!(screen.contains("Analyzing..."));
        assert!(screen.contains("Execution Output"));
        assert!(screen.contains("print('hi')"));
        assert!(screen.contains("Python"));
    }

    #[test]
    fn very_long_line_scrolls_horizontally() {
        let mut app = App::new(Language::Python, String::new());
        app.edit(|e| e.insert_str(&format!("{}END", "a".repeat(70_000))));

        let screen = rendered(&app);
        assert!(screen.contains("aaaEND"));
    }

    #[test]
    fn many_lines_keep_cursor_row_visible() {
        let mut app = App::new(Language::Python, String::new());
        let text: String = (0..70_000).map(|i| format!("line{i}\n")).collect();
        app.edit(|e| e.insert_str(&format!("{text}last_line")));

        let screen = rendered(&app);
        assert!(screen.contains("line69999"));
        assert!(screen.contains("last_line"));
        assert!(!screen.contains("line0 "));
    }

    #[test]
    fn status_bar_shows_endpoint() {
        let app = App::new(Language::Python, "http://127.0.0.1:4000/api/code-explainer".into());
        let screen = rendered(&app);
        assert!(screen.contains("http://127.0.0.1:4000/api/code-explainer"));
    }

    #[test]
    fn shows_settled_output() {
        let mut app = App::new(Language::Python, String::new());
        app.edit(|e| e.insert_str("print('hi')"));
        let req = app.begin(PaneKind::Execution).unwrap();
        app.settle(PaneKind::Execution, req.ticket, Settled::Success("hi\n".into()));

        let screen = rendered(&app);
        assert!(screen.contains("hi"));
        assert!(!screen.contains("Running..."));
    }
}
