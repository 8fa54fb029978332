use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, Message};
use crate::config::Action;
use crate::engine::{HistoryEntry, Operator};
use crate::mode::Mode;

pub fn render(frame: &mut Frame, app: &App) {
    if let Some(bg) = app.style.background() {
        frame.render_widget(Block::default().style(Style::default().bg(bg)), frame.size());
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    render_value(frame, app, chunks[0]);
    render_operand(frame, app, chunks[1]);
    render_history(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
    render_command_line(frame, app, chunks[4]);
}

fn bordered(app: &App, title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(app.style.border())
        .title(format!(" {} ", title))
}

fn render_value(frame: &mut Frame, app: &App, area: Rect) {
    let value = Paragraph::new(Span::styled(
        app.calculator.value().to_string(),
        app.style.value(),
    ))
    .alignment(Alignment::Right)
    .block(bordered(app, "Current Value"));
    frame.render_widget(value, area);
}

fn render_operand(frame: &mut Frame, app: &App, area: Rect) {
    let operand = Paragraph::new(Span::styled(app.operand.buffer.as_str(), app.style.operand()))
        .block(bordered(app, "Operand"));
    frame.render_widget(operand, area);

    if app.mode == Mode::Normal {
        let x = area.x + 1 + app.operand.cursor as u16;
        frame.set_cursor(x.min(area.right().saturating_sub(2)), area.y + 1);
    }
}

fn entry_line(index: usize, entry: &HistoryEntry, style: Style) -> ListItem<'static> {
    ListItem::new(Line::from(vec![
        Span::styled(format!("{:>4}  ", index + 1), style),
        Span::styled(entry.command().to_string(), style),
    ]))
}

fn render_history(frame: &mut Frame, app: &App, area: Rect) {
    let history = app.calculator.history();
    let title = format!("History {}/{}", history.cursor(), history.len());
    let block = bordered(app, &title);

    if app.calculator.is_empty() {
        let empty = Paragraph::new(Span::styled("No operations yet", app.style.history_undone()))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let applied = history.applied();
    let mut items: Vec<ListItem> = Vec::with_capacity(history.len());
    for (i, entry) in applied.iter().enumerate() {
        let style = if i + 1 == applied.len() {
            app.style.history_cursor()
        } else {
            app.style.history_applied()
        };
        items.push(entry_line(i, entry, style));
    }
    for (i, entry) in history.pending().iter().enumerate() {
        items.push(entry_line(applied.len() + i, entry, app.style.history_undone()));
    }

    // keep the cursor in view when the log is taller than the panel
    let visible = area.height.saturating_sub(2) as usize;
    let skip = if history.cursor() > visible {
        history.cursor() - visible
    } else {
        0
    };
    let items: Vec<ListItem> = items.into_iter().skip(skip).collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let history = app.calculator.history();
    let next_undo = history
        .peek_undo()
        .map(|e| format!("undo: {}", e.command()))
        .unwrap_or_else(|| "undo: -".to_string());
    let next_redo = history
        .peek_redo()
        .map(|e| format!("redo: {}", e.command()))
        .unwrap_or_else(|| "redo: -".to_string());

    let status = Line::from(vec![
        Span::styled(format!(" {} ", app.mode.display_name()), app.style.status_mode(&app.mode)),
        Span::raw(" "),
        Span::raw(next_undo),
        Span::raw("  "),
        Span::raw(next_redo),
        Span::raw("  "),
        Span::raw(help_text(app)),
    ]);

    frame.render_widget(Paragraph::new(status).style(app.style.status_bar()), area);
}

/// Short key reference built from the live key table
fn help_text(app: &App) -> String {
    let key = |action| {
        app.keys
            .key_for(action)
            .map(|c| c.to_string())
            .unwrap_or_else(|| "?".to_string())
    };
    let ops: String = Operator::ALL
        .iter()
        .map(|op| key(Action::Operate(*op)))
        .collect();
    format!(
        "[{}] operate  [{}] undo  [{}] redo  [{}] cmd  [{}] quit",
        ops,
        key(Action::Undo),
        key(Action::Redo),
        key(Action::CommandLine),
        key(Action::Quit)
    )
}

fn render_command_line(frame: &mut Frame, app: &App, area: Rect) {
    let line = match app.mode {
        Mode::Command => {
            frame.set_cursor(area.x + 1 + app.command_buffer().chars().count() as u16, area.y);
            Line::from(vec![
                Span::styled(":", app.style.command_prompt()),
                Span::styled(app.command_buffer(), app.style.command_line()),
            ])
        }
        Mode::Normal => match &app.message {
            Some(Message::Info(msg)) => Line::from(Span::styled(msg.as_str(), app.style.message_info())),
            Some(Message::Error(msg)) => Line::from(Span::styled(msg.as_str(), app.style.message_error())),
            None => Line::default(),
        },
    };

    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, KeyTable};
    use crate::style::Theme;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn make_app() -> App {
        App::new(&AppConfig::default(), Theme::dark(), KeyTable::default())
    }

    fn screen(app: &App) -> String {
        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_help_text_uses_key_table() {
        let app = make_app();
        assert_eq!(
            help_text(&app),
            "[+-*/] operate  [u] undo  [r] redo  [:] cmd  [q] quit"
        );
    }

    #[test]
    fn test_render_empty_history() {
        let app = make_app();
        let out = screen(&app);
        assert!(out.contains("Current Value"));
        assert!(out.contains("100"));
        assert!(out.contains("No operations yet"));
        assert!(out.contains("History 0/0"));
    }

    #[test]
    fn test_command_cursor_counts_characters() {
        let mut app = make_app();
        app.handle_key(KeyEvent::new(KeyCode::Char(':'), KeyModifiers::NONE));
        for c in "thème".chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }

        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        assert_eq!(terminal.get_cursor().unwrap(), (6, 11));
    }

    #[test]
    fn test_render_history_entries() {
        let mut app = make_app();
        app.calculator.operate(Operator::Add, 5.0).unwrap();
        app.calculator.operate(Operator::Multiply, 2.0).unwrap();
        app.calculator.undo(1);

        let out = screen(&app);
        assert!(out.contains("History 1/2"));
        assert!(out.contains("+ 5"));
        assert!(out.contains("* 2"));
        assert!(out.contains("105"));
        assert!(out.contains("undo: + 5"));
        assert!(out.contains("redo: * 2"));
    }
}
