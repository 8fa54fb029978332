use std::io;
use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use crate::command::Command;
use crate::config::{Action, AppConfig, KeyTable};
use crate::engine::{Calculator, EngineError, Operator};
use crate::input::{CommandHandler, CommandResult, OperandInput};
use crate::mode::Mode;
use crate::style::{Style, Theme};
use crate::ui;

/// Feedback shown on the bottom line until the next key press
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Info(String),
    Error(String),
}

pub struct App {
    pub calculator: Calculator,
    pub operand: OperandInput,
    pub keys: KeyTable,
    pub style: Style,
    pub mode: Mode,
    pub message: Option<Message>,
    pub should_quit: bool,
    initial_value: f64,
    command_handler: CommandHandler,
}

impl App {
    pub fn new(config: &AppConfig, theme: Theme, keys: KeyTable) -> Self {
        Self {
            calculator: Calculator::new(config.initial_value),
            operand: OperandInput::new(config.operand),
            keys,
            style: Style::with_theme(theme),
            mode: Mode::Normal,
            message: None,
            should_quit: false,
            initial_value: config.initial_value,
            command_handler: CommandHandler::new(),
        }
    }

    pub fn command_buffer(&self) -> &str {
        &self.command_handler.buffer
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|f| ui::render(f, self))?;

            if poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    // crossterm reports releases on some platforms
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    self.message = None;
                    self.handle_key(key);
                }
            }
        }
        info!(value = self.calculator.value(), history = self.calculator.len(), "quitting");
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Command => self.handle_command_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('r') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.redo(1);
            return;
        }

        if self.operand.handle_key(key) {
            return;
        }

        let action = match key.code {
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.keys.get(c)
            }
            _ => None,
        };

        match action {
            Some(Action::Operate(operator)) => self.operate_with_input(operator),
            Some(Action::Undo) => self.undo(1),
            Some(Action::Redo) => self.redo(1),
            Some(Action::UndoAll) => self.undo(self.calculator.cursor()),
            Some(Action::RedoAll) => self.redo(self.calculator.history().undone()),
            Some(Action::Negate) => self.operand.negate(),
            Some(Action::CommandLine) => {
                self.mode = Mode::Command;
                self.command_handler.start();
            }
            Some(Action::Quit) => self.should_quit = true,
            None => {}
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) {
        match self.command_handler.handle_key(key) {
            CommandResult::Continue => {}
            CommandResult::Cancel => self.mode = Mode::Normal,
            CommandResult::Submit(line) => {
                self.mode = Mode::Normal;
                if let Some(cmd) = Command::parse(&line) {
                    self.execute_command(cmd);
                }
            }
        }
    }

    pub fn execute_command(&mut self, cmd: Command) {
        match cmd {
            Command::Quit => self.should_quit = true,
            Command::Undo(count) => self.undo(count),
            Command::Redo(count) => self.redo(count),
            Command::Operate { operator, operand } => {
                let result = self.calculator.operate_str(&operator, operand);
                self.report(result);
            }
            Command::Clear => {
                self.calculator.reset(self.initial_value);
                self.message = Some(Message::Info("History cleared".to_string()));
            }
            Command::Theme(name) => match Theme::by_name(&name) {
                Some(theme) => {
                    self.message = Some(Message::Info(format!("Theme: {}", theme.name)));
                    self.style.set_theme(theme);
                }
                None => {
                    self.message = Some(Message::Error(format!(
                        "Unknown theme '{}'. Available: {}",
                        name,
                        Theme::builtin_names().join(", ")
                    )));
                }
            },
            Command::ThemeList => {
                self.message = Some(Message::Info(format!(
                    "Themes: {} (current: {})",
                    Theme::builtin_names().join(", "),
                    self.style.theme.name
                )));
            }
            Command::Unknown(line) => {
                self.message = Some(Message::Error(format!("Unknown command: {}", line)));
            }
        }
    }

    fn operate_with_input(&mut self, operator: Operator) {
        match self.operand.value() {
            Some(operand) => {
                let result = self.calculator.operate(operator, operand);
                self.report(result);
            }
            None => {
                self.message = Some(Message::Error(format!(
                    "Invalid operand: '{}'",
                    self.operand.buffer
                )));
            }
        }
    }

    fn report(&mut self, result: Result<f64, EngineError>) {
        if let Err(e) = result {
            warn!(error = %e, "operation failed");
            self.message = Some(Message::Error(format!("Error: {}", e)));
        }
    }

    fn undo(&mut self, count: usize) {
        if !self.calculator.can_undo() {
            self.message = Some(Message::Info("Nothing to undo".to_string()));
            return;
        }
        let before = self.calculator.cursor();
        self.calculator.undo(count);
        let steps = before - self.calculator.cursor();
        if steps > 0 {
            self.message = Some(Message::Info(step_message("Undo", steps)));
        }
    }

    fn redo(&mut self, count: usize) {
        if !self.calculator.can_redo() {
            self.message = Some(Message::Info("Nothing to redo".to_string()));
            return;
        }
        let before = self.calculator.cursor();
        self.calculator.redo(count);
        let steps = self.calculator.cursor() - before;
        if steps > 0 {
            self.message = Some(Message::Info(step_message("Redo", steps)));
        }
    }
}

fn step_message(verb: &str, steps: usize) -> String {
    match steps {
        1 => verb.to_string(),
        n => format!("{} ({} steps)", verb, n),
    }
}
