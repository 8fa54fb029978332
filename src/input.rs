use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Check for escape key (Esc or Ctrl+[)
pub fn is_escape(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('[') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// The number the next operator key will use.
///
/// Only ever holds ASCII (digits, one '.', a leading '-'), so the cursor is
/// a byte offset.
pub struct OperandInput {
    pub buffer: String,
    pub cursor: usize,
}

impl OperandInput {
    pub fn new(initial: f64) -> Self {
        let buffer = initial.to_string();
        let cursor = buffer.len();
        Self { buffer, cursor }
    }

    /// Parsed operand, `None` while the buffer is empty or incomplete
    pub fn value(&self) -> Option<f64> {
        self.buffer.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Handle an editing key, returns false if the key is not for the operand
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }

        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.buffer.insert(self.cursor, c);
                self.cursor += 1;
            }
            KeyCode::Char('.') => {
                if !self.buffer.contains('.') {
                    self.buffer.insert(self.cursor.max(self.sign_len()), '.');
                    self.cursor = self.cursor.max(self.sign_len()) + 1;
                }
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.buffer.remove(self.cursor);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.buffer.len() {
                    self.buffer.remove(self.cursor);
                }
            }
            KeyCode::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
            }
            KeyCode::Right => {
                self.cursor = std::cmp::min(self.cursor + 1, self.buffer.len());
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.buffer.len(),
            _ => return false,
        }
        true
    }

    /// Flip the sign, keeping the cursor on the same digit
    pub fn negate(&mut self) {
        if self.buffer.starts_with('-') {
            self.buffer.remove(0);
            self.cursor = self.cursor.saturating_sub(1);
        } else {
            self.buffer.insert(0, '-');
            self.cursor += 1;
        }
    }

    fn sign_len(&self) -> usize {
        if self.buffer.starts_with('-') { 1 } else { 0 }
    }
}

/// What the command line did with a key
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Continue,
    Cancel,
    Submit(String),
}

pub struct CommandHandler {
    pub buffer: String,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    pub fn start(&mut self) {
        self.buffer.clear();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> CommandResult {
        if is_escape(key) {
            self.buffer.clear();
            return CommandResult::Cancel;
        }

        match key.code {
            KeyCode::Enter => CommandResult::Submit(std::mem::take(&mut self.buffer)),
            KeyCode::Backspace => {
                // backspace on an empty line leaves command mode, like vim
                if self.buffer.pop().is_none() {
                    return CommandResult::Cancel;
                }
                CommandResult::Continue
            }
            KeyCode::Char(c) => {
                self.buffer.push(c);
                CommandResult::Continue
            }
            _ => CommandResult::Continue,
        }
    }
}
