use super::command::Command;

/// A command as it was recorded in the history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry {
    command: Command,
    /// Value before the command ran, kept only when the inverse does not
    /// land back on it exactly
    replaced: Option<f64>,
}

impl HistoryEntry {
    /// Record `command` as applied to `before`. The prior value is kept
    /// whenever the inverse would not reproduce it exactly (`* 0`, underflow).
    pub fn new(command: Command, before: f64) -> Self {
        let after = command.forward(before);
        let replaced = if command.inverse(after) == before {
            None
        } else {
            Some(before)
        };
        Self { command, replaced }
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn run(&self, value: f64) -> f64 {
        self.command.forward(value)
    }

    pub fn undo(&self, value: f64) -> f64 {
        match self.replaced {
            Some(before) => before,
            None => self.command.inverse(value),
        }
    }
}

/// Manages undo/redo history.
///
/// Entries before the cursor are applied, entries from the cursor on have
/// been undone and can be redone.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
        }
    }

    /// Record an entry (discards anything that was undone)
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.cursor);
        self.entries.push(entry);
        self.cursor = self.entries.len();
    }

    /// Step back over the most recently applied entry, returning it so the
    /// caller can reverse it
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward over the next undone entry, returning it for replay
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        let entry = self.entries.get(self.cursor)?;
        self.cursor += 1;
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Peek at the next undo entry without moving the cursor
    pub fn peek_undo(&self) -> Option<&HistoryEntry> {
        self.cursor.checked_sub(1).and_then(|idx| self.entries.get(idx))
    }

    /// Peek at the next redo entry without moving the cursor
    pub fn peek_redo(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries that can currently be redone
    pub fn undone(&self) -> usize {
        self.entries.len() - self.cursor
    }

    /// Applied entries, oldest first
    pub fn applied(&self) -> &[HistoryEntry] {
        &self.entries[..self.cursor]
    }

    /// Undone entries, in the order redo would replay them
    pub fn pending(&self) -> &[HistoryEntry] {
        &self.entries[self.cursor..]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::command::Operator;

    fn entry(operator: Operator, operand: f64) -> HistoryEntry {
        HistoryEntry::new(Command::new(operator, operand).unwrap(), 0.0)
    }

    #[test]
    fn test_record_advances_cursor() {
        let mut history = History::new();
        history.record(entry(Operator::Add, 1.0));
        history.record(entry(Operator::Add, 2.0));
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.len(), 2);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_then_redo_walks_cursor() {
        let mut history = History::new();
        history.record(entry(Operator::Add, 1.0));
        history.record(entry(Operator::Add, 2.0));

        assert_eq!(history.undo().map(|e| e.command().operand), Some(2.0));
        assert_eq!(history.undo().map(|e| e.command().operand), Some(1.0));
        assert!(history.undo().is_none());
        assert_eq!(history.cursor(), 0);

        assert_eq!(history.redo().map(|e| e.command().operand), Some(1.0));
        assert_eq!(history.cursor(), 1);
        assert_eq!(history.undone(), 1);
    }

    #[test]
    fn test_record_after_undo_truncates() {
        let mut history = History::new();
        history.record(entry(Operator::Add, 1.0));
        history.record(entry(Operator::Add, 2.0));
        history.record(entry(Operator::Add, 3.0));
        history.undo();
        history.undo();

        history.record(entry(Operator::Subtract, 9.0));
        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), 2);
        assert!(history.redo().is_none());
        assert_eq!(history.applied()[1].command().operator, Operator::Subtract);
    }

    #[test]
    fn test_peek_does_not_move_cursor() {
        let mut history = History::new();
        assert!(history.peek_undo().is_none());
        history.record(entry(Operator::Multiply, 2.0));
        assert!(history.peek_undo().is_some());
        assert!(history.peek_redo().is_none());
        history.undo();
        assert!(history.peek_undo().is_none());
        assert_eq!(history.peek_redo().map(|e| e.command().operand), Some(2.0));
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.pending().len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.record(entry(Operator::Add, 1.0));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn test_non_invertible_entry_restores_previous_value() {
        let cmd = Command::new(Operator::Multiply, 0.0).unwrap();
        let entry = HistoryEntry::new(cmd, 42.0);
        assert_eq!(entry.run(42.0), 0.0);
        assert_eq!(entry.undo(0.0), 42.0);
    }

    #[test]
    fn test_exact_inverse_keeps_no_snapshot() {
        let entry = HistoryEntry::new(Command::new(Operator::Add, 5.0).unwrap(), 100.0);
        assert_eq!(entry.replaced, None);
        assert_eq!(entry.undo(7.0), 2.0);
    }

    #[test]
    fn test_lossy_entries_keep_snapshot() {
        let underflow = HistoryEntry::new(Command::new(Operator::Multiply, 1e-200).unwrap(), 1e-200);
        assert_eq!(underflow.replaced, Some(1e-200));

        let rounded = HistoryEntry::new(Command::new(Operator::Divide, 3.0).unwrap(), f64::MAX);
        assert_eq!(rounded.replaced, Some(f64::MAX));
        assert_eq!(rounded.undo(rounded.run(f64::MAX)), f64::MAX);
    }
}
