use tracing::{debug, warn};

use super::command::{Command, Operator};
use super::error::EngineError;
use super::history::{History, HistoryEntry};

/// An accumulator whose every change goes through a reversible command
#[derive(Debug, Default)]
pub struct Calculator {
    value: f64,
    history: History,
}

impl Calculator {
    pub fn new(initial: f64) -> Self {
        Self {
            value: initial,
            history: History::new(),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Number of history entries currently applied
    pub fn cursor(&self) -> usize {
        self.history.cursor()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Apply `operator` with `operand` to the current value and record it.
    /// Anything previously undone is dropped from the history.
    pub fn operate(&mut self, operator: Operator, operand: f64) -> Result<f64, EngineError> {
        let command = Command::new(operator, operand).map_err(|e| {
            warn!(value = self.value, %operator, operand, error = %e, "operation rejected");
            e
        })?;

        let result = command.forward(self.value);
        if !result.is_finite() {
            warn!(value = self.value, %operator, operand, "operation overflowed");
            return Err(EngineError::NonFiniteResult);
        }

        debug!(
            value = self.value,
            %command,
            history = self.history.len(),
            discarded = self.history.undone(),
            "executing"
        );

        self.history.record(HistoryEntry::new(command, self.value));
        self.value = result;
        Ok(self.value)
    }

    /// Like [`Calculator::operate`], with the operator given as text
    pub fn operate_str(&mut self, operator: &str, operand: f64) -> Result<f64, EngineError> {
        let operator = operator.parse::<Operator>().map_err(|e| {
            warn!(operator, error = %e, "operation rejected");
            e
        })?;
        self.operate(operator, operand)
    }

    /// Undo up to `count` entries, most recent first
    pub fn undo(&mut self, count: usize) -> f64 {
        let mut steps = 0;
        while steps < count {
            let Some(entry) = self.history.undo() else {
                break;
            };
            self.value = entry.undo(self.value);
            steps += 1;
        }
        debug!(requested = count, steps, cursor = self.history.cursor(), value = self.value, "undo");
        self.value
    }

    /// Redo up to `count` entries, oldest first
    pub fn redo(&mut self, count: usize) -> f64 {
        let mut steps = 0;
        while steps < count {
            let Some(entry) = self.history.redo() else {
                break;
            };
            self.value = entry.run(self.value);
            steps += 1;
        }
        debug!(requested = count, steps, cursor = self.history.cursor(), value = self.value, "redo");
        self.value
    }

    /// Start over from `value` with an empty history
    pub fn reset(&mut self, value: f64) {
        debug!(value, dropped = self.history.len(), "reset");
        self.value = value;
        self.history.clear();
    }
}
