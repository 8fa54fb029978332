pub mod calculator;
pub mod command;
pub mod error;
pub mod history;

pub use calculator::Calculator;
pub use command::Operator;
pub use error::EngineError;
pub use history::HistoryEntry;
