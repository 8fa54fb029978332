use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::engine::Operator;
use crate::style::Theme;

/// What a single key press in normal mode asks for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Operate(Operator),
    Undo,
    Redo,
    UndoAll,
    RedoAll,
    Negate,
    CommandLine,
    Quit,
}

/// Normal-mode key map. Digits, '.' and Backspace always edit the operand
/// and cannot be bound.
#[derive(Debug, Clone)]
pub struct KeyTable {
    map: HashMap<char, Action>,
}

impl KeyTable {
    pub fn get(&self, c: char) -> Option<Action> {
        self.map.get(&c).copied()
    }

    /// Key currently bound to `action`, for the help line
    pub fn key_for(&self, action: Action) -> Option<char> {
        let mut keys: Vec<char> = self
            .map
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(c, _)| *c)
            .collect();
        keys.sort_unstable();
        keys.first().copied()
    }
}

impl Default for KeyTable {
    fn default() -> Self {
        // the defaults always validate
        KeyBindings::default()
            .build()
            .unwrap_or_else(|_| KeyTable { map: HashMap::new() })
    }
}

/// Key bindings as written in the config file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyBindings {
    pub add: String,
    pub subtract: String,
    pub multiply: String,
    pub divide: String,
    pub undo: String,
    pub redo: String,
    pub undo_all: String,
    pub redo_all: String,
    pub negate: String,
    pub command: String,
    pub quit: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            add: "+".to_string(),
            subtract: "-".to_string(),
            multiply: "*".to_string(),
            divide: "/".to_string(),
            undo: "u".to_string(),
            redo: "r".to_string(),
            undo_all: "U".to_string(),
            redo_all: "R".to_string(),
            negate: "~".to_string(),
            command: ":".to_string(),
            quit: "q".to_string(),
        }
    }
}

impl KeyBindings {
    pub fn build(&self) -> Result<KeyTable, String> {
        let bindings = [
            ("add", &self.add, Action::Operate(Operator::Add)),
            ("subtract", &self.subtract, Action::Operate(Operator::Subtract)),
            ("multiply", &self.multiply, Action::Operate(Operator::Multiply)),
            ("divide", &self.divide, Action::Operate(Operator::Divide)),
            ("undo", &self.undo, Action::Undo),
            ("redo", &self.redo, Action::Redo),
            ("undo_all", &self.undo_all, Action::UndoAll),
            ("redo_all", &self.redo_all, Action::RedoAll),
            ("negate", &self.negate, Action::Negate),
            ("command", &self.command, Action::CommandLine),
            ("quit", &self.quit, Action::Quit),
        ];

        let mut map = HashMap::new();
        for (name, key, action) in bindings {
            let mut chars = key.chars();
            let c = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(format!("Key for '{}' must be a single character, got '{}'", name, key)),
            };
            if c.is_ascii_digit() || c == '.' || c.is_whitespace() {
                return Err(format!("Key '{}' for '{}' is reserved for operand entry", c, name));
            }
            if map.insert(c, action).is_some() {
                return Err(format!("Key '{}' is bound more than once", c));
            }
        }
        Ok(KeyTable { map })
    }
}

/// Settings read from the TOML config file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub initial_value: f64,
    pub operand: f64,
    pub theme: String,
    pub theme_file: Option<PathBuf>,
    pub keys: KeyBindings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial_value: 100.0,
            operand: 5.0,
            theme: "dark".to_string(),
            theme_file: None,
            keys: KeyBindings::default(),
        }
    }
}

impl AppConfig {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        let mut config = Self::parse(&content)?;

        // theme_file is relative to the config file
        if let Some(dir) = path.parent() {
            config.theme_file = config.theme_file.take().map(|file| {
                if file.is_relative() { dir.join(file) } else { file }
            });
        }
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.initial_value.is_finite() {
            return Err(format!("initial_value must be finite, got {}", self.initial_value));
        }
        if !self.operand.is_finite() {
            return Err(format!("operand must be finite, got {}", self.operand));
        }
        self.keys.build().map(|_| ())
    }

    pub fn key_table(&self) -> Result<KeyTable, String> {
        self.keys.build()
    }

    /// The theme file wins over the theme name
    pub fn resolve_theme(&self) -> Result<Theme, String> {
        match &self.theme_file {
            Some(path) => Theme::from_file(path),
            None => Theme::by_name(&self.theme).ok_or_else(|| {
                format!(
                    "Unknown theme '{}'. Available: {}",
                    self.theme,
                    Theme::builtin_names().join(", ")
                )
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.initial_value, 100.0);
        assert_eq!(config.operand, 5.0);
    }

    #[test]
    fn test_partial_config() {
        let config = AppConfig::parse(
            r#"
            initial_value = 2.5
            theme = "light"

            [keys]
            undo = "z"
            "#,
        )
        .unwrap();
        assert_eq!(config.initial_value, 2.5);
        assert_eq!(config.operand, 5.0);
        assert_eq!(config.resolve_theme().map(|t| t.name), Ok("light".to_string()));

        let keys = config.key_table().unwrap();
        assert_eq!(keys.get('z'), Some(Action::Undo));
        assert_eq!(keys.get('u'), None);
        assert_eq!(keys.get('r'), Some(Action::Redo));
    }

    #[test]
    fn test_default_key_table() {
        let keys = KeyTable::default();
        assert_eq!(keys.get('+'), Some(Action::Operate(Operator::Add)));
        assert_eq!(keys.get('/'), Some(Action::Operate(Operator::Divide)));
        assert_eq!(keys.get('U'), Some(Action::UndoAll));
        assert_eq!(keys.get(':'), Some(Action::CommandLine));
        assert_eq!(keys.get('5'), None);
        assert_eq!(keys.key_for(Action::Quit), Some('q'));
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let err = AppConfig::parse("[keys]\nundo = \"uu\"").unwrap_err();
        assert!(err.contains("single character"));

        let err = AppConfig::parse("[keys]\nredo = \"7\"").unwrap_err();
        assert!(err.contains("reserved"));

        let err = AppConfig::parse("[keys]\nredo = \"u\"").unwrap_err();
        assert!(err.contains("more than once"));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(AppConfig::parse("precision = 3").is_err());
    }

    #[test]
    fn test_non_finite_values_rejected() {
        assert!(AppConfig::parse("initial_value = nan").is_err());
        assert!(AppConfig::parse("operand = inf").is_err());
    }

    #[test]
    fn test_unknown_theme() {
        let config = AppConfig::parse("theme = \"neon\"").unwrap();
        assert!(config.resolve_theme().unwrap_err().contains("Unknown theme"));
    }

    #[test]
    fn test_from_file_resolves_relative_theme_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("tally.toml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "theme_file = \"mine.toml\"").unwrap();

        let mut theme = Theme::light();
        theme.name = "mine".to_string();
        std::fs::write(dir.path().join("mine.toml"), toml::to_string(&theme).unwrap()).unwrap();

        let config = AppConfig::from_file(&config_path).unwrap();
        assert_eq!(config.theme_file, Some(dir.path().join("mine.toml")));
        assert_eq!(config.resolve_theme().map(|t| t.name), Ok("mine".to_string()));
    }

    #[test]
    fn test_from_file_missing() {
        let err = AppConfig::from_file(Path::new("/nonexistent/tally.toml")).unwrap_err();
        assert!(err.starts_with("Failed to read config file"));
    }
}
