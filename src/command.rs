/// A line entered after `:`
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Quit,
    Undo(usize),
    Redo(usize),
    /// Operator is kept as typed so unsupported symbols reach the calculator
    Operate { operator: String, operand: f64 },
    Clear,
    Theme(String),
    ThemeList,
    Unknown(String),
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(cmd) = Self::parse_operation(trimmed) {
            return Some(cmd);
        }

        let mut parts = trimmed.split_whitespace();
        let name = parts.next().unwrap_or("");
        let arg = parts.next();
        if parts.next().is_some() {
            return Some(Command::Unknown(trimmed.to_string()));
        }

        let cmd = match (name, arg) {
            ("q" | "quit", None) => Command::Quit,
            ("u" | "undo", count) => match Self::parse_count(count) {
                Some(n) => Command::Undo(n),
                None => Command::Unknown(trimmed.to_string()),
            },
            ("r" | "redo", count) => match Self::parse_count(count) {
                Some(n) => Command::Redo(n),
                None => Command::Unknown(trimmed.to_string()),
            },
            ("clear", None) => Command::Clear,
            ("theme", Some(name)) => Command::Theme(name.to_string()),
            ("theme" | "themes", None) => Command::ThemeList,
            _ => Command::Unknown(trimmed.to_string()),
        };
        Some(cmd)
    }

    /// Missing count means one step
    fn parse_count(arg: Option<&str>) -> Option<usize> {
        match arg {
            None => Some(1),
            Some(s) => s.parse().ok(),
        }
    }

    /// `<symbol> <number>`, e.g. `* 3` or `/2`
    fn parse_operation(s: &str) -> Option<Self> {
        let split = s
            .find(|c: char| c.is_alphanumeric() || c.is_whitespace() || c == '.')
            .unwrap_or(s.len());
        if split == 0 {
            return None;
        }
        let (operator, rest) = s.split_at(split);
        let operand = rest.trim().parse::<f64>().ok()?;
        Some(Command::Operate {
            operator: operator.to_string(),
            operand,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("quit"), Some(Command::Quit));
        assert_eq!(Command::parse("clear"), Some(Command::Clear));
        assert_eq!(Command::parse("themes"), Some(Command::ThemeList));
        assert_eq!(Command::parse("theme"), Some(Command::ThemeList));
        assert_eq!(
            Command::parse("theme light"),
            Some(Command::Theme("light".to_string()))
        );
    }

    #[test]
    fn test_parse_undo_redo_counts() {
        assert_eq!(Command::parse("undo"), Some(Command::Undo(1)));
        assert_eq!(Command::parse("u 3"), Some(Command::Undo(3)));
        assert_eq!(Command::parse("redo 12"), Some(Command::Redo(12)));
        assert_eq!(Command::parse("r"), Some(Command::Redo(1)));
        assert_eq!(Command::parse("undo 0"), Some(Command::Undo(0)));
        assert_eq!(
            Command::parse("undo -1"),
            Some(Command::Unknown("undo -1".to_string()))
        );
        assert_eq!(
            Command::parse("redo many"),
            Some(Command::Unknown("redo many".to_string()))
        );
    }

    #[test]
    fn test_parse_operations() {
        assert_eq!(
            Command::parse("* 3"),
            Some(Command::Operate { operator: "*".to_string(), operand: 3.0 })
        );
        assert_eq!(
            Command::parse("/2.5"),
            Some(Command::Operate { operator: "/".to_string(), operand: 2.5 })
        );
        assert_eq!(
            Command::parse("- -4"),
            Some(Command::Operate { operator: "-".to_string(), operand: -4.0 })
        );
        assert_eq!(
            Command::parse("+ .5"),
            Some(Command::Operate { operator: "+".to_string(), operand: 0.5 })
        );
    }

    #[test]
    fn test_unsupported_operator_is_still_an_operation() {
        assert_eq!(
            Command::parse("% 1"),
            Some(Command::Operate { operator: "%".to_string(), operand: 1.0 })
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            Command::parse("foobar"),
            Some(Command::Unknown("foobar".to_string()))
        );
        assert_eq!(Command::parse("* x"), Some(Command::Unknown("* x".to_string())));
        assert_eq!(Command::parse("q now"), Some(Command::Unknown("q now".to_string())));
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   "), None);
    }

    #[test]
    fn test_parse_with_whitespace() {
        assert_eq!(Command::parse("  q  "), Some(Command::Quit));
        assert_eq!(Command::parse("\tundo   2\n"), Some(Command::Undo(2)));
    }
}
